//! # API Module
//!
//! HTTP handlers for the temporary loopback server started by the login flow
//! when the configured redirect URI points at this machine.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives Spotify's authorization redirect, checks the
//!   `state` parameter and hands the authorization code to the waiting login
//!   flow through shared state.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use spotplay::api::callback;
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .layer(Extension(shared_state));
//! ```

mod callback;

pub use callback::callback;
