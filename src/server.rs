use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use reqwest::Url;
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};

use crate::{Res, api, types::PendingAuth};

/// Starts the loopback server that receives the OAuth redirect.
///
/// Binds to the host and port of `redirect_uri` and serves the callback on its
/// path. Binding happens before this returns, so an occupied port is reported
/// to the caller; the server itself runs on a spawned task until aborted.
pub async fn start_callback_server(
    redirect_uri: &str,
    state: Arc<Mutex<Option<PendingAuth>>>,
) -> Res<JoinHandle<()>> {
    let url = Url::parse(redirect_uri)?;
    let addr = url
        .socket_addrs(|| Some(80))?
        .into_iter()
        .next()
        .ok_or_else(|| format!("Cannot resolve redirect address {}", redirect_uri))?;

    let path = match url.path() {
        "" => "/".to_string(),
        p => p.to_string(),
    };

    let app = Router::new()
        .route(&path, get(api::callback))
        .layer(Extension(state));

    let listener = TcpListener::bind(addr).await?;
    Ok(tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    }))
}
