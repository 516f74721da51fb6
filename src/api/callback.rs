use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{types::PendingAuth, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PendingAuth>>>>,
) -> Html<&'static str> {
    if let Some(error) = params.get("error") {
        warning!("Authorization was declined: {}", error);
        return Html("<h4>Login failed.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(pending) = state.as_mut() else {
        return Html("<h4>No login in progress.</h4>");
    };

    if params.get("state") != Some(&pending.state) {
        warning!("Ignoring callback with a mismatching state parameter");
        return Html("<h4>Login failed: state mismatch.</h4>");
    }

    pending.code = Some(code.clone());
    Html("<h2>Authentication successful.</h2><p>You can close this window.</p>")
}
