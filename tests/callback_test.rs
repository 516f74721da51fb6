use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query};
use spotplay::{api::callback, types::PendingAuth};
use tokio::sync::Mutex;

type Shared = Arc<Mutex<Option<PendingAuth>>>;

fn pending(state: &str) -> Shared {
    Arc::new(Mutex::new(Some(PendingAuth {
        state: state.to_string(),
        code: None,
    })))
}

fn query(pairs: &[(&str, &str)]) -> Query<HashMap<String, String>> {
    Query(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

async fn recorded_code(shared: &Shared) -> Option<String> {
    shared
        .lock()
        .await
        .as_ref()
        .and_then(|pending| pending.code.clone())
}

#[tokio::test]
async fn test_matching_state_records_code() {
    let shared = pending("abc123");

    let page = callback(
        query(&[("code", "AQBx"), ("state", "abc123")]),
        Extension(Arc::clone(&shared)),
    )
    .await;

    assert!(page.0.contains("successful"));
    assert_eq!(recorded_code(&shared).await, Some("AQBx".to_string()));
}

#[tokio::test]
async fn test_state_mismatch_is_ignored() {
    let shared = pending("abc123");

    let page = callback(
        query(&[("code", "AQBx"), ("state", "forged")]),
        Extension(Arc::clone(&shared)),
    )
    .await;

    assert!(page.0.contains("state mismatch"));
    assert_eq!(recorded_code(&shared).await, None);

    callback(query(&[("code", "AQBx")]), Extension(Arc::clone(&shared))).await;
    assert_eq!(recorded_code(&shared).await, None);
}

#[tokio::test]
async fn test_declined_authorization() {
    let shared = pending("abc123");

    let page = callback(
        query(&[("error", "access_denied"), ("state", "abc123")]),
        Extension(Arc::clone(&shared)),
    )
    .await;

    assert!(page.0.contains("Login failed"));
    assert_eq!(recorded_code(&shared).await, None);
}

#[tokio::test]
async fn test_missing_code_or_login() {
    let shared = pending("abc123");
    let page = callback(query(&[("state", "abc123")]), Extension(Arc::clone(&shared))).await;
    assert!(page.0.contains("Missing authorization code"));

    let idle: Shared = Arc::new(Mutex::new(None));
    let page = callback(
        query(&[("code", "AQBx"), ("state", "abc123")]),
        Extension(Arc::clone(&idle)),
    )
    .await;
    assert!(page.0.contains("No login in progress"));
    assert!(idle.lock().await.is_none());
}
