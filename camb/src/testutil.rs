//! Local stand-in for the CAMB.AI API used by tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    http::{HeaderMap, StatusCode},
    Router,
};

use super::{client::Client, http::API_KEY_HEADER};

pub(crate) const TEST_API_KEY: &str = "test-key";

/// Serves `router` on an ephemeral local port and returns its base URL.
pub(crate) async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Builds a client pointed at a local server.
pub(crate) fn client(base_url: &str, output_dir: &std::path::Path) -> Client {
    Client::builder()
        .api_key(TEST_API_KEY)
        .base_url(base_url)
        .output_dir(output_dir)
        .build()
        .unwrap()
}

/// Rejects requests that do not carry the test API key.
pub(crate) fn authorized(headers: &HeaderMap) -> Result<(), (StatusCode, &'static str)> {
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(TEST_API_KEY) => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, "missing api key")),
    }
}

/// Shared request counter.
#[derive(Clone, Default)]
pub(crate) struct Counter(Arc<AtomicUsize>);

impl Counter {
    /// Increments and returns the previous count.
    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
