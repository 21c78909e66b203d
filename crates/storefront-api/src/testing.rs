//! Shared fixtures for endpoint tests.

use std::sync::Arc;
use storefront_client::{ApiClient, ApiConfig, MemoryTokenStore, MockTransport};

pub const BASE: &str = "https://shop.test";

/// Client over a fresh mock transport, optionally signed in.
pub fn mock_client(token: Option<&str>) -> (ApiClient, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let tokens = match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    };
    let client = ApiClient::new(ApiConfig::new(BASE), mock.clone(), Arc::new(tokens));
    (client, mock)
}
