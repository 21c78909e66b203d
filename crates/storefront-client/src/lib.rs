//! HTTP transport client for the storefront backend.
//!
//! Builds JSON requests against a configured base URL, attaches the bearer
//! token when a call requires auth, enforces a timeout, and turns every
//! outcome into either the unwrapped payload or a single [`ApiError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_client::ApiClient;
//! use storefront_commerce::Product;
//!
//! let client = ApiClient::from_env()?;
//!
//! // `{data: [...]}` and bare `[...]` bodies both decode here.
//! let products: Vec<Product> = client.get("/api/products?isActive=true", false).await?;
//!
//! match client.get::<serde_json::Value>("/api/transactions", true).await {
//!     Err(e) if e.status_code() == 0 => eprintln!("transport failure: {}", e),
//!     Err(e) => eprintln!("server said {}: {}", e.status_code(), e),
//!     Ok(orders) => println!("{}", orders),
//! }
//! ```

mod client;
pub mod config;
mod error;
mod request;
mod response;
mod token;
mod transport;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use client::ApiClient;
pub use config::{ApiConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, PLACEHOLDER_BASE_URL};
pub use error::{ApiError, ErrorClass, FieldErrors, TransportError, TIMEOUT_MESSAGE};
pub use request::{ApiRequest, HttpRequest, Method};
pub use response::HttpResponse;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
pub use transport::{ReqwestTransport, Transport};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ApiClient, ApiConfig, ApiError, ErrorClass, TokenStore};
}
