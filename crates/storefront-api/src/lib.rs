//! Storefront resource APIs, session state, and checkout.
//!
//! Each endpoint is a free function over a borrowed
//! [`ApiClient`](storefront_client::ApiClient) that builds the path and
//! query string, sends the call, and returns the typed payload.
//! [`AppState`] ties the shared cart to the customer session, and
//! [`checkout`] turns that cart into an order.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_api::prelude::*;
//!
//! let state = AppState::new(ApiClient::from_env()?);
//! state.initialize().await;
//!
//! let products = products::get_products(state.client(), &ProductsQuery::active_for("acme")).await?;
//! state.cart().add_item(products[0].clone(), 1, None)?;
//! let order = checkout::place_order(&state, CheckoutOptions::default()).await?;
//! ```

pub mod auth;
pub mod bookings;
pub mod checkout;
pub mod discounts;
pub mod orders;
pub mod products;
pub mod query;
pub mod state;

#[cfg(test)]
mod testing;

pub use checkout::{CheckoutError, CheckoutOptions, Fulfillment};
pub use orders::OrdersQuery;
pub use products::ProductsQuery;
pub use state::{AppState, AuthState, AuthStatus, CartHandle, SessionError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{auth, bookings, checkout, discounts, orders, products};
    pub use crate::{
        AppState, AuthStatus, CartHandle, CheckoutError, CheckoutOptions, Fulfillment,
        OrdersQuery, ProductsQuery,
    };
    pub use storefront_client::{ApiClient, ApiError};
}
