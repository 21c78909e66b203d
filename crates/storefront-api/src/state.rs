//! Application state: the shared cart and the customer session.

use crate::auth::{self, VerifyOtpResponse};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use storefront_client::{ApiClient, TokenStoreError};
use storefront_commerce::cart::Cart;
use storefront_commerce::catalog::{Product, ProductVariation};
use storefront_commerce::customer::Customer;
use storefront_commerce::ids::ProductId;
use storefront_commerce::{CommerceError, Money};
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

/// Session persistence errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] TokenStoreError),

    #[error("Failed to encode customer profile: {0}")]
    Encode(#[from] serde_json::Error),
}

struct CartInner {
    cart: Mutex<Cart>,
    tx: watch::Sender<Cart>,
}

/// Shared, observable cart.
///
/// Every mutation that changes the cart publishes the new state to
/// subscribers. Clones share the same cart.
#[derive(Clone)]
pub struct CartHandle {
    inner: Arc<CartInner>,
}

impl CartHandle {
    pub fn new(cart: Cart) -> Self {
        let (tx, _) = watch::channel(cart.clone());
        Self {
            inner: Arc::new(CartInner {
                cart: Mutex::new(cart),
                tx,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the cart and notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut cart = self.lock();
        let result = f(&mut cart);
        self.inner.tx.send_replace(cart.clone());
        result
    }

    /// Like [`update`](Self::update), but only notifies when `f` succeeds.
    fn try_update<R>(
        &self,
        f: impl FnOnce(&mut Cart) -> Result<R, CommerceError>,
    ) -> Result<R, CommerceError> {
        let mut cart = self.lock();
        let result = f(&mut cart)?;
        self.inner.tx.send_replace(cart.clone());
        Ok(result)
    }

    /// Read the cart without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Receiver that sees every published cart state.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.tx.subscribe()
    }

    pub fn add_item(
        &self,
        product: Product,
        quantity: i64,
        variation: Option<ProductVariation>,
    ) -> Result<(), CommerceError> {
        self.try_update(|cart| cart.add_item(product, quantity, variation))
    }

    /// Returns whether a line was removed.
    pub fn remove_item(&self, product_id: &ProductId, variation: Option<&ProductVariation>) -> bool {
        let mut cart = self.lock();
        let removed = cart.remove_item(product_id, variation);
        if removed {
            self.inner.tx.send_replace(cart.clone());
        }
        removed
    }

    pub fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
        variation: Option<&ProductVariation>,
    ) -> Result<bool, CommerceError> {
        let mut cart = self.lock();
        let changed = cart.update_quantity(product_id, quantity, variation)?;
        if changed {
            self.inner.tx.send_replace(cart.clone());
        }
        Ok(changed)
    }

    pub fn set_discount_code(
        &self,
        code: impl Into<String>,
        amount: Option<Money>,
    ) -> Result<(), CommerceError> {
        let code = code.into();
        self.try_update(|cart| cart.set_discount_code(code, amount))
    }

    pub fn clear(&self) {
        self.update(Cart::clear);
    }
}

impl Default for CartHandle {
    fn default() -> Self {
        Self::new(Cart::new())
    }
}

impl fmt::Debug for CartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartHandle")
            .field("cart", &*self.lock())
            .finish()
    }
}

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// Stored credentials not yet checked.
    #[default]
    Loading,
    SignedOut,
    Guest,
    SignedIn,
}

impl AuthStatus {
    /// Signed in or browsing as a guest.
    pub fn has_access(&self) -> bool {
        matches!(self, AuthStatus::SignedIn | AuthStatus::Guest)
    }
}

/// Current session. The token is kept out of `Debug` output.
#[derive(Clone, Default)]
pub struct AuthState {
    pub status: AuthStatus,
    pub token: Option<String>,
    pub customer: Option<Customer>,
}

impl AuthState {
    fn signed_out() -> Self {
        Self {
            status: AuthStatus::SignedOut,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::SignedIn
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("status", &self.status)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("customer", &self.customer.as_ref().map(|c| &c.id))
            .finish()
    }
}

/// Cart plus session, shared by everything that talks to the backend.
#[derive(Debug)]
pub struct AppState {
    client: ApiClient,
    cart: CartHandle,
    auth: RwLock<AuthState>,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        Self::with_cart(client, Cart::new())
    }

    /// State seeded with a previously saved cart.
    pub fn with_cart(client: ApiClient, cart: Cart) -> Self {
        Self {
            client,
            cart: CartHandle::new(cart),
            auth: RwLock::new(AuthState::default()),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cart(&self) -> &CartHandle {
        &self.cart
    }

    pub async fn auth(&self) -> AuthState {
        self.auth.read().await.clone()
    }

    pub async fn status(&self) -> AuthStatus {
        self.auth.read().await.status
    }

    /// Restore a persisted session.
    ///
    /// Signed in only when both a token and a readable customer profile are
    /// stored; anything else leaves the session signed out.
    pub async fn initialize(&self) -> AuthStatus {
        let store = self.client.token_store();
        let token = store.get_token().await;
        let user = store.get_user_data().await;

        let state = match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_value::<Customer>(user) {
                Ok(customer) => {
                    debug!(customer_id = %customer.id, "Restored customer session");
                    AuthState {
                        status: AuthStatus::SignedIn,
                        token: Some(token),
                        customer: Some(customer),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Stored customer profile is unreadable");
                    AuthState::signed_out()
                }
            },
            _ => AuthState::signed_out(),
        };

        let status = state.status;
        *self.auth.write().await = state;
        status
    }

    /// Persist and adopt a verified session.
    pub async fn sign_in(&self, session: VerifyOtpResponse) -> Result<(), SessionError> {
        let store = self.client.token_store();
        let profile = serde_json::to_value(&session.user)?;

        store.save_token(&session.token).await?;
        if let Some(refresh) = &session.refresh_token {
            store.save_refresh_token(refresh).await?;
        }
        store.save_user_data(&profile).await?;

        info!(customer_id = %session.user.id, "Customer signed in");
        *self.auth.write().await = AuthState {
            status: AuthStatus::SignedIn,
            token: Some(session.token),
            customer: Some(session.user),
        };
        Ok(())
    }

    /// Browse without an account. Nothing is persisted.
    pub async fn continue_as_guest(&self) {
        *self.auth.write().await = AuthState {
            status: AuthStatus::Guest,
            ..AuthState::default()
        };
    }

    /// End the session: tell the backend (best effort), drop stored
    /// credentials, and empty the cart.
    pub async fn logout(&self) -> Result<(), SessionError> {
        if self.status().await == AuthStatus::SignedIn {
            if let Err(e) = auth::logout(&self.client).await {
                warn!(error = %e, "Server-side logout failed");
            }
        }

        self.client.token_store().remove_token().await?;
        self.cart.clear();
        *self.auth.write().await = AuthState::signed_out();
        info!("Customer signed out");
        Ok(())
    }
}
