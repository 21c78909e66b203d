//! Discount application and order placement over the shared cart.

use crate::discounts::{validate_discount_code, ValidateDiscountRequest};
use crate::orders::create_order;
use crate::state::{AppState, CartHandle};
use storefront_client::{ApiClient, ApiError};
use storefront_commerce::checkout::{Address, Order, OrderDetails, PaymentMethod};
use storefront_commerce::{CommerceError, Money};
use thiserror::Error;
use tracing::{info, warn};

/// Percentage of the subtotal charged as estimated tax.
pub const DEFAULT_TAX_RATE_PERCENT: f64 = 10.0;

/// Flat fee for delivered orders.
pub const DEFAULT_DELIVERY_FEE: Money = Money::from_cents(500);

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error("Discount code rejected: {0}")]
    DiscountRejected(String),
}

/// How the order reaches the customer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fulfillment {
    Pickup,
    /// Delivered to the signed-in customer's primary address.
    #[default]
    Delivery,
    DeliveryTo(Address),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOptions {
    pub payment_method: PaymentMethod,
    pub fulfillment: Fulfillment,
    pub tax_rate_percent: f64,
    pub delivery_fee: Money,
    /// Contact overrides; the signed-in customer's details are used otherwise.
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            payment_method: PaymentMethod::default(),
            fulfillment: Fulfillment::default(),
            tax_rate_percent: DEFAULT_TAX_RATE_PERCENT,
            delivery_fee: DEFAULT_DELIVERY_FEE,
            customer_email: None,
            customer_phone: None,
            notes: None,
        }
    }
}

/// Validate `code` against the current subtotal and store it on the cart.
///
/// The cart is only touched when the backend accepts the code.
pub async fn apply_discount(
    client: &ApiClient,
    cart: &CartHandle,
    code: &str,
) -> Result<Money, CheckoutError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(CommerceError::InvalidDiscountCode(code.to_string()).into());
    }

    let request = ValidateDiscountRequest {
        code: code.to_string(),
        amount: cart.read(|c| c.subtotal()),
    };
    let response = validate_discount_code(client, &request).await?;

    if !response.valid {
        let reason = response
            .message
            .unwrap_or_else(|| "Invalid discount code".to_string());
        warn!(code = %code, reason = %reason, "Discount code rejected");
        return Err(CheckoutError::DiscountRejected(reason));
    }

    let amount = response.discount_amount.unwrap_or(Money::ZERO);
    cart.set_discount_code(code, Some(amount))?;
    info!(code = %code, amount = %amount, "Discount applied");
    Ok(amount)
}

/// Submit the cart as an order.
///
/// The cart is cleared only after the backend accepts the order; on any
/// error it is left as it was.
pub async fn place_order(state: &AppState, options: CheckoutOptions) -> Result<Order, CheckoutError> {
    let cart = state.cart().snapshot();
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart.into());
    }

    let customer = state.auth().await.customer;

    let (delivery_address, delivery_fee) = match options.fulfillment {
        Fulfillment::Pickup => (None, Money::ZERO),
        Fulfillment::Delivery => (
            customer.as_ref().and_then(|c| c.primary_address()).cloned(),
            options.delivery_fee,
        ),
        Fulfillment::DeliveryTo(address) => (Some(address), options.delivery_fee),
    };

    let details = OrderDetails {
        payment_method: options.payment_method,
        tax: cart.estimate_tax(options.tax_rate_percent),
        delivery_fee,
        customer_email: options
            .customer_email
            .or_else(|| customer.as_ref().and_then(|c| c.contact_email()).map(str::to_string)),
        customer_phone: options
            .customer_phone
            .or_else(|| customer.as_ref().and_then(|c| c.phone.clone())),
        delivery_address,
        notes: options.notes,
    };

    let request = cart.to_order_request(details)?;
    let order = create_order(state.client(), &request).await?;

    state.cart().clear();
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::VerifyOtpResponse;
    use crate::testing::mock_client;
    use serde_json::json;
    use storefront_commerce::catalog::Product;

    fn tee() -> Product {
        Product::new("p1", "Tee", Money::from_cents(1000))
    }

    fn order_json() -> serde_json::Value {
        json!({"_id": "o1", "subtotal": 20, "total": 27, "status": "pending"})
    }

    #[tokio::test]
    async fn test_apply_discount_valid() {
        let (client, mock) = mock_client(None);
        mock.push_json(200, json!({"valid": true, "discountAmount": 3}));
        let cart = CartHandle::default();
        cart.add_item(tee(), 3, None).unwrap();

        let amount = apply_discount(&client, &cart, " SAVE3 ").await.unwrap();

        assert_eq!(amount, Money::from_cents(300));
        let snapshot = cart.snapshot();
        assert_eq!(snapshot.discount_code(), Some("SAVE3"));
        assert_eq!(snapshot.total(Money::ZERO).unwrap(), Money::from_cents(2700));
        assert_eq!(
            mock.last_request().unwrap().json_body().unwrap(),
            json!({"code": "SAVE3", "amount": 30})
        );
    }

    #[tokio::test]
    async fn test_apply_discount_rejected_leaves_cart() {
        let (client, mock) = mock_client(None);
        mock.push_json(200, json!({"valid": false, "message": "Expired"}));
        let cart = CartHandle::default();
        cart.add_item(tee(), 1, None).unwrap();

        let err = apply_discount(&client, &cart, "OLD").await.unwrap_err();

        assert!(matches!(err, CheckoutError::DiscountRejected(ref m) if m == "Expired"));
        assert_eq!(cart.snapshot().discount_code(), None);
    }

    #[tokio::test]
    async fn test_apply_blank_discount_skips_request() {
        let (client, mock) = mock_client(None);
        let cart = CartHandle::default();

        let err = apply_discount(&client, &cart, "   ").await.unwrap_err();

        assert!(matches!(err, CheckoutError::Commerce(CommerceError::InvalidDiscountCode(_))));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_place_order_delivery_totals() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(201, order_json());
        let state = AppState::new(client);
        state.cart().add_item(tee(), 2, None).unwrap();

        let order = place_order(&state, CheckoutOptions::default()).await.unwrap();

        assert_eq!(order.id.as_str(), "o1");
        let body = mock.last_request().unwrap().json_body().unwrap();
        // 20.00 subtotal + 2.00 tax + 5.00 delivery
        assert_eq!(body["subtotal"], json!(20));
        assert_eq!(body["tax"], json!(2));
        assert_eq!(body["total"], json!(27));
        assert_eq!(body["paymentMethod"], json!("cash"));
        assert!(state.cart().snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_pickup_uses_customer_contact() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(201, order_json());
        let state = AppState::new(client);
        let session: VerifyOtpResponse = serde_json::from_value(json!({
            "token": "tok",
            "user": {
                "_id": "c1",
                "email": "ada@x.io",
                "phone": "555",
                "addresses": [{"street": "1 Main"}]
            }
        }))
        .unwrap();
        state.sign_in(session).await.unwrap();
        state.cart().add_item(tee(), 1, None).unwrap();

        let options = CheckoutOptions {
            fulfillment: Fulfillment::Pickup,
            payment_method: PaymentMethod::Card,
            ..CheckoutOptions::default()
        };
        place_order(&state, options).await.unwrap();

        let body = mock.last_request().unwrap().json_body().unwrap();
        assert_eq!(body["total"], json!(11));
        assert_eq!(body["customerEmail"], json!("ada@x.io"));
        assert_eq!(body["customerPhone"], json!("555"));
        assert!(body.get("deliveryAddress").is_none());
    }

    #[tokio::test]
    async fn test_place_order_failure_keeps_cart() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(422, json!({"message": "Out of stock"}));
        let state = AppState::new(client);
        state.cart().add_item(tee(), 1, None).unwrap();

        let err = place_order(&state, CheckoutOptions::default()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Api(ref e) if e.status_code() == 422));
        assert_eq!(state.cart().snapshot().item_count(), 1);
    }

    #[tokio::test]
    async fn test_place_order_empty_cart() {
        let (client, mock) = mock_client(Some("tok"));
        let state = AppState::new(client);

        let err = place_order(&state, CheckoutOptions::default()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Commerce(CommerceError::EmptyCart)));
        assert_eq!(mock.request_count(), 0);
    }
}
