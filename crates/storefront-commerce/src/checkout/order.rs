//! Order types and order-request construction.

use crate::cart::Cart;
use crate::catalog::ProductVariation;
use crate::checkout::Address;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order paid and closed.
    Completed,
    /// Order cancelled.
    Cancelled,
    /// Order refunded.
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Online => "online",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "online" => Ok(PaymentMethod::Online),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

/// A line on an order, priced at the time of checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Product id.
    pub product: ProductId,
    pub name: String,
    /// Effective unit price.
    pub price: Money,
    pub quantity: i64,
    /// price * quantity.
    pub subtotal: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<ProductVariation>,
}

/// Checkout inputs that do not come from the cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDetails {
    pub payment_method: PaymentMethod,
    /// Tax to add on top of the discounted subtotal.
    pub tax: Money,
    /// Flat fee added after tax; zero for pickup.
    pub delivery_fee: Money,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<Address>,
    pub notes: Option<String>,
}

/// Payload for `POST /api/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Money>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
}

impl CreateOrderRequest {
    /// Build the request from the cart's current lines and discount.
    ///
    /// total = cart total at `details.tax` + `details.delivery_fee`.
    pub fn from_cart(cart: &Cart, details: OrderDetails) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let items = cart
            .items()
            .iter()
            .map(|item| OrderItem {
                product: item.product.id.clone(),
                name: item.product.name.clone(),
                price: item.unit_price(),
                quantity: item.quantity,
                subtotal: item.line_total(),
                variation: item.variation.clone(),
            })
            .collect();

        let pricing = cart.pricing(details.tax)?;
        let total = pricing
            .total
            .checked_add(details.delivery_fee)
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            items,
            subtotal: pricing.subtotal,
            discount_code: cart.discount_code().map(str::to_string),
            discount_amount: cart.discount_amount(),
            tax: Some(details.tax),
            total,
            payment_method: details.payment_method,
            customer_email: details.customer_email,
            customer_phone: details.customer_phone,
            notes: details.notes,
            delivery_address: details.delivery_address.map(|a| a.for_delivery()),
        })
    }
}

/// An order as returned by the transactions API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub receipt_number: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Money>,
    pub total: Money,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total quantity across lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(Product::new("a", "Mug", Money::from_cents(1000)), 2, None)
            .unwrap();
        cart.add_item(
            Product::new("b", "Tee", Money::from_cents(500)),
            3,
            Some(ProductVariation::new().with_size("M")),
        )
        .unwrap();
        cart
    }

    #[test]
    fn test_from_cart_totals() {
        let mut cart = cart();
        cart.set_discount_code("SAVE5", Some(Money::from_cents(500))).unwrap();

        let details = OrderDetails {
            payment_method: PaymentMethod::Card,
            tax: cart.estimate_tax(10.0),
            delivery_fee: Money::from_cents(500),
            ..Default::default()
        };
        let request = CreateOrderRequest::from_cart(&cart, details).unwrap();

        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[1].subtotal.amount_cents, 1500);
        assert_eq!(request.subtotal.amount_cents, 3500);
        assert_eq!(request.tax, Some(Money::from_cents(350)));
        // 3500 - 500 + 350 + 500
        assert_eq!(request.total.amount_cents, 3850);
        assert_eq!(request.discount_code.as_deref(), Some("SAVE5"));
    }

    #[test]
    fn test_from_empty_cart_fails() {
        let result = CreateOrderRequest::from_cart(&Cart::new(), OrderDetails::default());
        assert_eq!(result, Err(CommerceError::EmptyCart));
    }

    #[test]
    fn test_request_wire_shape() {
        let request = cart()
            .to_order_request(OrderDetails {
                customer_email: Some("ana@example.com".to_string()),
                ..Default::default()
            })
            .unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["paymentMethod"], "cash");
        assert_eq!(json["customerEmail"], "ana@example.com");
        assert_eq!(json["items"][0]["product"], "a");
        assert_eq!(json["items"][0]["price"], 10);
        assert_eq!(json["items"][1]["variation"]["size"], "M");
        assert!(json.get("discountCode").is_none());
        assert!(json.get("deliveryAddress").is_none());
    }

    #[test]
    fn test_order_from_backend_json() {
        let json = r#"{
            "_id": "o1",
            "receiptNumber": "R-0001",
            "items": [{"product": "a", "name": "Mug", "price": 10, "quantity": 2, "subtotal": 20}],
            "subtotal": 20,
            "total": 22,
            "paymentMethod": "cash",
            "status": "completed",
            "createdAt": "2024-03-01T10:00:00.000Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.status.is_terminal());
        assert_eq!(order.item_count(), 2);
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Refunded".parse::<OrderStatus>(), Ok(OrderStatus::Refunded));
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert_eq!("online".parse::<PaymentMethod>(), Ok(PaymentMethod::Online));
    }
}
