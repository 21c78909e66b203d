//! Checkout module.
//!
//! Contains addresses, orders, and the order-creation payload built from a
//! cart.

mod address;
mod order;

pub use address::Address;
pub use order::{CreateOrderRequest, Order, OrderDetails, OrderItem, OrderStatus, PaymentMethod};
