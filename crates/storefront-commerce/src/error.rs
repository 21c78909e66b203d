//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Quantity passed to an add was zero or negative.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A discount amount below zero was supplied.
    #[error("Invalid discount amount: {0}")]
    InvalidDiscountAmount(String),

    /// Discount code was blank.
    #[error("Invalid discount code: {0:?}")]
    InvalidDiscountCode(String),

    /// Checkout was attempted with no lines in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in cart calculation")]
    Overflow,
}
