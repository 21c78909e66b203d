//! Storefront domain types and the cart engine.
//!
//! - **Catalog**: products and their variations
//! - **Cart**: line merging by canonical variation key, discount, totals
//! - **Checkout**: order payloads built from a cart, orders, addresses
//! - **Bookings**: service appointments and time slots
//!
//! # Example
//!
//! ```rust
//! use storefront_commerce::prelude::*;
//!
//! let tee = Product::new("p1", "Tee", Money::from_cents(1000));
//!
//! let mut cart = Cart::new();
//! cart.add_item(tee.clone(), 2, None).unwrap();
//! cart.add_item(tee, 1, Some(ProductVariation::new().with_size("M"))).unwrap();
//! cart.set_discount_code("SAVE5", Some(Money::from_cents(500))).unwrap();
//!
//! assert_eq!(cart.subtotal(), Money::from_cents(3000));
//! assert_eq!(cart.total(Money::from_cents(200)).unwrap(), Money::from_cents(2700));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customer;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::booking::{Booking, BookingStatus, TimeSlot};
    pub use crate::cart::{Cart, CartItem, CartPricing, LineKey, VariationKey};
    pub use crate::catalog::{Product, ProductType, ProductVariation};
    pub use crate::checkout::{
        Address, CreateOrderRequest, Order, OrderDetails, OrderItem, OrderStatus, PaymentMethod,
    };
    pub use crate::customer::Customer;
}
