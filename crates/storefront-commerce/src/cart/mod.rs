//! Shopping cart module.
//!
//! Contains the cart, its line identity rules, and pricing.

mod cart;
mod key;
mod pricing;

pub use cart::{Cart, CartItem};
pub use key::{LineKey, VariationKey};
pub use pricing::CartPricing;
