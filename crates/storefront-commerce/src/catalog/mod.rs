//! Product catalog types.

mod product;

pub use product::{Product, ProductType, ProductVariation};
