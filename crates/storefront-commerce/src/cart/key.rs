//! Line identity for cart merging.

use crate::catalog::ProductVariation;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical form of a variation: its present fields as sorted
/// `(field, value)` pairs.
///
/// Two variations with the same content produce the same key regardless of
/// the order their fields were written in. Prices are keyed by cents so
/// `12.5` and `12.50` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariationKey(Vec<(String, String)>);

impl VariationKey {
    pub fn from_variation(variation: &ProductVariation) -> Self {
        let mut pairs = Vec::new();
        let mut push = |field: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((field.to_string(), value));
            }
        };

        push("size", variation.size.clone());
        push("color", variation.color.clone());
        push("type", variation.kind.clone());
        push("sku", variation.sku.clone());
        push("price", variation.price.map(|p| p.amount_cents.to_string()));
        push("stock", variation.stock.map(|s| s.to_string()));

        for (name, value) in &variation.attributes {
            if !value.is_null() {
                pairs.push((name.clone(), value.to_string()));
            }
        }

        pairs.sort();
        Self(pairs)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl fmt::Display for VariationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", field, value)?;
        }
        Ok(())
    }
}

/// Identity of a cart line: product id plus optional canonical variation.
///
/// A line without a variation never equals a line with one, even an empty
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub variation: Option<VariationKey>,
}

impl LineKey {
    pub fn new(product_id: &ProductId, variation: Option<&ProductVariation>) -> Self {
        Self {
            product_id: product_id.clone(),
            variation: variation.map(VariationKey::from_variation),
        }
    }
}
