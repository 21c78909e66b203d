//! Product and variation types.

use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Product type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Physical product sold from stock.
    #[default]
    Regular,
    /// Bundle of multiple products.
    Bundle,
    /// Bookable service.
    Service,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Regular => "regular",
            ProductType::Bundle => "bundle",
            ProductType::Service => "service",
        }
    }
}

/// A purchasable variation of a product (size, color, type).
///
/// A variation may override the product's price, stock and SKU. Fields the
/// backend adds beyond the known ones are kept in `attributes` so they take
/// part in line identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Overrides the product price when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    /// Any additional option fields sent by the backend.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl ProductVariation {
    /// Create an empty variation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Human-readable label, e.g. "M / Blue".
    pub fn label(&self) -> String {
        [&self.size, &self.color, &self.kind]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Check whether this variation carries the given option values.
    ///
    /// `None` in a selector means "don't care".
    pub fn matches_options(
        &self,
        size: Option<&str>,
        color: Option<&str>,
        kind: Option<&str>,
    ) -> bool {
        fn eq(selector: Option<&str>, value: &Option<String>) -> bool {
            selector.map_or(true, |s| value.as_deref().is_some_and(|v| v.eq_ignore_ascii_case(s)))
        }
        eq(size, &self.size) && eq(color, &self.color) && eq(kind, &self.kind)
    }
}

fn default_true() -> bool {
    true
}

/// A product snapshot as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub product_type: ProductType,
    #[serde(default)]
    pub has_variations: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<ProductVariation>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Product {
    /// Create a minimal active product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            stock: 0,
            sku: None,
            category: None,
            category_id: None,
            image: None,
            images: Vec::new(),
            product_type: ProductType::Regular,
            has_variations: false,
            variations: Vec::new(),
            is_active: true,
        }
    }

    /// Set stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Add a variation.
    pub fn with_variation(mut self, variation: ProductVariation) -> Self {
        self.has_variations = true;
        self.variations.push(variation);
        self
    }

    /// First variation matching the given option values.
    pub fn find_variation(
        &self,
        size: Option<&str>,
        color: Option<&str>,
        kind: Option<&str>,
    ) -> Option<&ProductVariation> {
        self.variations
            .iter()
            .find(|v| v.matches_options(size, color, kind))
    }

    /// Price for a given variation, falling back to the product price.
    pub fn price_for(&self, variation: Option<&ProductVariation>) -> Money {
        variation.and_then(|v| v.price).unwrap_or(self.price)
    }

    /// Check if the product (or the given variation) has stock.
    pub fn is_in_stock(&self, variation: Option<&ProductVariation>) -> bool {
        variation.and_then(|v| v.stock).unwrap_or(self.stock) > 0
    }

    /// Image to show in listings.
    pub fn primary_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .or_else(|| self.images.first().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "_id": "p1",
            "name": "Linen Shirt",
            "price": 24.5,
            "stock": 12,
            "productType": "regular",
            "hasVariations": true,
            "variations": [
                {"size": "M", "color": "white", "price": 26},
                {"size": "L", "material": "linen"}
            ],
            "isActive": true
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.price.amount_cents, 2450);
        assert_eq!(product.variations.len(), 2);
        assert_eq!(product.variations[0].price, Some(Money::from_cents(2600)));
        assert_eq!(
            product.variations[1].attributes.get("material"),
            Some(&serde_json::json!("linen"))
        );
    }

    #[test]
    fn test_product_with_out_of_range_price_fails() {
        let json = r#"{"_id":"x","name":"x","price":1e300}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_product_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"_id": "p2", "name": "Gift card", "price": 10}"#).unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.product_type, ProductType::Regular);
        assert!(product.is_active);
        assert!(product.variations.is_empty());
    }

    #[test]
    fn test_price_for_variation() {
        let medium = ProductVariation::new().with_size("M").with_price(Money::from_cents(1200));
        let large = ProductVariation::new().with_size("L");
        let product = Product::new("p1", "Tee", Money::from_cents(1000));

        assert_eq!(product.price_for(None).amount_cents, 1000);
        assert_eq!(product.price_for(Some(&medium)).amount_cents, 1200);
        assert_eq!(product.price_for(Some(&large)).amount_cents, 1000);
    }

    #[test]
    fn test_find_variation() {
        let product = Product::new("p1", "Tee", Money::from_cents(1000))
            .with_variation(ProductVariation::new().with_size("M").with_color("Red"))
            .with_variation(ProductVariation::new().with_size("L").with_color("Red"));

        let found = product.find_variation(Some("l"), Some("red"), None).unwrap();
        assert_eq!(found.size.as_deref(), Some("L"));
        assert!(product.find_variation(Some("XL"), None, None).is_none());
    }

    #[test]
    fn test_variation_label() {
        let v = ProductVariation::new().with_size("M").with_color("Blue");
        assert_eq!(v.label(), "M / Blue");
        assert_eq!(ProductVariation::new().label(), "");
    }
}
