//! Cart and cart item types.

use crate::cart::{CartPricing, LineKey};
use crate::catalog::{Product, ProductVariation};
use crate::checkout::{CreateOrderRequest, OrderDetails};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A shopping cart.
///
/// Lines are kept in insertion order. Each line is identified by its
/// [`LineKey`], so adding the same product and variation again grows the
/// existing line instead of appending a duplicate.
///
/// The subtotal always fits in `Money`: mutations that would overflow it
/// fail with [`CommerceError::Overflow`], and a deserialized cart is
/// rebuilt through the same checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "CartRecord")]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    discount_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    discount_amount: Option<Money>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart.
    ///
    /// Merges into an existing line with the same product and variation.
    /// Returns an error if quantity is not positive or the line total would
    /// overflow.
    pub fn add_item(
        &mut self,
        product: Product,
        quantity: i64,
        variation: Option<ProductVariation>,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        let key = LineKey::new(&product.id, variation.as_ref());

        if let Some(index) = self.position(&key) {
            let existing = &self.items[index];
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            let line_total = existing
                .unit_price()
                .checked_mul(new_quantity)
                .ok_or(CommerceError::Overflow)?;
            self.check_subtotal(Some(index), line_total)?;
            self.items[index].quantity = new_quantity;
            debug!(product_id = %key.product_id, quantity = new_quantity, "Merged cart line");
            return Ok(());
        }

        let item = CartItem::new(product, quantity, variation)?;
        self.check_subtotal(None, item.line_total())?;
        debug!(product_id = %item.product.id, quantity, "Added cart line");
        self.items.push(item);
        Ok(())
    }

    /// Remove the line matching product id and variation exactly.
    ///
    /// Lines for the same product with a different variation (or with a
    /// variation when none was given) are left alone.
    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
        variation: Option<&ProductVariation>,
    ) -> bool {
        let key = LineKey::new(product_id, variation);
        let len_before = self.items.len();
        self.items.retain(|i| i.key() != key);
        self.items.len() < len_before
    }

    /// Set a line's quantity.
    ///
    /// If quantity is <= 0, removes the line. Returns whether a line was
    /// found.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        variation: Option<&ProductVariation>,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id, variation));
        }

        let key = LineKey::new(product_id, variation);
        let Some(index) = self.position(&key) else {
            return Ok(false);
        };
        let line_total = self.items[index]
            .unit_price()
            .checked_mul(quantity)
            .ok_or(CommerceError::Overflow)?;
        self.check_subtotal(Some(index), line_total)?;
        self.items[index].quantity = quantity;
        Ok(true)
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.items.iter().position(|i| &i.key() == key)
    }

    /// Fail unless the subtotal, with line `replaced` (or a new line) at
    /// `line_total`, still fits.
    fn check_subtotal(&self, replaced: Option<usize>, line_total: Money) -> Result<(), CommerceError> {
        self.items
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replaced)
            .try_fold(line_total, |acc, (_, item)| acc.checked_add(item.line_total()))
            .map(|_| ())
            .ok_or(CommerceError::Overflow)
    }

    /// Remove all lines and the discount.
    pub fn clear(&mut self) {
        self.items.clear();
        self.clear_discount();
    }

    /// Store a discount code with its precomputed amount.
    ///
    /// The amount is not checked against the code or the subtotal.
    pub fn set_discount_code(
        &mut self,
        code: impl Into<String>,
        amount: Option<Money>,
    ) -> Result<(), CommerceError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(CommerceError::InvalidDiscountCode(code));
        }
        if let Some(amount) = amount {
            if amount.is_negative() {
                return Err(CommerceError::InvalidDiscountAmount(amount.to_string()));
            }
        }
        self.discount_code = Some(code);
        self.discount_amount = amount;
        Ok(())
    }

    /// Erase discount code and amount.
    pub fn clear_discount(&mut self) {
        self.discount_code = None;
        self.discount_amount = None;
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code.as_deref()
    }

    pub fn discount_amount(&self) -> Option<Money> {
        self.discount_amount
    }

    /// Get the line for a product and variation.
    pub fn get_item(
        &self,
        product_id: &ProductId,
        variation: Option<&ProductVariation>,
    ) -> Option<&CartItem> {
        let key = LineKey::new(product_id, variation);
        self.items.iter().find(|i| i.key() == key)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of effective unit price times quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// subtotal - discount + tax. May be negative.
    ///
    /// Fails with [`CommerceError::Overflow`] when tax or discount push the
    /// total out of range.
    pub fn total(&self, tax: Money) -> Result<Money, CommerceError> {
        Ok(self.pricing(tax)?.total)
    }

    /// Full breakdown at the given tax amount.
    pub fn pricing(&self, tax: Money) -> Result<CartPricing, CommerceError> {
        CartPricing::new(
            self.subtotal(),
            self.discount_amount.unwrap_or(Money::ZERO),
            tax,
        )
    }

    /// Estimated tax as a percentage of the subtotal.
    pub fn estimate_tax(&self, rate_percent: f64) -> Money {
        self.subtotal().percentage(rate_percent)
    }

    /// Build the order-creation payload for this cart.
    pub fn to_order_request(&self, details: OrderDetails) -> Result<CreateOrderRequest, CommerceError> {
        CreateOrderRequest::from_cart(self, details)
    }
}

/// Wire form of a cart, validated into [`Cart`] on deserialization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartRecord {
    #[serde(default)]
    items: Vec<CartItem>,
    #[serde(default)]
    discount_code: Option<String>,
    #[serde(default)]
    discount_amount: Option<Money>,
}

impl TryFrom<CartRecord> for Cart {
    type Error = CommerceError;

    fn try_from(record: CartRecord) -> Result<Self, Self::Error> {
        let mut cart = Cart::new();
        for item in record.items {
            cart.add_item(item.product, item.quantity, item.variation)?;
        }
        if let Some(code) = record.discount_code {
            cart.set_discount_code(code, record.discount_amount)?;
        }
        Ok(cart)
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product snapshot taken when the line was added.
    pub product: Product,
    /// Always positive.
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<ProductVariation>,
}

impl CartItem {
    /// Create a new line.
    pub fn new(
        product: Product,
        quantity: i64,
        variation: Option<ProductVariation>,
    ) -> Result<Self, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let item = Self {
            product,
            quantity,
            variation,
        };
        item.unit_price().checked_mul(quantity).ok_or(CommerceError::Overflow)?;
        Ok(item)
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(&self.product.id, self.variation.as_ref())
    }

    /// Variation price if present, else product price.
    pub fn unit_price(&self) -> Money {
        self.product.price_for(self.variation.as_ref())
    }

    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }

    /// Display name including the variation label.
    pub fn display_name(&self) -> String {
        match self.variation.as_ref().map(ProductVariation::label) {
            Some(label) if !label.is_empty() => format!("{} ({})", self.product.name, label),
            _ => self.product.name.clone(),
        }
    }
}
