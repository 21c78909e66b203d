//! Checkout command.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use storefront_api::checkout::{place_order, CheckoutOptions, Fulfillment};
use storefront_commerce::checkout::PaymentMethod;
use storefront_commerce::Money;

use super::{CheckoutArgs, PaymentArg};
use crate::context::Context;
use crate::output::{money, status_badge};

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Cash => PaymentMethod::Cash,
            PaymentArg::Card => PaymentMethod::Card,
            PaymentArg::Online => PaymentMethod::Online,
        }
    }
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let state = ctx.app_state().await?;
    let cart = state.cart().snapshot();

    if cart.is_empty() {
        bail!("Your cart is empty. Add products with `storefront cart add <PRODUCT_ID>`.");
    }

    let store = &ctx.config.store;
    let options = CheckoutOptions {
        payment_method: args.payment.into(),
        fulfillment: if args.pickup {
            Fulfillment::Pickup
        } else {
            Fulfillment::Delivery
        },
        tax_rate_percent: store.tax_rate_percent,
        delivery_fee: store.delivery_fee,
        customer_email: args.email,
        customer_phone: args.phone,
        notes: args.notes,
    };

    // Summary
    let currency = ctx.currency();
    let tax = cart.estimate_tax(options.tax_rate_percent);
    let delivery_fee = if args.pickup { Money::ZERO } else { options.delivery_fee };
    let pricing = cart.pricing(tax)?;

    ctx.output.header("Checkout");
    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("subtotal", &money(pricing.subtotal, currency));
    if pricing.has_discount() {
        ctx.output
            .kv("discount", &format!("-{}", money(pricing.discount, currency)));
    }
    ctx.output.kv("estimated tax", &money(tax, currency));
    if !delivery_fee.is_zero() {
        ctx.output.kv("delivery", &money(delivery_fee, currency));
    }
    let total = pricing
        .total
        .checked_add(delivery_fee)
        .context("Order total is out of range")?;
    ctx.output.kv("total", &money(total, currency));
    ctx.output.kv("payment", options.payment_method.as_str());

    if !state.auth().await.is_authenticated() {
        ctx.output
            .warn("Not signed in; the backend may reject the order");
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Placing order...");
    let result = place_order(&state, options).await;
    spinner.finish_and_clear();
    let order = result?;

    // Persist the now-empty cart.
    ctx.save_cart(&state.cart().snapshot())?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.success("Order placed");
    ctx.output.kv("order", order.id.as_str());
    if !order.receipt_number.is_empty() {
        ctx.output.kv("receipt", &order.receipt_number);
    }
    ctx.output.kv("status", &status_badge(order.status.as_str()));
    ctx.output.kv("total", &money(order.total, currency));
    Ok(())
}
