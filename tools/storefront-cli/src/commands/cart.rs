//! Cart commands. The cart lives in `.storefront/cart.json` between runs.

use anyhow::{bail, Context as _, Result};
use dialoguer::{Confirm, Select};
use serde_json::json;
use storefront_api::checkout::apply_discount;
use storefront_api::products;
use storefront_api::CartHandle;
use storefront_commerce::cart::Cart;
use storefront_commerce::catalog::{Product, ProductVariation};
use storefront_commerce::ids::ProductId;

use super::{CartArgs, CartCommand, VariationArgs};
use crate::context::Context;
use crate::output::money;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let cart = CartHandle::new(ctx.load_cart()?);

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Add {
            product_id,
            quantity,
            variation,
        } => add(&cart, ProductId::new(product_id), quantity, &variation, ctx).await?,
        CartCommand::Remove {
            product_id,
            variation,
        } => {
            let product_id = ProductId::new(product_id);
            let line = find_line(&cart.snapshot(), &product_id, &variation)?;
            cart.remove_item(&product_id, line.as_ref());
            ctx.output.success("Removed from cart");
        }
        CartCommand::Set {
            product_id,
            quantity,
            variation,
        } => {
            let product_id = ProductId::new(product_id);
            let line = find_line(&cart.snapshot(), &product_id, &variation)?;
            cart.update_quantity(&product_id, quantity, line.as_ref())?;
            if quantity > 0 {
                ctx.output.success(&format!("Quantity set to {}", quantity));
            } else {
                ctx.output.success("Removed from cart");
            }
        }
        CartCommand::Discount { code, clear } => {
            if clear {
                cart.update(Cart::clear_discount);
                ctx.output.success("Discount removed");
            } else if let Some(code) = code {
                let client = ctx.client()?;
                let amount = apply_discount(&client, &cart, &code).await?;
                ctx.output.success(&format!(
                    "Discount {} applied: -{}",
                    code.trim(),
                    money(amount, ctx.currency())
                ));
            }
        }
        CartCommand::Show => return show(&cart.snapshot(), ctx),
        CartCommand::Clear { yes } => {
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt("Remove everything from the cart?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.warn("Cart left unchanged");
                    return Ok(());
                }
            }
            cart.clear();
            ctx.output.success("Cart cleared");
        }
    }

    let snapshot = cart.snapshot();
    ctx.save_cart(&snapshot)?;
    if ctx.output.is_json() {
        show(&snapshot, ctx)?;
    }
    Ok(())
}

async fn add(
    cart: &CartHandle,
    product_id: ProductId,
    quantity: i64,
    options: &VariationArgs,
    ctx: &Context,
) -> Result<()> {
    let client = ctx.client()?;
    let product = products::get_product_by_id(&client, &product_id)
        .await
        .with_context(|| format!("Failed to load product {}", product_id))?;

    let variation = choose_variation(&product, options, ctx)?;
    if !product.is_in_stock(variation.as_ref()) {
        ctx.output.warn(&format!("{} is out of stock", product.name));
    }

    let name = product.name.clone();
    cart.add_item(product, quantity, variation)?;
    ctx.output
        .success(&format!("Added {} x {} to cart", quantity, name));
    Ok(())
}

/// Variation for a new line: from the options, or picked interactively when
/// the product has variations and none were given.
fn choose_variation(
    product: &Product,
    options: &VariationArgs,
    ctx: &Context,
) -> Result<Option<ProductVariation>> {
    if !options.is_empty() {
        return match product.find_variation(
            options.size.as_deref(),
            options.color.as_deref(),
            options.kind.as_deref(),
        ) {
            Some(variation) => Ok(Some(variation.clone())),
            None => bail!("{} has no variation matching those options", product.name),
        };
    }

    if product.variations.is_empty() {
        return Ok(None);
    }
    if ctx.output.is_json() {
        bail!("{} has variations; pass --size, --color, or --type", product.name);
    }

    let labels: Vec<String> = product
        .variations
        .iter()
        .map(|v| {
            format!(
                "{} ({})",
                v.label(),
                money(product.price_for(Some(v)), ctx.currency())
            )
        })
        .collect();
    let selection = Select::new()
        .with_prompt("Select variation")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(product.variations.get(selection).cloned())
}

/// Variation of the existing line the options point at.
fn find_line(
    cart: &Cart,
    product_id: &ProductId,
    options: &VariationArgs,
) -> Result<Option<ProductVariation>> {
    let lines: Vec<_> = cart
        .items()
        .iter()
        .filter(|item| &item.product.id == product_id)
        .collect();

    let matched = if options.is_empty() {
        // A product with a single line needs no selector.
        lines
            .iter()
            .find(|item| item.variation.is_none())
            .or_else(|| if lines.len() == 1 { lines.first() } else { None })
    } else {
        lines.iter().find(|item| {
            item.variation.as_ref().is_some_and(|v| {
                v.matches_options(
                    options.size.as_deref(),
                    options.color.as_deref(),
                    options.kind.as_deref(),
                )
            })
        })
    };

    match matched {
        Some(item) => Ok(item.variation.clone()),
        None => bail!("No cart line for product {} with those options", product_id),
    }
}

fn show(cart: &Cart, ctx: &Context) -> Result<()> {
    let currency = ctx.currency();
    let tax = cart.estimate_tax(ctx.config.store.tax_rate_percent);
    let pricing = cart.pricing(tax)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "cart": cart,
            "itemCount": cart.item_count(),
            "pricing": pricing,
        }));
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    ctx.output.header(&format!("Cart ({} items)", cart.item_count()));
    let widths = [32, 5, 10, 10];
    ctx.output.table_row(&["ITEM", "QTY", "PRICE", "TOTAL"], &widths);
    for item in cart.items() {
        let name = item.display_name();
        let quantity = item.quantity.to_string();
        let price = money(item.unit_price(), currency);
        let total = money(item.line_total(), currency);
        ctx.output
            .table_row(&[name.as_str(), quantity.as_str(), price.as_str(), total.as_str()], &widths);
    }

    println!();
    ctx.output.kv("subtotal", &money(pricing.subtotal, currency));
    if pricing.has_discount() {
        let code = cart.discount_code().unwrap_or_default();
        ctx.output.kv(
            &format!("discount {}", code),
            &format!("-{}", money(pricing.discount, currency)),
        );
    }
    ctx.output.kv("estimated tax", &money(pricing.tax, currency));
    ctx.output.kv("total", &money(pricing.total, currency));
    if pricing.is_negative() {
        ctx.output.warn("Discount exceeds the cart value");
    }
    Ok(())
}
