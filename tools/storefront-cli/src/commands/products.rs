//! Catalog browsing commands.

use anyhow::{Context as _, Result};
use storefront_api::products::{self, ProductsQuery};
use storefront_commerce::catalog::Product;
use storefront_commerce::ids::{CategoryId, ProductId};

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::money;

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductsCommand::List {
            search,
            category,
            page,
            limit,
            all,
        } => {
            let query = ProductsQuery {
                tenant_slug: ctx.config.store.tenant_slug.clone(),
                is_active: if all { None } else { Some(true) },
                search,
                category_id: category.map(CategoryId::new),
                page,
                limit,
            };
            list_products(&query, ctx).await
        }
        ProductsCommand::Show { id } => show_product(&ProductId::new(id), ctx).await,
    }
}

async fn list_products(query: &ProductsQuery, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let spinner = ctx.output.spinner("Loading products...");
    let result = products::get_products(&client, query).await;
    spinner.finish_and_clear();
    let products = result.context("Failed to load products")?;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", products.len()));
    let widths = [26, 28, 10, 8];
    ctx.output.table_row(&["ID", "NAME", "PRICE", "STOCK"], &widths);
    for product in &products {
        let price = money(product.price, ctx.currency());
        let stock = stock_label(product);
        ctx.output.table_row(
            &[product.id.as_str(), product.name.as_str(), price.as_str(), stock.as_str()],
            &widths,
        );
    }
    Ok(())
}

async fn show_product(id: &ProductId, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let product = products::get_product_by_id(&client, id)
        .await
        .with_context(|| format!("Failed to load product {}", id))?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("price", &money(product.price, ctx.currency()));
    ctx.output.kv("stock", &stock_label(&product));
    ctx.output.kv("type", product.product_type.as_str());
    if let Some(category) = &product.category {
        ctx.output.kv("category", category);
    }
    if let Some(description) = &product.description {
        ctx.output.kv("description", description);
    }

    if !product.variations.is_empty() {
        ctx.output.info("Variations:");
        for variation in &product.variations {
            let price = money(product.price_for(Some(variation)), ctx.currency());
            let stock = variation
                .stock
                .map(|s| format!(", {} in stock", s))
                .unwrap_or_default();
            ctx.output
                .list_item(&format!("{} ({}{})", variation.label(), price, stock));
        }
    }
    Ok(())
}

fn stock_label(product: &Product) -> String {
    if product.has_variations && !product.variations.is_empty() {
        "varies".to_string()
    } else if product.is_in_stock(None) {
        product.stock.to_string()
    } else {
        "sold out".to_string()
    }
}
