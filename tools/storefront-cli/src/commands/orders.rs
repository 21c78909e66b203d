//! Order history commands.

use anyhow::{anyhow, bail, Context as _, Result};
use storefront_api::orders::{self, OrdersQuery};
use storefront_commerce::checkout::{Order, OrderStatus};
use storefront_commerce::ids::OrderId;

use super::{parse_date, OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{money, status_badge};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(OrdersCommand::List {
            status,
            from,
            to,
            page,
            limit,
        }) => {
            let query = OrdersQuery {
                status: status
                    .map(|s| s.parse::<OrderStatus>().map_err(|e| anyhow!(e)))
                    .transpose()?,
                start_date: from.as_deref().map(parse_date).transpose()?,
                end_date: to.as_deref().map(parse_date).transpose()?,
                page,
                limit,
                ..OrdersQuery::default()
            };
            list_orders(query, ctx).await
        }
        None => list_orders(OrdersQuery::default(), ctx).await,
        Some(OrdersCommand::Show { id }) => show_order(&OrderId::new(id), ctx).await,
    }
}

async fn list_orders(mut query: OrdersQuery, ctx: &Context) -> Result<()> {
    let state = ctx.app_state().await?;
    let auth = state.auth().await;
    let customer = match auth.customer {
        Some(customer) if auth.status.has_access() => customer,
        _ => bail!("Sign in to see your orders (`storefront auth send-otp <PHONE>`)"),
    };

    let spinner = ctx.output.spinner("Loading orders...");
    let result = match customer.contact_email() {
        Some(email) => {
            query.customer_email = Some(email.to_string());
            orders::get_orders(state.client(), &query).await
        }
        None => orders::get_customer_orders(state.client(), &customer.id).await,
    };
    spinner.finish_and_clear();
    let orders = result.context("Failed to load orders")?;

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    if orders.is_empty() {
        ctx.output.info("No orders yet.");
        return Ok(());
    }

    ctx.output.header(&format!("Orders ({})", orders.len()));
    let widths = [26, 12, 12, 6, 10];
    ctx.output
        .table_row(&["ID", "DATE", "STATUS", "ITEMS", "TOTAL"], &widths);
    for order in &orders {
        let date = order_date(order);
        let status = status_badge(order.status.as_str());
        let items = order.item_count().to_string();
        let total = money(order.total, ctx.currency());
        ctx.output.table_row(
            &[order.id.as_str(), date.as_str(), status.as_str(), items.as_str(), total.as_str()],
            &widths,
        );
    }
    Ok(())
}

async fn show_order(id: &OrderId, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let order = orders::get_order_by_id(&client, id)
        .await
        .with_context(|| format!("Failed to load order {}", id))?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    let currency = ctx.currency();
    ctx.output.header(&format!("Order {}", order.id));
    if !order.receipt_number.is_empty() {
        ctx.output.kv("receipt", &order.receipt_number);
    }
    ctx.output.kv("date", &order_date(&order));
    ctx.output.kv("status", &status_badge(order.status.as_str()));
    if !order.payment_method.is_empty() {
        ctx.output.kv("payment", &order.payment_method);
    }

    for item in &order.items {
        ctx.output.list_item(&format!(
            "{} x {} @ {} = {}",
            item.quantity,
            item.name,
            money(item.price, currency),
            money(item.subtotal, currency)
        ));
    }

    ctx.output.kv("subtotal", &money(order.subtotal, currency));
    if let Some(discount) = order.discount_amount.filter(|d| !d.is_zero()) {
        let code = order.discount_code.as_deref().unwrap_or_default();
        ctx.output
            .kv(&format!("discount {}", code), &format!("-{}", money(discount, currency)));
    }
    if let Some(tax) = order.tax {
        ctx.output.kv("tax", &money(tax, currency));
    }
    ctx.output.kv("total", &money(order.total, currency));
    if let Some(address) = order.delivery_address.as_ref().filter(|a| !a.is_empty()) {
        ctx.output.kv("deliver to", &address.one_line());
    }
    Ok(())
}

fn order_date(order: &Order) -> String {
    order
        .created_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
