//! Order endpoints. The backend calls orders "transactions".

use crate::query::{segment, Query};
use chrono::NaiveDate;
use storefront_client::{ApiClient, ApiError};
use storefront_commerce::checkout::{CreateOrderRequest, Order, OrderStatus};
use storefront_commerce::ids::{CustomerId, OrderId};
use tracing::info;

const TRANSACTIONS: &str = "/api/transactions";

/// Filters for the order listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersQuery {
    pub customer_email: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl OrdersQuery {
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            customer_email: Some(email.into()),
            ..Self::default()
        }
    }

    fn to_query(&self) -> Query {
        Query::new()
            .push_str("customerEmail", self.customer_email.as_deref())
            .push_str("customerId", self.customer_id.as_ref().map(CustomerId::as_str))
            .push_opt("status", self.status.map(|s| s.as_str()))
            .push_opt("startDate", self.start_date)
            .push_opt("endDate", self.end_date)
            .push_opt("page", self.page.filter(|p| *p > 0))
            .push_opt("limit", self.limit.filter(|l| *l > 0))
    }
}

pub async fn create_order(
    client: &ApiClient,
    request: &CreateOrderRequest,
) -> Result<Order, ApiError> {
    let order: Order = client.post(TRANSACTIONS, request, true).await?;
    info!(
        order_id = %order.id,
        items = request.items.len(),
        total = %request.total,
        "Order created"
    );
    Ok(order)
}

pub async fn get_orders(client: &ApiClient, query: &OrdersQuery) -> Result<Vec<Order>, ApiError> {
    client.get(&query.to_query().to_path(TRANSACTIONS), true).await
}

pub async fn get_order_by_id(client: &ApiClient, id: &OrderId) -> Result<Order, ApiError> {
    client
        .get(&format!("{}/{}", TRANSACTIONS, segment(id.as_str())), true)
        .await
}

pub async fn get_customer_orders(
    client: &ApiClient,
    customer_id: &CustomerId,
) -> Result<Vec<Order>, ApiError> {
    client
        .get(
            &format!("{}/customer/{}", TRANSACTIONS, segment(customer_id.as_str())),
            true,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;
    use serde_json::json;
    use storefront_commerce::cart::Cart;
    use storefront_commerce::catalog::Product;
    use storefront_commerce::checkout::OrderDetails;
    use storefront_commerce::Money;

    fn order_json(id: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "receiptNumber": "R-1",
            "items": [],
            "subtotal": 20,
            "total": 22,
            "paymentMethod": "cash",
            "status": "pending"
        })
    }

    #[tokio::test]
    async fn test_create_order_posts_with_auth() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(201, json!({"data": order_json("o1")}));

        let mut cart = Cart::new();
        cart.add_item(Product::new("p1", "Tee", Money::from_cents(1000)), 2, None)
            .unwrap();
        let request = cart
            .to_order_request(OrderDetails {
                tax: Money::from_cents(200),
                ..OrderDetails::default()
            })
            .unwrap();

        let order = create_order(&client, &request).await.unwrap();
        assert_eq!(order.id, OrderId::new("o1"));

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.url, "https://shop.test/api/transactions");
        assert_eq!(sent.header_str("authorization"), Some("Bearer tok"));
        let body = sent.json_body().unwrap();
        assert_eq!(body["subtotal"], json!(20));
        assert_eq!(body["total"], json!(22));
        assert_eq!(body["items"][0]["product"], json!("p1"));
    }

    #[tokio::test]
    async fn test_get_orders_query() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(200, json!([order_json("o1"), order_json("o2")]));

        let query = OrdersQuery {
            status: Some(OrderStatus::Completed),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..OrdersQuery::for_email("ada@x.io")
        };
        let orders = get_orders(&client, &query).await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(
            mock.last_request().unwrap().url,
            "https://shop.test/api/transactions?customerEmail=ada%40x.io&status=completed&startDate=2024-01-01"
        );
    }

    #[tokio::test]
    async fn test_get_customer_orders_path() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(200, json!({"data": []}));

        let orders = get_customer_orders(&client, &CustomerId::new("c1")).await.unwrap();

        assert!(orders.is_empty());
        assert_eq!(
            mock.last_request().unwrap().url,
            "https://shop.test/api/transactions/customer/c1"
        );
    }

    #[tokio::test]
    async fn test_get_order_unauthorized() {
        let (client, mock) = mock_client(None);
        mock.push_json(401, json!({"message": "Unauthorized"}));

        let err = get_order_by_id(&client, &OrderId::new("o1")).await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
