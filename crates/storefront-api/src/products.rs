//! Catalog endpoints.

use crate::query::{segment, Query};
use storefront_client::{ApiClient, ApiError};
use storefront_commerce::catalog::Product;
use storefront_commerce::ids::{CategoryId, ProductId};

/// Filters for the product listing. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductsQuery {
    pub tenant_slug: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductsQuery {
    /// Active products of one tenant.
    pub fn active_for(tenant_slug: impl Into<String>) -> Self {
        Self {
            tenant_slug: Some(tenant_slug.into()),
            is_active: Some(true),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    fn to_query(&self) -> Query {
        Query::new()
            .push_str("tenantSlug", self.tenant_slug.as_deref())
            .push_opt("isActive", self.is_active)
            .push_str("search", self.search.as_deref())
            .push_str("categoryId", self.category_id.as_ref().map(CategoryId::as_str))
            .push_opt("page", self.page.filter(|p| *p > 0))
            .push_opt("limit", self.limit.filter(|l| *l > 0))
    }
}

pub async fn get_products(
    client: &ApiClient,
    query: &ProductsQuery,
) -> Result<Vec<Product>, ApiError> {
    client
        .get(&query.to_query().to_path("/api/products"), false)
        .await
}

pub async fn get_product_by_id(client: &ApiClient, id: &ProductId) -> Result<Product, ApiError> {
    client
        .get(&format!("/api/products/{}", segment(id.as_str())), false)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;
    use serde_json::json;
    use storefront_commerce::Money;

    #[tokio::test]
    async fn test_get_products_without_filters() {
        let (client, mock) = mock_client(None);
        mock.push_json(200, json!([]));

        let products = get_products(&client, &ProductsQuery::default()).await.unwrap();

        assert!(products.is_empty());
        assert_eq!(mock.last_request().unwrap().url, "https://shop.test/api/products");
    }

    #[tokio::test]
    async fn test_get_products_builds_query() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(
            200,
            json!({"data": [{"_id": "p1", "name": "Tee", "price": 19.99, "stock": 4}]}),
        );

        let query = ProductsQuery::active_for("acme")
            .with_search("blue tee")
            .with_page(2, 20);
        let products = get_products(&client, &query).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, Money::from_cents(1999));

        let sent = mock.last_request().unwrap();
        assert_eq!(
            sent.url,
            "https://shop.test/api/products?tenantSlug=acme&isActive=true&search=blue+tee&page=2&limit=20"
        );
        // Catalog reads are public.
        assert!(sent.header_str("authorization").is_none());
    }

    #[tokio::test]
    async fn test_zero_page_is_omitted() {
        let (client, mock) = mock_client(None);
        mock.push_json(200, json!([]));

        let query = ProductsQuery {
            page: Some(0),
            limit: Some(0),
            ..ProductsQuery::default()
        };
        get_products(&client, &query).await.unwrap();

        assert_eq!(mock.last_request().unwrap().url, "https://shop.test/api/products");
    }

    #[tokio::test]
    async fn test_get_product_by_id() {
        let (client, mock) = mock_client(None);
        mock.push_json(200, json!({"_id": "p 1", "name": "Tee", "price": 10}));

        let product = get_product_by_id(&client, &ProductId::new("p 1")).await.unwrap();

        assert_eq!(product.name, "Tee");
        assert_eq!(mock.last_request().unwrap().url, "https://shop.test/api/products/p%201");
    }

    #[tokio::test]
    async fn test_missing_product_is_server_error() {
        let (client, mock) = mock_client(None);
        mock.push_json(404, json!({"message": "Product not found"}));

        let err = get_product_by_id(&client, &ProductId::new("nope")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
