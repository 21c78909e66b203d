//! Discount code validation.

use serde::{Deserialize, Serialize};
use storefront_client::{ApiClient, ApiError};
use storefront_commerce::Money;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidateDiscountRequest {
    pub code: String,
    /// Cart subtotal the code would apply to.
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDiscountResponse {
    pub valid: bool,
    #[serde(default)]
    pub discount_amount: Option<Money>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Ask the backend whether `code` applies to a purchase of `amount`.
///
/// Public; an invalid code is a successful call with `valid: false`.
pub async fn validate_discount_code(
    client: &ApiClient,
    request: &ValidateDiscountRequest,
) -> Result<ValidateDiscountResponse, ApiError> {
    client.post("/api/discounts/validate", request, false).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_validate_discount() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(200, json!({"data": {"valid": true, "discountAmount": 4.5}}));

        let response = validate_discount_code(
            &client,
            &ValidateDiscountRequest {
                code: "SAVE10".into(),
                amount: Money::from_cents(4500),
            },
        )
        .await
        .unwrap();

        assert!(response.valid);
        assert_eq!(response.discount_amount, Some(Money::from_cents(450)));
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.url, "https://shop.test/api/discounts/validate");
        assert!(sent.header_str("authorization").is_none());
        assert_eq!(sent.json_body().unwrap(), json!({"code": "SAVE10", "amount": 45}));
    }

    #[tokio::test]
    async fn test_invalid_code_is_not_an_error() {
        let (client, mock) = mock_client(None);
        mock.push_json(200, json!({"valid": false, "message": "Code expired"}));

        let response = validate_discount_code(
            &client,
            &ValidateDiscountRequest {
                code: "OLD".into(),
                amount: Money::from_cents(100),
            },
        )
        .await
        .unwrap();

        assert!(!response.valid);
        assert_eq!(response.message.as_deref(), Some("Code expired"));
    }
}
