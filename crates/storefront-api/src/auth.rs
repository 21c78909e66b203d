//! Customer authentication endpoints (phone + one-time code).

use serde::{Deserialize, Serialize};
use serde_json::json;
use storefront_client::{ApiClient, ApiError};
use storefront_commerce::customer::Customer;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub phone: String,
    pub tenant_slug: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    #[serde(default)]
    pub message: String,
    /// Seconds until the code expires.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub otp: String,
    pub tenant_slug: String,
}

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub tenant_slug: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub requires_otp_verification: bool,
}

/// Verification of a registration code, carrying the profile fields again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRegisterRequest {
    #[serde(flatten)]
    pub otp: VerifyOtpRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Send a one-time code to a phone number.
pub async fn send_customer_otp(
    client: &ApiClient,
    request: &SendOtpRequest,
) -> Result<SendOtpResponse, ApiError> {
    debug!(tenant = %request.tenant_slug, "Requesting customer OTP");
    client
        .post("/api/auth/customer/send-otp", request, false)
        .await
}

/// Exchange a one-time code for a session.
pub async fn verify_customer_otp(
    client: &ApiClient,
    request: &VerifyOtpRequest,
) -> Result<VerifyOtpResponse, ApiError> {
    client
        .post("/api/auth/customer/verify-otp", request, false)
        .await
}

/// Register a new customer. The backend answers by sending a code.
pub async fn register(
    client: &ApiClient,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    client.post("/api/customers/register", request, false).await
}

pub async fn verify_register_otp(
    client: &ApiClient,
    request: &VerifyRegisterRequest,
) -> Result<VerifyOtpResponse, ApiError> {
    client
        .post("/api/customers/verify-register-otp", request, false)
        .await
}

/// Invalidate the current token server-side.
///
/// Local credentials are not touched; see `AppState::logout`.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    client
        .post::<serde::de::IgnoredAny, _>("/api/auth/customer-logout", &json!({}), true)
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;

    #[tokio::test]
    async fn test_send_otp_is_public() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(200, json!({"data": {"message": "sent", "expiresIn": 300}}));

        let response = send_customer_otp(
            &client,
            &SendOtpRequest {
                phone: "+15550100".into(),
                tenant_slug: "acme".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.expires_in, Some(300));
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.url, "https://shop.test/api/auth/customer/send-otp");
        assert!(sent.header_str("authorization").is_none());
        assert_eq!(
            sent.json_body().unwrap(),
            json!({"phone": "+15550100", "tenantSlug": "acme"})
        );
    }

    #[tokio::test]
    async fn test_verify_otp_decodes_session() {
        let (client, mock) = mock_client(None);
        mock.push_json(
            200,
            json!({
                "token": "jwt",
                "user": {"_id": "c1", "firstName": "Ada", "lastName": "L", "email": "ada@x.io"}
            }),
        );

        let session = verify_customer_otp(
            &client,
            &VerifyOtpRequest {
                phone: "+15550100".into(),
                otp: "123456".into(),
                tenant_slug: "acme".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(session.token, "jwt");
        assert_eq!(session.refresh_token, None);
        assert_eq!(session.user.full_name(), "Ada L");
    }

    #[tokio::test]
    async fn test_verify_register_flattens_fields() {
        let (client, mock) = mock_client(None);
        mock.push_json(200, json!({"token": "t", "user": {"_id": "c1"}}));

        let request = VerifyRegisterRequest {
            otp: VerifyOtpRequest {
                phone: "1".into(),
                otp: "0000".into(),
                tenant_slug: "acme".into(),
            },
            first_name: Some("Ada".into()),
            last_name: None,
            email: None,
        };
        verify_register_otp(&client, &request).await.unwrap();

        assert_eq!(
            mock.last_request().unwrap().json_body().unwrap(),
            json!({"phone": "1", "otp": "0000", "tenantSlug": "acme", "firstName": "Ada"})
        );
    }

    #[tokio::test]
    async fn test_logout_sends_token() {
        let (client, mock) = mock_client(Some("secret"));
        mock.push_json(200, json!({"success": true}));

        logout(&client).await.unwrap();

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.url, "https://shop.test/api/auth/customer-logout");
        assert_eq!(sent.header_str("authorization"), Some("Bearer secret"));
        assert_eq!(sent.json_body().unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_register_rejection_surfaces_server_error() {
        let (client, mock) = mock_client(None);
        mock.push_json(409, json!({"message": "Phone already registered"}));

        let err = register(
            &client,
            &RegisterRequest {
                first_name: "Ada".into(),
                last_name: "L".into(),
                phone: "1".into(),
                email: None,
                tenant_slug: "acme".into(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), "Phone already registered");
    }
}
