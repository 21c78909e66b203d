//! The API client.

use crate::error::ErrorBody;
use crate::{
    ApiConfig, ApiError, ApiRequest, HttpRequest, HttpResponse, MemoryTokenStore, Method,
    ReqwestTransport, TokenStore, Transport, TransportError,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Characters of a non-JSON body kept for the log preview.
const BODY_PREVIEW_CHARS: usize = 200;

/// Executes API calls against the configured backend.
///
/// Each call either returns the unwrapped, typed payload or one
/// [`ApiError`]. Nothing is retried.
///
/// Cloning is cheap; clones share the transport and token store.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ApiConfig>,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        config: ApiConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            tokens,
        }
    }

    /// Client over `reqwest` with the given token store.
    pub fn with_token_store(
        config: ApiConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let transport =
            ReqwestTransport::new().map_err(|e| ApiError::Unknown(e.to_string()))?;
        Ok(Self::new(config, Arc::new(transport), tokens))
    }

    /// Client configured from the environment, with an in-memory token
    /// store.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::with_token_store(ApiConfig::from_env(), Arc::new(MemoryTokenStore::new()))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// GET `path`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        self.call(ApiRequest::get(path).auth(requires_auth)).await
    }

    /// POST `body` to `path`.
    pub async fn post<T, B>(&self, path: &str, body: &B, requires_auth: bool) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(ApiRequest::post(path).json(body)?.auth(requires_auth))
            .await
    }

    /// POST to `path` without a body.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        self.call(ApiRequest::post(path).auth(requires_auth)).await
    }

    /// PUT `body` to `path`.
    pub async fn put<T, B>(&self, path: &str, body: &B, requires_auth: bool) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(ApiRequest::put(path).json(body)?.auth(requires_auth))
            .await
    }

    /// DELETE `path`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        self.call(ApiRequest::delete(path).auth(requires_auth)).await
    }

    /// DELETE `path`, discarding whatever payload comes back.
    pub async fn delete_ignore(&self, path: &str, requires_auth: bool) -> Result<(), ApiError> {
        self.delete::<IgnoredAny>(path, requires_auth).await.map(|_| ())
    }

    /// Execute a request and decode the unwrapped payload into `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let payload = self.execute(&request).await?;
        serde_json::from_value(payload).map_err(|e| {
            warn!(path = %request.path, error = %e, "Response payload did not match expected type");
            ApiError::Decode(e.to_string())
        })
    }

    /// Execute a request and return the unwrapped JSON payload.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let url = self.config.url_for(&request.path);
        let http_request = self.build_request(request, &url).await?;

        debug!(method = request.method.as_str(), url = %url, "Sending API request");
        let started = Instant::now();

        let outcome = tokio::time::timeout(self.config.timeout, self.transport.send(http_request)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match outcome {
            Err(_) | Ok(Err(TransportError::Timeout)) => {
                warn!(method = request.method.as_str(), url = %url, elapsed_ms, "API request timed out");
                return Err(ApiError::Timeout);
            }
            Ok(Err(TransportError::Connect(cause))) => {
                error!(
                    method = request.method.as_str(),
                    url = %url,
                    configured = self.config.is_configured(),
                    cause = %cause,
                    "API request failed: network error"
                );
                return Err(ApiError::Network {
                    message: self.network_error_message(&request.path, &url),
                    url,
                });
            }
            Ok(Err(TransportError::Other(cause))) => {
                error!(method = request.method.as_str(), url = %url, cause = %cause, "API request failed");
                return Err(ApiError::Unknown(cause));
            }
            Ok(Ok(response)) => response,
        };

        debug!(
            method = request.method.as_str(),
            url = %url,
            status = response.status,
            elapsed_ms,
            "API response received"
        );

        self.interpret(response, &url)
    }

    async fn build_request(&self, request: &ApiRequest, url: &str) -> Result<HttpRequest, ApiError> {
        let mut http_request = HttpRequest::json_api(request.method, url);

        if request.requires_auth {
            if let Some(token) = self.tokens.get_token().await {
                http_request = http_request.bearer_auth(&token)?;
            }
        }

        if request.method.allows_body() {
            if let Some(body) = &request.body {
                let bytes =
                    serde_json::to_vec(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                http_request = http_request.body(bytes);
            }
        }

        Ok(http_request)
    }

    /// Turn a raw response into the unwrapped payload or a typed error.
    fn interpret(&self, response: HttpResponse, url: &str) -> Result<Value, ApiError> {
        if !response.is_json() {
            let content_type = response.content_type().map(str::to_string);
            error!(
                url = %url,
                status = response.status,
                content_type = content_type.as_deref().unwrap_or("unknown"),
                preview = %response.preview(BODY_PREVIEW_CHARS),
                "Non-JSON response received"
            );
            let message = format!(
                "Server returned {} {}. Expected JSON but got {}. Please check your API configuration. API URL: {}",
                response.status,
                response.reason(),
                content_type.as_deref().unwrap_or("unknown content type"),
                self.config.base_url,
            );
            return Err(ApiError::NonJson {
                http_status: response.status,
                content_type,
                message,
            });
        }

        let body: Value = response.json().map_err(|e| {
            warn!(url = %url, status = response.status, error = %e, "Malformed JSON response");
            ApiError::MalformedJson(e.to_string())
        })?;

        if !response.is_success() {
            let ErrorBody { message, errors } = ErrorBody::from_value(&body);
            let message =
                message.unwrap_or_else(|| format!("Request failed with status {}", response.status));
            warn!(url = %url, status = response.status, message = %message, "API request rejected");
            return Err(ApiError::Server {
                status: response.status,
                message,
                errors,
            });
        }

        Ok(unwrap_envelope(body))
    }

    fn network_error_message(&self, path: &str, url: &str) -> String {
        let warning = if self.config.is_configured() {
            String::new()
        } else {
            format!(
                "\nWARNING: API URL is not configured! Using placeholder: {}\n",
                self.config.base_url
            )
        };

        format!(
            "Network request failed. Unable to reach the API server.{warning}\n\n\
             Current API URL: {base}\n\
             Endpoint: {path}\n\
             Full URL: {url}\n\n\
             Possible issues:\n\
             - API server is not running\n\
             - API URL is incorrect or not configured\n\
             - Using 'localhost' when the API runs on another machine (use its IP address instead)\n\
             - Network connectivity issues\n\n\
             To fix:\n\
             1. Ensure your backend API is running\n\
             2. Set {env}=http://YOUR_HOST:PORT or [api] base_url in storefront.toml\n\
             3. When calling from another device, use the API host's IP (e.g., http://192.168.1.100:3000)\n\n\
             Debug info:\n{diagnostics}",
            warning = warning,
            base = self.config.base_url,
            path = path,
            url = url,
            env = crate::config::ENV_API_URL,
            diagnostics = self.config.diagnostics(),
        )
    }
}

/// `{"data": T}` yields `T` (even when `T` is null); anything else is
/// returned as-is.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
