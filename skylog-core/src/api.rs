use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::ApiError,
    model::{
        HealthStatus, HistoryEntry, LoginBody, LoginResponse, RegisterAck, RegisterBody,
        WeatherBody, WeatherReport,
    },
    transport::{ApiRequest, RawResponse, Transport},
};

/// Typed client for the account and weather operations.
///
/// Generic over the transport so the same call sites run against the real
/// backend or the in-process mock. No operation retries or recovers; every
/// failure propagates as an [`ApiError`] for the caller to display.
#[derive(Debug, Clone)]
pub struct ApiClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Creates an account. Fails on missing fields or a taken username.
    pub async fn register(&self, username: &str, password: &str) -> Result<RegisterAck, ApiError> {
        let body = serde_json::to_value(RegisterBody {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        self.call(ApiRequest::post("/auth/register", body)).await
    }

    /// Exchanges credentials for a fresh bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(LoginBody {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        self.call(ApiRequest::post("/auth/login", body)).await
    }

    /// Current-conditions summary for a city. Requires a valid session.
    pub async fn weather(&self, city: &str, token: &str) -> Result<WeatherReport, ApiError> {
        let body = serde_json::to_value(WeatherBody { city: city.to_string() })?;

        self.call(ApiRequest::post("/weather/current", body).with_token(token)).await
    }

    /// The caller's past queries, most recent first. Requires a valid session.
    pub async fn history(&self, token: &str) -> Result<Vec<HistoryEntry>, ApiError> {
        self.call(ApiRequest::get("/history").with_token(token)).await
    }

    /// Probes that the backend is up. No authentication required.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.call(ApiRequest::get("/health")).await
    }

    /// Sends the request and normalizes the outcome: the parsed body on a
    /// 2xx status, otherwise the server-supplied `error` message with a
    /// generic fallback when the field is absent.
    async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.transport.send(request).await?;
        let data = parse_or_wrap(&response);

        if !response.is_success() {
            return Err(match data.get("error").and_then(Value::as_str) {
                Some(message) => ApiError::new(message),
                None => ApiError::request_failed(),
            });
        }

        serde_json::from_value(data).map_err(ApiError::from)
    }
}

/// The response body as JSON; non-JSON text is wrapped as `{error: text}`
/// so downstream handling sees one shape.
fn parse_or_wrap(response: &RawResponse) -> Value {
    serde_json::from_str(&response.body)
        .unwrap_or_else(|_| serde_json::json!({ "error": response.body }))
}
