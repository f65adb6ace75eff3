use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::ApiError,
    transport::{ApiRequest, Method, RawResponse, Transport},
};

/// Default address of the skylog backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Transport talking to a real backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { base_url, http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }

        let res = builder
            .send()
            .await
            .map_err(|err| ApiError::new(format!("Failed to reach {url}: {err}")))?;

        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(|err| ApiError::new(format!("Failed to read response body: {err}")))?;
        debug!(status, "received response");

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed_from_the_base_url() {
        let transport = HttpTransport::new("http://localhost:8080///");
        assert_eq!(transport.base_url(), "http://localhost:8080");
    }

    #[test]
    fn default_points_at_the_local_server() {
        assert_eq!(HttpTransport::default().base_url(), DEFAULT_BASE_URL);
    }
}
