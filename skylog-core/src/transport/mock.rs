//! In-memory stand-in for the real backend.
//!
//! Serves the same routes with the same status codes and error bodies as
//! the real server, so the client's response handling is exercised
//! identically in both modes. State lives in an explicit [`MemoryStore`];
//! every request first awaits an artificial latency delay emulating the
//! network, and the store is only touched after that, with no further
//! suspension inside a single operation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    error::ApiError,
    model::{HistoryEntry, LoginBody, RegisterBody, WeatherBody},
    store::MemoryStore,
    transport::{ApiRequest, Method, RawResponse, Transport},
};

/// Latency applied before every request unless overridden.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct MockServer {
    store: MemoryStore,
    latency: Duration,
}

impl MockServer {
    pub fn new(store: MemoryStore) -> Self {
        Self { store, latency: DEFAULT_LATENCY }
    }

    /// Mock with the `demo`/`demo` account pre-registered.
    pub fn seeded() -> Self {
        Self::new(MemoryStore::with_demo_user())
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    fn route(&self, request: &ApiRequest) -> RawResponse {
        match (request.method, request.path.as_str()) {
            (Method::Post, "/auth/register") => self.register(request.body.as_ref()),
            (Method::Post, "/auth/login") => self.login(request.body.as_ref()),
            (Method::Post, "/weather/current") => match self.authorize(request) {
                Ok(username) => self.weather(&username, request.body.as_ref()),
                Err(denied) => denied,
            },
            (Method::Get, "/history") => match self.authorize(request) {
                Ok(username) => ok(json!(self.store.history_for(&username))),
                Err(denied) => denied,
            },
            (Method::Get, "/health") => ok(json!({ "status": "ok" })),
            (method, path) => error(404, format!("No route for {method} {path}")),
        }
    }

    /// Resolves the bearer token to a username, or yields the 401 response.
    fn authorize(&self, request: &ApiRequest) -> Result<String, RawResponse> {
        request
            .token
            .as_deref()
            .and_then(|token| self.store.session_user(token))
            .ok_or_else(|| error(401, "Unauthorized."))
    }

    fn register(&self, body: Option<&Value>) -> RawResponse {
        let Some(body) = parse_body::<RegisterBody>(body) else {
            return error(400, "Missing username or password.");
        };
        if body.username.is_empty() || body.password.is_empty() {
            return error(400, "Missing username or password.");
        }
        if !self.store.create_user(&body.username, &body.password) {
            return error(409, "Username already exists.");
        }

        ok(json!({ "ok": true }))
    }

    fn login(&self, body: Option<&Value>) -> RawResponse {
        let Some(body) = parse_body::<LoginBody>(body) else {
            return error(401, "Invalid credentials.");
        };
        if !self.store.authenticate(&body.username, &body.password) {
            return error(401, "Invalid credentials.");
        }

        let token = self.store.create_session(&body.username);
        ok(json!({ "token": token, "username": body.username }))
    }

    fn weather(&self, username: &str, body: Option<&Value>) -> RawResponse {
        let city = match parse_body::<WeatherBody>(body) {
            Some(body) if !body.city.is_empty() => body.city,
            _ => return error(400, "City is required."),
        };

        let summary = synthesize_summary(&city);
        self.store.record_query(
            username,
            HistoryEntry { timestamp: Utc::now(), city, summary: summary.clone() },
        );

        ok(json!({ "summary": summary }))
    }
}

#[async_trait]
impl Transport for MockServer {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        tokio::time::sleep(self.latency).await;

        let response = self.route(&request);
        debug!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "mock request"
        );

        Ok(response)
    }
}

/// Fixed-format summary with randomized temperature and wind, matching
/// what the real backend returns for a current-conditions query.
fn synthesize_summary(city: &str) -> String {
    let mut rng = rand::thread_rng();
    let temperature: f64 = rng.gen_range(18.0..28.0);
    let wind: f64 = rng.gen_range(5.0..23.0);

    format!(
        "Location: {city}\nCondition: Clear\nTemperature: {temperature:.1} C\nWind: {wind:.1} kph\n"
    )
}

fn parse_body<T: DeserializeOwned>(body: Option<&Value>) -> Option<T> {
    body.and_then(|value| serde_json::from_value(value.clone()).ok())
}

fn ok(body: Value) -> RawResponse {
    RawResponse { status: 200, body: body.to_string() }
}

fn error(status: u16, message: impl Into<String>) -> RawResponse {
    let message = message.into();
    RawResponse { status, body: json!({ "error": message }).to_string() }
}
