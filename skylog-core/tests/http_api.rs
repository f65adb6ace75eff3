//! Integration tests driving `ApiClient` over `HttpTransport` against a
//! stubbed HTTP server, covering the wire contract end to end.

use serde_json::json;
use skylog_core::{ApiClient, HttpTransport};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn client_for(server: &MockServer) -> ApiClient<HttpTransport> {
    ApiClient::new(HttpTransport::new(server.uri()))
}

#[tokio::test]
async fn login_round_trips_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "demo", "password": "demo" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc123",
            "username": "demo",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.login("demo", "demo").await.expect("login succeeds");

    assert_eq!(session.token, "abc123");
    assert_eq!(session.username, "demo");
}

#[tokio::test]
async fn bearer_token_is_attached_to_authenticated_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/history"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "timestamp": "2026-08-01T09:30:00Z",
                "city": "Paris",
                "summary": "Location: Paris\nCondition: Clear\nTemperature: 21.4 C\nWind: 9.2 kph\n",
            },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let history = client.history("abc123").await.expect("history succeeds");

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].city, "Paris");
}

#[tokio::test]
async fn weather_posts_the_city_with_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/weather/current"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({ "city": "Paris" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "summary": "Location: Paris\n" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = client.weather("Paris", "abc123").await.expect("weather succeeds");

    assert!(report.summary.contains("Paris"));
}

#[tokio::test]
async fn server_error_messages_are_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/history"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized." })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.history("stale-token").await.unwrap_err();

    assert_eq!(err.message(), "Unauthorized.");
}

#[tokio::test]
async fn failure_without_an_error_field_falls_back_to_the_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.register("demo", "demo").await.unwrap_err();

    assert_eq!(err.message(), "Request failed");
}

#[tokio::test]
async fn non_json_failure_bodies_become_the_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.health().await.unwrap_err();

    assert_eq!(err.message(), "Bad Gateway");
}

#[tokio::test]
async fn unreachable_server_surfaces_a_transport_error() {
    // Nothing listens on this port; reqwest fails before any response.
    let client = ApiClient::new(HttpTransport::new("http://127.0.0.1:1"));
    let err = client.health().await.unwrap_err();

    assert!(err.message().contains("Failed to reach"));
}
