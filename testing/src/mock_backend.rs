//! A wiremock server speaking the ticketing API.
//!
//! Each `mount_*` method registers one endpoint under `/api`. Mocks mounted
//! later take precedence only if earlier ones do not match, so mount each
//! endpoint once per test.

use event_ticket_client::TicketApi;
use event_ticket_core::{AdminStats, Event};
use reqwest::Url;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path prefix every endpoint lives under
pub const API_PREFIX: &str = "/api";

/// Mock ticketing backend
#[derive(Debug)]
pub struct MockBackend {
    server: MockServer,
}

impl MockBackend {
    /// Start a backend on a random local port
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Underlying mock server, for custom mocks
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// API base URL (`http://127.0.0.1:<port>/api`)
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}{API_PREFIX}", self.server.uri())
    }

    /// API client pointed at this backend
    ///
    /// # Panics
    ///
    /// If the mock server URI is not a valid URL, which wiremock never produces.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn api(&self) -> TicketApi {
        let base = Url::parse(&self.api_base()).expect("mock server URI is a valid URL");
        TicketApi::new(reqwest::Client::new(), base)
    }

    fn endpoint(verb: &str, route: &str) -> wiremock::MockBuilder {
        Mock::given(method(verb)).and(path(format!("{API_PREFIX}{route}")))
    }

    /// `POST /auth/admin-login` answers with `token`
    pub async fn mount_admin_login(&self, token: &str) {
        Self::endpoint("POST", "/auth/admin-login")
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": token, "message": "Admin login successful"})),
            )
            .mount(&self.server)
            .await;
    }

    /// `POST /auth/user-login` answers with `token`
    pub async fn mount_user_login(&self, token: &str) {
        Self::endpoint("POST", "/auth/user-login")
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": token, "message": "Login successful"})),
            )
            .mount(&self.server)
            .await;
    }

    /// `GET /events` lists `events`
    pub async fn mount_events(&self, events: &[Event]) {
        Self::endpoint("GET", "/events")
            .respond_with(ResponseTemplate::new(200).set_body_json(events))
            .mount(&self.server)
            .await;
    }

    /// `POST /events` acknowledges creation, requiring the given bearer token
    pub async fn mount_create_event(&self, token: &str) {
        Self::endpoint("POST", "/events")
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"message": "Event created"})),
            )
            .mount(&self.server)
            .await;
    }

    /// `GET /events` lists `events` only for the given bearer token.
    ///
    /// Mount before [`MockBackend::mount_events`] so unauthenticated calls
    /// fall through to the public listing.
    pub async fn mount_admin_events(&self, token: &str, events: &[Event]) {
        Self::endpoint("GET", "/events")
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(events))
            .mount(&self.server)
            .await;
    }

    /// `DELETE /events/{id}` answers `204 No Content`, requiring the given
    /// bearer token
    pub async fn mount_delete_event(&self, token: &str, id: &str) {
        Self::endpoint("DELETE", &format!("/events/{id}"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;
    }

    /// `GET /admin/stats` answers with `stats`
    pub async fn mount_stats(&self, stats: AdminStats) {
        Self::endpoint("GET", "/admin/stats")
            .respond_with(ResponseTemplate::new(200).set_body_json(stats))
            .mount(&self.server)
            .await;
    }

    /// `POST /tickets/register` answers with `{message}`
    pub async fn mount_register(&self, message: &str) {
        self.mount_register_delayed(message, Duration::ZERO).await;
    }

    /// `POST /tickets/register` answers with `{message}` after `delay`
    pub async fn mount_register_delayed(&self, message: &str, delay: Duration) {
        Self::endpoint("POST", "/tickets/register")
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": message}))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// `GET /health` reports the given storage status
    pub async fn mount_health(&self, storage_status: &str) {
        Self::endpoint("GET", "/health")
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"message": "API is running", "supabase_status": storage_status}),
            ))
            .mount(&self.server)
            .await;
    }

    /// Any request to `route` fails with a JSON error envelope
    pub async fn mount_error(&self, verb: &str, route: &str, status: u16, error: &str) {
        Self::endpoint(verb, route)
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"error": error})))
            .mount(&self.server)
            .await;
    }

    /// Any request to `route` answers with an HTML page
    pub async fn mount_html(&self, verb: &str, route: &str, status: u16) {
        Self::endpoint(verb, route)
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_raw("<!DOCTYPE html><html><body>Error</body></html>", "text/html"),
            )
            .mount(&self.server)
            .await;
    }

    /// Number of requests received for `verb` on `route`
    pub async fn hits(&self, verb: &str, route: &str) -> usize {
        let full_path = format!("{API_PREFIX}{route}");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| {
                request.method.as_str().eq_ignore_ascii_case(verb) && request.url.path() == full_path
            })
            .count()
    }

    /// `Authorization` header of every request received for `verb` on
    /// `route`, in arrival order
    pub async fn authorizations(&self, verb: &str, route: &str) -> Vec<Option<String>> {
        let full_path = format!("{API_PREFIX}{route}");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| {
                request.method.as_str().eq_ignore_ascii_case(verb) && request.url.path() == full_path
            })
            .map(|request| {
                request
                    .headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }

    /// Body of the last request received on `route`, decoded as JSON
    pub async fn last_body(&self, route: &str) -> Option<Value> {
        let full_path = format!("{API_PREFIX}{route}");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .rev()
            .find(|request| request.url.path() == full_path)
            .and_then(|request| serde_json::from_slice(&request.body).ok())
    }
}
