//! Typed endpoints of the ticketing REST API.
//!
//! Every call goes through [`safe_fetch`], so each method returns an already
//! classified [`ClientError`] on failure.

use crate::config::{ClientConfig, ConfigError};
use crate::fetch::safe_fetch;
use event_ticket_core::{
    AdminStats, ClientError, CreatedEvent, Credentials, Event, EventId, HealthResponse,
    MessageResponse, NewEvent, RegistrationRequest, SessionToken, TokenResponse,
};
use reqwest::{Client, RequestBuilder, Url};

/// Ticketing API client
#[derive(Clone, Debug)]
pub struct TicketApi {
    http: Client,
    base: Url,
}

impl TicketApi {
    /// Create a client for the given base URL
    #[must_use]
    pub const fn new(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.http_client()?, config.api_base().clone()))
    }

    /// API base URL
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// `GET /events`, with the admin bearer token when given
    ///
    /// # Errors
    ///
    /// Any classified fetch failure
    pub async fn list_events(&self, token: Option<&SessionToken>) -> Result<Vec<Event>, ClientError> {
        let mut request = self.http.get(self.endpoint(&["events"]));
        if let Some(token) = token {
            request = authorized(request, token);
        }
        safe_fetch("list_events", request).await
    }

    /// `POST /events`
    ///
    /// # Errors
    ///
    /// Any classified fetch failure
    pub async fn create_event(
        &self,
        token: &SessionToken,
        event: &NewEvent,
    ) -> Result<CreatedEvent, ClientError> {
        let request = self.http.post(self.endpoint(&["events"])).json(event);
        safe_fetch("create_event", authorized(request, token)).await
    }

    /// `DELETE /events/{id}`
    ///
    /// An empty `204` answer yields `None`.
    ///
    /// # Errors
    ///
    /// Any classified fetch failure
    pub async fn delete_event(
        &self,
        token: &SessionToken,
        id: &EventId,
    ) -> Result<Option<MessageResponse>, ClientError> {
        let request = self.http.delete(self.endpoint(&["events", id.as_str()]));
        safe_fetch("delete_event", authorized(request, token)).await
    }

    /// `GET /admin/stats`
    ///
    /// # Errors
    ///
    /// Any classified fetch failure
    pub async fn admin_stats(&self, token: &SessionToken) -> Result<AdminStats, ClientError> {
        let request = self.http.get(self.endpoint(&["admin", "stats"]));
        safe_fetch("admin_stats", authorized(request, token)).await
    }

    /// `POST /auth/admin-login`
    ///
    /// # Errors
    ///
    /// Any classified fetch failure
    pub async fn admin_login(&self, credentials: &Credentials) -> Result<TokenResponse, ClientError> {
        let request = self
            .http
            .post(self.endpoint(&["auth", "admin-login"]))
            .json(credentials);
        safe_fetch("admin_login", request).await
    }

    /// `POST /auth/user-login`
    ///
    /// # Errors
    ///
    /// Any classified fetch failure
    pub async fn user_login(&self, credentials: &Credentials) -> Result<TokenResponse, ClientError> {
        let request = self
            .http
            .post(self.endpoint(&["auth", "user-login"]))
            .json(credentials);
        safe_fetch("user_login", request).await
    }

    /// `POST /tickets/register`
    ///
    /// # Errors
    ///
    /// Any classified fetch failure
    pub async fn register_tickets(
        &self,
        registration: &RegistrationRequest,
    ) -> Result<MessageResponse, ClientError> {
        let request = self
            .http
            .post(self.endpoint(&["tickets", "register"]))
            .json(registration);
        safe_fetch("register_tickets", request).await
    }

    /// `GET /health`
    ///
    /// # Errors
    ///
    /// Any classified fetch failure
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        safe_fetch("health", self.http.get(self.endpoint(&["health"]))).await
    }

    /// Resolve path segments against the base, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Bases are validated by `ClientConfig`; a cannot-be-a-base URL is left as is.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn authorized(request: RequestBuilder, token: &SessionToken) -> RequestBuilder {
    request.bearer_auth(token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> TicketApi {
        let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
        TicketApi::new(Client::new(), base)
    }

    #[test]
    fn endpoints_join_base_path() {
        let api = TicketApi::new(
            Client::new(),
            Url::parse("http://localhost:5000/api/").unwrap(),
        );

        assert_eq!(
            api.endpoint(&["auth", "admin-login"]).as_str(),
            "http://localhost:5000/api/auth/admin-login"
        );
        assert_eq!(
            api.endpoint(&["events", "a b/c"]).as_str(),
            "http://localhost:5000/api/events/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn admin_calls_send_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/stats"))
            .and(header("authorization", "Bearer admin-xyz"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"total_events": 3, "total_tickets": 41})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let stats = api_for(&server)
            .admin_stats(&SessionToken::new("admin-xyz"))
            .await
            .unwrap();

        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.total_tickets, 41);
    }

    #[tokio::test]
    async fn registration_posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tickets/register"))
            .and(body_json(json!({
                "name": "Jo",
                "email": "jo@x.com",
                "event_id": "e1",
                "tickets": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let registration = RegistrationRequest {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            event_id: EventId::new("e1"),
            tickets: 3,
        };
        let response = api_for(&server).register_tickets(&registration).await.unwrap();

        assert_eq!(response.message, "ok");
    }

    #[tokio::test]
    async fn create_event_accepts_bare_acknowledgement() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/events"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"message": "Event created"})),
            )
            .mount(&server)
            .await;

        let event = NewEvent {
            title: "Gala".into(),
            description: "Annual gala".into(),
            date: chrono_date(),
            total_tickets: 100,
        };
        let created = api_for(&server)
            .create_event(&SessionToken::new("admin-xyz"), &event)
            .await
            .unwrap();

        assert!(matches!(created, CreatedEvent::Acknowledged(_)));
    }

    #[tokio::test]
    async fn delete_event_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/events/e1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let response = api_for(&server)
            .delete_event(&SessionToken::new("admin-xyz"), &EventId::new("e1"))
            .await
            .unwrap();

        assert_eq!(response, None);
    }

    fn chrono_date() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }
}
