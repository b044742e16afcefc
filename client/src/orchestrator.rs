//! Use-case orchestration.
//!
//! The [`Orchestrator`] runs every flow as a sequential pipeline:
//!
//! ```text
//! gate → (admin session check) → validate → fetch → epoch check → store/view update
//! ```
//!
//! Nothing in the session store or the view data changes unless the network
//! call succeeded and the view is still the one the flow started in.

use crate::api::TicketApi;
use crate::config::{ClientConfig, ConfigError};
use crate::gate::{FlowGates, FlowPermit};
use crate::session_store::SessionStore;
use event_ticket_core::{
    AdminStats, ClientError, CreatedEvent, EventForm, EventId, EventListing, Field, Flow,
    HealthCheck, LoginForm, Outcome, RegistrationForm, Role, Screen, SessionToken, UiState,
    ValidationError, ValidationReason, ViewModel,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Notice shown after an event is created
pub const EVENT_CREATED_NOTICE: &str = "Event added successfully!";

/// Notice shown after an event is deleted
pub const EVENT_DELETED_NOTICE: &str = "Event deleted successfully!";

/// Component name reported by health checks
pub const HEALTH_COMPONENT: &str = "api";

/// Forms whose submission status the orchestrator drives
#[derive(Clone, Copy, Debug)]
enum FormSlot {
    AdminLogin,
    UserLogin,
    NewEvent,
    Registration,
}

impl FormSlot {
    fn status(self, view: &mut ViewModel) -> &mut UiState<String> {
        match self {
            Self::AdminLogin => &mut view.admin_login.status,
            Self::UserLogin => &mut view.user_login.status,
            Self::NewEvent => &mut view.new_event.status,
            Self::Registration => &mut view.registration.status,
        }
    }
}

/// Runs the client's flows against one API and one session store.
///
/// The view model is published through a `watch` channel; presentation code
/// subscribes with [`Orchestrator::subscribe`] and renders whatever it sees.
pub struct Orchestrator {
    api: TicketApi,
    session: Arc<dyn SessionStore>,
    gates: FlowGates,
    epoch: AtomicU64,
    view: watch::Sender<ViewModel>,
}

impl Orchestrator {
    /// Create an orchestrator over an API client and a session store
    #[must_use]
    pub fn new(api: TicketApi, session: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            session,
            gates: FlowGates::new(),
            epoch: AtomicU64::new(0),
            view: watch::Sender::new(ViewModel::default()),
        }
    }

    /// Create an orchestrator from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built
    pub fn from_config(
        config: &ClientConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(TicketApi::from_config(config)?, session))
    }

    // ========================================================================
    // View access
    // ========================================================================

    /// Subscribe to view model updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.view.subscribe()
    }

    /// Snapshot of the current view model
    #[must_use]
    pub fn view(&self) -> ViewModel {
        self.view.borrow().clone()
    }

    /// Switch screens.
    ///
    /// Results of requests still in flight are discarded when they arrive.
    pub fn navigate(&self, screen: Screen) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.view.send_modify(|view| {
            view.screen = screen;
            view.abandon_pending();
        });
        debug!(?screen, "navigated");
    }

    /// Edit the admin login form
    pub fn edit_admin_login(&self, edit: impl FnOnce(&mut LoginForm)) {
        self.view.send_modify(|view| edit(&mut view.admin_login.fields));
    }

    /// Edit the user login form
    pub fn edit_user_login(&self, edit: impl FnOnce(&mut LoginForm)) {
        self.view.send_modify(|view| edit(&mut view.user_login.fields));
    }

    /// Edit the event creation form
    pub fn edit_event_form(&self, edit: impl FnOnce(&mut EventForm)) {
        self.view.send_modify(|view| edit(&mut view.new_event.fields));
    }

    /// Edit the ticket registration form
    pub fn edit_registration(&self, edit: impl FnOnce(&mut RegistrationForm)) {
        self.view.send_modify(|view| edit(&mut view.registration.fields));
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in as an administrator with the admin login form.
    ///
    /// On success the token is stored under the admin role and the admin
    /// dashboard is shown.
    ///
    /// # Errors
    ///
    /// Validation, fetch and storage failures. A token without the admin role
    /// marker is a [`ClientError::ProtocolMismatch`].
    #[tracing::instrument(skip(self), name = "admin_login")]
    pub async fn admin_login(&self) -> Outcome<SessionToken> {
        self.login(Flow::AdminLogin, Role::Admin).await
    }

    /// Log in as a user with the user login form.
    ///
    /// On success the token is stored under the user role and the
    /// registration screen is shown.
    ///
    /// # Errors
    ///
    /// Validation, fetch and storage failures.
    #[tracing::instrument(skip(self), name = "user_login")]
    pub async fn user_login(&self) -> Outcome<SessionToken> {
        self.login(Flow::UserLogin, Role::User).await
    }

    async fn login(&self, flow: Flow, role: Role) -> Outcome<SessionToken> {
        let _permit = self.enter(flow)?;
        let (slot, destination) = match role {
            Role::Admin => (FormSlot::AdminLogin, Screen::AdminDashboard),
            Role::User => (FormSlot::UserLogin, Screen::Registration),
        };

        let form = {
            let view = self.view.borrow();
            match role {
                Role::Admin => view.admin_login.fields.clone(),
                Role::User => view.user_login.fields.clone(),
            }
        };
        let credentials = form
            .credentials()
            .map_err(|error| self.reject(slot, error.into()))?;

        let epoch = self.begin(slot);
        let outcome = match role {
            Role::Admin => self.api.admin_login(&credentials).await,
            Role::User => self.api.user_login(&credentials).await,
        };
        drop(credentials);
        self.ensure_current(epoch)?;

        let stored = outcome.and_then(|response| {
            let token = SessionToken::new(response.token);
            if role == Role::Admin && !token.is_admin() {
                return Err(ClientError::ProtocolMismatch {
                    status: 200,
                    detail: "admin login returned a token without the admin role marker"
                        .to_string(),
                });
            }
            self.session.set_token(role, &token)?;
            Ok((token, response.message))
        });

        match stored {
            Ok((token, message)) => {
                info!(%role, "logged in");
                self.navigate(destination);
                self.view.send_modify(|view| {
                    match role {
                        Role::Admin => view.admin_login.reset(),
                        Role::User => view.user_login.reset(),
                    }
                    *slot.status(view) =
                        UiState::Success(message.unwrap_or_else(|| "Login successful".into()));
                });
                Ok(token)
            }
            Err(error) => Err(self.reject(slot, error)),
        }
    }

    /// Clear every stored token and return to the entry screen.
    ///
    /// The view is reset even if the store fails to clear.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the store could not be cleared.
    #[tracing::instrument(skip(self), name = "logout")]
    pub fn logout(&self) -> Outcome<()> {
        let cleared = self.session.clear_all();
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.view.send_replace(ViewModel::default());

        match cleared {
            Ok(()) => {
                info!("logged out");
                Ok(())
            }
            Err(error) => {
                warn!(%error, "session store could not be cleared");
                Err(error.into())
            }
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Load the public event listing.
    ///
    /// # Errors
    ///
    /// Fetch failures; the listing is cleared.
    #[tracing::instrument(skip(self), name = "load_events")]
    pub async fn load_events(&self) -> Outcome<EventListing> {
        let _permit = self.enter(Flow::ListEvents)?;
        self.fetch_listing(None).await
    }

    /// Load the event listing with the admin session.
    ///
    /// # Errors
    ///
    /// [`ClientError::AdminRequired`] without an admin session, otherwise
    /// fetch failures.
    #[tracing::instrument(skip(self), name = "load_admin_events")]
    pub async fn load_admin_events(&self) -> Outcome<EventListing> {
        let (_permit, token) = self.enter_admin(Flow::AdminListEvents)?;
        self.fetch_listing(Some(&token)).await
    }

    async fn fetch_listing(&self, token: Option<&SessionToken>) -> Outcome<EventListing> {
        let epoch = self.current_epoch();
        self.view.send_modify(|view| view.events = UiState::Loading);

        let outcome = self.api.list_events(token).await.map(EventListing::from);
        self.ensure_current(epoch)?;

        if let Ok(listing) = &outcome {
            info!(count = listing.events().len(), "events loaded");
        }
        self.view
            .send_modify(|view| view.apply_listing(outcome.clone()));
        outcome
    }

    /// Create an event from the event form.
    ///
    /// On success the form is cleared and the admin listing and stats are
    /// refreshed.
    ///
    /// # Errors
    ///
    /// [`ClientError::AdminRequired`], validation or fetch failures; the form
    /// is kept.
    #[tracing::instrument(skip(self), name = "create_event")]
    pub async fn create_event(&self) -> Outcome<CreatedEvent> {
        let slot = FormSlot::NewEvent;
        let (permit, token) = self.enter_admin(Flow::CreateEvent)?;

        let form = self.view.borrow().new_event.fields.clone();
        let new_event = form
            .new_event()
            .map_err(|error| self.reject(slot, error.into()))?;

        let epoch = self.begin(slot);
        let outcome = self.api.create_event(&token, &new_event).await;
        self.ensure_current(epoch)?;

        let created = outcome.map_err(|error| self.reject(slot, error))?;
        info!(title = %new_event.title, "event created");
        self.view.send_modify(|view| {
            view.new_event.reset();
            view.new_event.status = UiState::Success(EVENT_CREATED_NOTICE.to_string());
        });

        drop(permit);
        self.refresh_admin_views().await;
        Ok(created)
    }

    /// Delete an event.
    ///
    /// On success the admin listing and stats are refreshed.
    ///
    /// # Errors
    ///
    /// [`ClientError::AdminRequired`], a blank id, or fetch failures.
    #[tracing::instrument(skip(self), name = "delete_event")]
    pub async fn delete_event(&self, id: &EventId) -> Outcome<String> {
        let (permit, token) = self.enter_admin(Flow::DeleteEvent)?;

        if id.as_str().trim().is_empty() {
            let error: ClientError =
                ValidationError::new(Field::EventId, ValidationReason::Empty).into();
            self.view
                .send_modify(|view| view.deletion = UiState::Failure(error.clone()));
            return Err(error);
        }

        let epoch = self.current_epoch();
        self.view.send_modify(|view| view.deletion = UiState::Loading);
        let outcome = self.api.delete_event(&token, id).await;
        self.ensure_current(epoch)?;

        match outcome {
            Ok(_) => {
                info!(%id, "event deleted");
                let notice = EVENT_DELETED_NOTICE.to_string();
                self.view
                    .send_modify(|view| view.deletion = UiState::Success(notice.clone()));
                drop(permit);
                self.refresh_admin_views().await;
                Ok(notice)
            }
            Err(error) => {
                self.view
                    .send_modify(|view| view.deletion = UiState::Failure(error.clone()));
                Err(error)
            }
        }
    }

    /// Load admin statistics.
    ///
    /// # Errors
    ///
    /// [`ClientError::AdminRequired`] or fetch failures.
    #[tracing::instrument(skip(self), name = "load_stats")]
    pub async fn load_stats(&self) -> Outcome<AdminStats> {
        let (_permit, token) = self.enter_admin(Flow::AdminStats)?;

        let epoch = self.current_epoch();
        self.view.send_modify(|view| view.stats = UiState::Loading);
        let outcome = self.api.admin_stats(&token).await;
        self.ensure_current(epoch)?;

        self.view.send_modify(|view| view.stats = outcome.clone().into());
        outcome
    }

    async fn refresh_admin_views(&self) {
        if let Err(error) = self.load_admin_events().await {
            debug!(%error, "listing refresh skipped");
        }
        if let Err(error) = self.load_stats().await {
            debug!(%error, "stats refresh skipped");
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register tickets with the registration form.
    ///
    /// Without a selected event, the first listed event is used. On success
    /// the form is reset and the notice carries the server's message.
    ///
    /// # Errors
    ///
    /// Validation or fetch failures; the form is kept.
    #[tracing::instrument(skip(self), name = "register_tickets")]
    pub async fn register_tickets(&self) -> Outcome<String> {
        let slot = FormSlot::Registration;
        let _permit = self.enter(Flow::RegisterTickets)?;

        let request = {
            let view = self.view.borrow();
            view.registration.fields.request(view.listed_events())
        }
        .map_err(|error| self.reject(slot, error.into()))?;

        let epoch = self.begin(slot);
        let outcome = self.api.register_tickets(&request).await;
        self.ensure_current(epoch)?;

        let response = outcome.map_err(|error| self.reject(slot, error))?;
        info!(event_id = %request.event_id, tickets = request.tickets, "tickets registered");

        let notice = if response.message.is_empty() {
            "Success!".to_string()
        } else {
            format!("Success! {}", response.message)
        };
        self.view.send_modify(|view| {
            view.registration.reset();
            view.registration.status = UiState::Success(notice.clone());
        });
        Ok(notice)
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Probe backend health.
    ///
    /// An unreachable backend is reported as an unhealthy check, not as an error.
    ///
    /// # Errors
    ///
    /// Only [`ClientError::InFlight`] and [`ClientError::Superseded`].
    #[tracing::instrument(skip(self), name = "check_health")]
    pub async fn check_health(&self) -> Outcome<HealthCheck> {
        let _permit = self.enter(Flow::Health)?;

        let epoch = self.current_epoch();
        self.view.send_modify(|view| view.health = UiState::Loading);
        let outcome = self.api.health().await;
        self.ensure_current(epoch)?;

        let check = match outcome {
            Ok(response) => HealthCheck::from_response(HEALTH_COMPONENT, &response),
            Err(error) => HealthCheck::unreachable(HEALTH_COMPONENT, &error),
        };
        info!(status = %check.status, "health checked");
        self.view
            .send_modify(|view| view.health = UiState::Success(check.clone()));
        Ok(check)
    }

    // ========================================================================
    // Pipeline steps
    // ========================================================================

    fn enter(&self, flow: Flow) -> Result<FlowPermit<'_>, ClientError> {
        self.gates
            .try_enter(flow)
            .ok_or(ClientError::InFlight(flow))
    }

    /// Enter an admin-gated flow.
    ///
    /// Without an admin session the admin login screen is shown and no request
    /// is issued. The redirect leaves the epoch alone so other flows in flight
    /// still land.
    fn enter_admin(&self, flow: Flow) -> Result<(FlowPermit<'_>, SessionToken), ClientError> {
        let permit = self.enter(flow)?;
        let token = self
            .session
            .get_token(Role::Admin)?
            .filter(SessionToken::is_admin);

        match token {
            Some(token) => Ok((permit, token)),
            None => {
                warn!(flow = flow.as_str(), "admin session required");
                self.view
                    .send_modify(|view| view.screen = Screen::AdminLogin);
                Err(ClientError::AdminRequired)
            }
        }
    }

    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Mark a form submission as loading and return the epoch it started in
    fn begin(&self, slot: FormSlot) -> u64 {
        let epoch = self.current_epoch();
        self.view
            .send_modify(|view| *slot.status(view) = UiState::Loading);
        epoch
    }

    fn ensure_current(&self, epoch: u64) -> Result<(), ClientError> {
        if self.current_epoch() == epoch {
            Ok(())
        } else {
            debug!("view changed while in flight, discarding result");
            Err(ClientError::Superseded)
        }
    }

    /// Surface a failure on a form and hand it back
    fn reject(&self, slot: FormSlot, error: ClientError) -> ClientError {
        self.view
            .send_modify(|view| *slot.status(view) = UiState::Failure(error.clone()));
        error
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("api", &self.api)
            .field("gates", &self.gates)
            .field("epoch", &self.current_epoch())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_store::MemorySessionStore;
    use event_ticket_core::FailureKind;
    use reqwest::Url;

    fn offline() -> (Orchestrator, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        // Port 9 (discard) is never served in tests; any request would fail
        let api = TicketApi::new(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9/api").unwrap(),
        );
        (Orchestrator::new(api, store.clone()), store)
    }

    #[tokio::test]
    async fn invalid_login_form_fails_before_fetch() {
        let (orchestrator, store) = offline();
        orchestrator.edit_admin_login(|form| {
            form.email = "nobody".into();
            form.password = "secret1".into();
        });

        let error = orchestrator.admin_login().await.unwrap_err();
        assert_eq!(error.kind(), FailureKind::Validation);
        assert_eq!(store.get_token(Role::Admin).unwrap(), None);

        let view = orchestrator.view();
        assert_eq!(view.admin_login.status.failure(), Some(&error));
        assert_eq!(view.admin_login.fields.email, "nobody");
    }

    #[tokio::test]
    async fn admin_flows_require_admin_token() {
        let (orchestrator, store) = offline();
        store.set_token(Role::User, &SessionToken::new("u-1")).unwrap();

        for outcome in [
            orchestrator.load_stats().await.map(|_| ()),
            orchestrator.load_admin_events().await.map(|_| ()),
            orchestrator.create_event().await.map(|_| ()),
            orchestrator.delete_event(&EventId::new("e1")).await.map(|_| ()),
        ] {
            assert_eq!(outcome, Err(ClientError::AdminRequired));
        }
        assert_eq!(orchestrator.view().screen, Screen::AdminLogin);
    }

    #[tokio::test]
    async fn non_admin_token_under_admin_key_is_rejected() {
        let (orchestrator, store) = offline();
        store.set_token(Role::Admin, &SessionToken::new("u-1")).unwrap();

        assert_eq!(
            orchestrator.load_stats().await,
            Err(ClientError::AdminRequired)
        );
    }

    #[test]
    fn navigation_abandons_pending_states() {
        let (orchestrator, _) = offline();
        orchestrator
            .view
            .send_modify(|view| view.events = UiState::Loading);

        orchestrator.navigate(Screen::UserLogin);

        let view = orchestrator.view();
        assert_eq!(view.screen, Screen::UserLogin);
        assert_eq!(view.events, UiState::Idle);
    }

    #[test]
    fn logout_resets_view() {
        let (orchestrator, store) = offline();
        store.set_token(Role::Admin, &SessionToken::new("admin-1")).unwrap();
        orchestrator.navigate(Screen::AdminDashboard);

        orchestrator.logout().unwrap();

        assert_eq!(orchestrator.view(), ViewModel::default());
        assert_eq!(store.get_token(Role::Admin).unwrap(), None);
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let (orchestrator, _) = offline();
        let mut updates = orchestrator.subscribe();

        orchestrator.navigate(Screen::Registration);

        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().screen, Screen::Registration);
    }
}
