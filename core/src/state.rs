//! UI state rendered by a presentation layer.
//!
//! The orchestrator owns a single [`ViewModel`] and publishes every transition.
//! Presentation code only reads it and edits raw form fields; it never decides
//! control flow.

use crate::error::{ClientError, ValidationError};
use crate::health::HealthCheck;
use crate::types::{AdminStats, Credentials, Event, EventId, NewEvent, RegistrationRequest};
use crate::validation::{
    validate_email, validate_event_fields, validate_event_selection, validate_name,
    validate_password, validate_ticket_count,
};
use std::fmt;

// ============================================================================
// Flows & screens
// ============================================================================

/// A user-initiated use case. Each flow has at most one request in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flow {
    /// Admin login
    AdminLogin,
    /// User login
    UserLogin,
    /// Public event listing
    ListEvents,
    /// Event listing on admin screens
    AdminListEvents,
    /// Event creation
    CreateEvent,
    /// Event deletion
    DeleteEvent,
    /// Admin statistics
    AdminStats,
    /// Ticket registration
    RegisterTickets,
    /// Backend health check
    Health,
}

impl Flow {
    /// Every flow
    pub const ALL: [Self; 9] = [
        Self::AdminLogin,
        Self::UserLogin,
        Self::ListEvents,
        Self::AdminListEvents,
        Self::CreateEvent,
        Self::DeleteEvent,
        Self::AdminStats,
        Self::RegisterTickets,
        Self::Health,
    ];

    /// Dense index of the flow, for per-flow tables
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminLogin => "admin_login",
            Self::UserLogin => "user_login",
            Self::ListEvents => "list_events",
            Self::AdminListEvents => "admin_list_events",
            Self::CreateEvent => "create_event",
            Self::DeleteEvent => "delete_event",
            Self::AdminStats => "admin_stats",
            Self::RegisterTickets => "register_tickets",
            Self::Health => "health",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screen the presentation layer shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Entry page with the public event listing
    #[default]
    Home,
    /// User login form
    UserLogin,
    /// Admin login form
    AdminLogin,
    /// Ticket registration for logged-in users
    Registration,
    /// Admin dashboard: stats, event management
    AdminDashboard,
}

// ============================================================================
// UI state
// ============================================================================

/// State of one asynchronous piece of the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiState<T> {
    /// Nothing requested yet
    Idle,
    /// Request in flight
    Loading,
    /// Last request succeeded
    Success(T),
    /// Last request failed
    Failure(ClientError),
}

impl<T> Default for UiState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> UiState<T> {
    /// Whether a request is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Success payload, if any
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Failure, if any
    #[must_use]
    pub const fn failure(&self) -> Option<&ClientError> {
        match self {
            Self::Failure(error) => Some(error),
            _ => None,
        }
    }
}

impl<T> From<Result<T, ClientError>> for UiState<T> {
    fn from(outcome: Result<T, ClientError>) -> Self {
        match outcome {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

/// Loaded event collection. An empty listing is its own state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventListing {
    /// The backend has no events
    Empty,
    /// Events in backend order
    Events(Vec<Event>),
}

impl EventListing {
    /// Borrow the events; empty for [`EventListing::Empty`]
    #[must_use]
    pub fn events(&self) -> &[Event] {
        match self {
            Self::Empty => &[],
            Self::Events(events) => events.as_slice(),
        }
    }
}

impl From<Vec<Event>> for EventListing {
    fn from(events: Vec<Event>) -> Self {
        if events.is_empty() {
            Self::Empty
        } else {
            Self::Events(events)
        }
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Raw login form input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email input
    pub email: String,
    /// Password input
    pub password: String,
}

impl LoginForm {
    /// Validate and build credentials.
    ///
    /// # Errors
    ///
    /// The first failing field among email and password.
    pub fn credentials(&self) -> Result<Credentials, ValidationError> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw event creation form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventForm {
    /// Title input
    pub title: String,
    /// Description input
    pub description: String,
    /// Date input (`YYYY-MM-DD`)
    pub date: String,
    /// Ticket capacity input
    pub total_tickets: String,
}

impl EventForm {
    /// Validate and build the creation request.
    ///
    /// # Errors
    ///
    /// See [`validate_event_fields`].
    pub fn new_event(&self) -> Result<NewEvent, ValidationError> {
        validate_event_fields(&self.title, &self.description, &self.date, &self.total_tickets)
    }
}

/// Raw ticket registration form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Attendee name input
    pub name: String,
    /// Attendee email input
    pub email: String,
    /// Selected event; `None` defaults to the first listed event
    pub event_id: Option<EventId>,
    /// Ticket count input
    pub tickets: String,
}

impl RegistrationForm {
    /// Validate and build the registration request.
    ///
    /// # Errors
    ///
    /// The first failing check among name, email, event selection and ticket count.
    pub fn request(&self, available: &[Event]) -> Result<RegistrationRequest, ValidationError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        let event_id = validate_event_selection(self.event_id.as_ref(), available)?;
        let tickets = validate_ticket_count(&self.tickets)?;

        Ok(RegistrationRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            event_id,
            tickets,
        })
    }
}

/// A form's raw input plus the state of its last submission.
///
/// Successful submissions carry the notice to show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Form<F> {
    /// Raw field values
    pub fields: F,
    /// Last submission state
    pub status: UiState<String>,
}

impl<F: Default> Form<F> {
    /// Clear every field, keeping the submission status
    pub fn reset(&mut self) {
        self.fields = F::default();
    }
}

// ============================================================================
// View model
// ============================================================================

/// Everything the presentation layer renders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewModel {
    /// Active screen
    pub screen: Screen,
    /// Admin login form
    pub admin_login: Form<LoginForm>,
    /// User login form
    pub user_login: Form<LoginForm>,
    /// Event creation form
    pub new_event: Form<EventForm>,
    /// Ticket registration form
    pub registration: Form<RegistrationForm>,
    /// Last event deletion
    pub deletion: UiState<String>,
    /// Event listing
    pub events: UiState<EventListing>,
    /// Admin statistics
    pub stats: UiState<AdminStats>,
    /// Backend health
    pub health: UiState<HealthCheck>,
}

impl ViewModel {
    /// Events currently listed, empty unless a listing loaded
    #[must_use]
    pub fn listed_events(&self) -> &[Event] {
        match self.events.success() {
            Some(listing) => listing.events(),
            None => &[],
        }
    }

    /// Record a listing outcome.
    ///
    /// A successful listing also preselects its first event in the
    /// registration form when nothing is selected yet. A failure clears the
    /// listing.
    pub fn apply_listing(&mut self, outcome: Result<EventListing, ClientError>) {
        if let Ok(listing) = &outcome {
            let unselected = self
                .registration
                .fields
                .event_id
                .as_ref()
                .is_none_or(|id| id.as_str().trim().is_empty());
            if unselected {
                self.registration.fields.event_id =
                    listing.events().first().map(|event| event.id.clone());
            }
        }
        self.events = outcome.into();
    }

    /// Return every in-flight status to idle.
    ///
    /// Used on navigation, after which in-flight results are discarded.
    pub fn abandon_pending(&mut self) {
        fn settle<T>(state: &mut UiState<T>) {
            if state.is_loading() {
                *state = UiState::Idle;
            }
        }

        settle(&mut self.admin_login.status);
        settle(&mut self.user_login.status);
        settle(&mut self.new_event.status);
        settle(&mut self.registration.status);
        settle(&mut self.deletion);
        settle(&mut self.events);
        settle(&mut self.stats);
        settle(&mut self.health);
    }
}
