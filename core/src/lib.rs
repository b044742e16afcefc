//! # Event Ticket Core
//!
//! Pure domain layer of the event ticketing client.
//!
//! This crate performs no I/O. It provides:
//!
//! - **Types**: wire types for the ticketing REST API (`Event`, `Credentials`, ...)
//! - **Session roles**: the `admin-` token role-marker convention
//! - **Validation**: field validators run before any network call
//! - **Errors**: the [`ClientError`] taxonomy every flow reports with
//! - **State**: the [`ViewModel`] a presentation layer renders
//!
//! ## Example
//!
//! ```
//! use event_ticket_core::{RegistrationForm, EventId};
//!
//! let form = RegistrationForm {
//!     name: "Jo".into(),
//!     email: "jo@x.com".into(),
//!     event_id: Some(EventId::new("e1")),
//!     tickets: "3".into(),
//! };
//!
//! let request = form.request(&[]).expect("valid form");
//! assert_eq!(request.tickets, 3);
//! ```

pub mod error;
pub mod health;
pub mod session;
pub mod state;
pub mod types;
pub mod validation;

pub use error::{ClientError, FailureKind, Field, ValidationError, ValidationReason};
pub use health::{HealthCheck, HealthStatus};
pub use session::{ADMIN_TOKEN_PREFIX, Role, SessionToken};
pub use state::{
    EventForm, EventListing, Flow, Form, LoginForm, RegistrationForm, Screen, UiState, ViewModel,
};
pub use types::{
    AdminStats, CreatedEvent, Credentials, Event, EventId, HealthResponse, MessageResponse,
    NewEvent, RegistrationRequest, TokenResponse,
};

/// Result of an orchestrated flow
pub type Outcome<T> = Result<T, ClientError>;
