//! Error taxonomy shared by every flow.
//!
//! [`ClientError`] is the failure half of a flow outcome. Its variants separate
//! problems the user can fix (validation), problems with the session
//! (missing admin token), problems with the network or deployment (transport,
//! protocol mismatch) and explicit rejections by the server (API errors).
//! [`ClientError::kind`] gives presentation code a stable discriminator.

use crate::state::Flow;
use std::fmt;
use thiserror::Error;

/// Generic message shown for transport failures.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Generic message shown when the server answers outside the JSON contract.
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

// ============================================================================
// Validation
// ============================================================================

/// Input field a validation failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Email address
    Email,
    /// Password
    Password,
    /// Attendee name
    Name,
    /// Selected event
    EventId,
    /// Requested ticket count for a registration
    Tickets,
    /// Event title
    Title,
    /// Event description
    Description,
    /// Event date
    Date,
    /// Ticket capacity of a new event
    TotalTickets,
}

impl Field {
    /// Human-readable field label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
            Self::Name => "Name",
            Self::EventId => "Event",
            Self::Tickets => "Number of tickets",
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Date => "Date",
            Self::TotalTickets => "Total tickets",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a field failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// Missing or blank
    Empty,
    /// Present but malformed
    Format,
    /// Shorter than the minimum length
    TooShort,
    /// Not a positive integer
    Invalid,
    /// Above the allowed maximum
    MaxExceeded,
}

impl ValidationReason {
    /// Stable snake-case code for the reason
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Format => "format",
            Self::TooShort => "too_short",
            Self::Invalid => "invalid",
            Self::MaxExceeded => "max_exceeded",
        }
    }
}

/// A single field-level validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValidationError {
    /// Offending field
    pub field: Field,
    /// What is wrong with it
    pub reason: ValidationReason,
}

impl ValidationError {
    /// Create a validation error
    #[must_use]
    pub const fn new(field: Field, reason: ValidationReason) -> Self {
        Self { field, reason }
    }

    /// User-facing message for the failure
    #[must_use]
    pub fn message(&self) -> String {
        use ValidationReason::{Empty, Format, Invalid, MaxExceeded, TooShort};

        match (self.field, self.reason) {
            (Field::Email, Format) => "Please enter a valid email address".to_string(),
            (Field::Password, TooShort) => "Password must be at least 6 characters".to_string(),
            (Field::EventId, Empty) => "Please select an event".to_string(),
            (Field::Tickets, Invalid) => "Please enter a valid number of tickets".to_string(),
            (Field::Tickets, MaxExceeded) => "You can register at most 10 tickets".to_string(),
            (Field::Date, Format) => "Date must be in YYYY-MM-DD format".to_string(),
            (field, Empty) => format!("{field} is required"),
            (field, Invalid) => format!("{field} must be a positive number"),
            (field, Format | TooShort | MaxExceeded) => format!("{field} is invalid"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Flow failures
// ============================================================================

/// Discriminator of a [`ClientError`], for rendering distinct messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Input rejected before any network call
    Validation,
    /// Admin-gated flow without an admin session
    Precondition,
    /// Network unreachable
    Transport,
    /// Server answered outside the JSON contract
    ProtocolMismatch,
    /// Server explicitly rejected the request
    Api,
    /// Same flow already has a request in flight
    InFlight,
    /// Result dropped because the view changed
    Superseded,
    /// Session persistence failed
    Storage,
}

/// Failure outcome of a flow.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Input failed validation; no request was issued
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Admin-only flow invoked without an admin token; no request was issued
    #[error("admin session required")]
    AdminRequired,

    /// The request could not complete (DNS, connection, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// The response was not the expected JSON
    #[error("protocol mismatch (status {status}): {detail}")]
    ProtocolMismatch {
        /// HTTP status of the response
        status: u16,
        /// What was wrong with the response
        detail: String,
    },

    /// The server answered with a JSON error envelope
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the error envelope, possibly empty
        message: String,
    },

    /// Re-entry rejected while the same flow is in flight
    #[error("{0} is already in flight")]
    InFlight(Flow),

    /// The view changed while the request was in flight
    #[error("result discarded after navigation")]
    Superseded,

    /// The session store could not be read or written
    #[error("session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Discriminator for this failure
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::AdminRequired => FailureKind::Precondition,
            Self::Transport(_) => FailureKind::Transport,
            Self::ProtocolMismatch { .. } => FailureKind::ProtocolMismatch,
            Self::Api { .. } => FailureKind::Api,
            Self::InFlight(_) => FailureKind::InFlight,
            Self::Superseded => FailureKind::Superseded,
            Self::Storage(_) => FailureKind::Storage,
        }
    }

    /// HTTP status, for failures that carry one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ProtocolMismatch { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// API messages are surfaced verbatim; transport and protocol failures map to
    /// generic messages so an HTML error page never reaches the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(error) => error.message(),
            Self::AdminRequired => "Please log in as an administrator.".to_string(),
            Self::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::ProtocolMismatch { .. } => SERVER_ERROR_MESSAGE.to_string(),
            Self::Api { status, message } if message.is_empty() => {
                format!("Request failed with status {status}")
            }
            Self::Api { message, .. } => message.clone(),
            Self::InFlight(_) => "Please wait for the current request to finish.".to_string(),
            Self::Superseded => {
                "The page changed before the request finished. Please check and retry.".to_string()
            }
            Self::Storage(_) => "Could not save your session.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        let error = ValidationError::new(Field::Title, ValidationReason::Empty);
        assert_eq!(error.message(), "Title is required");

        let error = ValidationError::new(Field::Password, ValidationReason::TooShort);
        assert_eq!(error.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(ValidationReason::TooShort.code(), "too_short");
        assert_eq!(ValidationReason::MaxExceeded.code(), "max_exceeded");
    }

    #[test]
    fn api_messages_are_verbatim() {
        let error = ClientError::Api {
            status: 400,
            message: "Only 3 tickets available".into(),
        };
        assert_eq!(error.user_message(), "Only 3 tickets available");
        assert_eq!(error.kind(), FailureKind::Api);
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn empty_api_message_falls_back_to_status() {
        let error = ClientError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(error.user_message(), "Request failed with status 500");
    }

    #[test]
    fn protocol_mismatch_hides_details_from_users() {
        let error = ClientError::ProtocolMismatch {
            status: 502,
            detail: "unexpected content type `text/html`".into(),
        };
        assert_eq!(error.user_message(), SERVER_ERROR_MESSAGE);
        assert!(error.to_string().contains("text/html"));
    }

    #[test]
    fn every_failure_has_a_user_message() {
        let failures = [
            ClientError::AdminRequired,
            ClientError::Transport("refused".into()),
            ClientError::InFlight(Flow::RegisterTickets),
            ClientError::Superseded,
            ClientError::Storage("read-only".into()),
        ];
        for error in failures {
            assert!(!error.user_message().is_empty(), "{error:?}");
        }
    }

    #[test]
    fn validation_converts_into_client_error() {
        let error: ClientError = ValidationError::new(Field::Email, ValidationReason::Format).into();
        assert_eq!(error.kind(), FailureKind::Validation);
        assert_eq!(error.user_message(), "Please enter a valid email address");
    }
}
