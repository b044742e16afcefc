//! Wire and domain types for the ticketing API.
//!
//! Everything the backend owns (events, stats, health) is modelled as read-only
//! values that the client refetches rather than caches. Request bodies
//! (`Credentials`, `NewEvent`, `RegistrationRequest`) are built by the validators
//! in [`crate::validation`] and are never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of an event as issued by the backend.
///
/// Some backend deployments issue numeric ids, others UUID strings. Both are
/// accepted on the wire and normalized to a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Create an `EventId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

// ============================================================================
// Events
// ============================================================================

/// An event as listed by `GET /api/events`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Backend-issued identifier
    pub id: EventId,
    /// Display title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// ISO-8601 date (`YYYY-MM-DD`, optionally followed by a time part)
    pub date: String,
    /// Tickets still available
    pub total_tickets: u32,
}

impl Event {
    /// Calendar date of the event, if the backend sent a parseable ISO-8601 date.
    #[must_use]
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Whether the event has no tickets left.
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.total_tickets == 0
    }
}

/// Body of `POST /api/events`: an event without its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Ticket capacity
    pub total_tickets: u32,
}

/// Success body of `POST /api/events`.
///
/// The contract promises the created event, but deployed backends answer with a
/// bare `{message}` acknowledgement. Both are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CreatedEvent {
    /// The backend echoed the created event
    Event(Event),
    /// The backend only acknowledged the creation
    Acknowledged(MessageResponse),
}

// ============================================================================
// Authentication
// ============================================================================

/// Login credentials. Created per attempt and dropped after the response.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Plain-text password, sent once over the wire
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Success body of both login endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// Session token; admin tokens carry the `admin-` role marker
    pub token: String,
    /// Optional human-readable acknowledgement
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Registration
// ============================================================================

/// Body of `POST /api/tickets/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    /// Attendee name
    pub name: String,
    /// Attendee email
    pub email: String,
    /// Event to register for
    pub event_id: EventId,
    /// Number of tickets, between 1 and 10
    pub tickets: u32,
}

/// Generic `{message}` acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Admin & health
// ============================================================================

/// Success body of `GET /api/admin/stats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    /// Number of events
    #[serde(default)]
    pub total_events: u64,
    /// Number of tickets booked across all events
    #[serde(default)]
    pub total_tickets: u64,
}

/// Success body of `GET /api/health`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Liveness message
    #[serde(default)]
    pub message: String,
    /// State of the backend's storage connection
    #[serde(default)]
    pub supabase_status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_accepts_strings_and_numbers() {
        let text: EventId = serde_json::from_str(r#""e1""#).unwrap();
        let number: EventId = serde_json::from_str("42").unwrap();

        assert_eq!(text.as_str(), "e1");
        assert_eq!(number.as_str(), "42");
        assert_eq!(serde_json::to_string(&number).unwrap(), r#""42""#);
    }

    #[test]
    fn event_deserializes_without_description() {
        let event: Event = serde_json::from_str(
            r#"{"id": 7, "title": "Launch", "date": "2026-03-15", "total_tickets": 40}"#,
        )
        .unwrap();

        assert_eq!(event.id, EventId::new("7"));
        assert!(event.description.is_empty());
        assert_eq!(
            event.calendar_date(),
            NaiveDate::from_ymd_opt(2026, 3, 15)
        );
    }

    #[test]
    fn calendar_date_tolerates_timestamps() {
        let event = Event {
            id: EventId::new("e1"),
            title: "Gala".into(),
            description: String::new(),
            date: "2026-05-10T19:30:00".into(),
            total_tickets: 0,
        };

        assert_eq!(event.calendar_date(), NaiveDate::from_ymd_opt(2026, 5, 10));
        assert!(event.is_sold_out());
    }

    #[test]
    fn new_event_serializes_iso_date() {
        let event = NewEvent {
            title: "Meetup".into(),
            description: "Monthly".into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            total_tickets: 25,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2026-01-02");
        assert_eq!(json["total_tickets"], 25);
    }

    #[test]
    fn created_event_accepts_acknowledgement() {
        let created: CreatedEvent =
            serde_json::from_str(r#"{"message": "Event created successfully"}"#).unwrap();

        assert_eq!(
            created,
            CreatedEvent::Acknowledged(MessageResponse {
                message: "Event created successfully".into()
            })
        );
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials {
            email: "a@b.co".into(),
            password: "hunter22".into(),
        };

        let debug = format!("{credentials:?}");
        assert!(debug.contains("a@b.co"));
        assert!(!debug.contains("hunter22"));
    }
}
