//! Field validators.
//!
//! Pure and synchronous. Every flow runs these before touching the network, so
//! a submission that can be rejected locally never costs a round trip. Each
//! validator reports the first problem it finds and never aggregates.

use crate::error::{Field, ValidationError, ValidationReason};
use crate::types::{Event, EventId, NewEvent};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum number of tickets per registration.
pub const MAX_TICKETS_PER_REGISTRATION: u32 = 10;

/// `local-part @ domain . tld` with no whitespace anywhere.
#[allow(clippy::unwrap_used)] // Constant pattern
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn fail<T>(field: Field, reason: ValidationReason) -> Result<T, ValidationError> {
    Err(ValidationError::new(field, reason))
}

fn require(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return fail(field, ValidationReason::Empty);
    }
    Ok(())
}

/// Validate an email address.
///
/// # Errors
///
/// `Empty` if blank after trimming, `Format` if it is not `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require(Field::Email, email)?;
    if !EMAIL_PATTERN.is_match(email.trim()) {
        return fail(Field::Email, ValidationReason::Format);
    }
    Ok(())
}

/// Validate a password.
///
/// # Errors
///
/// `Empty` if blank, `TooShort` if shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    require(Field::Password, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return fail(Field::Password, ValidationReason::TooShort);
    }
    Ok(())
}

/// Validate an attendee name.
///
/// # Errors
///
/// `Empty` if blank after trimming.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    require(Field::Name, name)
}

/// Parse a positive integer, mapping anything else to `Invalid` on `field`.
fn parse_positive(field: Field, raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(count) if count > 0 => {
            u32::try_from(count).or_else(|_| fail(field, ValidationReason::MaxExceeded))
        }
        _ => fail(field, ValidationReason::Invalid),
    }
}

/// Validate the number of tickets requested in a registration.
///
/// # Errors
///
/// `Invalid` if not an integer or not positive, `MaxExceeded` if above
/// [`MAX_TICKETS_PER_REGISTRATION`].
pub fn validate_ticket_count(raw: &str) -> Result<u32, ValidationError> {
    let count = parse_positive(Field::Tickets, raw)?;
    if count > MAX_TICKETS_PER_REGISTRATION {
        return fail(Field::Tickets, ValidationReason::MaxExceeded);
    }
    Ok(count)
}

/// Validate the event creation form, returning the request body.
///
/// Checks title, description, date and ticket capacity in that order and stops
/// at the first failure.
///
/// # Errors
///
/// `Empty` for a blank title, description or date; `Format` for a date that is
/// not `YYYY-MM-DD`; `Invalid` for a non-positive or unparseable capacity.
pub fn validate_event_fields(
    title: &str,
    description: &str,
    date: &str,
    ticket_count: &str,
) -> Result<NewEvent, ValidationError> {
    require(Field::Title, title)?;
    require(Field::Description, description)?;
    require(Field::Date, date)?;

    let Ok(day) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") else {
        return fail(Field::Date, ValidationReason::Format);
    };

    let total_tickets = parse_positive(Field::TotalTickets, ticket_count)?;

    Ok(NewEvent {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        date: day,
        total_tickets,
    })
}

/// Resolve the event a registration is for.
///
/// An explicit selection wins; otherwise the first available event is used.
///
/// # Errors
///
/// `Empty` on [`Field::EventId`] when nothing is selected and no events exist.
pub fn validate_event_selection(
    selected: Option<&EventId>,
    available: &[Event],
) -> Result<EventId, ValidationError> {
    match selected {
        Some(id) if !id.as_str().trim().is_empty() => Ok(id.clone()),
        _ => available
            .first()
            .map(|event| event.id.clone())
            .ok_or(ValidationError::new(Field::EventId, ValidationReason::Empty)),
    }
}
