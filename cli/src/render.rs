//! Plain-text rendering of view model slices.

use event_ticket_core::{AdminStats, EventListing, HealthCheck};
use std::fmt::Write;

/// Render an event listing, one event per line
pub fn events(listing: &EventListing) -> String {
    match listing {
        EventListing::Empty => "No events available.".to_string(),
        EventListing::Events(events) => {
            let mut out = String::new();
            for event in events {
                let date = event
                    .calendar_date()
                    .map_or_else(|| event.date.clone(), |day| day.format("%b %-d, %Y").to_string());
                let _ = writeln!(
                    out,
                    "{id:<8} {date:<14} {tickets:>5} tickets  {title}",
                    id = event.id,
                    tickets = event.total_tickets,
                    title = event.title,
                );
            }
            out.trim_end().to_string()
        }
    }
}

/// Render admin statistics
pub fn stats(stats: &AdminStats) -> String {
    format!(
        "Total events:  {}\nTotal tickets: {}",
        stats.total_events, stats.total_tickets
    )
}

/// Render a health check
pub fn health(check: &HealthCheck) -> String {
    match &check.message {
        Some(message) => format!("{}: {} ({message})", check.component, check.status),
        None => format!("{}: {}", check.component, check.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_ticket_core::{Event, EventId, HealthStatus};

    #[test]
    fn empty_listing_has_its_own_message() {
        assert_eq!(events(&EventListing::Empty), "No events available.");
    }

    #[test]
    fn events_render_one_per_line() {
        let listing = EventListing::from(vec![
            Event {
                id: EventId::new("e1"),
                title: "Jazz Night".into(),
                description: String::new(),
                date: "2026-07-14T19:00:00Z".into(),
                total_tickets: 40,
            },
            Event {
                id: EventId::new("e2"),
                title: "Open Air".into(),
                description: String::new(),
                date: "someday".into(),
                total_tickets: 0,
            },
        ]);

        let rendered = events(&listing);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Jul 14, 2026"));
        assert!(lines[0].ends_with("Jazz Night"));
        assert!(lines[1].contains("someday"));
    }

    #[test]
    fn health_includes_message() {
        let check = HealthCheck {
            component: "api".into(),
            status: HealthStatus::Degraded,
            message: Some("storage status: error".into()),
        };
        assert_eq!(health(&check), "api: degraded (storage status: error)");
    }
}
