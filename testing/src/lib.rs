//! # Event Ticket Testing
//!
//! Testing utilities for the event ticketing client.
//!
//! This crate provides:
//! - [`MockBackend`]: a wiremock server speaking the ticketing API
//! - Fixtures for events and credentials
//! - Orchestrators preconfigured against a mock backend
//! - proptest strategies for form input
//!
//! ## Example
//!
//! ```ignore
//! use event_ticket_testing::{MockBackend, fixtures, helpers};
//!
//! #[tokio::test]
//! async fn lists_events() {
//!     let backend = MockBackend::start().await;
//!     backend.mount_events(&fixtures::sample_events()).await;
//!
//!     let (orchestrator, _store) = helpers::test_orchestrator(&backend);
//!     let listing = orchestrator.load_events().await.unwrap();
//!     assert_eq!(listing.events().len(), 2);
//! }
//! ```

mod mock_backend;

pub use mock_backend::{API_PREFIX, MockBackend};

/// Sample data shaped like real backend payloads.
pub mod fixtures {
    use event_ticket_core::{Event, EventId};

    /// Admin token a mock backend issues
    pub const ADMIN_TOKEN: &str = "admin-xyz";

    /// User token a mock backend issues
    pub const USER_TOKEN: &str = "user-abc";

    /// Email that passes validation
    pub const VALID_EMAIL: &str = "jo@x.com";

    /// Password that passes validation
    pub const VALID_PASSWORD: &str = "secret1";

    /// An event with the given id
    #[must_use]
    pub fn sample_event(id: &str) -> Event {
        Event {
            id: EventId::new(id),
            title: format!("Concert {id}"),
            description: "An evening of live music".to_string(),
            date: "2026-07-14".to_string(),
            total_tickets: 120,
        }
    }

    /// Two events, `e1` then `e2`
    #[must_use]
    pub fn sample_events() -> Vec<Event> {
        vec![sample_event("e1"), sample_event("e2")]
    }
}

/// Orchestrators wired to a [`MockBackend`].
pub mod helpers {
    use super::MockBackend;
    use super::fixtures::ADMIN_TOKEN;
    use event_ticket_client::{MemorySessionStore, Orchestrator, SessionStore};
    use event_ticket_core::{Role, SessionToken};
    use std::sync::Arc;

    /// Orchestrator with an empty in-memory session store.
    ///
    /// The store is returned alongside so tests can inspect it.
    #[must_use]
    pub fn test_orchestrator(backend: &MockBackend) -> (Orchestrator, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let orchestrator = Orchestrator::new(backend.api(), store.clone());
        (orchestrator, store)
    }

    /// Orchestrator whose session already holds [`ADMIN_TOKEN`]
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn admin_orchestrator(backend: &MockBackend) -> (Orchestrator, Arc<MemorySessionStore>) {
        let (orchestrator, store) = test_orchestrator(backend);
        store
            .set_token(Role::Admin, &SessionToken::new(ADMIN_TOKEN))
            .expect("memory store never fails");
        (orchestrator, store)
    }

    /// Route client logs to the test harness; safe to call more than once
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// proptest strategies for form input.
pub mod properties {
    use proptest::prelude::*;

    /// Emails the validator accepts
    pub fn valid_email() -> impl Strategy<Value = String> {
        ("[a-z0-9._]{1,12}", "[a-z0-9]{1,12}", "[a-z]{2,6}")
            .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
    }

    /// Passwords the validator accepts
    pub fn valid_password() -> impl Strategy<Value = String> {
        "[A-Za-z0-9!#%]{6,24}"
    }

    /// Ticket counts the validator accepts, as typed
    pub fn valid_ticket_input() -> impl Strategy<Value = String> {
        (1u32..=10).prop_map(|count| count.to_string())
    }

    /// Ticket counts the validator rejects, as typed
    pub fn invalid_ticket_input() -> impl Strategy<Value = String> {
        prop_oneof![
            (i64::MIN..=0).prop_map(|count| count.to_string()),
            (11i64..=i64::from(u32::MAX)).prop_map(|count| count.to_string()),
            "[a-z]{1,8}",
        ]
    }
}
