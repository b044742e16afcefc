//! # Event Ticket Client
//!
//! I/O layer of the event ticketing client.
//!
//! - [`safe_fetch`]: one HTTP call, classified into transport, protocol and API
//!   failures before anything is parsed
//! - [`TicketApi`]: typed endpoints of the REST API
//! - [`SessionStore`]: role-keyed token storage, in memory or on disk
//! - [`Orchestrator`]: the use-case flows, publishing a [`ViewModel`] over a
//!   `watch` channel
//!
//! ## Example
//!
//! ```no_run
//! use event_ticket_client::{ClientConfig, MemorySessionStore, Orchestrator};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let orchestrator = Orchestrator::from_config(&config, Arc::new(MemorySessionStore::new()))?;
//!
//! orchestrator.edit_user_login(|form| {
//!     form.email = "jo@example.com".into();
//!     form.password = "secret1".into();
//! });
//! orchestrator.user_login().await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`ViewModel`]: event_ticket_core::ViewModel

pub mod api;
pub mod config;
pub mod fetch;
pub mod gate;
pub mod orchestrator;
pub mod session_store;

pub use api::TicketApi;
pub use config::{ClientConfig, ConfigError};
pub use fetch::{is_json_content_type, safe_fetch};
pub use gate::{FlowGates, FlowPermit};
pub use orchestrator::{EVENT_CREATED_NOTICE, EVENT_DELETED_NOTICE, Orchestrator};
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError};
