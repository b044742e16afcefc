//! Event Ticket command line client
//!
//! Runs one flow per invocation against the ticketing API. Session tokens
//! persist between invocations in the session file.
//!
//! # Usage
//!
//! ```bash
//! event-ticket events
//! event-ticket login admin --email admin@example.com --password secret1
//! event-ticket create-event --title Gala --description "Annual gala" \
//!     --date 2026-12-01 --total-tickets 100
//! event-ticket register --name Jo --email jo@x.com --tickets 3
//! event-ticket logout
//! ```
//!
//! Configuration comes from `EVENT_TICKET_*` environment variables or a `.env`
//! file; `RUST_LOG` controls log output on stderr.

mod render;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use event_ticket_client::{ClientConfig, FileSessionStore, Orchestrator};
use event_ticket_core::{ClientError, EventId, Screen};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Command line client for the event ticketing API.
#[derive(Debug, Parser)]
#[command(name = "event-ticket", version, about)]
struct Cli {
    /// API base URL, overriding `EVENT_TICKET_API_BASE`
    #[arg(long, global = true, value_name = "url")]
    api_base: Option<String>,

    /// Session file, overriding `EVENT_TICKET_SESSION_FILE`
    #[arg(long, global = true, value_name = "path")]
    session_file: Option<String>,

    /// Request timeout in seconds, overriding `EVENT_TICKET_TIMEOUT_SECS`
    #[arg(long, global = true, value_name = "secs")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Probe backend health
    Health,

    /// List events
    Events {
        /// Use the admin session
        #[arg(long)]
        admin: bool,
    },

    /// Show admin statistics
    Stats,

    /// Log in and store the session token
    Login {
        /// Account role
        #[arg(value_enum)]
        role: LoginRole,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Forget every stored session token
    Logout,

    /// Create an event (admin)
    CreateEvent {
        /// Event title
        #[arg(long)]
        title: String,

        /// Event description
        #[arg(long)]
        description: String,

        /// Event date, `YYYY-MM-DD`
        #[arg(long)]
        date: String,

        /// Ticket capacity
        #[arg(long)]
        total_tickets: String,
    },

    /// Delete an event (admin)
    DeleteEvent {
        /// Event id
        id: String,
    },

    /// Register tickets for an event
    Register {
        /// Attendee name
        #[arg(long)]
        name: String,

        /// Attendee email
        #[arg(long)]
        email: String,

        /// Event id; defaults to the first listed event
        #[arg(long)]
        event: Option<String>,

        /// Number of tickets (1 to 10)
        #[arg(long)]
        tickets: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LoginRole {
    Admin,
    User,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,event_ticket=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    tracing::debug!(api_base = %config.api_base(), "configuration loaded");

    let store = Arc::new(FileSessionStore::new(config.session_file()));
    let orchestrator =
        Orchestrator::from_config(&config, store).context("failed to initialise client")?;

    match cli.command {
        Command::Health => {
            let check = orchestrator.check_health().await.map_err(surface)?;
            println!("{}", render::health(&check));
            if !check.status.is_healthy() {
                anyhow::bail!("backend is {}", check.status);
            }
        }
        Command::Events { admin } => {
            let listing = if admin {
                orchestrator.load_admin_events().await
            } else {
                orchestrator.load_events().await
            }
            .map_err(surface)?;
            println!("{}", render::events(&listing));
        }
        Command::Stats => {
            let stats = orchestrator.load_stats().await.map_err(surface)?;
            println!("{}", render::stats(&stats));
        }
        Command::Login {
            role,
            email,
            password,
        } => {
            let message = match role {
                LoginRole::Admin => {
                    orchestrator.navigate(Screen::AdminLogin);
                    orchestrator.edit_admin_login(|form| {
                        form.email = email;
                        form.password = password;
                    });
                    orchestrator.admin_login().await.map_err(surface)?;
                    orchestrator.view().admin_login.status.success().cloned()
                }
                LoginRole::User => {
                    orchestrator.navigate(Screen::UserLogin);
                    orchestrator.edit_user_login(|form| {
                        form.email = email;
                        form.password = password;
                    });
                    orchestrator.user_login().await.map_err(surface)?;
                    orchestrator.view().user_login.status.success().cloned()
                }
            };
            println!("{}", message.unwrap_or_default());
        }
        Command::Logout => {
            orchestrator.logout().map_err(surface)?;
            println!("Logged out.");
        }
        Command::CreateEvent {
            title,
            description,
            date,
            total_tickets,
        } => {
            orchestrator.navigate(Screen::AdminDashboard);
            orchestrator.edit_event_form(|form| {
                form.title = title;
                form.description = description;
                form.date = date;
                form.total_tickets = total_tickets;
            });
            orchestrator.create_event().await.map_err(surface)?;
            print_notice(orchestrator.view().new_event.status.success());
        }
        Command::DeleteEvent { id } => {
            orchestrator.navigate(Screen::AdminDashboard);
            let notice = orchestrator
                .delete_event(&EventId::new(id))
                .await
                .map_err(surface)?;
            println!("{notice}");
        }
        Command::Register {
            name,
            email,
            event,
            tickets,
        } => {
            orchestrator.navigate(Screen::Registration);
            if event.is_none() {
                orchestrator.load_events().await.map_err(surface)?;
            }
            orchestrator.edit_registration(|form| {
                form.name = name;
                form.email = email;
                if let Some(id) = event {
                    form.event_id = Some(EventId::new(id));
                }
                form.tickets = tickets;
            });
            let notice = orchestrator.register_tickets().await.map_err(surface)?;
            println!("{notice}");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid configuration")?;
    if let Some(api_base) = &cli.api_base {
        config = config
            .with_api_base(api_base)
            .context("invalid --api-base")?;
    }
    if let Some(path) = &cli.session_file {
        config = config.with_session_file(path);
    }
    if let Some(secs) = cli.timeout.filter(|secs| *secs > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

fn print_notice(notice: Option<&String>) {
    if let Some(notice) = notice {
        println!("{notice}");
    }
}

/// Turn a flow failure into the message a user should see
fn surface(error: ClientError) -> anyhow::Error {
    tracing::debug!(kind = ?error.kind(), %error, "flow failed");
    anyhow::anyhow!(error.user_message())
}
