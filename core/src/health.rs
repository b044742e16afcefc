//! Backend health as seen from the client.

use crate::error::ClientError;
use crate::types::HealthResponse;
use std::fmt;

/// Storage status the backend reports when it is fully connected.
pub const CONNECTED_STATUS: &str = "connected";

/// Verdict of a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend answered and its storage is connected
    Healthy,
    /// Backend answered but reports a storage problem
    Degraded,
    /// No answer within the JSON contract
    Unhealthy,
}

impl HealthStatus {
    /// Whether the backend is fully usable
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of probing `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    /// Probed component
    pub component: String,
    /// Verdict
    pub status: HealthStatus,
    /// Liveness message or reason for the verdict
    pub message: Option<String>,
}

impl HealthCheck {
    /// Judge a check the backend answered.
    ///
    /// Any storage status other than `connected` (case-insensitive) is
    /// degraded.
    #[must_use]
    pub fn from_response(component: impl Into<String>, response: &HealthResponse) -> Self {
        let connected = response
            .supabase_status
            .eq_ignore_ascii_case(CONNECTED_STATUS);

        let (status, message) = if connected {
            (HealthStatus::Healthy, response.message.clone())
        } else {
            (
                HealthStatus::Degraded,
                format!("storage status: {}", response.supabase_status),
            )
        };

        Self {
            component: component.into(),
            status,
            message: Some(message).filter(|m| !m.is_empty()),
        }
    }

    /// Judge a check that failed outright
    #[must_use]
    pub fn unreachable(component: impl Into<String>, error: &ClientError) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Unhealthy,
            message: Some(error.user_message()),
        }
    }
}
