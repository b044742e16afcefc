//! Safe fetching: one HTTP call, one classified outcome.
//!
//! Every response is classified before the caller sees it:
//!
//! | Situation | Outcome |
//! |---|---|
//! | request never completed | [`ClientError::Transport`] |
//! | response is not JSON | [`ClientError::ProtocolMismatch`] (body never parsed) |
//! | JSON with a failure status | [`ClientError::Api`] from the `{error}` envelope |
//! | JSON success that does not decode | [`ClientError::ProtocolMismatch`] |
//! | JSON success | decoded payload |
//!
//! This is what keeps an HTML error page from ever being parsed as JSON.

use event_ticket_core::ClientError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Error body returned by the backend on failure.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: String,
}

/// Whether a `Content-Type` value declares JSON.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Send a request and classify its outcome.
///
/// `endpoint` labels logs and metrics.
///
/// # Errors
///
/// See the module documentation for the classification.
pub async fn safe_fetch<T>(endpoint: &'static str, request: RequestBuilder) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let outcome = match request.send().await {
        Ok(response) => classify(response).await,
        Err(error) => Err(ClientError::Transport(error.to_string())),
    };

    record(endpoint, &outcome);
    outcome
}

/// Classify a completed response.
async fn classify<T>(response: Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let status = response.status();

    if status == StatusCode::NO_CONTENT {
        return decode(status, b"null");
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if !is_json_content_type(&content_type) {
        let shown = if content_type.is_empty() {
            "none"
        } else {
            content_type.as_str()
        };
        return Err(ClientError::ProtocolMismatch {
            status: status.as_u16(),
            detail: format!("unexpected content type `{shown}`"),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    if !status.is_success() {
        let envelope: ErrorEnvelope = serde_json::from_slice(&body).unwrap_or_default();
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope.error,
        });
    }

    decode(status, &body)
}

fn decode<T>(status: StatusCode, body: &[u8]) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|e| ClientError::ProtocolMismatch {
        status: status.as_u16(),
        detail: format!("invalid JSON payload: {e}"),
    })
}

fn record<T>(endpoint: &'static str, outcome: &Result<T, ClientError>) {
    let label = match outcome {
        Ok(_) => {
            debug!(endpoint, "request succeeded");
            "success"
        }
        Err(error) => {
            warn!(endpoint, kind = ?error.kind(), %error, "request failed");
            match error {
                ClientError::Transport(_) => "transport",
                ClientError::ProtocolMismatch { .. } => "protocol_mismatch",
                _ => "api_error",
            }
        }
    };

    metrics::counter!("ticket_client.requests", "endpoint" => endpoint, "outcome" => label)
        .increment(1);
}
