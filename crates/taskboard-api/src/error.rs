use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can be returned by task API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("{}", describe_status(.status, .body))]
    Status { status: StatusCode, body: ErrorBody },

    /// A 2xx response whose body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// The configured base URL cannot address `/tasks` endpoints.
    #[error("invalid task API URL: {0}")]
    InvalidUrl(String),

    /// The id cannot be sent as a path segment (empty, `.` or `..`).
    #[error("invalid task id {0:?}")]
    InvalidId(String),
}

/// Error body shapes the API is known to send. Every field is optional;
/// a body that matches none of them is treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<ErrorDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(default)]
    pub due_date: Option<String>,
}

impl ErrorBody {
    pub(crate) fn from_text(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }
}

fn describe_status(status: &StatusCode, body: &ErrorBody) -> String {
    match body.message.as_deref() {
        Some(message) if !message.is_empty() => message.to_owned(),
        _ => format!("Request failed with status code {}", status.as_u16()),
    }
}

impl ApiError {
    /// `true` when no connection to the API could be established.
    pub fn is_connection_refused(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_connect())
    }

    /// Structured validation message, `"<error>: <details.dueDate>"`.
    pub fn validation_detail(&self) -> Option<String> {
        let ApiError::Status { body, .. } = self else {
            return None;
        };
        let detail = body.details.as_ref()?.due_date.as_deref()?;
        Some(match body.error.as_deref() {
            Some(error) if !error.is_empty() => format!("{error}: {detail}"),
            _ => detail.to_owned(),
        })
    }
}
