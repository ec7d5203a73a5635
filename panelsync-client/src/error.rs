use panelsync_protocol::entity::EntityOperation;
use thiserror::Error;

const GENERIC_FAILURE: &str = "An error occurred.";

/// Errors raised while talking to the dashboard backend.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("invalid backend url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("request timed out")]
    Timeout,
    #[error("backend returned unexpected status {status}")]
    UnexpectedStatus { status: reqwest::StatusCode },
    #[error("failed to decode backend response: {0}")]
    Decode(String),
    #[error("backend rejected the request: {}", .error.as_deref().unwrap_or("no reason given"))]
    Rejected { error: Option<String> },
    #[error("no rows selected")]
    EmptySelection,
    #[error("anti-forgery cookie `{cookie}` is not set")]
    MissingCsrfToken { cookie: String },
    #[error("{entity} does not support {operation}")]
    Unsupported {
        entity: String,
        operation: EntityOperation,
    },
}

impl ClientError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }

    /// Whether the failure happened below the application layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Http(_)
                | ClientError::Timeout
                | ClientError::UnexpectedStatus { .. }
                | ClientError::Decode(_)
        )
    }

    /// Text shown to the user. Server-supplied reasons win over the generic message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { error: Some(reason) } if !reason.trim().is_empty() => {
                reason.clone()
            }
            ClientError::Timeout => "The server took too long to respond.".to_string(),
            ClientError::Unsupported { entity, operation } => {
                format!("Cannot {} {} records.", operation, entity)
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
