//! Errors surfaced by the dispatcher, resource clients and live channel.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is retried or recovered. Every variant propagates to the
//! immediate caller; only `Session::refresh` absorbs failures locally.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Any failure produced by a `skul` client call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No base URL was established for the client.
    #[error("base url not set")]
    MissingBaseUrl,

    /// The base URL or a request path could not be resolved.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend answered 429, whatever the body said.
    #[error("too many requests")]
    RateLimited { status: StatusCode, headers: HeaderMap },

    /// The backend answered with a non-2xx status and a JSON error envelope.
    #[error("{message}")]
    RequestFailed {
        message: String,
        status: StatusCode,
        headers: HeaderMap,
        body: Value,
    },

    /// The HTTP transport failed before a usable response arrived.
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A body was not valid JSON or did not match the expected shape.
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The live channel failed to connect, send or receive.
    #[error("websocket failed: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    /// The peer closed the live channel.
    #[error("websocket closed")]
    ChannelClosed,
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(error))
    }
}

impl ClientError {
    /// HTTP status attached to the failure, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RateLimited { status, .. } | Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(error) => error.status(),
            _ => None,
        }
    }

    /// Response headers, when a response was received.
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::RateLimited { headers, .. } | Self::RequestFailed { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// Parsed error body of a failed request.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::RequestFailed { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True when the backend rejected the caller's session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Stable machine-readable code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingBaseUrl => "E_MISSING_BASE_URL",
            Self::InvalidUrl(_) => "E_INVALID_URL",
            Self::RateLimited { .. } => "E_RATE_LIMITED",
            Self::RequestFailed { .. } => "E_REQUEST_FAILED",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Decode(_) => "E_DECODE",
            Self::WebSocket(_) => "E_WEBSOCKET",
            Self::ChannelClosed => "E_CHANNEL_CLOSED",
        }
    }

    /// Whether repeating the same call could succeed. The library itself
    /// never retries; this is a hint for callers.
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Transport(_) => true,
            Self::RequestFailed { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
