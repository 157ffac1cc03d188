//! Error types shared across the fetch, extract, validate and deliver stages.

use thiserror::Error;

/// Failure to retrieve the source page. Always surfaced to the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with http {status}")]
    Status { url: String, status: u16 },

    #[error("failed reading body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TransportError::Timeout {
                url: url.to_string(),
            };
        }
        if err.is_body() || err.is_decode() {
            return TransportError::Body {
                url: url.to_string(),
                source: err,
            };
        }
        TransportError::Network {
            url: url.to_string(),
            source: err,
        }
    }
}

/// The document did not have the shape an extraction strategy expects.
/// Absorbed by the pipeline as "no matches".
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("expected markup not found: {expected}")]
    StructuralMismatch { expected: &'static str },

    #[error("invalid selector: {0}")]
    Selector(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Teams,
    League,
    Time,
    Channel,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Teams => "teams",
            Field::League => "league",
            Field::Time => "time",
            Field::Channel => "channel",
        }
    }
}

/// Why a single candidate row was left out of the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("empty {} field", .0.name())]
    EmptyField(Field),

    #[error("duplicate of an earlier row")]
    Duplicate,
}

/// Missing or malformed startup configuration. Fatal before any run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("could not set up telegram client: {0}")]
    Setup(#[from] TransportError),

    #[error("telegram request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("telegram rejected message ({code}): {description}")]
    Rejected { code: u16, description: String },

    #[error("unreadable telegram response: {0}")]
    Decode(String),
}

impl DeliveryError {
    pub fn is_markdown_rejection(&self) -> bool {
        match self {
            DeliveryError::Rejected { description, .. } => {
                description.to_ascii_lowercase().contains("can't parse entities")
            }
            _ => false,
        }
    }

    pub fn is_too_long(&self) -> bool {
        match self {
            DeliveryError::Rejected { description, .. } => {
                description.to_ascii_lowercase().contains("message is too long")
            }
            _ => false,
        }
    }
}
