use std::fmt;
use std::result;

use thiserror::Error;

/// Transport-level failure causes, classified from the underlying reqwest error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connection refused, DNS failure, TLS handshake failure
    Connect,
    /// Connect, read or total request timeout
    Timeout,
    /// Anything else the HTTP stack reports (body decoding, redirects, ...)
    Other,
}

impl TransportKind {
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportKind::Timeout
        } else if err.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportKind::Connect => "connection error",
            TransportKind::Timeout => "timeout",
            TransportKind::Other => "transport error",
        };
        f.write_str(label)
    }
}

/// Error types for Entrez client operations
#[derive(Error, Debug)]
pub enum EntrezError {
    /// HTTP request never produced a response
    #[error("HTTP request failed ({kind}): {source}")]
    Transport {
        kind: TransportKind,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a status other than 200 OK
    #[error("Request status code was {status}: {message}")]
    RemoteStatus { status: u16, message: String },

    /// Expected field absent from an otherwise parseable response
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    Xml(String),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = result::Result<T, EntrezError>;

impl From<reqwest::Error> for EntrezError {
    fn from(source: reqwest::Error) -> Self {
        EntrezError::Transport {
            kind: TransportKind::classify(&source),
            source,
        }
    }
}

impl From<quick_xml::Error> for EntrezError {
    fn from(err: quick_xml::Error) -> Self {
        EntrezError::Xml(err.to_string())
    }
}

impl From<quick_xml::DeError> for EntrezError {
    fn from(err: quick_xml::DeError) -> Self {
        EntrezError::Xml(err.to_string())
    }
}

impl EntrezError {
    pub(crate) fn missing(field: &str) -> Self {
        EntrezError::MalformedResponse {
            message: format!("missing required field `{field}`"),
        }
    }

    /// Whether a caller-side retry might succeed.
    ///
    /// The client never retries on its own; this only classifies the failure.
    pub fn is_transient(&self) -> bool {
        match self {
            EntrezError::Transport { kind, .. } => {
                matches!(kind, TransportKind::Connect | TransportKind::Timeout)
            }
            EntrezError::RemoteStatus { status, .. } => {
                (500..600).contains(status) || *status == 429
            }
            EntrezError::MalformedResponse { .. } | EntrezError::Xml(_) | EntrezError::Json(_) => {
                false
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            EntrezError::RemoteStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
