use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum TsError {
    /// The server rejected the request as malformed (HTTP 400).
    #[error("{message}")]
    RequestMalformed {
        /// The HTTP status code.
        status: u16,
        /// Standard prefix plus the server-supplied message, if any.
        message: String,
    },

    /// The API key was missing or rejected (HTTP 401).
    #[error("{message}")]
    RequestUnauthorized {
        /// The HTTP status code.
        status: u16,
        /// Standard prefix plus the server-supplied message, if any.
        message: String,
    },

    /// The addressed object does not exist (HTTP 404).
    #[error("{message}")]
    ObjectNotFound {
        /// The HTTP status code.
        status: u16,
        /// Standard prefix plus the server-supplied message, if any.
        message: String,
    },

    /// The object being created already exists (HTTP 409).
    #[error("{message}")]
    ObjectAlreadyExists {
        /// The HTTP status code.
        status: u16,
        /// Standard prefix plus the server-supplied message, if any.
        message: String,
    },

    /// The server could not process the object (HTTP 422).
    #[error("{message}")]
    ObjectUnprocessable {
        /// The HTTP status code.
        status: u16,
        /// Standard prefix plus the server-supplied message, if any.
        message: String,
    },

    /// The node answered with a 5xx status. Retried before being surfaced.
    #[error("{message}")]
    ServerError {
        /// The HTTP status code.
        status: u16,
        /// Standard prefix plus the server-supplied message, if any.
        message: String,
    },

    /// Any other unsuccessful HTTP status.
    #[error("{message}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Standard prefix plus the server-supplied message, if any.
        message: String,
    },

    /// The client configuration is incomplete. Raised before any network attempt.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// A bulk import partially failed.
    #[error("{message}")]
    Import {
        /// Summary of how many items failed.
        message: String,
        /// The per-item results reported by the server, in request order.
        results: Vec<serde_json::Value>,
    },

    /// A transport-level failure (connection refused, DNS, reset, body read).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A single attempt exceeded the connection timeout.
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The caller cancelled the request.
    #[error("Request aborted by caller.")]
    Cancelled,

    /// A node URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A response or request body could not be (de)serialized.
    #[error("Data format unexpected: {0}")]
    Data(String),
}

impl From<serde_json::Error> for TsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Data(e.to_string())
    }
}

impl TsError {
    /// The HTTP status carried by this error, if it came from a server response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestMalformed { status, .. }
            | Self::RequestUnauthorized { status, .. }
            | Self::ObjectNotFound { status, .. }
            | Self::ObjectAlreadyExists { status, .. }
            | Self::ObjectUnprocessable { status, .. }
            | Self::ServerError { status, .. }
            | Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error points at the node rather than the request (5xx, transport, timeout).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ServerError { .. } | Self::Transport(_) | Self::Timeout(_)
        )
    }

    /// Builds an [`TsError::Import`] from per-item import results.
    ///
    /// Only items reporting `"success": false` count as failures. Returns `None` when there are
    /// none.
    #[must_use]
    pub fn from_import_results(results: Vec<serde_json::Value>) -> Option<Self> {
        let failed = results
            .iter()
            .filter(|r| r.get("success").and_then(serde_json::Value::as_bool) == Some(false))
            .count();
        if failed == 0 {
            return None;
        }
        Some(Self::Import {
            message: format!(
                "{} documents imported successfully, {failed} documents failed during import. \
                 Use `results` from the error to get the detailed status for each document.",
                results.len() - failed
            ),
            results,
        })
    }
}
