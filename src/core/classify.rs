//! Maps HTTP status codes onto the typed [`TsError`] taxonomy.

use crate::core::TsError;

/// The category an unsuccessful HTTP status falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// 400
    RequestMalformed,
    /// 401
    RequestUnauthorized,
    /// 404
    ObjectNotFound,
    /// 409
    ObjectAlreadyExists,
    /// 422
    ObjectUnprocessable,
    /// 500..=599, retryable.
    ServerError,
    /// Anything else.
    HttpError,
}

impl ErrorKind {
    /// Classifies a status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => Self::RequestMalformed,
            401 => Self::RequestUnauthorized,
            404 => Self::ObjectNotFound,
            409 => Self::ObjectAlreadyExists,
            422 => Self::ObjectUnprocessable,
            500..=599 => Self::ServerError,
            _ => Self::HttpError,
        }
    }
}

/// Builds the error for an unsuccessful response.
///
/// The message is `Request failed with HTTP code {status}`, followed by
/// ` | Server said: {message}` when the server sent a non-blank message.
#[must_use]
pub fn classify(status: u16, server_message: Option<&str>) -> TsError {
    let mut message = format!("Request failed with HTTP code {status}");
    if let Some(m) = server_message
        && !m.trim().is_empty()
    {
        message.push_str(" | Server said: ");
        message.push_str(m);
    }

    match ErrorKind::from_status(status) {
        ErrorKind::RequestMalformed => TsError::RequestMalformed { status, message },
        ErrorKind::RequestUnauthorized => TsError::RequestUnauthorized { status, message },
        ErrorKind::ObjectNotFound => TsError::ObjectNotFound { status, message },
        ErrorKind::ObjectAlreadyExists => TsError::ObjectAlreadyExists { status, message },
        ErrorKind::ObjectUnprocessable => TsError::ObjectUnprocessable { status, message },
        ErrorKind::ServerError => TsError::ServerError { status, message },
        ErrorKind::HttpError => TsError::HttpStatus { status, message },
    }
}
