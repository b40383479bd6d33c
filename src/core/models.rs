use crate::core::TsError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/* ----- REQUEST PARTS (shared by the verbs, search/ and health/) ----- */

/// Query parameters of a request. Ordered, so identical parameter sets serialize identically.
pub type QueryParams = BTreeMap<String, String>;

/// Extra per-request headers.
pub type HeaderParams = BTreeMap<String, String>;

/// A request body, already encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RequestBody {
    /// Serialized JSON, sent as-is.
    Json(String),
    /// A raw string body, e.g. JSON-Lines for imports.
    Text(String),
}

impl RequestBody {
    /// Encodes any serializable value.
    ///
    /// A non-empty string is sent verbatim, a non-empty object or array is sent as JSON, and
    /// anything else (empty containers, `null`, scalars) sends no body at all.
    ///
    /// # Errors
    ///
    /// Returns [`TsError::Data`] if `value` cannot be serialized.
    pub fn encode<B: Serialize + ?Sized>(value: &B) -> Result<Option<Self>, TsError> {
        let body = match serde_json::to_value(value)? {
            Value::String(s) if !s.is_empty() => Some(Self::Text(s)),
            v @ Value::Object(_) if v.as_object().is_some_and(|m| !m.is_empty()) => {
                Some(Self::Json(v.to_string()))
            }
            v @ Value::Array(_) if v.as_array().is_some_and(|a| !a.is_empty()) => {
                Some(Self::Json(v.to_string()))
            }
            _ => None,
        };
        Ok(body)
    }

    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Json(s) | Self::Text(s) => s,
        }
    }
}

/* ----- RESPONSES ----- */

/// A successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseBody {
    /// The server declared `application/json`.
    Json(Value),
    /// Anything else, kept as text.
    Text(String),
}

impl ResponseBody {
    /// Deserializes the body into `T`.
    ///
    /// Text bodies are presented to serde as a JSON string, so `T = String` receives the raw text.
    ///
    /// # Errors
    ///
    /// Returns [`TsError::Data`] if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, TsError> {
        let value = match self {
            Self::Json(v) => v,
            Self::Text(s) => Value::String(s),
        };
        Ok(serde_json::from_value(value)?)
    }

    /// The JSON value, if this is a JSON body.
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// The text, if this is a text body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}
