//! Centralized constants for header names and defaults.

/// Header carrying the API key (`X-TYPESENSE-API-KEY`; header names are case-insensitive).
pub(crate) const API_KEY_HEADER: &str = "x-typesense-api-key";

/// Query parameter carrying the API key when headers are not an option.
pub(crate) const API_KEY_QUERY_PARAM: &str = "x-typesense-api-key";

/// Keys at least this long are always sent as a header in search-only mode.
pub(crate) const MAX_QUERY_PARAM_API_KEY_LEN: usize = 2000;

pub(crate) const USER_AGENT: &str = concat!("typesense-rs/", env!("CARGO_PKG_VERSION"));
