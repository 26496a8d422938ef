//! Standard response envelope.
//!
//! Every response body, success or failure, is `{ success, data, timestamp }`.
//! `success` is false exactly when `data` carries an `error` key.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::utils::utc_timestamp;

/// Standard `{ "success": bool, "data": {...}, "timestamp": "..." }` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    /// False iff `data` contains an `error` key.
    pub success: bool,
    /// Handler payload.
    pub data: Map<String, Value>,
    /// UTC ISO-8601 time the envelope was built.
    pub timestamp: String,
}

/// Wrap a payload in the standard envelope.
///
/// The timestamp is taken at call time, not at request entry.
pub fn format_response(data: Map<String, Value>) -> Envelope {
    Envelope {
        success: !data.contains_key("error"),
        data,
        timestamp: utc_timestamp(),
    }
}
