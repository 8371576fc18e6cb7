//! Body serialization utilities.

use bytes::Bytes;
use derive_more::{Display, Error};

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed payload did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("JSON deserialization error at '{path}': {message}")]
pub struct DecodeError {
    /// JSON path to the failing field (e.g. `list[3].price`), `.` for the root.
    pub path: String,
    /// Error message.
    pub message: String,
}

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use arts_api_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Login { address: String }
///
/// let bytes = to_json(&Login { address: "0xabc".to_string() }).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"address":"0xabc"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec(value).map(Bytes::from)
}

/// Deserialize JSON bytes with path-aware error messages.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| DecodeError {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

/// Deserialize an already-parsed JSON value with path-aware error messages.
///
/// # Example
///
/// ```
/// use arts_api_core::from_value;
/// use serde_json::json;
///
/// let ids: Vec<u32> = from_value(json!([1, 2, 3])).expect("deserialize");
/// assert_eq!(ids, vec![1, 2, 3]);
///
/// let err = from_value::<Vec<u32>>(json!([1, "two"])).expect_err("mismatch");
/// assert_eq!(err.path, "[1]");
/// ```
pub fn from_value<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, DecodeError> {
    serde_path_to_error::deserialize(value).map_err(|e| DecodeError {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}
