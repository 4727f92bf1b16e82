//! JSON codec shared by every backend.
//!
//! Decoding happens in two steps so that the query engine can inspect the
//! generic document tree and callers still receive their typed object:
//! bytes -> [`Value`] ([`decode_document`]) -> `T` ([`decode_object`]).

use serde_json::Value;
use thiserror::Error;

use crate::storable::Storable;

/// Failure to encode or decode a stored payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The object could not be serialized.
    #[error("failed to encode {kind} object: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The payload is valid JSON but does not have the shape of the target type.
    #[error("document does not decode as {kind}: {source}")]
    Shape {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialize an object to its stored byte form.
pub fn encode<T: Storable>(object: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(object).map_err(|source| CodecError::Encode {
        kind: T::KIND,
        source,
    })
}

/// Serialize an untyped document to its stored byte form.
pub fn encode_document(document: &Value) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(document).map_err(|source| CodecError::Encode {
        kind: "document",
        source,
    })
}

/// Parse stored bytes into a generic document tree.
pub fn decode_document(bytes: &[u8]) -> Result<Value, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Malformed)
}

/// Interpret a document tree as a typed object.
pub fn decode_object<T: Storable>(document: &Value) -> Result<T, CodecError> {
    <T as serde::Deserialize>::deserialize(document).map_err(|source| CodecError::Shape {
        kind: T::KIND,
        source,
    })
}

/// Parse stored bytes straight into a typed object.
pub fn decode<T: Storable>(bytes: &[u8]) -> Result<T, CodecError> {
    decode_object(&decode_document(bytes)?)
}
