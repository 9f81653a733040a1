//! Codec error types.

use thiserror::Error;

/// A payload could not be represented as protocol JSON.
///
/// Seeing this is a programmer or data error in the connector, not a
/// transport problem: the value handed to the codec has no JSON form.
#[derive(Debug, Error)]
#[error("payload cannot be encoded: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// A line could not be decoded into an [`crate::Envelope`].
///
/// Covers both malformed JSON and well-formed JSON whose `type` tag is
/// not a known envelope kind.
#[derive(Debug, Error)]
#[error("malformed envelope: {0}")]
pub struct ParseError(#[from] serde_json::Error);
