//! Errors raised while building a masking policy.
//!
//! Masking itself is infallible. Only configuration can be rejected.

use thiserror::Error;

/// A masking policy could not be constructed from configuration.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The privacy level name is not one of the known aliases.
    #[error(
        "unknown privacy level `{0}` (expected `open`/`none`, `restricted`/`private` or `locked`/`sensitive`)"
    )]
    UnknownLevel(String),
    /// The policy document is not valid JSON or has an unexpected shape.
    #[error("invalid masking policy document: {0}")]
    Document(#[from] serde_json::Error),
}
