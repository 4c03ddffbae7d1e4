//! Privacy masking for network telemetry.
//!
//! This crate turns a [`NetworkEvent`] (REST or GraphQL request, response or
//! error) into a [`MaskedEvent`] that is safe to forward to analytics. It
//! separates:
//! - **Policy**: how aggressively to mask ([`PrivacyLevel`]) and which keys are
//!   exempt ([`MaskingPolicy`]).
//! - **Maskers**: the structural masker for JSON-like data, the URL query
//!   masker, and the literal masker for GraphQL query text.
//! - **Assembly**: [`mask_event`] wires each event field to its masker.
//!
//! Key rules:
//! - Every masked value becomes the marker [`REDACTION_MARKER`] (`***`).
//! - Exemption sets only apply at [`PrivacyLevel::Restricted`]. At
//!   [`PrivacyLevel::Locked`] they are ignored and bodies, variables and
//!   query text are dropped entirely.
//! - Masking never fails: malformed input degrades to a masked result.
//!
//! What this crate does not do:
//! - format human-readable log lines for the unmasked event
//! - transport events anywhere (see [`AnalyticsSink`])
//! - detect PII by content
//!
//! Integrations live behind feature flags (`slog`, `tracing`).

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

/// Emits a `tracing` diagnostic when the `tracing` feature is enabled.
///
/// Call sites must never pass raw event data.
macro_rules! diagnostic {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: "netredact", $($arg)*);
    };
}

// Module declarations
mod error;
mod event;
mod masking;
mod policy;
mod sink;
#[cfg(feature = "slog")]
pub mod slog;
#[cfg(feature = "tracing")]
pub mod tracing;

// Re-exports
pub use error::PolicyError;
pub use event::{mask_event, EventKind, GraphQlContext, Headers, MaskedEvent, NetworkEvent};
pub use masking::{
    mask_body, mask_headers, mask_literals, mask_query, mask_structured, mask_url,
    mask_variables, StructuredValue, Variables, MAX_DEPTH,
};
pub use policy::{
    KeySet, MaskingPolicy, MaskingPolicyBuilder, PrivacyLevel, Surface, REDACTION_MARKER,
};
pub use sink::{AnalyticsPipeline, AnalyticsSink};
