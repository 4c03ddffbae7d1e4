//! Adapters for emitting masked events through `tracing`.
//!
//! [`TracingSink`] is an [`AnalyticsSink`] that turns each masked event into
//! one `tracing` event carrying the event as a JSON string field. Enabling
//! this feature also turns on debug diagnostics for degraded masking paths
//! (unparseable bodies or URLs, unterminated literals, nesting limit); those
//! diagnostics never include event data.

use ::tracing::info;

use crate::{event::MaskedEvent, sink::AnalyticsSink};

/// Target used for every event emitted by [`TracingSink`].
pub const ANALYTICS_TARGET: &str = "netredact::analytics";

/// An [`AnalyticsSink`] that emits each masked event at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl AnalyticsSink for TracingSink {
    fn record(&self, event: MaskedEvent) {
        let json = serde_json::to_string(&event)
            .unwrap_or_else(|_| "Failed to serialize masked event".to_string());
        info!(
            target: ANALYTICS_TARGET,
            kind = event.kind().name(),
            method = event.method(),
            event = %json,
            "network event"
        );
    }
}
