//! Adapters for emitting masked events through `slog`.
//!
//! This module connects [`MaskedEvent`] with `slog`:
//! - [`MaskedEvent`] implements `slog::Value`, serialized as structured JSON
//!   via `slog`'s nested-value support.
//! - [`SlogSink`] is an [`AnalyticsSink`] that logs every recorded event.
//!
//! Only masked events implement `slog::Value`; a raw `NetworkEvent` cannot be
//! passed to a logger through this module. Serialization failures are logged
//! as a placeholder string rather than propagated.
//!
//! It does not configure `slog` or choose drains.

use serde_json::Value as JsonValue;
use slog::{Key, Logger, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{event::MaskedEvent, sink::AnalyticsSink};

impl SlogValue for MaskedEvent {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let json = serde_json::to_value(self).unwrap_or_else(|_| {
            JsonValue::String("Failed to serialize masked event".to_string())
        });
        let nested = slog::Serde(json);
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// An [`AnalyticsSink`] that writes each masked event to a `slog::Logger`.
///
/// Each event is logged at info level under the `event` key, next to its
/// `kind` and `method`.
///
/// ## Example
/// ```ignore
/// use netredact::{slog::SlogSink, AnalyticsPipeline};
///
/// let pipeline = AnalyticsPipeline::new(policy, SlogSink::new(logger.clone()));
/// pipeline.observe(&event);
/// ```
#[derive(Clone, Debug)]
pub struct SlogSink {
    logger: Logger,
}

impl SlogSink {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl AnalyticsSink for SlogSink {
    fn record(&self, event: MaskedEvent) {
        let kind = event.kind().name();
        let method = event.method().to_string();
        slog::info!(
            self.logger,
            "network event";
            "kind" => kind,
            "method" => method,
            "event" => &event
        );
    }
}
