//! The analytics side of event dispatch.
//!
//! A sink receives masked events only. [`AnalyticsPipeline`] pairs a shared
//! policy with a sink so callers hand over raw events and never touch the
//! masking step themselves.

use std::sync::Arc;

use crate::{
    event::{mask_event, MaskedEvent, NetworkEvent},
    policy::MaskingPolicy,
};

/// Destination for masked events (upload queue, local buffer, logger...).
///
/// Closures taking a [`MaskedEvent`] are sinks:
///
/// ```rust
/// use std::sync::Mutex;
///
/// use netredact::{AnalyticsPipeline, MaskedEvent, MaskingPolicy, NetworkEvent, PrivacyLevel};
///
/// let recorded = Mutex::new(Vec::new());
/// let pipeline = AnalyticsPipeline::new(
///     MaskingPolicy::new(PrivacyLevel::Restricted),
///     |event: MaskedEvent| recorded.lock().unwrap().push(event),
/// );
///
/// pipeline.observe(&NetworkEvent::request("GET", "https://example.com/?token=abc"));
///
/// assert_eq!(recorded.lock().unwrap()[0].url(), "https://example.com/?token=***");
/// ```
pub trait AnalyticsSink {
    /// Records one masked event. Called at most once per observed event.
    fn record(&self, event: MaskedEvent);
}

impl<F> AnalyticsSink for F
where
    F: Fn(MaskedEvent),
{
    fn record(&self, event: MaskedEvent) {
        self(event);
    }
}

/// Masks raw events with a fixed policy and forwards them to a sink.
#[derive(Debug)]
pub struct AnalyticsPipeline<S> {
    policy: Arc<MaskingPolicy>,
    sink: S,
}

impl<S: AnalyticsSink> AnalyticsPipeline<S> {
    /// Accepts an owned policy or an `Arc` shared with other pipelines.
    pub fn new(policy: impl Into<Arc<MaskingPolicy>>, sink: S) -> Self {
        Self {
            policy: policy.into(),
            sink,
        }
    }

    pub fn policy(&self) -> &MaskingPolicy {
        &self.policy
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Masks `event` and records the result. `event` itself is left untouched.
    pub fn observe(&self, event: &NetworkEvent) {
        self.sink.record(mask_event(event, &self.policy));
    }
}
