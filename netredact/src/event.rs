//! Network events and the assembler that masks them.
//!
//! [`NetworkEvent`] is the raw record an HTTP adapter builds. [`mask_event`]
//! sends each field through its masker and returns a [`MaskedEvent`], which
//! owns only masked data and can only be produced by masking.

use std::{
    borrow::Cow,
    collections::BTreeMap,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Serialize, Serializer};

use crate::{
    masking::{mask_body, mask_headers, mask_query, mask_url, mask_variables, Variables},
    policy::{MaskingPolicy, PrivacyLevel, REDACTION_MARKER},
};

/// Header name to value. Order carries no meaning.
pub type Headers = BTreeMap<String, String>;

/// What happened on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A request was sent.
    Request,
    /// A response arrived.
    Response {
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
    /// The request failed without a response.
    Error { error_text: String },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Request => "request",
            EventKind::Response { .. } => "response",
            EventKind::Error { .. } => "error",
        }
    }
}

/// GraphQL operation details attached to an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphQlContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Variables>,
}

/// An unmasked request, response or error, as captured by an HTTP adapter.
///
/// This record holds raw data. Only the local diagnostic path should see it;
/// analytics gets the output of [`mask_event`].
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkEvent {
    pub kind: EventKind,
    pub method: String,
    pub url: String,
    pub headers: Option<Headers>,
    pub body: Option<Vec<u8>>,
    pub timestamp: Option<SystemTime>,
    pub duration: Option<Duration>,
    pub request_id: Option<String>,
    pub graphql: Option<GraphQlContext>,
}

impl NetworkEvent {
    fn new(kind: EventKind, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind,
            method: method.into(),
            url: url.into(),
            headers: None,
            body: None,
            timestamp: None,
            duration: None,
            request_id: None,
            graphql: None,
        }
    }

    #[must_use]
    pub fn request(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(EventKind::Request, method, url)
    }

    #[must_use]
    pub fn response(
        method: impl Into<String>,
        url: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::new(EventKind::Response { status_code }, method, url)
    }

    #[must_use]
    pub fn error(
        method: impl Into<String>,
        url: impl Into<String>,
        error_text: impl Into<String>,
    ) -> Self {
        let kind = EventKind::Error {
            error_text: error_text.into(),
        };
        Self::new(kind, method, url)
    }

    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = Some(
            headers
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn with_graphql(mut self, graphql: GraphQlContext) -> Self {
        self.graphql = Some(graphql);
        self
    }

    /// Masks this event under `policy`. See [`mask_event`].
    #[must_use]
    pub fn mask(&self, policy: &MaskingPolicy) -> MaskedEvent {
        mask_event(self, policy)
    }
}

/// A fully masked copy of a [`NetworkEvent`], safe to hand to analytics.
///
/// Fields are private and there is no public constructor: the only way to get
/// one is to mask an event, and it holds no reference back to the original.
///
/// ```compile_fail
/// use netredact::{EventKind, MaskedEvent};
///
/// let forged = MaskedEvent {
///     kind: EventKind::Request,
///     method: "GET".into(),
///     url: "https://example.com/?token=raw".into(),
/// };
/// ```
///
/// ```compile_fail
/// use netredact::{MaskingPolicy, NetworkEvent, PrivacyLevel};
///
/// let policy = MaskingPolicy::new(PrivacyLevel::Locked);
/// let mut masked = NetworkEvent::request("GET", "https://example.com/").mask(&policy);
/// masked.url = "https://example.com/?token=raw".into();
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaskedEvent {
    #[serde(flatten)]
    kind: EventKind,
    method: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<Headers>,
    #[serde(
        serialize_with = "serialize_body",
        skip_serializing_if = "Option::is_none"
    )]
    body: Option<Vec<u8>>,
    #[serde(
        rename = "timestamp_ms",
        serialize_with = "serialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    timestamp: Option<SystemTime>,
    #[serde(
        rename = "duration_ms",
        serialize_with = "serialize_duration",
        skip_serializing_if = "Option::is_none"
    )]
    duration: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    graphql: Option<GraphQlContext>,
}

impl MaskedEvent {
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    /// Masked body bytes; `None` when the event had no body or the level dropped it.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Masked body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        self.body.as_deref().map(String::from_utf8_lossy)
    }

    pub fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn graphql(&self) -> Option<&GraphQlContext> {
        self.graphql.as_ref()
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.graphql.as_ref()?.operation_name.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.graphql.as_ref()?.query.as_deref()
    }

    pub fn variables(&self) -> Option<&Variables> {
        self.graphql.as_ref()?.variables.as_ref()
    }
}

/// Masks every field of `event` under `policy`.
///
/// | Field | `Open` | `Restricted` | `Locked` |
/// |-------|--------|--------------|----------|
/// | URL query | kept | masked unless exempt | stripped |
/// | headers | kept | masked unless exempt | all masked |
/// | body | kept | JSON masked unless exempt | absent |
/// | variables | kept | masked unless exempt | absent |
/// | query text | literals masked if enabled | literals masked if enabled | absent |
/// | error text | kept | kept | `***` |
///
/// Method, status code, timing, request id and operation name pass through.
pub fn mask_event(event: &NetworkEvent, policy: &MaskingPolicy) -> MaskedEvent {
    let kind = match &event.kind {
        EventKind::Error { .. } if policy.level() == PrivacyLevel::Locked => EventKind::Error {
            error_text: REDACTION_MARKER.to_string(),
        },
        kind => kind.clone(),
    };

    MaskedEvent {
        kind,
        method: event.method.clone(),
        url: mask_url(&event.url, policy),
        headers: event
            .headers
            .as_ref()
            .map(|headers| mask_headers(headers, policy)),
        body: event
            .body
            .as_deref()
            .and_then(|body| mask_body(body, policy)),
        timestamp: event.timestamp,
        duration: event.duration,
        request_id: event.request_id.clone(),
        graphql: event.graphql.as_ref().map(|graphql| GraphQlContext {
            operation_name: graphql.operation_name.clone(),
            query: graphql
                .query
                .as_deref()
                .and_then(|query| mask_query(query, policy)),
            variables: graphql
                .variables
                .as_ref()
                .and_then(|variables| mask_variables(variables, policy)),
        }),
    }
}

#[allow(clippy::ref_option)]
fn serialize_body<S: Serializer>(body: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match body {
        Some(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
        None => serializer.serialize_none(),
    }
}

#[allow(clippy::ref_option)]
fn serialize_timestamp<S: Serializer>(
    timestamp: &Option<SystemTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match timestamp.and_then(|at| at.duration_since(UNIX_EPOCH).ok()) {
        Some(since_epoch) => serializer.serialize_u128(since_epoch.as_millis()),
        None => serializer.serialize_none(),
    }
}

#[allow(clippy::ref_option)]
fn serialize_duration<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(duration) => serializer.serialize_u128(duration.as_millis()),
        None => serializer.serialize_none(),
    }
}
