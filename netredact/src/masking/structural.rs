//! Structural masking over JSON-like trees.
//!
//! Maps are walked key by key, lists element by element, and every scalar
//! that is not under an exempt key becomes [`REDACTION_MARKER`]. An exempt
//! key passes its whole subtree through untouched.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::policy::{KeySet, MaskingPolicy, PrivacyLevel, Surface, REDACTION_MARKER};

/// Recursive value the structural masker operates on.
///
/// A closed sum over null, bool, number, string, list and insertion-ordered
/// map. Every absent or null representation is [`Value::Null`].
pub type StructuredValue = Value;

/// GraphQL variables: an insertion-ordered map of name to value.
pub type Variables = Map<String, StructuredValue>;

/// Deepest container nesting the masker descends into.
///
/// Containers below this depth are replaced wholesale by the marker. Matches
/// the recursion limit `serde_json` applies when parsing.
pub const MAX_DEPTH: usize = 128;

fn marker() -> StructuredValue {
    Value::String(REDACTION_MARKER.to_string())
}

/// Masks `value` under `policy`, honouring `exempt` keys at `Restricted` only.
///
/// - `Open`: `value` is returned unchanged.
/// - `Restricted`: scalars become `"***"` unless reached through an exempt key.
/// - `Locked`: every scalar becomes `"***"`; `exempt` is ignored.
pub fn mask_structured(
    value: StructuredValue,
    policy: &MaskingPolicy,
    exempt: &KeySet,
) -> StructuredValue {
    match policy.level() {
        PrivacyLevel::Open => value,
        PrivacyLevel::Restricted => walk(value, Some(exempt), 0),
        PrivacyLevel::Locked => walk(value, None, 0),
    }
}

fn walk(value: StructuredValue, exempt: Option<&KeySet>, depth: usize) -> StructuredValue {
    match value {
        Value::Object(_) | Value::Array(_) if depth >= MAX_DEPTH => {
            diagnostic!(depth, "nesting limit reached, masking subtree");
            marker()
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if exempt.is_some_and(|keys| keys.contains(&key)) {
                        (key, value)
                    } else {
                        (key, walk(value, exempt, depth + 1))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| walk(item, exempt, depth + 1))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => marker(),
    }
}

/// Masks a raw request or response body.
///
/// Returns `None` at `Locked`. At `Restricted` the bytes are parsed as JSON and
/// masked with the body field exemptions; bytes that do not parse are
/// replaced by the three-byte payload `***`. An empty body stays empty.
pub fn mask_body(body: &[u8], policy: &MaskingPolicy) -> Option<Vec<u8>> {
    match policy.level() {
        PrivacyLevel::Open => Some(body.to_vec()),
        PrivacyLevel::Locked => None,
        PrivacyLevel::Restricted if body.is_empty() => Some(Vec::new()),
        PrivacyLevel::Restricted => {
            let masked = serde_json::from_slice::<StructuredValue>(body)
                .ok()
                .map(|value| {
                    mask_structured(value, policy, policy.exempt_keys(Surface::BodyField))
                })
                .and_then(|value| serde_json::to_vec(&value).ok());
            Some(masked.unwrap_or_else(|| {
                diagnostic!(len = body.len(), "body is not JSON, masking whole payload");
                REDACTION_MARKER.as_bytes().to_vec()
            }))
        }
    }
}

/// Masks GraphQL variables with the body field exemptions.
///
/// Returns `None` at `Locked`.
pub fn mask_variables(variables: &Variables, policy: &MaskingPolicy) -> Option<Variables> {
    match policy.level() {
        PrivacyLevel::Locked => None,
        PrivacyLevel::Open | PrivacyLevel::Restricted => {
            let exempt = policy.exempt_keys(Surface::BodyField);
            match mask_structured(Value::Object(variables.clone()), policy, exempt) {
                Value::Object(masked) => Some(masked),
                // the root is a map and sits above the depth limit
                _ => Some(Variables::new()),
            }
        }
    }
}

/// Masks header values, keeping names.
///
/// Headers are a flat map, so this reduces to an exemption check per name:
/// `Open` passes everything, `Restricted` keeps exempt names, `Locked` masks
/// every value.
pub fn mask_headers(
    headers: &BTreeMap<String, String>,
    policy: &MaskingPolicy,
) -> BTreeMap<String, String> {
    if policy.level() == PrivacyLevel::Open {
        return headers.clone();
    }
    headers
        .iter()
        .map(|(name, value)| {
            let value = if policy.is_exempt(Surface::Header, name) {
                value.clone()
            } else {
                REDACTION_MARKER.to_string()
            };
            (name.clone(), value)
        })
        .collect()
}
