//! Masking policy: privacy level plus exemption sets.
//!
//! A policy is pure data. It is built once at configuration time, shared
//! read-only across threads, and only answers two questions: which level is
//! active, and whether a key is exempt on a given surface.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PolicyError;

/// Marker substituted for every masked value, on every surface.
pub const REDACTION_MARKER: &str = "***";

/// How aggressively events are masked.
///
/// Levels are ordered: each level hides strictly more than the one before.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivacyLevel {
    /// Nothing is masked (configuration alias: `none`).
    #[default]
    Open,
    /// Values are masked unless their key is exempt (configuration alias: `private`).
    Restricted,
    /// Everything is masked, exemptions are ignored, and bodies, variables and
    /// query text are dropped (configuration alias: `sensitive`).
    Locked,
}

impl PrivacyLevel {
    /// Canonical lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            PrivacyLevel::Open => "open",
            PrivacyLevel::Restricted => "restricted",
            PrivacyLevel::Locked => "locked",
        }
    }
}

impl fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyLevel {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "none" => Ok(PrivacyLevel::Open),
            "restricted" | "private" => Ok(PrivacyLevel::Restricted),
            "locked" | "sensitive" => Ok(PrivacyLevel::Locked),
            _ => Err(PolicyError::UnknownLevel(s.to_string())),
        }
    }
}

impl Serialize for PrivacyLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PrivacyLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// The part of an event an exemption set applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// HTTP header names.
    Header,
    /// URL query parameter names.
    QueryParam,
    /// Keys inside JSON bodies and GraphQL variables.
    BodyField,
}

/// A case-insensitive set of keys.
///
/// Keys are lower-cased on insertion and on lookup, so `Authorization` and
/// `authorization` are the same key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySet(BTreeSet<String>);

impl KeySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key. Returns `false` if a case variant was already present.
    pub fn insert(&mut self, key: impl AsRef<str>) -> bool {
        self.0.insert(key.as_ref().to_lowercase())
    }

    /// Returns `true` if any case variant of `key` is in the set.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the stored (lower-cased) keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<K: AsRef<str>> FromIterator<K> for KeySet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: AsRef<str>> Extend<K> for KeySet {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl Serialize for KeySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for KeySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Vec::<String>::deserialize(deserializer)?.into_iter().collect())
    }
}

/// The active masking rules for one analytics sink.
///
/// Construct with [`MaskingPolicy::builder`] or deserialize from a policy
/// document:
///
/// ```rust
/// use netredact::{MaskingPolicy, PrivacyLevel, Surface};
///
/// let policy = MaskingPolicy::from_json(
///     r#"{"level": "private", "unmasked_header_keys": ["Content-Type"]}"#,
/// )
/// .unwrap();
/// assert_eq!(policy.level(), PrivacyLevel::Restricted);
/// assert!(policy.is_exempt(Surface::Header, "content-type"));
/// assert!(!policy.is_exempt(Surface::Header, "authorization"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskingPolicy {
    level: PrivacyLevel,
    mask_query_literals: bool,
    unmasked_header_keys: KeySet,
    unmasked_query_param_keys: KeySet,
    unmasked_body_field_keys: KeySet,
}

impl MaskingPolicy {
    /// A policy at `level` with no exemptions and query literal masking off.
    #[must_use]
    pub fn new(level: PrivacyLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder() -> MaskingPolicyBuilder {
        MaskingPolicyBuilder::default()
    }

    /// Parses a JSON policy document. Missing fields take their defaults
    /// (`open`, literal masking off, no exemptions).
    pub fn from_json(document: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn level(&self) -> PrivacyLevel {
        self.level
    }

    pub fn masks_query_literals(&self) -> bool {
        self.mask_query_literals
    }

    /// The configured exemption set for `surface`, regardless of level.
    pub fn exempt_keys(&self, surface: Surface) -> &KeySet {
        match surface {
            Surface::Header => &self.unmasked_header_keys,
            Surface::QueryParam => &self.unmasked_query_param_keys,
            Surface::BodyField => &self.unmasked_body_field_keys,
        }
    }

    /// Whether `key` is exempt from masking on `surface` under the active level.
    ///
    /// Exemptions are only honoured at [`PrivacyLevel::Restricted`]. At
    /// `Open` nothing needs an exemption and at `Locked` none are granted, so
    /// both return `false`.
    pub fn is_exempt(&self, surface: Surface, key: &str) -> bool {
        self.level == PrivacyLevel::Restricted && self.exempt_keys(surface).contains(key)
    }
}

/// Builder for [`MaskingPolicy`].
#[derive(Clone, Debug, Default)]
pub struct MaskingPolicyBuilder {
    policy: MaskingPolicy,
}

impl MaskingPolicyBuilder {
    #[must_use]
    pub fn level(mut self, level: PrivacyLevel) -> Self {
        self.policy.level = level;
        self
    }

    #[must_use]
    pub fn mask_query_literals(mut self, enabled: bool) -> Self {
        self.policy.mask_query_literals = enabled;
        self
    }

    #[must_use]
    pub fn unmasked_header_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.policy.unmasked_header_keys.extend(keys);
        self
    }

    #[must_use]
    pub fn unmasked_query_param_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.policy.unmasked_query_param_keys.extend(keys);
        self
    }

    #[must_use]
    pub fn unmasked_body_field_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.policy.unmasked_body_field_keys.extend(keys);
        self
    }

    #[must_use]
    pub fn build(self) -> MaskingPolicy {
        self.policy
    }
}
