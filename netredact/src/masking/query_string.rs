//! URL query masking.
//!
//! The URL is validated with the `url` crate but rewritten on the original
//! text, so the scheme, authority, path and fragment come out byte-for-byte as
//! they went in. Only the query component changes.

use std::borrow::Cow;

use url::{form_urlencoded, ParseError, Url};

use crate::policy::{MaskingPolicy, PrivacyLevel, Surface, REDACTION_MARKER};

/// Base used to validate relative references such as `/search?q=x`.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Masks the query parameters of `url` under `policy`.
///
/// - `Open`: unchanged.
/// - `Restricted`: every parameter value becomes `***` unless its name is
///   exempt. Repeated names are masked independently and order is preserved.
/// - `Locked`: the query component, including `?`, is removed.
///
/// A URL that cannot be parsed is returned unchanged.
pub fn mask_url(url: &str, policy: &MaskingPolicy) -> String {
    if policy.level() == PrivacyLevel::Open {
        return url.to_string();
    }
    if !is_parseable(url) {
        diagnostic!("url is not parseable, leaving it unchanged");
        return url.to_string();
    }

    let (before_fragment, fragment) = match url.find('#') {
        Some(index) => url.split_at(index),
        None => (url, ""),
    };
    let Some((head, query)) = before_fragment.split_once('?') else {
        return url.to_string();
    };

    match policy.level() {
        PrivacyLevel::Locked => format!("{head}{fragment}"),
        PrivacyLevel::Open | PrivacyLevel::Restricted => {
            let masked = query
                .split('&')
                .map(|pair| mask_pair(pair, policy))
                .collect::<Vec<_>>()
                .join("&");
            format!("{head}?{masked}{fragment}")
        }
    }
}

fn is_parseable(url: &str) -> bool {
    match Url::parse(url) {
        Ok(_) => true,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(url))
            .is_ok(),
        Err(_) => false,
    }
}

fn mask_pair<'a>(pair: &'a str, policy: &MaskingPolicy) -> Cow<'a, str> {
    if pair.is_empty() {
        return Cow::Borrowed(pair);
    }
    let name = pair.split_once('=').map_or(pair, |(name, _)| name);
    if policy.is_exempt(Surface::QueryParam, &decode_name(name)) {
        Cow::Borrowed(pair)
    } else {
        Cow::Owned(format!("{name}={REDACTION_MARKER}"))
    }
}

/// Percent- and plus-decodes a parameter name for exemption lookup.
fn decode_name(name: &str) -> String {
    form_urlencoded::parse(name.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default()
}
