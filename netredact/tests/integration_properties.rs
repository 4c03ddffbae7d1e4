//! Property tests for the masking guarantees.
//!
//! - exemption lookup ignores key casing
//! - literal values never survive masking
//! - names, directives and `$variables` survive literal masking unchanged
//! - information only ever shrinks as the privacy level rises

use proptest::prelude::*;
use serde_json::json;

use netredact::{
    mask_event, mask_literals, mask_structured, mask_url, GraphQlContext, KeySet,
    MaskingPolicy, NetworkEvent, PrivacyLevel, Surface,
};

fn arb_key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_-]{0,15}"
}

/// Same letters, arbitrary per-character casing.
fn arb_case_variant(key: String) -> impl Strategy<Value = (String, String)> {
    prop::collection::vec(any::<bool>(), key.len()).prop_map(move |flips| {
        let variant: String = key
            .chars()
            .zip(flips)
            .map(|(ch, upper)| {
                if upper {
                    ch.to_ascii_uppercase()
                } else {
                    ch.to_ascii_lowercase()
                }
            })
            .collect();
        (key.clone(), variant)
    })
}

/// Literal payloads that cannot appear by accident in the surrounding query.
fn arb_secret() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.@'<>/;,:()\u{00e9}\u{4e2d}-]{1,40}".prop_map(|body| format!("SECRET{body}"))
}

/// Identifier that cannot be mistaken for a float (`inf`, `nan`...).
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,10}".prop_filter("float keyword", |name| name.parse::<f64>().is_err())
}

fn escape(literal: &str) -> String {
    literal.replace('\\', "\\\\").replace('"', "\\\"")
}

proptest! {
    #[test]
    fn exemption_ignores_casing(pair in arb_key().prop_flat_map(arb_case_variant)) {
        let (key, variant) = pair;
        let from_key = MaskingPolicy::builder()
            .level(PrivacyLevel::Restricted)
            .unmasked_header_keys([key.as_str()])
            .build();
        let from_variant = MaskingPolicy::builder()
            .level(PrivacyLevel::Restricted)
            .unmasked_header_keys([variant.as_str()])
            .build();

        prop_assert!(from_key.is_exempt(Surface::Header, &variant));
        prop_assert!(from_variant.is_exempt(Surface::Header, &key));
        prop_assert_eq!(
            from_key.is_exempt(Surface::Header, &key),
            from_key.is_exempt(Surface::Header, &variant)
        );
    }

    #[test]
    fn string_literals_never_leak(secret in arb_secret(), field in arb_name(), arg in arb_name()) {
        let query = format!(r#"query Q {{ {field}({arg}: "{}") {{ id }} }}"#, escape(&secret));
        let masked = mask_literals(&query);
        prop_assert!(!masked.contains(&secret));
        let expected = format!(r#"query Q {{ {field}({arg}: "***") {{ id }} }}"#);
        prop_assert_eq!(masked, expected);
    }

    #[test]
    fn numeric_literals_never_leak(number in any::<i64>(), fraction in 0u32..1000, arg in arb_name()) {
        let query = format!("f({arg}: {number}.{fraction}, other: {number})");
        let masked = mask_literals(&query);
        prop_assert_eq!(masked, format!("f({arg}: ***, other: ***)"));
    }

    #[test]
    fn structure_is_preserved(
        operation in arb_name(),
        field in arb_name(),
        arg in arb_name(),
        variable in arb_name(),
        secret in arb_secret(),
    ) {
        let query = format!(
            r#"query {operation}(${variable}: ID!) {{ {field}({arg}: ${variable}, note: "{}") @include(if: ${variable}) {{ id }} }}"#,
            escape(&secret)
        );
        let masked = mask_literals(&query);
        let expected = format!(
            r#"query {operation}(${variable}: ID!) {{ {field}({arg}: ${variable}, note: "***") @include(if: ${variable}) {{ id }} }}"#
        );
        prop_assert_eq!(masked, expected);
    }

    #[test]
    fn structured_values_never_leak(secret in arb_secret(), key in arb_key()) {
        let value = json!({ key.clone(): secret.clone(), "list": [secret.clone(), {"k": secret.clone()}] });
        let masked = mask_structured(value, &MaskingPolicy::new(PrivacyLevel::Restricted), &KeySet::new());
        prop_assert!(!masked.to_string().contains(&secret));
    }

    #[test]
    fn url_values_never_leak(secret in arb_secret(), name in arb_name()) {
        let encoded: String = url::form_urlencoded::byte_serialize(secret.as_bytes()).collect();
        let url = format!("https://example.com/p?{name}={encoded}");
        let masked = mask_url(&url, &MaskingPolicy::new(PrivacyLevel::Restricted));
        prop_assert_eq!(masked, format!("https://example.com/p?{name}=***"));
    }

    #[test]
    fn information_shrinks_as_level_rises(
        secret in arb_secret(),
        exempt in arb_name().prop_map(|name| format!("keep_{name}")),
    ) {
        let body = json!({ exempt.clone(): "visible", "hidden": secret.clone() }).to_string();
        let event = NetworkEvent::request("POST", format!("https://example.com/?{exempt}=1&q=2"))
            .with_headers([(exempt.clone(), "h".to_string()), ("x-secret".to_string(), secret.clone())])
            .with_body(body)
            .with_graphql(GraphQlContext {
                operation_name: Some("Op".into()),
                query: Some(format!(r#"query Op {{ f(x: "{}") }}"#, escape(&secret))),
                variables: json!({ "v": secret.clone() }).as_object().cloned(),
            });

        let builder = MaskingPolicy::builder()
            .mask_query_literals(true)
            .unmasked_header_keys([exempt.as_str()])
            .unmasked_query_param_keys([exempt.as_str()])
            .unmasked_body_field_keys([exempt.as_str()]);
        let open = mask_event(&event, &builder.clone().level(PrivacyLevel::Open).build());
        let restricted = mask_event(&event, &builder.clone().level(PrivacyLevel::Restricted).build());
        let locked = mask_event(&event, &builder.level(PrivacyLevel::Locked).build());

        let open_json = serde_json::to_string(&open).unwrap();
        let restricted_json = serde_json::to_string(&restricted).unwrap();
        let locked_json = serde_json::to_string(&locked).unwrap();

        // the secret is visible only at Open
        let plain_body = String::from_utf8(event.body.clone().unwrap()).unwrap();
        prop_assert!(open.body_text().as_deref() == Some(plain_body.as_str()));
        prop_assert!(!restricted_json.contains(&secret));
        prop_assert!(!locked_json.contains(&secret));

        // exempt values survive Restricted but not Locked
        prop_assert!(restricted_json.contains("visible"));
        prop_assert!(!locked_json.contains("visible"));
        prop_assert!(open_json.contains("visible"));

        // payloads present at lower levels become absent at Locked
        prop_assert!(restricted.body().is_some() && locked.body().is_none());
        prop_assert!(restricted.query().is_some() && locked.query().is_none());
        prop_assert!(restricted.variables().is_some() && locked.variables().is_none());
        prop_assert!(locked.url().len() < restricted.url().len());
    }
}
