//! The three maskers.
//!
//! - **`structural`**: JSON-like trees (bodies, variables) and header maps
//! - **`query_string`**: query component of a URL
//! - **`literals`**: literal values inside GraphQL query text
//!
//! Each masker is a pure function of its input and the active policy.

mod literals;
mod query_string;
mod structural;

pub use literals::mask_literals;
pub use query_string::mask_url;
pub use structural::{
    mask_body, mask_headers, mask_structured, mask_variables, StructuredValue, Variables,
    MAX_DEPTH,
};

use crate::policy::{MaskingPolicy, PrivacyLevel};

/// Masks GraphQL query text under `policy`.
///
/// Query text is dropped at [`PrivacyLevel::Locked`]. Otherwise literals are
/// masked when the policy enables it and the text passes through unchanged
/// when it does not.
pub fn mask_query(query: &str, policy: &MaskingPolicy) -> Option<String> {
    match policy.level() {
        PrivacyLevel::Locked => None,
        PrivacyLevel::Open | PrivacyLevel::Restricted if policy.masks_query_literals() => {
            Some(mask_literals(query))
        }
        PrivacyLevel::Open | PrivacyLevel::Restricted => Some(query.to_string()),
    }
}
