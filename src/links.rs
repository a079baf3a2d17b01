//! Percent-encoding helpers for outbound links.

use url::form_urlencoded;

/// Encode a URI component the way browsers do for query values: spaces
/// become `%20`, not `+`, so `mailto:` bodies survive mail clients intact.
pub fn encode_component(value: &str) -> String {
    // form_urlencoded escapes a literal '+' as %2B, so any '+' left is a space
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
