//! Query string encoding

/// Characters `urlencoding` escapes but a URI component may carry literally.
const UNRESERVED_MARKS: [(&str, &str); 5] =
    [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];

/// Percent-encode a query string component.
///
/// Letters, digits and `-_.!~*'()` pass through unchanged; everything else is
/// escaped as UTF-8 bytes. Spaces become `%20`, never `+`.
pub fn encode_uri_component(input: &str) -> String {
    let mut encoded = urlencoding::encode(input).into_owned();
    for (escaped, mark) in UNRESERVED_MARKS {
        if encoded.contains(escaped) {
            encoded = encoded.replace(escaped, mark);
        }
    }
    encoded
}
