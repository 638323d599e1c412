//! Request path decoding

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Percent-decoded request path
///
/// Returns `None` when the path does not decode to UTF-8, or when decoding
/// would add a `/` or NUL that the raw path did not contain (`%2F`, `%00`).
pub fn decode_path(raw: &str) -> Option<Cow<'_, str>> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    if decoded.contains('\0') || decoded.matches('/').count() != raw.matches('/').count() {
        return None;
    }
    Some(decoded)
}
