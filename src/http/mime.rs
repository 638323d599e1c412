//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension, and sniffs
//! text bodies written by route actions.

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use apimux::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Some("JSON")), "application/json");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let extension = extension.map(str::to_ascii_lowercase);
    match extension.as_deref() {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "text/xml; charset=utf-8",
        Some("csv") => "text/csv; charset=utf-8",

        // Scripts and data
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",

        _ => "application/octet-stream",
    }
}

/// Tag openers recognised as HTML, matched case-insensitively and followed by
/// a space or `>`
const HTML_OPENERS: [&str; 17] = [
    "<!DOCTYPE HTML",
    "<HTML",
    "<HEAD",
    "<SCRIPT",
    "<IFRAME",
    "<H1",
    "<DIV",
    "<FONT",
    "<TABLE",
    "<A",
    "<STYLE",
    "<TITLE",
    "<B",
    "<BODY",
    "<BR",
    "<P",
    "<!--",
];

/// Content-Type for a text body written without an explicit type
///
/// Leading whitespace is skipped. A known HTML opener gives HTML, an XML
/// declaration gives XML, and anything else is plain text.
pub fn sniff_text(body: &str) -> &'static str {
    let body = body.trim_start_matches(['\t', '\n', '\x0c', '\r', ' ']);
    let bytes = body.as_bytes();

    let is_html = HTML_OPENERS.iter().any(|opener| {
        bytes.len() > opener.len()
            && bytes[..opener.len()].eq_ignore_ascii_case(opener.as_bytes())
            && matches!(bytes[opener.len()], b' ' | b'>')
    });

    if is_html {
        "text/html; charset=utf-8"
    } else if body.starts_with("<?xml") {
        "text/xml; charset=utf-8"
    } else {
        "text/plain; charset=utf-8"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
        assert_eq!(get_content_type(Some("css")), "text/css; charset=utf-8");
        assert_eq!(get_content_type(Some("json")), "application/json");
        assert_eq!(get_content_type(Some("PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), "application/octet-stream");
        assert_eq!(get_content_type(None), "application/octet-stream");
    }

    #[test]
    fn test_sniff_text() {
        assert_eq!(sniff_text("  <h1>Users</h1>"), "text/html; charset=utf-8");
        assert_eq!(sniff_text("\n<!doctype html>"), "text/html; charset=utf-8");
        assert_eq!(sniff_text("<p class=\"x\">"), "text/html; charset=utf-8");
        assert_eq!(sniff_text("<?xml version=\"1.0\"?>"), "text/xml; charset=utf-8");
        assert_eq!(sniff_text("Home page"), "text/plain; charset=utf-8");
        assert_eq!(sniff_text(""), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_sniff_text_needs_a_known_opener() {
        assert_eq!(sniff_text("<ul><li>a</li></ul>"), "text/plain; charset=utf-8");
        assert_eq!(sniff_text("<pre>x</pre>"), "text/plain; charset=utf-8");
        assert_eq!(sniff_text("<p"), "text/plain; charset=utf-8");
        assert_eq!(sniff_text("<3 users"), "text/plain; charset=utf-8");
    }
}
