//! HTTP response building module
//!
//! Builders for the handful of responses the dispatchers emit, decoupled from routing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderName, HeaderValue, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_XSS_PROTECTION,
};
use hyper::{Method, Response, StatusCode};

use super::mime;

/// Body of the default "not found" view
pub const NOT_FOUND_BODY: &str = "404 page not found\n";

/// Headers set before an API handler runs
pub const JSON_HEADERS: [(HeaderName, &str); 2] = [
    (CONTENT_TYPE, "application/json; charset=utf-8"),
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
];

/// Headers set before a view handler runs
pub const HTML_HEADERS: [(HeaderName, &str); 3] = [
    (CONTENT_TYPE, "text/html; charset=utf-8"),
    (X_XSS_PROTECTION, "1; mode=block"),
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
];

/// Build 301 Moved Permanently response
///
/// `GET` requests get a small HTML body pointing at the new location.
pub fn build_redirect_response(location: &str, method: &Method) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Location", location);

    let body = if *method == Method::GET {
        builder = builder.header(CONTENT_TYPE, "text/html; charset=utf-8");
        Bytes::from(format!(
            "<a href=\"{}\">Moved Permanently</a>.\n\n",
            escape_html(location)
        ))
    } else {
        Bytes::new()
    };

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("301", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 404 Not Found response
pub fn build_not_found_response() -> Response<Full<Bytes>> {
    build_plain_error(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

/// Build 400 Bad Request response
pub fn build_bad_request_response() -> Response<Full<Bytes>> {
    build_plain_error(StatusCode::BAD_REQUEST, "400 Bad Request\n")
}

/// Build 403 Forbidden response
pub fn build_forbidden_response() -> Response<Full<Bytes>> {
    build_plain_error(StatusCode::FORBIDDEN, "403 Forbidden\n")
}

/// Build 500 Internal Server Error response
pub fn build_internal_error_response() -> Response<Full<Bytes>> {
    build_plain_error(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error\n")
}

fn build_plain_error(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(message.as_bytes())))
        })
}

/// Build 200 response for a text body, content type sniffed from the body
pub fn build_text_response(content: String) -> Response<Full<Bytes>> {
    let content_type = mime::sniff_text(&content);
    let content_length = content.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build static file response
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Add headers the response does not already carry
///
/// Dispatchers set their content headers before a handler runs; a handler that
/// sets the same header itself wins.
pub fn with_default_headers(
    mut response: Response<Full<Bytes>>,
    defaults: &[(HeaderName, &'static str)],
) -> Response<Full<Bytes>> {
    let headers = response.headers_mut();
    for (name, value) in defaults {
        headers
            .entry(name.clone())
            .or_insert_with(|| HeaderValue::from_static(value));
    }
    response
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&#34;")
        .replace('\'', "&#39;")
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
