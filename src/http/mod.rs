//! HTTP protocol layer module
//!
//! Response builders, content types, cache validators and query parsing shared by
//! both dispatchers.

pub mod cache;
pub mod mime;
pub mod path;
pub mod query;
pub mod response;

pub use path::decode_path;
pub use query::{query_value, with_query};
pub use response::{
    build_304_response, build_bad_request_response, build_file_response, build_forbidden_response,
    build_internal_error_response, build_not_found_response, build_redirect_response,
    build_text_response, with_default_headers, HTML_HEADERS, JSON_HEADERS,
};
