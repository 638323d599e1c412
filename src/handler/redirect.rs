//! Trailing-slash normalization
//!
//! Any path longer than `/` that ends in a slash is permanently redirected to the
//! same path without it, query string preserved.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

use crate::http;

/// Location to redirect to, or `None` when the path is already normal
pub fn trailing_slash_target(path: &str, raw_query: Option<&str>) -> Option<String> {
    if path.len() > 1 && path.ends_with('/') {
        Some(http::with_query(&path[..path.len() - 1], raw_query))
    } else {
        None
    }
}

/// 301 response for a request whose path carries a trailing slash
pub fn redirect_trailing_slash(req: &Request<Bytes>) -> Option<Response<Full<Bytes>>> {
    let target = trailing_slash_target(req.uri().path(), req.uri().query())?;
    Some(http::build_redirect_response(&target, req.method()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_root_is_left_alone() {
        assert_eq!(trailing_slash_target("/", None), None);
        assert_eq!(trailing_slash_target("/", Some("x=1")), None);
    }

    #[test]
    fn test_only_the_last_slash_is_removed() {
        assert_eq!(trailing_slash_target("/dashboard/", None).as_deref(), Some("/dashboard"));
        assert_eq!(trailing_slash_target("/a/b//", None).as_deref(), Some("/a/b/"));
        assert_eq!(trailing_slash_target("//", None).as_deref(), Some("/"));
        assert_eq!(trailing_slash_target("/dashboard", None), None);
    }

    #[test]
    fn test_query_is_preserved() {
        assert_eq!(trailing_slash_target("/foo/", Some("x=1")).as_deref(), Some("/foo?x=1"));
    }

    #[test]
    fn test_redirect_response() {
        let req = Request::builder().uri("/foo/?x=1").body(Bytes::new()).unwrap();
        let resp = redirect_trailing_slash(&req).unwrap();
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["Location"], "/foo?x=1");

        let req = Request::builder().uri("/foo").body(Bytes::new()).unwrap();
        assert!(redirect_trailing_slash(&req).is_none());
    }
}
