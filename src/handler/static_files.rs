//! Static file serving module
//!
//! `PublicDir` is the file capability both dispatchers consult first: a probe
//! answering "is there a regular file for this URL path" and a server for it.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::IF_NONE_MATCH;
use hyper::{Method, Request, Response};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::http::{self, cache, mime};
use crate::logger;

/// Folder whose files are served as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicDir {
    root: PathBuf,
}

impl PublicDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join the URL path onto the root, resolving `.` and `..`
    ///
    /// Returns `None` when `..` would climb above the root.
    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => parts.push(s),
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop()?;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        let mut path = self.root.clone();
        path.extend(parts);
        Some(path)
    }

    /// Path of the regular file backing `url_path`, if there is one
    ///
    /// Directories, missing files and any stat failure all count as "no file".
    pub async fn probe(&self, url_path: &str) -> Option<PathBuf> {
        let path = self.map_path(url_path)?;
        match fs::metadata(&path).await {
            Ok(meta) if !meta.is_dir() => Some(path),
            _ => None,
        }
    }

    /// Serve the file at `path` for `req`
    pub async fn serve(&self, path: &Path, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        let content = match fs::read(path).await {
            Ok(c) => c,
            Err(e) => return read_error_response(path, &e),
        };

        let etag = cache::generate_etag(&content);
        let if_none_match = req
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok());
        if cache::check_etag_match(if_none_match, &etag) {
            return http::build_304_response(&etag);
        }

        let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
        http::build_file_response(
            Bytes::from(content),
            content_type,
            &etag,
            req.method() == Method::HEAD,
        )
    }

    /// Probe for the decoded request path and serve the file when it exists
    pub async fn try_serve(
        &self,
        url_path: &str,
        req: &Request<Bytes>,
    ) -> Option<Response<Full<Bytes>>> {
        let path = self.probe(url_path).await?;
        Some(self.serve(&path, req).await)
    }
}

fn read_error_response(path: &Path, err: &io::Error) -> Response<Full<Bytes>> {
    match err.kind() {
        io::ErrorKind::NotFound => http::build_not_found_response(),
        io::ErrorKind::PermissionDenied => http::build_forbidden_response(),
        _ => {
            logger::log_error(&format!("Failed to read file '{}': {err}", path.display()));
            http::build_internal_error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::CONTENT_TYPE;
    use hyper::StatusCode;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "Hello\n").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs").join("app.css"), "body{}").unwrap();
        dir
    }

    fn get(uri: &str) -> Request<Bytes> {
        Request::builder().uri(uri).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_map_path_prevents_traversal() {
        let public = PublicDir::new("public");
        assert!(public.map_path("/../Cargo.toml").is_none());
        assert!(public.map_path("/docs/../../Cargo.toml").is_none());
        assert_eq!(
            public.map_path("/docs/../hello.txt"),
            Some(PathBuf::from("public/hello.txt"))
        );
        assert_eq!(public.map_path("/"), Some(PathBuf::from("public")));
    }

    #[tokio::test]
    async fn test_probe_only_finds_regular_files() {
        let dir = fixture();
        let public = PublicDir::new(dir.path());
        assert!(public.probe("/hello.txt").await.is_some());
        assert!(public.probe("/docs/app.css").await.is_some());
        assert!(public.probe("/docs").await.is_none());
        assert!(public.probe("/").await.is_none());
        assert!(public.probe("/missing.txt").await.is_none());
    }

    #[tokio::test]
    async fn test_try_serve_returns_content() {
        let dir = fixture();
        let public = PublicDir::new(dir.path());
        let resp = public.try_serve("/hello.txt", &get("/hello.txt")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("Hello\n"));
    }

    #[tokio::test]
    async fn test_names_with_spaces_and_non_ascii() {
        let dir = fixture();
        std::fs::write(dir.path().join("my file.txt"), "spaced").unwrap();
        std::fs::write(dir.path().join("café.txt"), "accented").unwrap();
        let public = PublicDir::new(dir.path());

        for (url_path, body) in [("/my file.txt", "spaced"), ("/café.txt", "accented")] {
            let resp = public.try_serve(url_path, &get("/")).await.unwrap();
            let bytes = resp.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(bytes, Bytes::from(body), "{url_path}");
        }
    }

    #[tokio::test]
    async fn test_matching_etag_gives_304() {
        let dir = fixture();
        let public = PublicDir::new(dir.path());
        let first = public.try_serve("/hello.txt", &get("/hello.txt")).await.unwrap();
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/hello.txt")
            .header(IF_NONE_MATCH, etag)
            .body(Bytes::new())
            .unwrap();
        let resp = public.try_serve("/hello.txt", &req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let dir = fixture();
        let public = PublicDir::new(dir.path());
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/hello.txt")
            .body(Bytes::new())
            .unwrap();
        let resp = public.try_serve("/hello.txt", &req).await.unwrap();
        assert_eq!(resp.headers()["Content-Length"], "6");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
