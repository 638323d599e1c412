//! Request handler module
//!
//! The `Handler` seam both dispatchers call into, plus the static-file and
//! trailing-slash steps they share.

pub mod redirect;
pub mod static_files;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::sync::Arc;

use crate::http;

pub use static_files::PublicDir;

/// Something that turns a request into a response
///
/// Closures of the right shape are handlers, so `register_fn`-style helpers are
/// rarely needed.
pub trait Handler: Send + Sync {
    fn serve(&self, req: &Request<Bytes>) -> Response<Full<Bytes>>;
}

impl<F> Handler for F
where
    F: Fn(&Request<Bytes>) -> Response<Full<Bytes>> + Send + Sync,
{
    fn serve(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        self(req)
    }
}

/// Shared handler as stored by the dispatchers
pub type SharedHandler = Arc<dyn Handler>;

/// Replies `404 page not found` to every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn serve(&self, _req: &Request<Bytes>) -> Response<Full<Bytes>> {
        http::build_not_found_response()
    }
}
