//! Process-wide default mux
//!
//! Convenience for zero-configuration programs: register on the shared
//! instance and call `serve`. Anything that needs more than one mux, or tests,
//! should construct an `ApiMux` and pass it around instead.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::sync::{Arc, OnceLock};

use super::ApiMux;
use crate::error::{ConfigError, ServerError};
use crate::handler::Handler;
use crate::server::{self, App, ServerOptions};

static MUX: OnceLock<Arc<ApiMux>> = OnceLock::new();

/// The default mux, created with default settings on first use
///
/// Its public folder is validated by `serve`, not here, so handlers can be
/// registered before the folder exists.
pub fn mux() -> &'static Arc<ApiMux> {
    MUX.get_or_init(|| Arc::new(ApiMux::unchecked()))
}

/// Register `handler` for the API name on the default mux
pub fn handle<H: Handler + 'static>(name: &str, handler: H) -> Result<(), ConfigError> {
    mux().register(name, handler)
}

/// Register a handler function for the API name on the default mux
pub fn handle_func<F>(name: &str, handler: F) -> Result<(), ConfigError>
where
    F: Fn(&Request<Bytes>) -> Response<Full<Bytes>> + Send + Sync + 'static,
{
    mux().register_fn(name, handler)
}

/// Serve the default mux on `addr` until Ctrl+C / SIGTERM
///
/// The public folder is validated before binding, so a missing folder fails
/// here rather than on the first request.
pub async fn serve(addr: &str) -> Result<(), ServerError> {
    let mux = Arc::clone(mux());
    let public_folder = mux.settings().public_folder;
    mux.set_public_folder(&public_folder)?;
    server::bind_and_serve(addr, App::Mux(mux), ServerOptions::default()).await
}
