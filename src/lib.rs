//! Minimal web-request dispatching
//!
//! Two dispatchers share the same shape, static files first, then a permanent
//! redirect for trailing slashes, then dynamic dispatch:
//!
//! - [`ApiMux`] picks a registered handler by the value of a query key on one
//!   API path, and falls back to a view handler for everything else.
//! - [`SegmentRouter`] splits the path into `/{route}/{action}` and calls the
//!   matching action from a [`RouteTable`] built once at startup.
//!
//! ```no_run
//! use apimux::{ApiMux, server::{self, App, ServerOptions}};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), apimux::ServerError> {
//! // fails unless ./public is a directory
//! let mux = ApiMux::new()?;
//! mux.register_fn("status", |_req| apimux::http::build_text_response("{}".to_string()))?;
//! server::bind_and_serve(":8080", App::Mux(Arc::new(mux)), ServerOptions::default()).await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod mux;
pub mod router;
pub mod server;

pub use error::{ConfigError, ServerError};
pub use handler::{Handler, PublicDir};
pub use mux::ApiMux;
pub use router::{Resource, RouteTable, SegmentRouter};
