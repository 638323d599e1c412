//! Path-segment router
//!
//! Resources are registered once through `RouteTableBuilder`; `SegmentRouter`
//! then maps `/{route}/{action}` onto them for every request.

mod dispatch;
mod table;

use std::sync::Arc;

use crate::error::ServerError;
use crate::server::{self, App, ServerOptions};

pub use dispatch::{
    SegmentRouter, API_PREFIX, DEFAULT_ACTION, HOME_PAGE, METHOD_NOT_FOUND, ROUTE_NOT_FOUND,
};
pub use table::{Action, Miss, Resource, RouteBuilder, RouteEntry, RouteTable, RouteTableBuilder};

/// Serve `router` on `addr` until Ctrl+C / SIGTERM
pub async fn run(addr: &str, router: SegmentRouter) -> Result<(), ServerError> {
    server::bind_and_serve(addr, App::Router(Arc::new(router)), ServerOptions::default()).await
}
