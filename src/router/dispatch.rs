//! Path-segment dispatch
//!
//! ```text
//! request ─▶ public file? ─▶ file
//!              │ no
//!              ▼
//!           trailing slash? ─▶ 301
//!              │ no
//!              ▼
//!           layout: "" ─▶ home text (root) │ no "api/" prefix ─▶ view (api)
//!              │
//!              ▼
//!           /{route}/{action = "index"} ─▶ action() │ "Route not found" │ "Method not found"
//! ```
//!
//! Routing misses answer 200 with a literal body, as existing clients expect.
//! Segments are matched after percent-decoding.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

use super::table::{Miss, RouteTable};
use crate::config::RouterLayout;
use crate::handler::{redirect, Handler, NotFound, PublicDir, SharedHandler};
use crate::http;

pub const HOME_PAGE: &str = "Home page";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const METHOD_NOT_FOUND: &str = "Method not found";
/// Action used when the path names only a route
pub const DEFAULT_ACTION: &str = "index";
/// Prefix stripped by the `api` layout
pub const API_PREFIX: &str = "api/";

enum Layout {
    Root,
    Api { view: SharedHandler },
}

/// Dispatches `/{route}/{action}` requests into a `RouteTable`
pub struct SegmentRouter {
    table: RouteTable,
    public: PublicDir,
    layout: Layout,
}

impl SegmentRouter {
    /// Router for the root layout: `/` answers with the home text
    pub fn new(table: RouteTable, public: PublicDir) -> Self {
        Self {
            table,
            public,
            layout: Layout::Root,
        }
    }

    /// Router for the api layout: routes live under `/api/`, everything else
    /// is rendered by `view`
    pub fn with_view<H: Handler + 'static>(table: RouteTable, public: PublicDir, view: H) -> Self {
        Self {
            table,
            public,
            layout: Layout::Api {
                view: std::sync::Arc::new(view),
            },
        }
    }

    /// Router for a configured layout; the api layout gets a "not found" view
    pub fn from_layout(table: RouteTable, public: PublicDir, layout: RouterLayout) -> Self {
        match layout {
            RouterLayout::Root => Self::new(table, public),
            RouterLayout::Api => Self::with_view(table, public, NotFound),
        }
    }

    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    pub async fn dispatch(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        let Some(decoded) = http::decode_path(req.uri().path()) else {
            return http::build_bad_request_response();
        };
        let path: &str = &decoded;

        if let Some(resp) = self.public.try_serve(path, req).await {
            return resp;
        }

        if let Some(resp) = redirect::redirect_trailing_slash(req) {
            return resp;
        }

        let path = path.strip_prefix('/').unwrap_or(path);

        let rest = match &self.layout {
            Layout::Root if path.is_empty() => {
                return http::build_text_response(HOME_PAGE.to_string());
            }
            Layout::Root => path,
            Layout::Api { view } => match path.strip_prefix(API_PREFIX) {
                Some(rest) => rest,
                None => return http::with_default_headers(view.serve(req), &http::HTML_HEADERS),
            },
        };

        http::build_text_response(self.invoke(rest))
    }

    /// Body for a route path such as `users/list`
    ///
    /// Segments after the action are ignored.
    pub fn invoke(&self, route_path: &str) -> String {
        let mut segments = route_path.split('/');
        let route = segments.next().unwrap_or_default();
        let action = segments.next().unwrap_or(DEFAULT_ACTION);

        match self.table.lookup(route, action) {
            Ok(call) => call(),
            Err(Miss::Route) => ROUTE_NOT_FOUND.to_string(),
            Err(Miss::Action) => METHOD_NOT_FOUND.to_string(),
        }
    }
}
