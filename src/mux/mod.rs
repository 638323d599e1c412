//! API request multiplexer
//!
//! `ApiMux` matches the value of its query key on its API path against a set
//! of registered API names and calls the handler registered under that name.
//! Every other request goes to the view path: a file from the public folder if
//! one exists, a permanent redirect for a trailing slash, and otherwise the view
//! handler.
//!
//! ```text
//! request ──▶ path == api_path && registry[lower(query[key])] ──▶ API handler (JSON headers)
//!                     │ no
//!                     ▼
//!             public file? ──▶ file │ trailing slash? ──▶ 301 │ view handler (HTML headers)
//! ```

pub mod default;
pub mod validate;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::MuxSettings;
use crate::error::ConfigError;
use crate::handler::{redirect, Handler, NotFound, PublicDir, SharedHandler};
use crate::http;
use crate::logger;

struct MuxState {
    public: PublicDir,
    api_path: String,
    query_key: String,
    handlers: HashMap<String, SharedHandler>,
    view: SharedHandler,
    view_registered: bool,
}

/// Query-attribute keyed request multiplexer
///
/// Settings and registrations go through `&self` methods guarded by one
/// reader/writer lock, so a mux can be shared behind an `Arc` while it is
/// still being configured.
pub struct ApiMux {
    state: RwLock<MuxState>,
}

impl ApiMux {
    /// Mux with the default settings (`./public`, `/api`, `name`) and a
    /// "not found" view
    ///
    /// Fails when `./public` is not a directory, like `with_settings`.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_settings(&MuxSettings::default())
    }

    /// Mux whose every setting has been validated
    pub fn with_settings(settings: &MuxSettings) -> Result<Self, ConfigError> {
        let mux = Self::unchecked();
        mux.apply(settings)?;
        Ok(mux)
    }

    /// Default settings without touching the filesystem; the public folder is
    /// checked later by whoever starts serving
    pub(crate) fn unchecked() -> Self {
        let defaults = MuxSettings::default();
        Self {
            state: RwLock::new(MuxState {
                public: PublicDir::new(defaults.public_folder),
                api_path: defaults.api_path,
                query_key: defaults.query_key,
                handlers: HashMap::new(),
                view: Arc::new(NotFound),
                view_registered: false,
            }),
        }
    }

    /// Apply all three settings; stops at the first invalid one
    pub fn apply(&self, settings: &MuxSettings) -> Result<(), ConfigError> {
        self.set_public_folder(&settings.public_folder)?;
        self.set_api_path(&settings.api_path)?;
        self.set_query_key(&settings.query_key)
    }

    fn read(&self) -> RwLockReadGuard<'_, MuxState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MuxState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the public folder path; it must exist and be a directory
    pub fn set_public_folder<P: AsRef<Path>>(&self, folder: P) -> Result<(), ConfigError> {
        let folder = folder.as_ref();
        validate::validate_public_folder(folder)?;
        self.write().public = PublicDir::new(folder);
        logger::log_setting_changed("public_folder", &folder.display().to_string());
        Ok(())
    }

    /// Set the API URL path
    pub fn set_api_path(&self, path: &str) -> Result<(), ConfigError> {
        validate::validate_api_path(path)?;
        self.write().api_path = path.to_string();
        logger::log_setting_changed("api_path", path);
        Ok(())
    }

    /// Set the API name query key
    pub fn set_query_key(&self, key: &str) -> Result<(), ConfigError> {
        validate::validate_query_key(key)?;
        self.write().query_key = key.to_string();
        logger::log_setting_changed("query_key", key);
        Ok(())
    }

    /// Current settings
    pub fn settings(&self) -> MuxSettings {
        let state = self.read();
        MuxSettings {
            public_folder: state.public.root().to_path_buf(),
            api_path: state.api_path.clone(),
            query_key: state.query_key.clone(),
        }
    }

    /// Handler for the request, or `None` when it should go to the view path
    ///
    /// Only requests whose decoded path is exactly the API path are
    /// considered; the query key's first value is looked up lower-cased.
    pub fn resolve(&self, req: &Request<Bytes>) -> Option<SharedHandler> {
        let path = http::decode_path(req.uri().path())?;
        self.resolve_path(&path, req)
    }

    fn resolve_path(&self, path: &str, req: &Request<Bytes>) -> Option<SharedHandler> {
        let state = self.read();
        if path != state.api_path {
            return None;
        }
        let name = http::query_value(req.uri().query(), &state.query_key).to_lowercase();
        if name.is_empty() {
            return None;
        }
        state.handlers.get(&name).cloned()
    }

    /// Register `handler` for the API name, or as the view handler when the
    /// name is empty
    ///
    /// Names are case-insensitive. Registering a name twice, the view
    /// included, fails and keeps the first registration.
    pub fn register<H: Handler + 'static>(&self, name: &str, handler: H) -> Result<(), ConfigError> {
        self.register_shared(name, Arc::new(handler))
    }

    /// `register` for a plain function or closure
    pub fn register_fn<F>(&self, name: &str, handler: F) -> Result<(), ConfigError>
    where
        F: Fn(&Request<Bytes>) -> Response<Full<Bytes>> + Send + Sync + 'static,
    {
        self.register(name, handler)
    }

    /// `register` for a handler that is already shared
    pub fn register_shared(&self, name: &str, handler: SharedHandler) -> Result<(), ConfigError> {
        let mut state = self.write();

        if name.is_empty() {
            if state.view_registered {
                return Err(ConfigError::DuplicateHandler(String::new()));
            }
            state.view = handler;
            state.view_registered = true;
        } else {
            let key = name.to_lowercase();
            if state.handlers.contains_key(&key) {
                return Err(ConfigError::DuplicateHandler(key));
            }
            state.handlers.insert(key, handler);
        }

        logger::log_handler_registered(name);
        Ok(())
    }

    /// Registered API names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Dispatch the request to the matching API handler or to the view path
    ///
    /// Paths that smuggle a `/` or NUL through percent-encoding get a 400.
    pub async fn dispatch(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        let Some(path) = http::decode_path(req.uri().path()) else {
            return http::build_bad_request_response();
        };

        match self.resolve_path(&path, req) {
            Some(handler) => http::with_default_headers(handler.serve(req), &http::JSON_HEADERS),
            None => self.serve_view(&path, req).await,
        }
    }

    async fn serve_view(&self, path: &str, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        let (public, view) = {
            let state = self.read();
            (state.public.clone(), Arc::clone(&state.view))
        };

        if let Some(resp) = public.try_serve(path, req).await {
            return resp;
        }

        if let Some(resp) = redirect::redirect_trailing_slash(req) {
            return resp;
        }

        http::with_default_headers(view.serve(req), &http::HTML_HEADERS)
    }
}
