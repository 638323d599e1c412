//! Error types
//!
//! Configuration-time failures are programming errors: every setter, registration
//! and builder call returns them so startup can abort. Request-time routing misses
//! are ordinary responses and never show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid configuration or registration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("given public folder path is not valid: {}", .0.display())]
    InvalidPublicFolder(PathBuf),

    #[error("given API URL path is invalid: {0}")]
    InvalidApiPath(String),

    #[error("given API name query key is invalid: {0}")]
    InvalidQueryKey(String),

    #[error("multiple registrations for {0:?}")]
    DuplicateHandler(String),

    #[error("multiple routes named {0:?}")]
    DuplicateRoute(String),

    #[error("route {route:?} has multiple actions named {action:?}")]
    DuplicateAction { route: String, action: String },

    #[error("route and action names must not be empty")]
    EmptyName,
}

/// Failure while starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("invalid listen address {addr:?}: {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
