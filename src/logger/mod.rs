//! Logger module
//!
//! Thin facade over `tracing` used by the rest of the crate:
//! - Subscriber initialisation from configuration
//! - Server lifecycle and registration logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::LoggingConfig;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this twice
/// keeps the first subscriber.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("apimux={}", config.level)));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}

pub fn log_server_start(addr: &SocketAddr, mode: &str) {
    tracing::info!(%addr, mode, "server started, listening on http://{addr}");
}

pub fn log_server_stop() {
    tracing::info!("shutdown requested, no longer accepting connections");
}

pub fn log_handler_registered(name: &str) {
    if name.is_empty() {
        tracing::debug!("registered view handler");
    } else {
        tracing::debug!(name, "registered API handler");
    }
}

pub fn log_route_registered(route: &str, action: &str) {
    tracing::debug!(route, action, "registered route action");
}

pub fn log_setting_changed(setting: &str, value: &str) {
    tracing::debug!(setting, value, "mux setting updated");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::trace!(%peer_addr, "connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::warn!("failed to serve connection: {err}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "apimux::access", "{}", entry.format(format));
}
