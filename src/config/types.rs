// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub mux: MuxSettings,
    pub router: RouterSettings,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Which dispatcher the binary serves
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServerMode {
    /// Query-attribute keyed API mux
    Mux,
    /// Path-segment router over registered resources
    Router,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub mode: ServerMode,
}

/// Settings applied to an `ApiMux` through its validating setters
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MuxSettings {
    /// Public folder path
    pub public_folder: PathBuf,
    /// API URL path
    pub api_path: String,
    /// API name query key
    pub query_key: String,
}

impl Default for MuxSettings {
    fn default() -> Self {
        Self {
            public_folder: PathBuf::from("./public"),
            api_path: "/api".to_string(),
            query_key: "name".to_string(),
        }
    }
}

/// URL layout understood by the segment router
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouterLayout {
    /// `/{route}/{action}`, the bare root answers with the home text
    #[default]
    Root,
    /// `/api/{route}/{action}`, every other path goes to the view handler
    Api,
}

/// Segment router configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouterSettings {
    pub public_folder: PathBuf,
    #[serde(default)]
    pub layout: RouterLayout,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound in seconds for serving one connection, 0 disables it
    pub request_timeout: u64,
}
