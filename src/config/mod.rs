// Configuration module entry point
// Loads the process configuration through the `config` crate

mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

pub use types::{
    Config, LoggingConfig, MuxSettings, PerformanceConfig, RouterLayout, RouterSettings,
    ServerConfig, ServerMode,
};

/// Config file looked up when no path is given (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "apimux";

const ENV_PREFIX: &str = "APIMUX";

impl Config {
    /// Load configuration from the given file path (extension optional)
    ///
    /// The file is optional; `APIMUX_*` environment variables override it, with
    /// `__` separating nested keys (e.g. `APIMUX_MUX__API_PATH=/v1`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, None)
    }

    /// `load_from` reading overrides from `env` instead of the process
    /// environment when given
    fn load_with_env(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.mode", "mux")?
            .set_default("mux.public_folder", "./public")?
            .set_default("mux.api_path", "/api")?
            .set_default("mux.query_key", "name")?
            .set_default("router.public_folder", "./public")?
            .set_default("router.layout", "root")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.request_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load `apimux.toml` (or whatever the first CLI argument names)
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::InvalidAddress { addr, source })
    }
}
