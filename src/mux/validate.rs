//! Setting validators
//!
//! Patterns are ASCII only: a segment or key character is `[A-Za-z0-9_-]`.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::ConfigError;

static API_PATH_RE: OnceLock<Regex> = OnceLock::new();
static QUERY_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn api_path_re() -> &'static Regex {
    API_PATH_RE.get_or_init(|| Regex::new(r"^(/[A-Za-z0-9_-]+)+$").expect("valid API path pattern"))
}

fn query_key_re() -> &'static Regex {
    QUERY_KEY_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid query key pattern"))
}

/// One or more `/segment` groups, e.g. `/api` or `/v1/api`
pub fn validate_api_path(path: &str) -> Result<(), ConfigError> {
    if api_path_re().is_match(path) {
        Ok(())
    } else {
        Err(ConfigError::InvalidApiPath(path.to_string()))
    }
}

/// A single non-empty word, e.g. `name` or `api-name`
pub fn validate_query_key(key: &str) -> Result<(), ConfigError> {
    if query_key_re().is_match(key) {
        Ok(())
    } else {
        Err(ConfigError::InvalidQueryKey(key.to_string()))
    }
}

/// The folder must already exist and be a directory
pub fn validate_public_folder(path: &Path) -> Result<(), ConfigError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(ConfigError::InvalidPublicFolder(path.to_path_buf())),
    }
}
