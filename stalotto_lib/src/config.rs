//! Runtime settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use stalotto_archive::{DEFAULT_BASE_URL, REQUEST_TIMEOUT};

pub const DB_PATH_VAR: &str = "STALOTTO_DB";
pub const BASE_URL_VAR: &str = "STALOTTO_BASE_URL";
pub const TIMEOUT_VAR: &str = "STALOTTO_TIMEOUT_SECS";
pub const PAGE_DELAY_VAR: &str = "STALOTTO_PAGE_DELAY_MS";

const DEFAULT_PAGE_DELAY_MS: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
    /// Pause between draw page fetches during a sync.
    pub page_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
        }
    }
}

impl Config {
    /// Defaults overridden by any `STALOTTO_*` variables that are set.
    /// Unparseable numbers fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: std::env::var_os(DB_PATH_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            base_url: std::env::var(BASE_URL_VAR)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(env_u64(TIMEOUT_VAR, defaults.timeout.as_secs())),
            page_delay: Duration::from_millis(env_u64(PAGE_DELAY_VAR, DEFAULT_PAGE_DELAY_MS)),
        }
    }
}

/// `$HOME/.cache/stalotto/data.db`, or `./stalotto/data.db` without a home
/// directory.
pub fn default_db_path() -> PathBuf {
    let base = std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".cache"))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("stalotto").join("data.db")
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_with_cache_file() {
        let path = default_db_path();
        assert!(path.ends_with("stalotto/data.db"));
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.page_delay, Duration::ZERO);
    }

    #[test]
    fn env_u64_falls_back_when_unset() {
        assert_eq!(env_u64("STALOTTO_TEST_UNSET_VARIABLE", 17), 17);
    }
}
