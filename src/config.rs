use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::{DEFAULT_TOP_K, TOP_K_MAX, TOP_K_MIN};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub demo: bool,
    pub top_k: u32,
    pub http_timeout: Option<Duration>,
    pub export_dir: PathBuf,
    pub http_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            demo: false,
            top_k: DEFAULT_TOP_K,
            http_timeout: None,
            export_dir: PathBuf::from("."),
            http_cache: true,
        }
    }
}

impl Config {
    /// Loads `.env.local` then `.env` (either may be missing) and reads the environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_base = lookup("SCOUT_API_BASE")
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base);
        let top_k = lookup("SCOUT_TOP_K")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .filter(|k| (TOP_K_MIN..=TOP_K_MAX).contains(k))
            .unwrap_or(defaults.top_k);
        let export_dir = lookup("SCOUT_EXPORT_DIR")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);
        Self {
            api_base,
            demo: lookup("SCOUT_DEMO").is_some_and(|val| is_truthy(&val)),
            top_k,
            http_timeout: parse_timeout(lookup("SCOUT_HTTP_TIMEOUT_SECS")),
            export_dir,
            http_cache: !lookup("SCOUT_NO_CACHE").is_some_and(|val| is_truthy(&val)),
        }
    }
}

fn parse_timeout(raw: Option<String>) -> Option<Duration> {
    raw.and_then(|val| val.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn api_base_trailing_slash_is_trimmed() {
        let config = config_from(&[("SCOUT_API_BASE", "http://scout.local:8080/ ")]);
        assert_eq!(config.api_base, "http://scout.local:8080");
    }

    #[test]
    fn out_of_range_top_k_falls_back() {
        assert_eq!(config_from(&[("SCOUT_TOP_K", "0")]).top_k, DEFAULT_TOP_K);
        assert_eq!(config_from(&[("SCOUT_TOP_K", "500")]).top_k, DEFAULT_TOP_K);
        assert_eq!(config_from(&[("SCOUT_TOP_K", "abc")]).top_k, DEFAULT_TOP_K);
        assert_eq!(config_from(&[("SCOUT_TOP_K", "25")]).top_k, 25);
    }

    #[test]
    fn flags_and_timeout() {
        let config = config_from(&[
            ("SCOUT_DEMO", "Yes"),
            ("SCOUT_NO_CACHE", "1"),
            ("SCOUT_HTTP_TIMEOUT_SECS", "15"),
        ]);
        assert!(config.demo);
        assert!(!config.http_cache);
        assert_eq!(config.http_timeout, Some(Duration::from_secs(15)));

        let config = config_from(&[("SCOUT_DEMO", "0"), ("SCOUT_HTTP_TIMEOUT_SECS", "0")]);
        assert!(!config.demo);
        assert_eq!(config.http_timeout, None);
    }
}
