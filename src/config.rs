use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_APP_NAME: &str = "ArtFest";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings for the console, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub bind: String,
    pub api_timeout: Duration,
    pub app_name: String,
    pub session_key: Option<String>,
}

impl AppConfig {
    /// Load settings after pulling in a `.env` file, if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (environment, map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("ARTFEST_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("ARTFEST_API_URL"))?;
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid { key: "ARTFEST_API_URL", value: api_url });
        }

        let bind = lookup("ARTFEST_BIND")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let api_timeout = match lookup("ARTFEST_API_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid { key: "ARTFEST_API_TIMEOUT_SECS", value: raw }),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let app_name = lookup("ARTFEST_APP_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        Ok(Self {
            api_url,
            bind,
            api_timeout,
            app_name,
            session_key: lookup("SESSION_KEY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("ARTFEST_API_URL", "http://localhost:5000/api/")]))
            .unwrap();
        assert_eq!(cfg.api_url, "http://localhost:5000/api");
        assert_eq!(cfg.bind, DEFAULT_BIND);
        assert_eq!(cfg.api_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.app_name, DEFAULT_APP_NAME);
        assert!(cfg.session_key.is_none());
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ARTFEST_API_URL")));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("ARTFEST_API_URL", "localhost:5000")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ARTFEST_API_URL", .. }));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("ARTFEST_API_URL", "http://x"),
            ("ARTFEST_API_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ARTFEST_API_TIMEOUT_SECS", .. }));

        let zero = AppConfig::from_lookup(lookup_from(&[
            ("ARTFEST_API_URL", "http://x"),
            ("ARTFEST_API_TIMEOUT_SECS", "0"),
        ]));
        assert!(zero.is_err());
    }
}
