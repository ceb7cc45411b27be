use std::{net::SocketAddr, path::PathBuf};

use thiserror::Error;
use tracing::Level;
use url::Url;

pub const DEFAULT_STATE_PATH: &str = "state";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub state_path: PathBuf,
    pub log_level: Level,
    pub webhook: Option<Webhook>,
}

impl Config {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("TELOXIDE_TOKEN")
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;

        let state_path = lookup("STATE_PATH")
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_STATE_PATH.to_owned())
            .into();

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => parse("LOG_LEVEL", level)?,
            None => Level::INFO,
        };

        let webhook = match (lookup("WEBHOOK_URL"), lookup("WEBHOOK_ADDR")) {
            (Some(url), Some(addr)) => Some(Webhook {
                url: parse("WEBHOOK_URL", url)?,
                addr: parse("WEBHOOK_ADDR", addr)?,
            }),
            _ => None,
        };

        Ok(Self {
            token,
            state_path,
            log_level,
            webhook,
        })
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn token_is_required() {
        assert!(matches!(
            config(&[]),
            Err(ConfigError::Missing("TELOXIDE_TOKEN"))
        ));
    }

    #[test]
    fn defaults() {
        let config = config(&[("TELOXIDE_TOKEN", "123:abc")]).unwrap();
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_PATH));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.webhook, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("TELOXIDE_TOKEN", "123:abc"),
            ("STATE_PATH", "/var/lib/jsquizbot"),
            ("LOG_LEVEL", "debug"),
            ("WEBHOOK_URL", "https://example.org/bot"),
            ("WEBHOOK_ADDR", "127.0.0.1:8443"),
        ])
        .unwrap();

        assert_eq!(config.state_path, PathBuf::from("/var/lib/jsquizbot"));
        assert_eq!(config.log_level, Level::DEBUG);
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url.as_str(), "https://example.org/bot");
        assert_eq!(webhook.addr, "127.0.0.1:8443".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn webhook_needs_both_vars() {
        let config = config(&[
            ("TELOXIDE_TOKEN", "123:abc"),
            ("WEBHOOK_URL", "https://example.org/bot"),
        ])
        .unwrap();
        assert_eq!(config.webhook, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = config(&[("TELOXIDE_TOKEN", "123:abc"), ("LOG_LEVEL", "loud")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LOG_LEVEL", .. }));

        let err = config(&[
            ("TELOXIDE_TOKEN", "123:abc"),
            ("WEBHOOK_URL", "https://example.org/bot"),
            ("WEBHOOK_ADDR", "not an address"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "WEBHOOK_ADDR", .. }));
    }
}
