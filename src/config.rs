// src/config.rs
use std::{env, net::SocketAddr, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var} `{value}`: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Credential for the inference provider. Absence is reported per request.
    pub hf_token: Option<String>,
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let hf_token = lookup("HF_TOKEN").filter(|t| !t.trim().is_empty());

        let raw_addr = lookup("CHAT_PROXY_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: "CHAT_PROXY_ADDR",
            value: raw_addr.clone(),
            reason: e.to_string(),
        })?;

        let static_dir = lookup("CHAT_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            hf_token,
            addr,
            static_dir,
        })
    }
}

/// Base URL the terminal front-end talks to.
pub fn proxy_url_from_env() -> String {
    proxy_url_from_lookup(|key| env::var(key).ok())
}

pub fn proxy_url_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("CHAT_PROXY_URL")
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.hf_token, None);
        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup_from(&[
            ("HF_TOKEN", "hf_abc"),
            ("CHAT_PROXY_ADDR", "127.0.0.1:8080"),
            ("CHAT_STATIC_DIR", "/srv/chat"),
        ]))
        .unwrap();
        assert_eq!(config.hf_token.as_deref(), Some("hf_abc"));
        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.static_dir, PathBuf::from("/srv/chat"));
    }

    #[test]
    fn blank_token_is_none() {
        let config = Config::from_lookup(lookup_from(&[("HF_TOKEN", "   ")])).unwrap();
        assert_eq!(config.hf_token, None);
    }

    #[test]
    fn invalid_addr_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("CHAT_PROXY_ADDR", "localhost")])).unwrap_err();
        match err {
            ConfigError::Invalid { var, value, .. } => {
                assert_eq!(var, "CHAT_PROXY_ADDR");
                assert_eq!(value, "localhost");
            }
        }
    }

    #[test]
    fn proxy_url_trailing_slash_stripped() {
        let url = proxy_url_from_lookup(lookup_from(&[("CHAT_PROXY_URL", "http://chat.local:8080/")]));
        assert_eq!(url, "http://chat.local:8080");
        assert_eq!(proxy_url_from_lookup(lookup_from(&[])), DEFAULT_PROXY_URL);
    }
}
