use crate::utils::url::api_base_url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable that overrides the configured backend origin.
pub const BACKEND_URL_ENV: &str = "EVOLANCE_BACKEND_URL";
pub const DEFAULT_BACKEND_ORIGIN: &str = "http://localhost:8001";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend origin without the `/api` suffix (e.g. "https://evolance.example")
    pub backend_url: Option<String>,
    /// Path the terminal UI asks the router for at startup
    pub start_route: Option<String>,
}

/// Keys accepted by `evolance set` / `evolance unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BackendUrl,
    StartRoute,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::BackendUrl, ConfigKey::StartRoute];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::BackendUrl => "backend-url",
            ConfigKey::StartRoute => "start-route",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().replace('_', "-").as_str() {
            "backend-url" => Ok(ConfigKey::BackendUrl),
            "start-route" => Ok(ConfigKey::StartRoute),
            other => {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
                Err(format!(
                    "Unknown config key: {other}. Available keys: {}",
                    known.join(", ")
                ))
            }
        }
    }
}

impl Config {
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("{key} requires a value"));
        }
        match key {
            ConfigKey::BackendUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!(
                        "backend-url must start with http:// or https:// (got {value})"
                    ));
                }
                self.backend_url = Some(value.to_string());
            }
            ConfigKey::StartRoute => {
                let route = if value.starts_with('/') {
                    value.to_string()
                } else {
                    format!("/{value}")
                };
                self.start_route = Some(route);
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BackendUrl => self.backend_url = None,
            ConfigKey::StartRoute => self.start_route = None,
        }
    }

    /// Backend origin after applying the environment override.
    pub fn backend_origin(&self) -> String {
        backend_origin_from(std::env::var(BACKEND_URL_ENV).ok(), self)
    }

    /// Base URL every API path is resolved against.
    pub fn api_base(&self) -> String {
        api_base_url(&self.backend_origin())
    }
}

/// Pick the backend origin: a non-blank override wins, then the config
/// file, then the local development default.
pub fn backend_origin_from(env_override: Option<String>, config: &Config) -> String {
    env_override
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            config
                .backend_url
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_BACKEND_ORIGIN.to_string())
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
