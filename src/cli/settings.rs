//! `config`, `set` and `unset` subcommands.

use std::error::Error;
use std::fmt;

use crate::core::config::{path_display, Config, ConfigKey};

/// Errors raised while changing a setting.
#[derive(Debug)]
pub enum SettingError {
    UnknownKey(String),
    InvalidValue(String),
    Config(String),
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(message) | SettingError::InvalidValue(message) => {
                f.write_str(message)
            }
            SettingError::Config(message) => write!(f, "Failed to update config: {message}"),
        }
    }
}

impl Error for SettingError {}

pub fn show() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    config.print_all();
    if let Ok(path) = Config::get_config_path() {
        println!("  file: {}", path_display(path));
    }
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let key: ConfigKey = key.parse().map_err(SettingError::UnknownKey)?;
    let mut config = Config::load()?;
    apply_set(&mut config, key, value)?;
    config
        .save()
        .map_err(|err| SettingError::Config(err.to_string()))?;
    println!("✅ Set {key} to: {}", display_value(&config, key));
    Ok(())
}

pub fn unset(key: &str) -> Result<(), Box<dyn Error>> {
    let key: ConfigKey = key.parse().map_err(SettingError::UnknownKey)?;
    let mut config = Config::load()?;
    config.unset_value(key);
    config
        .save()
        .map_err(|err| SettingError::Config(err.to_string()))?;
    println!("✅ Unset {key}");
    Ok(())
}

fn apply_set(config: &mut Config, key: ConfigKey, value: &str) -> Result<(), SettingError> {
    config
        .set_value(key, value)
        .map_err(SettingError::InvalidValue)
}

fn display_value(config: &Config, key: ConfigKey) -> String {
    let value = match key {
        ConfigKey::BackendUrl => config.backend_url.as_deref(),
        ConfigKey::StartRoute => config.start_route.as_deref(),
    };
    value.unwrap_or("(unset)").to_string()
}
