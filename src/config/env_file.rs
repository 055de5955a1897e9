use crate::domain::model::{Credential, Device};
use crate::utils::error::{Result, TaggerError};
use crate::utils::validation::{validate_device_address, validate_required_field};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const ENV_FILE_NAME: &str = ".env";

/// Credential and fleet read from the env file.
#[derive(Debug)]
pub struct EnvConfig {
    pub credential: Credential,
    pub devices: Vec<Device>,
}

/// `.env` in the directory holding the running executable.
pub fn default_env_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let base = exe.parent().ok_or_else(|| TaggerError::ConfigError {
        message: format!("Cannot resolve directory of {}", exe.display()),
    })?;
    Ok(base.join(ENV_FILE_NAME))
}

pub fn load_config(path: &Path) -> Result<EnvConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TaggerError::ConfigError {
        message: format!("Cannot read env file '{}': {}", path.display(), e),
    })?;
    tracing::debug!("Loaded env file {}", path.display());
    parse_env(&content)
}

pub fn parse_env(content: &str) -> Result<EnvConfig> {
    let api_key = find_value(content, "API_KEY")?;
    let api_key = validate_required_field("API_KEY", &api_key)?;

    let pan_list = find_value(content, "PAN")?;
    let pan_list = validate_required_field("PAN", &pan_list)?;

    // 同一台設備只派一個任務，避免重複 commit
    let mut seen = HashSet::new();
    let mut devices = Vec::new();
    for address in pan_list.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        validate_device_address("PAN", address)?;
        if !seen.insert(address) {
            tracing::warn!("Duplicate device {} in PAN list, ignoring", address);
            continue;
        }
        devices.push(Device::new(address));
    }

    if devices.is_empty() {
        return Err(TaggerError::MissingConfigError {
            field: "PAN".to_string(),
        });
    }

    Ok(EnvConfig {
        credential: Credential::new(api_key.as_str()),
        devices,
    })
}

/// First `KEY=value` line; value runs up to the first whitespace.
fn find_value(content: &str, key: &str) -> Result<Option<String>> {
    let pattern = format!(r"(?m)^\s*(?:export\s+)?{}=(\S+)", regex::escape(key));
    let re = Regex::new(&pattern).map_err(|e| TaggerError::ConfigError {
        message: format!("Invalid pattern for {}: {}", key, e),
    })?;

    Ok(re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}
