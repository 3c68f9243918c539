use std::{fs, path::Path};

use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::{ClientConfig, LoggingConfig};
use crate::config::validator::validate_client_config;
use crate::errors::ConfigError;

/// Load and validate config from YAML file
pub fn file_to_config(path: &Path) -> Result<ClientConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("cannot read config '{}': {}", path.display(), e))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<ClientConfig> {
    let expanded = expand_env_vars(content)?;
    let mut client_config: ClientConfig = serde_yaml::from_str(&expanded)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if client_config.logging.is_none() {
        client_config.logging = Some(LoggingConfig::default());
    }

    debug!("validating config ...");
    validate_client_config(&client_config).map_err(ConfigError::Invalid)?;

    Ok(client_config)
}

/// Replace `${VAR}` and `${VAR:default}` with the environment value, the default, or "".
pub fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.into_owned())
}
