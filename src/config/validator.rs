//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks URLs, timeouts, cache location, logging level and credentials

use tracing::{error, info};

use crate::config::settings::{ClientConfig, StoreBackend};
use crate::errors::ConfigError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_client_config(cfg: &ClientConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_url("api.base_url", &cfg.api.base_url, &mut errors);
    if cfg.api.timeout_ms == Some(0) {
        errors.push("api.timeout_ms must be greater than 0".to_string());
    }

    validate_url("auth.token_url", &cfg.auth.token_url, &mut errors);
    match cfg.auth.credentials() {
        Ok(_) => {}
        Err(ConfigError::Invalid(issues)) => errors.extend(issues),
        Err(e) => errors.push(e.to_string()),
    }

    if cfg.token_cache.backend == StoreBackend::File && !cfg.token_cache.dir.is_absolute() {
        errors.push(format!(
            "token_cache.dir must be an absolute path, got '{}'",
            cfg.token_cache.dir.display()
        ));
    }

    if let Some(logging) = &cfg.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "logging.level '{}' is not one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config: {}", e);
        }
        Err(errors)
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("{} must be an http(s) url, got '{}'", field, url));
    }
}
