use thiserror::Error;

use crate::app_config::AppConfig;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process. Unlike [`load_app_config`], this does NOT load `.env` files —
/// useful for testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let tikhub_base_url = or_default("IDEAPULSE_TIKHUB_BASE_URL", "https://api.tikhub.io");
    // An empty token means "not configured" — adapters then report themselves
    // unconfigured instead of issuing doomed requests.
    let tikhub_token = lookup("IDEAPULSE_TIKHUB_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());
    let log_level = or_default("IDEAPULSE_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("IDEAPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let inter_request_delay_ms = parse_u64("IDEAPULSE_INTER_REQUEST_DELAY_MS", "800")?;
    let rate_limit_cooldown_secs = parse_u64("IDEAPULSE_RATE_LIMIT_COOLDOWN_SECS", "5")?;
    let retry_backoff_step_secs = parse_u64("IDEAPULSE_RETRY_BACKOFF_STEP_SECS", "2")?;
    let max_retries = parse_u32("IDEAPULSE_MAX_RETRIES", "3")?;
    let channel_timeout_secs = parse_u64("IDEAPULSE_CHANNEL_TIMEOUT_SECS", "120")?;

    Ok(AppConfig {
        tikhub_base_url,
        tikhub_token,
        log_level,
        request_timeout_secs,
        inter_request_delay_ms,
        rate_limit_cooldown_secs,
        retry_backoff_step_secs,
        max_retries,
        channel_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
