use crate::app_config::{AppConfig, RegionConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("PNP_LOG_LEVEL", "info");
    let news_backend = or_default("PNP_NEWS_BACKEND", "lexicon");
    let news_days = parse_u32("PNP_NEWS_DAYS", "7")?;
    let aliases_path = PathBuf::from(or_default("PNP_ALIASES_PATH", "./aliases.json"));
    let regional_fallback = parse_bool(
        "PNP_REGIONAL_FALLBACK",
        &or_default("PNP_REGIONAL_FALLBACK", "true"),
    )?;
    let regional_max_items = parse_usize("PNP_REGIONAL_MAX_ITEMS", "50")?;

    let region_defaults = RegionConfig::default();
    let region = RegionConfig {
        language: or_default("PNP_REGION_LANGUAGE", &region_defaults.language),
        country: or_default("PNP_REGION_COUNTRY", &region_defaults.country),
        restriction_clause: or_default("PNP_REGION_CLAUSE", &region_defaults.restriction_clause),
        default_source_label: or_default(
            "PNP_REGION_SOURCE_LABEL",
            &region_defaults.default_source_label,
        ),
    };

    let http_timeout_secs = parse_u64("PNP_HTTP_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("PNP_USER_AGENT", "pnp/0.1 (portfolio-news)");
    let max_retries = parse_u32("PNP_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("PNP_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        log_level,
        news_backend,
        news_days,
        aliases_path,
        regional_fallback,
        regional_max_items,
        region,
        http_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
