use crate::app_config::{AnswerMode, AppConfig, Environment};
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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `.env` templates with `KEY=` stay harmless.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SHOPFRONT_ENV", "development"))
        .map_err(|reason| invalid("SHOPFRONT_ENV", reason))?;
    let bind_addr = parse_addr("SHOPFRONT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SHOPFRONT_LOG_LEVEL", "info");

    let shop_domain = optional("SHOPFRONT_SHOP_DOMAIN");
    let storefront_token = optional("SHOPFRONT_STOREFRONT_TOKEN");
    let storefront_api_version = or_default("SHOPFRONT_STOREFRONT_API_VERSION", "2024-01");

    let request_timeout_secs = parse_u64("SHOPFRONT_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "SHOPFRONT_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let max_retries = parse_u32("SHOPFRONT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("SHOPFRONT_RETRY_BACKOFF_BASE_MS", "500")?;

    let bulk_max_pages = parse_usize("SHOPFRONT_BULK_MAX_PAGES", "200")?;
    if bulk_max_pages == 0 {
        return Err(invalid(
            "SHOPFRONT_BULK_MAX_PAGES",
            "must be greater than zero".to_string(),
        ));
    }
    let bulk_max_duration_secs = parse_u64("SHOPFRONT_BULK_MAX_DURATION_SECS", "120")?;
    let bulk_inter_request_delay_ms = parse_u64("SHOPFRONT_BULK_INTER_REQUEST_DELAY_MS", "0")?;

    let rate_limit_max_requests = parse_usize("SHOPFRONT_RATE_LIMIT_MAX_REQUESTS", "120")?;
    if rate_limit_max_requests == 0 {
        return Err(invalid(
            "SHOPFRONT_RATE_LIMIT_MAX_REQUESTS",
            "must be greater than zero".to_string(),
        ));
    }
    let rate_limit_window_secs = parse_u64("SHOPFRONT_RATE_LIMIT_WINDOW_SECS", "60")?;
    if rate_limit_window_secs == 0 {
        return Err(invalid(
            "SHOPFRONT_RATE_LIMIT_WINDOW_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let answer_mode = parse_answer_mode(&or_default("SHOPFRONT_ANSWER_MODE", "heuristic"))
        .map_err(|reason| invalid("SHOPFRONT_ANSWER_MODE", reason))?;
    let answer_url = optional("SHOPFRONT_ANSWER_URL");
    let outfit_url = optional("SHOPFRONT_OUTFIT_URL");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        shop_domain,
        storefront_token,
        storefront_api_version,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        bulk_max_pages,
        bulk_max_duration_secs,
        bulk_inter_request_delay_ms,
        rate_limit_max_requests,
        rate_limit_window_secs,
        answer_mode,
        answer_url,
        outfit_url,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" | "prod" => Ok(Environment::Production),
        other => Err(format!(
            "unknown environment \"{other}\"; expected development, test, or production"
        )),
    }
}

fn parse_answer_mode(s: &str) -> Result<AnswerMode, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "heuristic" => Ok(AnswerMode::Heuristic),
        "remote" => Ok(AnswerMode::Remote),
        other => Err(format!(
            "unknown answer mode \"{other}\"; expected heuristic or remote"
        )),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
