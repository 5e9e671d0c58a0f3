use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation only; tests drive it with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.trim().is_empty()) };

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

    let api_base_url = optional("SUPLINK_API_BASE_URL");
    let database_url = optional("DATABASE_URL");

    let env = parse_environment(&or_default("SUPLINK_ENV", "development"))?;
    let log_level = or_default("SUPLINK_LOG_LEVEL", "info");
    let user_id = optional("SUPLINK_USER_ID");

    let request_timeout_secs = parse_u64("SUPLINK_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SUPLINK_USER_AGENT", "suplink/0.1 (supplier-discovery)");
    let advisory_interval_ms = parse_u64("SUPLINK_ADVISORY_INTERVAL_MS", "10000")?;
    if advisory_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SUPLINK_ADVISORY_INTERVAL_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let db_max_connections = parse_u32("SUPLINK_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SUPLINK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SUPLINK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        api_base_url,
        database_url,
        env,
        log_level,
        user_id,
        request_timeout_secs,
        user_agent,
        advisory_interval_ms,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SUPLINK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
