use std::env::VarError;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::app_config::{ScraperConfig, ServerConfig};
use crate::ConfigError;

const DEFAULT_PROFILE_DIR: &str = "./.foodspend-profile";
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3001";
const DEFAULT_DATABASE_URL: &str = "sqlite://foodspend.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";

/// Load scrape-driver configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be interpreted.
pub fn load_scraper_config() -> Result<ScraperConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_scraper_config_from_env()
}

/// Load scrape-driver configuration from variables already in the process.
///
/// Unlike [`load_scraper_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be interpreted.
pub fn load_scraper_config_from_env() -> Result<ScraperConfig, ConfigError> {
    build_scraper_config(|key| std::env::var(key))
}

/// Load storage API configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_server_config_from_env()
}

/// Load storage API configuration from variables already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_server_config_from_env() -> Result<ServerConfig, ConfigError> {
    build_server_config(|key| std::env::var(key))
}

/// Parsing/validation for the scrape driver, decoupled from the real
/// environment so it can be tested with a `HashMap` lookup.
fn build_scraper_config<F>(lookup: F) -> Result<ScraperConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // An empty endpoint means "not configured", so launch mode stays the default
    // even when the variable is exported blank.
    let cdp_url = lookup("FOODSPEND_CDP_URL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let profile_dir = PathBuf::from(or_default("FOODSPEND_PROFILE_DIR", DEFAULT_PROFILE_DIR));

    let api_base_url = or_default("FOODSPEND_API_BASE_URL", DEFAULT_API_BASE_URL);
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOODSPEND_API_BASE_URL".to_string(),
            reason: format!("\"{api_base_url}\" is not an http(s) URL"),
        });
    }

    let debug = match lookup("FOODSPEND_DEBUG") {
        Ok(raw) => parse_bool("FOODSPEND_DEBUG", &raw)?,
        Err(_) => false,
    };

    Ok(ScraperConfig {
        cdp_url,
        profile_dir,
        api_base_url,
        debug,
    })
}

fn build_server_config<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = or_default("DATABASE_URL", DEFAULT_DATABASE_URL);

    let raw_bind = or_default("FOODSPEND_BIND_ADDR", DEFAULT_BIND_ADDR);
    let bind_addr = raw_bind
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "FOODSPEND_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let log_level = or_default("FOODSPEND_LOG_LEVEL", "info");

    let raw_max = or_default("FOODSPEND_DB_MAX_CONNECTIONS", "5");
    let db_max_connections = raw_max
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "FOODSPEND_DB_MAX_CONNECTIONS".to_string(),
            reason: e.to_string(),
        })?;

    Ok(ServerConfig {
        database_url,
        bind_addr,
        log_level,
        db_max_connections,
    })
}

/// Parse a boolean toggle. Accepts `1/0`, `true/false`, `yes/no`, `on/off`
/// in any case; anything else is rejected.
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
