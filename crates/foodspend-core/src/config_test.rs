use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

// -----------------------------------------------------------------------
// scraper config
// -----------------------------------------------------------------------

#[test]
fn scraper_config_defaults_to_launch_mode() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_scraper_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.cdp_url.is_none());
    assert!(!cfg.is_attach_mode());
    assert_eq!(cfg.profile_dir, PathBuf::from("./.foodspend-profile"));
    assert_eq!(cfg.api_base_url, "http://127.0.0.1:3001");
    assert!(!cfg.debug);
}

#[test]
fn scraper_config_cdp_url_enables_attach_mode() {
    let mut map = HashMap::new();
    map.insert("FOODSPEND_CDP_URL", "http://127.0.0.1:9222");
    let cfg = build_scraper_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cdp_url.as_deref(), Some("http://127.0.0.1:9222"));
    assert!(cfg.is_attach_mode());
}

#[test]
fn scraper_config_blank_cdp_url_is_ignored() {
    let mut map = HashMap::new();
    map.insert("FOODSPEND_CDP_URL", "   ");
    let cfg = build_scraper_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.is_attach_mode());
}

#[test]
fn scraper_config_profile_dir_override() {
    let mut map = HashMap::new();
    map.insert("FOODSPEND_PROFILE_DIR", "/tmp/eats-profile");
    let cfg = build_scraper_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.profile_dir, PathBuf::from("/tmp/eats-profile"));
}

#[test]
fn scraper_config_rejects_non_http_api_base() {
    let mut map = HashMap::new();
    map.insert("FOODSPEND_API_BASE_URL", "localhost:3001");
    let result = build_scraper_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODSPEND_API_BASE_URL"),
        "expected InvalidEnvVar(FOODSPEND_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn scraper_config_debug_accepts_common_spellings() {
    for raw in ["1", "true", "TRUE", "yes", "on"] {
        let mut map = HashMap::new();
        map.insert("FOODSPEND_DEBUG", raw);
        let cfg = build_scraper_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.debug, "{raw} should enable debug");
    }
    for raw in ["0", "false", "no", "off", ""] {
        let mut map = HashMap::new();
        map.insert("FOODSPEND_DEBUG", raw);
        let cfg = build_scraper_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.debug, "{raw:?} should disable debug");
    }
}

#[test]
fn scraper_config_debug_invalid() {
    let mut map = HashMap::new();
    map.insert("FOODSPEND_DEBUG", "sometimes");
    let result = build_scraper_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODSPEND_DEBUG"),
        "expected InvalidEnvVar(FOODSPEND_DEBUG), got: {result:?}"
    );
}

// -----------------------------------------------------------------------
// server config
// -----------------------------------------------------------------------

#[test]
fn server_config_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_server_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.database_url, "sqlite://foodspend.db");
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3001");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.db_max_connections, 5);
}

#[test]
fn server_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("FOODSPEND_BIND_ADDR", "not-a-socket-addr");
    let result = build_server_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODSPEND_BIND_ADDR"),
        "expected InvalidEnvVar(FOODSPEND_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn server_config_max_connections_invalid() {
    let mut map = HashMap::new();
    map.insert("FOODSPEND_DB_MAX_CONNECTIONS", "lots");
    let result = build_server_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODSPEND_DB_MAX_CONNECTIONS"),
        "expected InvalidEnvVar(FOODSPEND_DB_MAX_CONNECTIONS), got: {result:?}"
    );
}

#[test]
fn server_config_overrides() {
    let mut map = HashMap::new();
    map.insert("DATABASE_URL", "sqlite::memory:");
    map.insert("FOODSPEND_BIND_ADDR", "0.0.0.0:8080");
    map.insert("FOODSPEND_LOG_LEVEL", "debug");
    map.insert("FOODSPEND_DB_MAX_CONNECTIONS", "2");
    let cfg = build_server_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.database_url, "sqlite::memory:");
    assert_eq!(cfg.bind_addr.port(), 8080);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.db_max_connections, 2);
}
