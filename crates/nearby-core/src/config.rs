use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("NEARBY_LOG_LEVEL", "info");

    let geocoder_base_url = or_default(
        "NEARBY_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_user_agent = or_default(
        "NEARBY_GEOCODER_USER_AGENT",
        "nearby/0.1 (location-acquisition)",
    );
    let geocoder_language = or_default("NEARBY_GEOCODER_LANGUAGE", "en");

    let geocoder_zoom = or_default("NEARBY_GEOCODER_ZOOM", "18")
        .parse::<u8>()
        .map_err(|e| invalid("NEARBY_GEOCODER_ZOOM", e.to_string()))?;
    if geocoder_zoom > 18 {
        return Err(invalid(
            "NEARBY_GEOCODER_ZOOM",
            format!("zoom must be between 0 and 18, got {geocoder_zoom}"),
        ));
    }

    let geocoder_timeout_secs = match lookup("NEARBY_GEOCODER_TIMEOUT_SECS") {
        Ok(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("NEARBY_GEOCODER_TIMEOUT_SECS", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let position_timeout_ms = parse_u64("NEARBY_POSITION_TIMEOUT_MS", "15000")?;
    let store_path = PathBuf::from(or_default("NEARBY_STORE_PATH", "./.nearby/store.json"));

    Ok(AppConfig {
        log_level,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_language,
        geocoder_zoom,
        geocoder_timeout_secs,
        position_timeout_ms,
        store_path,
    })
}

#[cfg(test)]
mod tests {
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

    #[test]
    fn build_app_config_uses_defaults_for_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.geocoder_base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(cfg.geocoder_user_agent, "nearby/0.1 (location-acquisition)");
        assert_eq!(cfg.geocoder_language, "en");
        assert_eq!(cfg.geocoder_zoom, 18);
        assert!(cfg.geocoder_timeout_secs.is_none());
        assert_eq!(cfg.position_timeout_ms, 15_000);
        assert_eq!(
            cfg.store_path,
            std::path::PathBuf::from("./.nearby/store.json")
        );
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("NEARBY_GEOCODER_BASE_URL", "http://localhost:8080");
        map.insert("NEARBY_GEOCODER_ZOOM", "10");
        map.insert("NEARBY_GEOCODER_TIMEOUT_SECS", "20");
        map.insert("NEARBY_POSITION_TIMEOUT_MS", "5000");
        map.insert("NEARBY_STORE_PATH", "/tmp/nearby.json");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.geocoder_base_url, "http://localhost:8080");
        assert_eq!(cfg.geocoder_zoom, 10);
        assert_eq!(cfg.geocoder_timeout_secs, Some(20));
        assert_eq!(cfg.position_timeout_ms, 5000);
        assert_eq!(cfg.store_path, std::path::PathBuf::from("/tmp/nearby.json"));
    }

    #[test]
    fn build_app_config_rejects_zoom_out_of_range() {
        let mut map = HashMap::new();
        map.insert("NEARBY_GEOCODER_ZOOM", "19");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NEARBY_GEOCODER_ZOOM"),
            "expected InvalidEnvVar(NEARBY_GEOCODER_ZOOM), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_non_numeric_position_timeout() {
        let mut map = HashMap::new();
        map.insert("NEARBY_POSITION_TIMEOUT_MS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NEARBY_POSITION_TIMEOUT_MS"),
            "expected InvalidEnvVar(NEARBY_POSITION_TIMEOUT_MS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_non_numeric_geocoder_timeout() {
        let mut map = HashMap::new();
        map.insert("NEARBY_GEOCODER_TIMEOUT_SECS", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NEARBY_GEOCODER_TIMEOUT_SECS"),
            "expected InvalidEnvVar(NEARBY_GEOCODER_TIMEOUT_SECS), got: {result:?}"
        );
    }
}
