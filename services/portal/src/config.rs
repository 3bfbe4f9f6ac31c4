//! services/portal/src/config.rs
//!
//! Defines the portal's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use report_portal_core::controller::{DEFAULT_AUTH_DELAY, DEFAULT_PAGE_SIZE};
use report_portal_core::session::DEFAULT_SESSION_TTL_HOURS;
use report_portal_core::{AuthPolicy, PortalProfile, PortalSettings};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: Option<String>,
    pub page_size: usize,
    pub auth_delay: Duration,
    pub session_ttl_hours: i64,
    pub patient_display_name: String,
    pub institution_display_name: String,
    pub institution_policy: AuthPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: Level::INFO,
            cors_origin: None,
            page_size: DEFAULT_PAGE_SIZE,
            auth_delay: DEFAULT_AUTH_DELAY,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            patient_display_name: "John Doe".to_string(),
            institution_display_name: "City Hospital".to_string(),
            institution_policy: AuthPolicy::strict(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to defaults for
    /// unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Server Settings ---
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            None => defaults.bind_address,
        };

        let log_level = match lookup("RUST_LOG") {
            Some(raw) => raw.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "RUST_LOG".to_string(),
                    format!("'{}' is not a valid log level", raw),
                )
            })?,
            None => defaults.log_level,
        };

        let cors_origin = lookup("CORS_ORIGIN").filter(|s| !s.trim().is_empty());

        // --- Dashboard and Session Settings ---
        let page_size = parse_positive(&lookup, "PAGE_SIZE", defaults.page_size)?;
        let auth_delay = match lookup("AUTH_DELAY_MS") {
            Some(raw) => Duration::from_millis(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("AUTH_DELAY_MS".to_string(), e.to_string())
            })?),
            None => defaults.auth_delay,
        };
        let session_ttl_hours =
            parse_positive(&lookup, "SESSION_TTL_HOURS", defaults.session_ttl_hours as usize)? as i64;

        // --- Portal Profiles ---
        let patient_display_name =
            lookup("PATIENT_DISPLAY_NAME").unwrap_or(defaults.patient_display_name);
        let institution_display_name =
            lookup("INSTITUTION_DISPLAY_NAME").unwrap_or(defaults.institution_display_name);
        let institution_policy = AuthPolicy {
            validate_email: parse_flag(&lookup, "INSTITUTION_VALIDATE_EMAIL", true)?,
            enforce_password_strength: parse_flag(
                &lookup,
                "INSTITUTION_ENFORCE_PASSWORD_STRENGTH",
                true,
            )?,
            require_password_match: parse_flag(&lookup, "INSTITUTION_REQUIRE_PASSWORD_MATCH", true)?,
        };

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            page_size,
            auth_delay,
            session_ttl_hours,
            patient_display_name,
            institution_display_name,
            institution_policy,
        })
    }

    /// The settings handed to every view controller.
    pub fn portal_settings(&self) -> PortalSettings {
        PortalSettings {
            page_size: self.page_size,
            auth_delay: self.auth_delay,
            session_ttl: chrono::Duration::hours(self.session_ttl_hours),
            patient: PortalProfile {
                policy: AuthPolicy::strict(),
                login_display_name: self.patient_display_name.clone(),
            },
            institution: PortalProfile {
                policy: self.institution_policy,
                login_display_name: self.institution_display_name.clone(),
            },
        }
    }
}

fn parse_positive<F>(lookup: &F, key: &str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be greater than 0".to_string(),
        )),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidValue(key.to_string(), e.to_string())),
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("'{}' is not a boolean", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.auth_delay, Duration::from_millis(1000));
        assert_eq!(config.session_ttl_hours, 24);
        assert_eq!(config.institution_policy, AuthPolicy::strict());
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("PAGE_SIZE", "5"),
            ("AUTH_DELAY_MS", "0"),
            ("INSTITUTION_REQUIRE_PASSWORD_MATCH", "false"),
            ("INSTITUTION_DISPLAY_NAME", "Lakeside Clinic"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.page_size, 5);
        assert!(config.auth_delay.is_zero());
        assert!(!config.institution_policy.require_password_match);
        assert!(config.institution_policy.enforce_password_strength);

        let settings = config.portal_settings();
        assert_eq!(settings.institution.login_display_name, "Lakeside Clinic");
        assert_eq!(settings.patient.policy, AuthPolicy::strict());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("PAGE_SIZE", "0")])),
            Err(ConfigError::InvalidValue(key, _)) if key == "PAGE_SIZE"
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("BIND_ADDRESS", "nowhere")])),
            Err(ConfigError::InvalidValue(key, _)) if key == "BIND_ADDRESS"
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("INSTITUTION_VALIDATE_EMAIL", "maybe")])),
            Err(ConfigError::InvalidValue(key, _)) if key == "INSTITUTION_VALIDATE_EMAIL"
        ));
    }
}
