//! Application configuration via environment variables.

use std::env;

use crate::antiforgery::{
    AntiforgeryOptions, DEFAULT_COOKIE_NAME, DEFAULT_FORM_FIELD_NAME, DEFAULT_HEADER_NAME,
};
use crate::middleware::form_guard::DEFAULT_MAX_BODY_BYTES;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub frontend_url: String,
    pub antiforgery_secret: String,
    pub antiforgery_cookie_name: String,
    pub antiforgery_header_name: String,
    pub antiforgery_form_field: String,
    pub cookie_https_only: bool,
    pub validate_antiforgery: bool,
    pub validate_ajax: bool,
    pub max_body_bytes: usize,
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `ANTIFORGERY_SECRET`. Everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let antiforgery_secret = required_env("ANTIFORGERY_SECRET")?;
        if antiforgery_secret.len() < 16 {
            return Err(ConfigError::Invalid(
                "ANTIFORGERY_SECRET".into(),
                "must be at least 16 bytes".into(),
            ));
        }

        Ok(Self {
            port: parsed_env("PORT", 3001)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            antiforgery_secret,
            antiforgery_cookie_name: env::var("ANTIFORGERY_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_COOKIE_NAME.into()),
            antiforgery_header_name: env::var("ANTIFORGERY_HEADER_NAME")
                .unwrap_or_else(|_| DEFAULT_HEADER_NAME.into()),
            antiforgery_form_field: env::var("ANTIFORGERY_FORM_FIELD")
                .unwrap_or_else(|_| DEFAULT_FORM_FIELD_NAME.into()),
            cookie_https_only: bool_env("COOKIE_HTTPS_ONLY", false),
            validate_antiforgery: bool_env("FORM_GUARD_VALIDATE_ANTIFORGERY", true),
            validate_ajax: bool_env("FORM_GUARD_VALIDATE_AJAX", true),
            max_body_bytes: parsed_env("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".into()),
        })
    }

    /// Token store options derived from this configuration.
    pub fn antiforgery_options(&self) -> AntiforgeryOptions {
        AntiforgeryOptions {
            cookie_name: self.antiforgery_cookie_name.clone(),
            header_name: self.antiforgery_header_name.clone(),
            form_field_name: self.antiforgery_form_field.clone(),
            https_only: self.cookie_https_only,
        }
    }
}

/// Fixed configuration for tests. All fields are public and settable.
impl Config {
    pub fn test_default() -> Self {
        Self {
            port: 3001,
            frontend_url: "http://localhost:3000".into(),
            antiforgery_secret: "test-antiforgery-secret".into(),
            antiforgery_cookie_name: DEFAULT_COOKIE_NAME.into(),
            antiforgery_header_name: DEFAULT_HEADER_NAME.into(),
            antiforgery_form_field: DEFAULT_FORM_FIELD_NAME.into(),
            cookie_https_only: false,
            validate_antiforgery: true,
            validate_ajax: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_format: "pretty".into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

fn required_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnv(key.into()))
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(key.into(), raw)),
        Err(_) => Ok(default),
    }
}

fn bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| parse_bool(&v).unwrap_or(default))
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "True" | "TRUE" | "1" | "yes" => Some(true),
        "false" | "False" | "FALSE" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_creates_valid_config() {
        let cfg = Config::test_default();
        assert_eq!(cfg.port, 3001);
        assert!(cfg.validate_antiforgery);
        assert!(cfg.validate_ajax);
        assert!(!cfg.cookie_https_only);
        assert_eq!(cfg.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_antiforgery_options() {
        let mut cfg = Config::test_default();
        cfg.cookie_https_only = true;
        cfg.antiforgery_cookie_name = "af".into();
        let options = cfg.antiforgery_options();
        assert_eq!(options.cookie_name, "af");
        assert_eq!(options.header_name, "RequestVerificationToken");
        assert_eq!(options.form_field_name, "__RequestVerificationToken");
        assert!(options.https_only);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" 1 "), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    const UNSET_KEY: &str = "FORM_GUARD_TEST_NEVER_SET";

    #[test]
    fn test_required_env_missing() {
        let err = required_env(UNSET_KEY).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(ref key) if key == UNSET_KEY));
        assert_eq!(
            err.to_string(),
            format!("missing required environment variable: {UNSET_KEY}")
        );
    }

    #[test]
    fn test_parsed_env_falls_back_to_default() {
        assert_eq!(parsed_env(UNSET_KEY, 3001u16).unwrap(), 3001);
        assert_eq!(parsed_env(UNSET_KEY, 64usize).unwrap(), 64);
        assert!(bool_env(UNSET_KEY, true));
        assert!(!bool_env(UNSET_KEY, false));
    }
}
