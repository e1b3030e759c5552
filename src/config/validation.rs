//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the override feature's settings have the right types
//! - Validate value ranges and path shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use serde_json::Value;
use thiserror::Error;

use crate::config::baseline::{COOKIE_NAME_KEY, ENABLED_KEY, OVERRIDABLE_KEYS_KEY};
use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("admin.mount_path must start with '/' and must not end with '/': {0:?}")]
    MountPath(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("settings.{key} must be {expected}")]
    WrongType { key: &'static str, expected: &'static str },

    #[error("settings.CONFIG_OVERRIDE_COOKIE_NAME is not a valid cookie name: {0:?}")]
    CookieName(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mount = &config.admin.mount_path;
    if !mount.starts_with('/') || mount.ends_with('/') {
        errors.push(ValidationError::MountPath(mount.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    match config.settings.get(COOKIE_NAME_KEY) {
        None => {}
        Some(Value::String(name)) => {
            if !is_cookie_token(name) {
                errors.push(ValidationError::CookieName(name.clone()));
            }
        }
        Some(_) => errors.push(ValidationError::WrongType {
            key: COOKIE_NAME_KEY,
            expected: "a string",
        }),
    }

    if let Some(value) = config.settings.get(ENABLED_KEY) {
        if !value.is_boolean() {
            errors.push(ValidationError::WrongType {
                key: ENABLED_KEY,
                expected: "a boolean",
            });
        }
    }

    if let Some(value) = config.settings.get(OVERRIDABLE_KEYS_KEY) {
        let all_strings = value
            .as_array()
            .map(|items| items.iter().all(Value::is_string))
            .unwrap_or(false);
        if !all_strings {
            errors.push(ValidationError::WrongType {
                key: OVERRIDABLE_KEYS_KEY,
                expected: "an array of strings",
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// RFC 6265 cookie-name token: visible ASCII minus separators.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServiceConfig::default();
        config.admin.mount_path = "config_override/".into();
        config.timeouts.request_secs = 0;
        config.settings.insert(ENABLED_KEY.into(), json!("yes"));
        config.settings.insert(OVERRIDABLE_KEYS_KEY.into(), json!(["A", 1]));
        config.settings.insert(COOKIE_NAME_KEY.into(), json!("bad name;"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::CookieName("bad name;".into())));
    }

    #[test]
    fn test_cookie_name_must_be_string() {
        let mut config = ServiceConfig::default();
        config.settings.insert(COOKIE_NAME_KEY.into(), json!(12));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::WrongType { key: COOKIE_NAME_KEY, expected: "a string" }]
        );
    }
}
