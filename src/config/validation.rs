//! Configuration validation.
//!
//! Serde handles the syntax; these are the semantic checks. Every problem
//! is collected so an operator sees them all at once.

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("maintenance service name must not be empty")]
    EmptyServiceName,

    #[error("maintenance route #{index}: match key must not be empty")]
    EmptyMatchKey { index: usize },

    #[error("maintenance route `{key}`: `{file}` is not a plain file name")]
    InvalidFile { key: String, file: String },

    #[error("maintenance route `{key}`: `{env}` is not a valid environment variable name")]
    InvalidEnvName { key: String, env: String },

    #[error("maintenance route `{0}` is declared more than once")]
    DuplicateMatchKey(String),
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.maintenance.service_name.is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    let mut seen = HashSet::new();
    for (index, route) in config.maintenance.routes.iter().enumerate() {
        if route.match_key.is_empty() {
            errors.push(ValidationError::EmptyMatchKey { index });
        } else if !seen.insert(route.match_key.as_str()) {
            errors.push(ValidationError::DuplicateMatchKey(route.match_key.clone()));
        }

        if !is_plain_file_name(&route.file) {
            errors.push(ValidationError::InvalidFile {
                key: route.match_key.clone(),
                file: route.file.clone(),
            });
        }

        if !is_env_name(&route.env) {
            errors.push(ValidationError::InvalidEnvName {
                key: route.match_key.clone(),
                env: route.env.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

fn is_env_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
