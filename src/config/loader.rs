//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::env::EnvLookup;
use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the error files root directory.
pub const ERROR_FILES_PATH_VAR: &str = "ERROR_FILES_PATH";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file.
///
/// The result is not validated; see [`resolve_config`].
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Build the effective configuration.
///
/// Layers, lowest first: defaults or the TOML file at `path`, environment
/// overrides, then `overrides` (command line). Validation runs once on the
/// final result.
pub fn resolve_config(
    path: Option<&Path>,
    env: &dyn EnvLookup,
    overrides: impl FnOnce(&mut ServerConfig),
) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    apply_env_overrides(&mut config, env);
    overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides on top of a loaded configuration.
pub fn apply_env_overrides(config: &mut ServerConfig, env: &dyn EnvLookup) {
    if let Some(path) = env.non_empty(ERROR_FILES_PATH_VAR) {
        config.pages.error_files_path = PathBuf::from(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::StaticEnv;
    use std::io::Write;

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [pages]
            error_files_path = "/srv/errors"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.pages.error_files_path, PathBuf::from("/srv/errors"));
    }

    #[test]
    fn test_resolve_config_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timeouts]\nrequest_secs = 0").unwrap();

        // Parsing alone accepts it.
        assert_eq!(load_config(file.path()).unwrap().timeouts.request_secs, 0);

        match resolve_config(Some(file.path()), &StaticEnv::new(), |_| {}) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec![ValidationError::ZeroTimeout]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_config_validates_after_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nbind_address = \"not an address\"").unwrap();

        let config = resolve_config(Some(file.path()), &StaticEnv::new(), |config| {
            config.listener.bind_address = "127.0.0.1:9000".into();
        })
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_resolve_config_layer_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pages]\nerror_files_path = \"/from-file\"").unwrap();
        let env = StaticEnv::new().with(ERROR_FILES_PATH_VAR, "/from-env");

        let config = resolve_config(Some(file.path()), &env, |_| {}).unwrap();
        assert_eq!(config.pages.error_files_path, PathBuf::from("/from-env"));

        let config = resolve_config(Some(file.path()), &env, |config| {
            config.pages.error_files_path = "/from-cli".into();
        })
        .unwrap();
        assert_eq!(config.pages.error_files_path, PathBuf::from("/from-cli"));
    }

    #[test]
    fn test_resolve_config_defaults_without_file() {
        let config = resolve_config(None, &StaticEnv::new(), |_| {}).unwrap();
        let default = ServerConfig::default();
        assert_eq!(config.listener.bind_address, default.listener.bind_address);
        assert_eq!(config.pages.error_files_path, default.pages.error_files_path);
        assert_eq!(config.maintenance.routes, default.maintenance.routes);
    }

    #[test]
    fn test_load_config_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nbind_address = 1").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_env_override_error_files_path() {
        let mut config = ServerConfig::default();
        apply_env_overrides(&mut config, &StaticEnv::new().with(ERROR_FILES_PATH_VAR, "/data"));
        assert_eq!(config.pages.error_files_path, PathBuf::from("/data"));
    }

    #[test]
    fn test_empty_env_override_is_ignored() {
        let mut config = ServerConfig::default();
        apply_env_overrides(&mut config, &StaticEnv::new().with(ERROR_FILES_PATH_VAR, ""));
        assert_eq!(config.pages.error_files_path, PathBuf::from("/www"));
    }
}
