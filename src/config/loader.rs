//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} is missing or unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file is corrupted: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate the application's `config/config.json`.
///
/// The application root is injected into the returned config as `app_path`,
/// so downstream components never re-derive it.
pub fn load_config(app_root: &Path) -> Result<AppConfig, ConfigError> {
    let path = app_root.join("config").join("config.json");
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let mut config: AppConfig = serde_json::from_str(&content)?;
    config.app_path = app_root.to_path_buf();

    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, content: &str) {
        let config_dir = dir.join("config");
        fs::create_dir_all(&config_dir).unwrap();
        let mut file = fs::File::create(config_dir.join("config.json")).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_corrupt_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "{not json");
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_app_path_is_injected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "{}");
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.app_path, dir.path());
    }

    #[test]
    fn test_semantic_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"{"servers": {"http": {"enabled": true, "port": 0}}}"#,
        );
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
