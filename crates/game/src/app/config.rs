use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::{ConfigError, PhysicsConfig};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ConfigFileError {
    #[error("failed to read physics config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse physics config {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid physics config {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Reads the physics config, falling back to defaults when the file is absent.
pub(crate) fn load_physics_config(path: &Path) -> Result<PhysicsConfig, ConfigFileError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "physics_config_defaulted");
            return Ok(PhysicsConfig::default());
        }
        Err(source) => {
            return Err(ConfigFileError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = parse_physics_config(path, &raw)?;
    config
        .validate()
        .map_err(|source| ConfigFileError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        unit_scale = config.unit_scale,
        "physics_config_loaded"
    );
    Ok(config)
}

fn parse_physics_config(path: &Path, raw: &str) -> Result<PhysicsConfig, ConfigFileError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        ConfigFileError::Parse {
            path: path.to_path_buf(),
            json_path,
            source: error.into_inner(),
        }
    })
}
