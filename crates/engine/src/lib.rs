use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod geometry;
pub mod map;
pub mod physics;

pub use app::{
    Camera2D, ClockConfig, Direction, Entity, EntityConfig, EntityId, FixedStepClock, InputAction,
    InputSnapshot, PlayerController, State, StepPlan, Viewport, World, PIXELS_PER_UNIT,
};
pub use geometry::{Rect, Vec2};
pub use map::{
    load_map_file, load_maps_dir, Map, MapError, MapHandle, MapLayer, MapLoadError, MapManager,
    MapObject, MapType, NpcSpawn,
};
pub use physics::{
    ConfigError, Message, MessageError, NpcPhysics, PhysicsComponent, PhysicsConfig,
    PlayerPhysics,
};

pub const ROOT_ENV_VAR: &str = "WAYFARER_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub maps_dir: PathBuf,
    pub config_dir: PathBuf,
    pub scripts_dir: PathBuf,
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        Self {
            maps_dir: assets_dir.join("maps"),
            config_dir: assets_dir.join("config"),
            scripts_dir: assets_dir.join("scripts"),
            assets_dir,
            root,
        }
    }

    pub fn physics_config_file(&self) -> PathBuf {
        self.config_dir.join("physics.json")
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("WAYFARER_ROOT points at {path}, which has no Cargo.toml and assets/maps/")]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "no directory at or above {searched_from} holds Cargo.toml and assets/maps/; \
set WAYFARER_ROOT to the project root"
    )]
    RootNotFound { searched_from: PathBuf },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    resolve_root().map(AppPaths::from_root)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => root_from_env(PathBuf::from(value)),
        Err(env::VarError::NotPresent) => root_above_exe(),
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn root_from_env(raw: PathBuf) -> Result<PathBuf, StartupError> {
    let path = canonical_or_raw(raw);
    if has_project_layout(&path) {
        Ok(path)
    } else {
        Err(StartupError::InvalidEnvRoot { path })
    }
}

fn root_above_exe() -> Result<PathBuf, StartupError> {
    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    let exe_dir = match exe.parent() {
        Some(dir) => dir.to_path_buf(),
        None => return Err(StartupError::ExeHasNoParent(exe)),
    };
    exe_dir
        .ancestors()
        .find(|dir| has_project_layout(dir))
        .map(|dir| canonical_or_raw(dir.to_path_buf()))
        .ok_or(StartupError::RootNotFound {
            searched_from: exe_dir.clone(),
        })
}

/// The workspace manifest next to the map assets the session loads.
fn has_project_layout(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join("assets").join("maps").is_dir()
}

fn canonical_or_raw(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_layout_needs_manifest_and_maps_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("assets/maps")).expect("maps dir");
        assert!(!has_project_layout(dir.path()));

        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("manifest");
        assert!(has_project_layout(dir.path()));
    }

    #[test]
    fn env_root_without_maps_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("manifest");
        assert!(matches!(
            root_from_env(dir.path().to_path_buf()),
            Err(StartupError::InvalidEnvRoot { .. })
        ));
    }

    #[test]
    fn asset_dirs_hang_off_root() {
        let paths = AppPaths::from_root(PathBuf::from("/srv/wayfarer"));
        assert_eq!(paths.maps_dir, PathBuf::from("/srv/wayfarer/assets/maps"));
        assert_eq!(
            paths.physics_config_file(),
            PathBuf::from("/srv/wayfarer/assets/config/physics.json")
        );
    }
}
