use std::env;
use std::path::PathBuf;

use engine::{
    load_maps_dir, resolve_app_paths, AppPaths, ClockConfig, MapError, MapLoadError, StartupError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_physics_config, ConfigFileError};
use super::script::{InputScript, ScriptError};
use super::session::Session;

pub(crate) const SCRIPT_ENV_VAR: &str = "WAYFARER_SCRIPT";
const DEFAULT_SCRIPT_FILE: &str = "demo.json";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigFileError),
    #[error(transparent)]
    Maps(#[from] MapLoadError),
    #[error("failed to start session: {0}")]
    Session(#[from] MapError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

pub(crate) struct AppWiring {
    pub(crate) session: Session,
    pub(crate) script: InputScript,
    pub(crate) clock: ClockConfig,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    info!("=== Wayfarer Startup ===");
    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "project_root_resolved");

    let config = load_physics_config(&paths.physics_config_file())?;
    let maps = load_maps_dir(&paths.maps_dir)?;
    let session = Session::new(&config, maps)?;
    let script = InputScript::load(&script_path(&paths))?;
    info!(
        frames = script.frames.len(),
        duration_ms = script.total_duration().as_millis() as u64,
        "input_script_loaded"
    );

    Ok(AppWiring {
        session,
        script,
        clock: ClockConfig::default(),
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn script_path(paths: &AppPaths) -> PathBuf {
    env::var_os(SCRIPT_ENV_VAR)
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.scripts_dir.join(DEFAULT_SCRIPT_FILE))
}
