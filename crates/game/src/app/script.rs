//! Scripted input timelines for headless runs.
//!
//! A script is a JSON array of frames; each frame holds its input for
//! `duration_ms`. A click fires on the first tick of its frame only.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::{InputAction, InputSnapshot, Vec2};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse input script {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("input script {path} has no frames")]
    Empty { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptFrame {
    pub(crate) duration_ms: u64,
    #[serde(default)]
    pub(crate) actions: Vec<InputAction>,
    #[serde(default)]
    pub(crate) click_px: Option<[f32; 2]>,
    #[serde(default)]
    pub(crate) zoom_steps: i32,
}

impl ScriptFrame {
    pub(crate) fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Snapshot for one tick of this frame; `first_tick` gates one-shot input.
    pub(crate) fn snapshot(&self, first_tick: bool) -> InputSnapshot {
        let mut snapshot = self
            .actions
            .iter()
            .fold(InputSnapshot::empty(), |snapshot, action| {
                snapshot.with_action_down(*action, true)
            });
        if first_tick {
            snapshot = snapshot
                .with_cursor_position_px(self.click_px.map(|[x, y]| Vec2::new(x, y)))
                .with_left_click_pressed(self.click_px.is_some())
                .with_zoom_delta_steps(self.zoom_steps);
        }
        snapshot
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InputScript {
    pub(crate) frames: Vec<ScriptFrame>,
}

impl InputScript {
    pub(crate) fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    pub(crate) fn parse(path: &Path, raw: &str) -> Result<Self, ScriptError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let frames: Vec<ScriptFrame> = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|error| {
                let json_path = error.path().to_string();
                ScriptError::Parse {
                    path: path.to_path_buf(),
                    json_path,
                    source: error.into_inner(),
                }
            })?;
        if frames.is_empty() {
            return Err(ScriptError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { frames })
    }

    pub(crate) fn total_duration(&self) -> Duration {
        self.frames.iter().map(ScriptFrame::duration).sum()
    }
}
