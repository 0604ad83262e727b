use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub(crate) const SETTINGS_ENV_VAR: &str = "SCRUB_SETTINGS";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Tunables read once at startup. Unknown keys in the file are ignored and
/// missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Settings {
    /// Skip the menu and start straight in the level.
    pub(crate) auto_level: bool,
    pub(crate) show_camera: bool,
    pub(crate) show_hitboxes: bool,
    pub(crate) invincible: bool,
    pub(crate) hide_overlay: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) player_speed: f64,
    pub(crate) camera_inner: f64,
    pub(crate) camera_outer: f64,
    pub(crate) camera_speed: f64,
    pub(crate) enemy_health: u32,
    pub(crate) max_threat: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_level: false,
            show_camera: false,
            show_hitboxes: false,
            invincible: false,
            hide_overlay: false,
            seed: None,
            player_speed: 2.0,
            camera_inner: 75.0,
            camera_outer: 125.0,
            camera_speed: 20.0,
            enemy_health: 4,
            max_threat: 3,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in {path} at '{field}': {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

/// `$SCRUB_SETTINGS` when set, otherwise `<root>/settings.json`.
pub(crate) fn settings_path(root: &Path) -> PathBuf {
    std::env::var_os(SETTINGS_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join(SETTINGS_FILE_NAME))
}

pub(crate) fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "settings_missing_using_defaults");
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let settings = parse_settings(&raw).map_err(|(field, source)| SettingsError::Parse {
        path: path.to_path_buf(),
        field,
        source,
    })?;
    settings.log_overrides();
    Ok(settings)
}

fn parse_settings(raw: &str) -> Result<Settings, (String, serde_json::Error)> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let mut settings: Settings = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|error| (error.path().to_string(), error.into_inner()))?;
    settings.sanitize();
    Ok(settings)
}

impl Settings {
    fn sanitize(&mut self) {
        let defaults = Settings::default();
        if !self.player_speed.is_finite() || self.player_speed <= 0.0 {
            warn!(value = self.player_speed, "settings_player_speed_reset");
            self.player_speed = defaults.player_speed;
        }
        if !self.camera_speed.is_finite() || self.camera_speed <= 0.0 {
            self.camera_speed = defaults.camera_speed;
        }
        if self.camera_outer < self.camera_inner {
            warn!(
                inner = self.camera_inner,
                outer = self.camera_outer,
                "settings_camera_outer_below_inner"
            );
            self.camera_outer = self.camera_inner;
        }
        self.enemy_health = self.enemy_health.max(1);
        self.max_threat = self.max_threat.max(0);
    }

    fn log_overrides(&self) {
        info!(
            seed = ?self.seed,
            invincible = self.invincible,
            show_camera = self.show_camera,
            show_hitboxes = self.show_hitboxes,
            max_threat = self.max_threat,
            "settings_loaded"
        );
    }
}
