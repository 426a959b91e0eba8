use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories_next::{BaseDirs, UserDirs};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_VERSION: &str = "1";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings at '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Host settings. Every field is optional in the file; missing fields take
/// their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
    pub version: String,

    /// Sketch to open when none is named on the command line.
    pub initial_sketch: Option<String>,

    /// Replaces each sketch's own preferred rate when set.
    pub fps_override: Option<f32>,

    pub capture_dir: PathBuf,

    /// Where the host writes the stats summary on shutdown, if anywhere.
    pub stats_path: Option<PathBuf>,

    /// Stop after this many ticks of the active sketch. Mostly useful
    /// headless.
    pub frame_limit: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION.to_string(),
            initial_sketch: None,
            fps_override: None,
            capture_dir: default_capture_dir(),
            stats_path: None,
            frame_limit: None,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| {
            SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let settings = serde_json::from_str::<Self>(&json).map_err(
            |source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            },
        )?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn load_if_exists(
        path: impl AsRef<Path>,
    ) -> Result<Option<Self>, SettingsError> {
        match Self::load(path) {
            Ok(settings) => Ok(Some(settings)),
            Err(SettingsError::Io { source, .. })
                if source.kind() == ErrorKind::NotFound =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Loads `path`, falling back to defaults when the file doesn't exist.
    pub fn load_or_default(
        path: impl AsRef<Path>,
    ) -> Result<Self, SettingsError> {
        Ok(Self::load_if_exists(path)?.unwrap_or_default())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let io_error = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        if let Some(parent_dir) = path.parent() {
            if !parent_dir.as_os_str().is_empty() {
                fs::create_dir_all(parent_dir).map_err(io_error)?;
            }
        }
        fs::write(path, json).map_err(io_error)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn capture_path(&self, sketch_name: &str, frame: u64) -> PathBuf {
        self.capture_dir
            .join(format!("{}-{:06}.png", sketch_name, frame))
    }
}

pub fn config_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|base| base.config_dir().join("Easel"))
}

pub fn default_settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE_NAME))
}

fn default_capture_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|ud| ud.picture_dir().map(|p| p.join("Easel")))
        .or_else(|| {
            BaseDirs::new().map(|bd| bd.home_dir().join("Easel").join("Images"))
        })
        .unwrap_or_else(|| PathBuf::from("captures"))
}
