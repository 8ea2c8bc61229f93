//! Session configuration and the `placer.yaml` profile.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PlacerError, Result};

/// Profile filename looked up in the working directory.
pub const PROFILE_FILENAME: &str = "placer.yaml";

/// How to act when the closest palette swatch is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockedMode {
    /// Count the task as attempted and advance past it without placing.
    Skip,
    /// Substitute the nearest unlocked swatch.
    Map,
    /// Downgrade the session to manual colour selection.
    Manual,
}

impl Default for LockedMode {
    fn default() -> Self {
        LockedMode::Skip
    }
}

/// Configuration for one drawing session.
///
/// Each engine owns its own instance; there is no shared session singleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Display name of the loaded image or task source.
    pub image_name: String,
    /// Device coordinate of the grid origin.
    pub start_x: i64,
    pub start_y: i64,
    /// Pause between tasks, in milliseconds.
    pub delay_ms: u64,
    /// Locked-colour handling mode.
    pub locked_mode: LockedMode,
    /// Calibrated cell size in device pixels; `None` until calibrated.
    pub cell_width: Option<u32>,
    pub cell_height: Option<u32>,
    /// Persist a checkpoint every this many consumed tasks.
    pub autosave_every: usize,
}

impl SessionConfig {
    /// Effective cell size, defaulting to 1x1 when uncalibrated.
    pub fn effective_cell(&self) -> (u32, u32) {
        (self.cell_width.unwrap_or(1), self.cell_height.unwrap_or(1))
    }

    /// Whether a grid calibration has been applied.
    pub fn calibrated(&self) -> bool {
        self.cell_width.is_some() && self.cell_height.is_some()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            image_name: String::new(),
            start_x: 0,
            start_y: 0,
            delay_ms: default_delay_ms(),
            locked_mode: LockedMode::default(),
            cell_width: None,
            cell_height: None,
            autosave_every: default_autosave_every(),
        }
    }
}

/// Persistent per-project defaults, loaded from [`PROFILE_FILENAME`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub start_x: i64,
    pub start_y: i64,
    pub delay_ms: u64,
    pub mode: LockedMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_height: Option<u32>,
    pub autosave_every: usize,
    /// Directory backing the checkpoint store.
    pub store_dir: String,
    /// Output path for the simulated canvas PNG.
    pub out: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            start_x: 0,
            start_y: 0,
            delay_ms: default_delay_ms(),
            mode: LockedMode::default(),
            cell_width: None,
            cell_height: None,
            autosave_every: default_autosave_every(),
            store_dir: ".placer".to_string(),
            out: "canvas.png".to_string(),
        }
    }
}

impl Profile {
    /// Load a profile from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PlacerError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PlacerError::Parse {
            message: format!("Invalid profile: {}", e),
            help: Some(format!("Check the fields in {}", path.display())),
        })
    }

    /// Load the profile next to `dir`, falling back to defaults when absent.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(PROFILE_FILENAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the profile as YAML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).map_err(|e| PlacerError::Parse {
            message: format!("Failed to serialize profile: {}", e),
            help: None,
        })?;

        fs::write(path, yaml).map_err(|e| PlacerError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Turn the profile into a session configuration for a named source.
    pub fn to_config(&self, image_name: impl Into<String>) -> SessionConfig {
        SessionConfig {
            image_name: image_name.into(),
            start_x: self.start_x,
            start_y: self.start_y,
            delay_ms: self.delay_ms,
            locked_mode: self.mode,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            autosave_every: self.autosave_every,
        }
    }
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_autosave_every() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_effective_cell_defaults_to_unit() {
        let config = SessionConfig::default();
        assert!(!config.calibrated());
        assert_eq!(config.effective_cell(), (1, 1));
    }

    #[test]
    fn test_effective_cell_calibrated() {
        let config = SessionConfig {
            cell_width: Some(10),
            cell_height: Some(12),
            ..SessionConfig::default()
        };
        assert!(config.calibrated());
        assert_eq!(config.effective_cell(), (10, 12));
    }

    #[test]
    fn test_profile_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILENAME);

        let profile = Profile {
            start_x: 120,
            start_y: 300,
            delay_ms: 300,
            mode: LockedMode::Map,
            cell_width: Some(4),
            cell_height: Some(4),
            ..Profile::default()
        };
        profile.save(&path).unwrap();

        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_profile_load_or_default_missing() {
        let dir = tempdir().unwrap();
        let profile = Profile::load_or_default(dir.path()).unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_profile_partial_yaml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILENAME);
        std::fs::write(&path, "start_x: 50\nmode: manual\n").unwrap();

        let profile = Profile::load(&path).unwrap();
        assert_eq!(profile.start_x, 50);
        assert_eq!(profile.mode, LockedMode::Manual);
        assert_eq!(profile.delay_ms, 1000);
    }

    #[test]
    fn test_profile_rejects_unknown_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILENAME);
        std::fs::write(&path, "starting_x: 50\n").unwrap();

        assert!(Profile::load(&path).is_err());
    }

    #[test]
    fn test_to_config() {
        let profile = Profile {
            start_x: 7,
            delay_ms: 250,
            mode: LockedMode::Manual,
            ..Profile::default()
        };

        let config = profile.to_config("flag.png");
        assert_eq!(config.image_name, "flag.png");
        assert_eq!(config.start_x, 7);
        assert_eq!(config.delay_ms, 250);
        assert_eq!(config.locked_mode, LockedMode::Manual);
    }
}
