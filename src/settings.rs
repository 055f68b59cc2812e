//! Game settings
//!
//! Loaded from a JSON file; every field is optional and falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors that can occur when loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read
    #[error("Failed to read settings '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON did not match the settings layout
    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Timing ===
    /// Longest delta a single tick may consume (seconds)
    pub max_frame_dt: f32,

    /// Fixed RNG seed for reproducible runs (random when absent)
    pub seed: Option<u64>,

    // === Cosmetics ===
    /// Emit cosmetic effect events for the frontend
    pub effects: bool,
    /// Most effect events queued between drains
    pub max_effects: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            max_frame_dt: MAX_FRAME_DT,
            seed: None,
            effects: true,
            max_effects: 256,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Delta clamp that is always usable, even from a bad config
    pub fn effective_max_frame_dt(&self) -> f32 {
        if self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0 {
            self.max_frame_dt
        } else {
            MAX_FRAME_DT
        }
    }

    /// Effective effect queue cap
    pub fn max_effects(&self) -> usize {
        if !self.effects { 0 } else { self.max_effects }
    }
}
