//! Game tuning
//!
//! Lane geometry, belt speeds and result grid layout. Persisted as JSON in
//! LocalStorage on the web; loaded from an optional file natively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a tuning could not be used
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} is {value}, at most {max} allowed")]
    TooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lanes ===
    /// Items spawned per lane
    pub lane_length: usize,
    /// Gap between consecutive spawns
    pub spawn_spacing: f32,
    /// Belt y coordinate
    pub travel_y: f32,
    /// Key lane speed (units per tick)
    pub key_speed: f32,
    /// Trash lane speed (units per tick)
    pub trash_speed: f32,

    // === Result grid ===
    pub grid_columns: u32,
    pub grid_column_spacing: f32,
    pub grid_row_spacing: f32,
    pub grid_top: f32,

    // === Presentation ===
    /// Frames per second the presentation layer should tick at
    pub fps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_length: LANE_LENGTH,
            spawn_spacing: SPAWN_SPACING,
            travel_y: TRAVEL_Y,
            key_speed: KEY_SPEED,
            trash_speed: TRASH_SPEED,

            grid_columns: GRID_COLUMNS,
            grid_column_spacing: GRID_COLUMN_SPACING,
            grid_row_spacing: GRID_ROW_SPACING,
            grid_top: GRID_TOP,

            fps: DEFAULT_FPS,
        }
    }
}

impl Tuning {
    /// Check every field is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_length == 0 {
            return Err(TuningError::Zero { field: "lane_length" });
        }
        if self.lane_length > MAX_LANE_LENGTH {
            return Err(TuningError::TooLarge {
                field: "lane_length",
                value: self.lane_length,
                max: MAX_LANE_LENGTH,
            });
        }
        if self.grid_columns == 0 {
            return Err(TuningError::Zero { field: "grid_columns" });
        }
        if self.fps == 0 {
            return Err(TuningError::Zero { field: "fps" });
        }

        let positive = [
            ("spawn_spacing", self.spawn_spacing),
            ("key_speed", self.key_speed),
            ("trash_speed", self.trash_speed),
            ("grid_column_spacing", self.grid_column_spacing),
            ("grid_row_spacing", self.grid_row_spacing),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        if !self.travel_y.is_finite() {
            return Err(TuningError::NotPositive {
                field: "travel_y",
                value: self.travel_y,
            });
        }
        if !self.grid_top.is_finite() {
            return Err(TuningError::NotPositive {
                field: "grid_top",
                value: self.grid_top,
            });
        }

        Ok(())
    }

    /// Parse and validate a tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a tuning file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "conveyor_sort_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Tuning saved");
                }
                Err(e) => log::warn!("Failed to serialize tuning: {}", e),
            }
        }
    }
}
