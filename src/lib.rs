//! Conveyor Sort - pull the keys out of the trash before the belt carries them off
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, sorting bands, scoring, result grid)
//! - `settings`: Data-driven tuning with validation and LocalStorage persistence
//!
//! Rendering, assets and input devices belong to the presentation layer. It calls
//! [`sim::tick`] once per frame and reads positions back out of [`sim::GameState`].

pub mod settings;
pub mod sim;

pub use settings::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Frame rate the presentation layer drives `tick` at
    pub const DEFAULT_FPS: u32 = 15;

    /// Items spawned per lane
    pub const LANE_LENGTH: usize = 20;
    /// Upper bound accepted from tuning files
    pub const MAX_LANE_LENGTH: usize = 1000;
    /// Horizontal gap between consecutive spawns (item i starts at -i * spacing)
    pub const SPAWN_SPACING: f32 = 500.0;
    /// Belt y coordinate; items only move while they sit on it
    pub const TRAVEL_Y: f32 = 350.0;

    /// Per-tick belt speeds
    pub const KEY_SPEED: f32 = 12.0;
    pub const TRASH_SPEED: f32 = 11.0;

    /// Result grid layout
    pub const GRID_COLUMNS: u32 = 5;
    pub const GRID_COLUMN_SPACING: f32 = 40.0;
    pub const GRID_ROW_SPACING: f32 = 70.0;
    pub const GRID_TOP: f32 = 100.0;

    /// Start button pulse animation
    pub const PULSE_STEP: f32 = 0.1;
    pub const PULSE_MAX_SCALE: f32 = 2.0;
    pub const PULSE_MIN_SCALE: f32 = 0.9;
}
