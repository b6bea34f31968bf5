//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per presentation frame
//! - Stable iteration order (keys before trash, spawn order within a lane)
//! - No rendering or platform dependencies

pub mod band;
pub mod grid;
pub mod state;
pub mod tick;

pub use band::{Band, KEY_MISS_BANDS, Outcome, SORT_ZONE, TRASH_DISCARD_BANDS, classify};
pub use grid::{grid_base_x, slot_position};
pub use state::{
    GamePhase, GameState, ItemKind, Lane, MovingItem, Scoreboard, SortedSlot, StartPulse,
};
pub use tick::{OrganizeReport, SortEvent, TickInput, advance_lanes, organize, tick};
