//! Result grid layout
//!
//! Each outcome bucket gets its own column block along the top of the screen.
//! Slots fill left to right, `grid_columns` per row.

use glam::Vec2;

use super::band::Outcome;
use crate::Tuning;

/// Left edge of an outcome's grid block
pub fn grid_base_x(outcome: Outcome) -> f32 {
    match outcome {
        Outcome::KeyCorrect => 0.0,
        Outcome::TrashIncorrect => 200.0,
        Outcome::KeyIncorrect => 700.0,
        Outcome::TrashCorrect => 900.0,
    }
}

/// Screen position of `slot` within an outcome's grid
pub fn slot_position(outcome: Outcome, slot: u32, tuning: &Tuning) -> Vec2 {
    let column = slot % tuning.grid_columns;
    let row = slot / tuning.grid_columns;
    Vec2::new(
        grid_base_x(outcome) + column as f32 * tuning.grid_column_spacing,
        tuning.grid_top + row as f32 * tuning.grid_row_spacing,
    )
}
