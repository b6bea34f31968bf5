//! Sorting bands
//!
//! Organize classifies each belt item by its x coordinate against a fixed set of
//! horizontal bands. The sort zone is half-open; the miss bands either side of it
//! are open intervals. Anything outside every band is left on the belt.

use serde::{Deserialize, Serialize};

use super::state::ItemKind;

/// A horizontal interval, open at the top and optionally closed at the bottom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f32,
    pub max: f32,
    pub min_inclusive: bool,
}

impl Band {
    /// `[min, max)`
    pub const fn half_open(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            min_inclusive: true,
        }
    }

    /// `(min, max)`
    pub const fn open(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            min_inclusive: false,
        }
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        let above_min = if self.min_inclusive {
            x >= self.min
        } else {
            x > self.min
        };
        above_min && x < self.max
    }
}

/// The sort zone in the middle of the belt: keys belong here, trash does not
pub const SORT_ZONE: Band = Band::half_open(500.0, 600.0);

/// Either side of the sort zone, for keys
pub const KEY_MISS_BANDS: [Band; 2] = [Band::open(400.0, 450.0), Band::open(650.0, 700.0)];

/// Either side of the sort zone, for trash (slightly wider than the key bands)
pub const TRASH_DISCARD_BANDS: [Band; 2] = [Band::open(400.0, 470.0), Band::open(650.0, 720.0)];

/// Result of sorting a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Key pulled in the sort zone
    KeyCorrect,
    /// Key pulled beside the sort zone
    KeyIncorrect,
    /// Trash discarded beside the sort zone
    TrashCorrect,
    /// Trash pulled in the sort zone
    TrashIncorrect,
}

impl Outcome {
    pub const COUNT: usize = 4;

    pub const ALL: [Outcome; Self::COUNT] = [
        Outcome::KeyCorrect,
        Outcome::KeyIncorrect,
        Outcome::TrashCorrect,
        Outcome::TrashIncorrect,
    ];

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Outcome::KeyCorrect => 0,
            Outcome::KeyIncorrect => 1,
            Outcome::TrashCorrect => 2,
            Outcome::TrashIncorrect => 3,
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::KeyCorrect | Outcome::TrashCorrect)
    }

    pub fn score_delta(&self) -> i32 {
        if self.is_correct() { 1 } else { -1 }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Outcome::KeyCorrect | Outcome::KeyIncorrect => ItemKind::Key,
            Outcome::TrashCorrect | Outcome::TrashIncorrect => ItemKind::Trash,
        }
    }
}

/// Classify an item at `x`. First matching band wins.
pub fn classify(kind: ItemKind, x: f32) -> Option<Outcome> {
    match kind {
        ItemKind::Key => {
            if SORT_ZONE.contains(x) {
                Some(Outcome::KeyCorrect)
            } else if KEY_MISS_BANDS.iter().any(|b| b.contains(x)) {
                Some(Outcome::KeyIncorrect)
            } else {
                None
            }
        }
        ItemKind::Trash => {
            if SORT_ZONE.contains(x) {
                Some(Outcome::TrashIncorrect)
            } else if TRASH_DISCARD_BANDS.iter().any(|b| b.contains(x)) {
                Some(Outcome::TrashCorrect)
            } else {
                None
            }
        }
    }
}
