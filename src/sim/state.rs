//! Game state and core simulation types
//!
//! Everything the presentation layer needs to draw a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::band::Outcome;
use crate::{Tuning, TuningError};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, start button pulsing
    Title,
    /// Belt running
    Playing,
}

/// What rides in a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Key,
    Trash,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Key => "key",
            ItemKind::Trash => "trash",
        }
    }

    /// Belt speed for this lane (units per tick)
    pub fn speed(&self, tuning: &Tuning) -> f32 {
        match self {
            ItemKind::Key => tuning.key_speed,
            ItemKind::Trash => tuning.trash_speed,
        }
    }
}

/// Where a sorted item ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortedSlot {
    pub outcome: Outcome,
    /// Index within the outcome's result grid
    pub slot: u32,
}

/// A key or piece of trash on the belt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingItem {
    /// Spawn index within its lane
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec2,
    /// Set once organize has placed this item; it never moves again
    pub sorted: Option<SortedSlot>,
}

impl MovingItem {
    pub fn new(id: u32, kind: ItemKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            sorted: None,
        }
    }

    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted.is_some()
    }

    /// Still riding the belt (unsorted and not diverted off the travel line)
    #[inline]
    pub fn on_belt(&self, travel_y: f32) -> bool {
        !self.is_sorted() && self.pos.y == travel_y
    }
}

/// One fixed-length lane, in spawn order. Empty until the round starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub items: Vec<MovingItem>,
}

impl Lane {
    /// Spawn a full lane; item i starts `i * spawn_spacing` left of the origin
    pub fn spawn(kind: ItemKind, tuning: &Tuning) -> Self {
        let items = (0..tuning.lane_length)
            .map(|i| {
                let x = -(i as f32) * tuning.spawn_spacing;
                MovingItem::new(i as u32, kind, Vec2::new(x, tuning.travel_y))
            })
            .collect();
        Self { items }
    }

    /// Move every item still on the belt by one tick
    pub fn advance(&mut self, speed: f32, travel_y: f32) {
        for item in self.items.iter_mut().filter(|i| i.on_belt(travel_y)) {
            item.pos.x += speed;
        }
    }

    pub fn unsorted_count(&self) -> usize {
        self.items.iter().filter(|i| !i.is_sorted()).count()
    }

    /// Flat `[x0, y0, x1, y1, ...]` for the presentation layer
    pub fn positions_flat(&self) -> Vec<f32> {
        self.items
            .iter()
            .flat_map(|i| [i.pos.x, i.pos.y])
            .collect()
    }
}

/// Score plus one slot counter per outcome bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: i32,
    /// Indexed by `Outcome::index`
    counters: [u32; Outcome::COUNT],
}

impl Scoreboard {
    /// Apply an outcome and claim the next slot in its bucket
    pub fn record(&mut self, outcome: Outcome) -> u32 {
        self.score += outcome.score_delta();
        let counter = &mut self.counters[outcome.index()];
        let slot = *counter;
        *counter += 1;
        slot
    }

    /// Items sorted into this bucket so far
    pub fn count(&self, outcome: Outcome) -> u32 {
        self.counters[outcome.index()]
    }

    /// Text for the score label
    pub fn label(&self) -> String {
        self.score.to_string()
    }
}

/// Start button scale animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPulse {
    pub scale: f32,
    pub growing: bool,
}

impl Default for StartPulse {
    fn default() -> Self {
        Self {
            scale: 1.0,
            growing: true,
        }
    }
}

impl StartPulse {
    /// Step one frame, bouncing between the min and max scale
    pub fn advance(&mut self) {
        if self.growing {
            self.scale += PULSE_STEP;
        } else {
            self.scale -= PULSE_STEP;
        }

        if self.scale > PULSE_MAX_SCALE {
            self.growing = false;
        } else if self.scale < PULSE_MIN_SCALE {
            self.growing = true;
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Validated at construction; read through `tuning()` outside the simulation
    pub(super) tuning: Tuning,
    pub phase: GamePhase,
    pub pulse: StartPulse,
    pub keys: Lane,
    pub trash: Lane,
    pub board: Scoreboard,
    /// Simulation tick counter
    pub frame: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_tuning(Tuning::default())
    }
}

impl GameState {
    /// Title screen state; lanes are spawned by `start`
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::with_tuning(tuning))
    }

    fn with_tuning(tuning: Tuning) -> Self {
        Self {
            tuning,
            phase: GamePhase::Title,
            pulse: StartPulse::default(),
            keys: Lane::default(),
            trash: Lane::default(),
            board: Scoreboard::default(),
            frame: 0,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Leave the title screen and put both lanes on the belt
    pub fn start(&mut self) {
        if self.phase != GamePhase::Title {
            return;
        }
        self.keys = Lane::spawn(ItemKind::Key, &self.tuning);
        self.trash = Lane::spawn(ItemKind::Trash, &self.tuning);
        self.phase = GamePhase::Playing;
        log::info!(
            "Round started: {} items per lane",
            self.tuning.lane_length
        );
    }

    /// Iterate both lanes, keys first
    pub fn items(&self) -> impl Iterator<Item = &MovingItem> {
        self.keys.items.iter().chain(self.trash.items.iter())
    }
}
