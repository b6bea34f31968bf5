//! Conveyor Sort entry point
//!
//! On the web this exposes a `ConveyorGame` handle the presentation layer drives
//! from its frame and touch callbacks. Natively it runs a headless demo round.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use js_sys::Float32Array;
    use wasm_bindgen::prelude::*;

    use conveyor_sort::Tuning;
    use conveyor_sort::sim::{GamePhase, GameState, TickInput, tick};

    /// Game instance owned by the page
    #[wasm_bindgen]
    pub struct ConveyorGame {
        state: GameState,
        input: TickInput,
    }

    #[wasm_bindgen]
    impl ConveyorGame {
        #[wasm_bindgen(constructor)]
        pub fn new() -> ConveyorGame {
            // `load` only hands back validated tuning
            let state = GameState::new(Tuning::load()).unwrap_or_default();
            log::info!("Game created ({} fps)", state.tuning().fps);
            ConveyorGame {
                state,
                input: TickInput::default(),
            }
        }

        /// Replace the tuning from JSON, persist it and restart on the title screen.
        /// Returns false (and keeps the current game) if the JSON is rejected.
        pub fn set_tuning(&mut self, json: &str) -> bool {
            let state = Tuning::from_json(json).and_then(|tuning| {
                let state = GameState::new(tuning)?;
                state.tuning().save();
                Ok(state)
            });
            match state {
                Ok(state) => {
                    self.state = state;
                    self.input = TickInput {
                        idle_mode: self.input.idle_mode,
                        ..Default::default()
                    };
                    log::info!("Tuning applied, back to title");
                    true
                }
                Err(e) => {
                    log::warn!("Rejected tuning: {}", e);
                    false
                }
            }
        }

        /// Start button touched
        pub fn start(&mut self) {
            self.input.start = true;
        }

        /// Organize button touched
        pub fn organize(&mut self) {
            self.input.organize = true;
        }

        pub fn set_idle_mode(&mut self, idle: bool) {
            self.input.idle_mode = idle;
            log::info!("Idle mode: {}", idle);
        }

        /// Advance one frame. Returns the score change from organize, if any.
        pub fn tick(&mut self) -> i32 {
            let report = tick(&mut self.state, &self.input);

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.organize = false;

            report.map(|r| r.score_delta).unwrap_or(0)
        }

        pub fn score(&self) -> i32 {
            self.state.board.score
        }

        pub fn score_text(&self) -> String {
            self.state.board.label()
        }

        pub fn is_playing(&self) -> bool {
            self.state.phase == GamePhase::Playing
        }

        pub fn start_button_scale(&self) -> f32 {
            self.state.pulse.scale
        }

        /// `[x0, y0, x1, y1, ...]` in spawn order
        pub fn key_positions(&self) -> Float32Array {
            Float32Array::from(self.state.keys.positions_flat().as_slice())
        }

        /// `[x0, y0, x1, y1, ...]` in spawn order
        pub fn trash_positions(&self) -> Float32Array {
            Float32Array::from(self.state.trash.positions_flat().as_slice())
        }

        pub fn fps(&self) -> u32 {
            self.state.tuning().fps
        }
    }

    impl Default for ConveyorGame {
        fn default() -> Self {
            Self::new()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }
        log::info!("Conveyor Sort ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use conveyor_sort::sim::GameState;

    env_logger::init();
    log::info!("Conveyor Sort (native) starting...");
    log::info!("Native mode runs a headless demo round - serve the web build to play");

    // conveyor-sort [frames] [tuning.json]
    let mut args = std::env::args().skip(1);
    let (frames, tuning_path) = match args.next() {
        Some(arg) if arg.ends_with(".json") => (None, Some(arg)),
        Some(arg) => (parse_frames(&arg), args.next()),
        None => (None, None),
    };

    let tuning = tuning_path.map(|p| load_tuning(&p)).unwrap_or_default();
    let state = GameState::new(tuning).unwrap_or_else(|e| {
        log::warn!("Using default tuning: {}", e);
        GameState::default()
    });
    // One minute of play by default
    let frames = frames.unwrap_or(60 * state.tuning().fps as u64);

    run_demo(state, frames);
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_frames(arg: &str) -> Option<u64> {
    match arg.parse() {
        Ok(frames) => Some(frames),
        Err(_) => {
            log::warn!("Ignoring frame count {:?}, playing one minute", arg);
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> conveyor_sort::Tuning {
    conveyor_sort::Tuning::from_path(path).unwrap_or_else(|e| {
        log::warn!("Using default tuning, {}: {}", path, e);
        conveyor_sort::Tuning::default()
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn run_demo(mut state: conveyor_sort::sim::GameState, frames: u64) {
    use conveyor_sort::sim::{Outcome, TickInput, tick};

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    for _ in 0..frames {
        if let Some(report) = tick(&mut state, &input) {
            log::info!(
                "Frame {}: sorted {} ({:+}), score {}",
                state.frame,
                report.sorted.len(),
                report.score_delta,
                state.board.score
            );
        }
    }

    println!("Final score: {}", state.board.label());
    for outcome in Outcome::ALL {
        println!("  {:?}: {}", outcome, state.board.count(outcome));
    }
    println!(
        "  Still on belt: {} keys, {} trash",
        state.keys.unsorted_count(),
        state.trash.unsorted_count()
    );
}
