//! Fixed timestep simulation tick
//!
//! One call per presentation frame. Organize runs against the positions the
//! player saw, then the belt advances.

use glam::Vec2;

use super::band::{Outcome, classify};
use super::grid::slot_position;
use super::state::{GamePhase, GameState, ItemKind, Lane, Scoreboard, SortedSlot};
use crate::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start button tapped
    pub start: bool,
    /// Organize button tapped
    pub organize: bool,
    /// Idle/demo mode - the simulation plays itself
    pub idle_mode: bool,
}

/// One item placed by organize
#[derive(Debug, Clone, PartialEq)]
pub struct SortEvent {
    pub kind: ItemKind,
    pub id: u32,
    pub outcome: Outcome,
    pub slot: u32,
    pub pos: Vec2,
}

/// Everything a single organize call committed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizeReport {
    pub sorted: Vec<SortEvent>,
    pub score_delta: i32,
}

impl OrganizeReport {
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

/// Advance the game state by one frame.
///
/// Returns the organize report when organize ran this frame.
pub fn tick(state: &mut GameState, input: &TickInput) -> Option<OrganizeReport> {
    state.frame += 1;

    match state.phase {
        GamePhase::Title => {
            state.pulse.advance();
            if input.start || input.idle_mode {
                state.start();
            }
            None
        }
        GamePhase::Playing => {
            let wants_organize = input.organize || (input.idle_mode && idle_wants_organize(state));
            let report = wants_organize.then(|| organize(state));

            advance_lanes(state);

            report
        }
    }
}

/// Move every item still on the belt by its lane speed
pub fn advance_lanes(state: &mut GameState) {
    let tuning = &state.tuning;
    state
        .keys
        .advance(ItemKind::Key.speed(tuning), tuning.travel_y);
    state
        .trash
        .advance(ItemKind::Trash.speed(tuning), tuning.travel_y);
}

/// Sort every item on the belt that sits in a band. Keys first, then trash.
///
/// Sorted items are skipped, so calling this again without a tick in between
/// changes nothing.
pub fn organize(state: &mut GameState) -> OrganizeReport {
    if state.phase != GamePhase::Playing {
        return OrganizeReport::default();
    }

    let mut report = OrganizeReport::default();
    sort_lane(&mut state.keys, &mut state.board, &state.tuning, &mut report);
    sort_lane(&mut state.trash, &mut state.board, &state.tuning, &mut report);

    if !report.is_empty() {
        log::debug!(
            "Organized {} items ({:+}), score {}",
            report.sorted.len(),
            report.score_delta,
            state.board.score
        );
    }
    report
}

/// Classify and place the items of one lane, recording outcomes on the board
pub fn sort_lane(
    lane: &mut Lane,
    board: &mut Scoreboard,
    tuning: &Tuning,
    report: &mut OrganizeReport,
) {
    for item in lane.items.iter_mut().filter(|i| i.on_belt(tuning.travel_y)) {
        let Some(outcome) = classify(item.kind, item.pos.x) else {
            continue;
        };

        let slot = board.record(outcome);
        item.pos = slot_position(outcome, slot, tuning);
        item.sorted = Some(SortedSlot { outcome, slot });
        report.score_delta += outcome.score_delta();

        log::debug!(
            "{} #{} -> {:?} slot {}",
            item.kind.as_str(),
            item.id,
            outcome,
            slot
        );
        report.sorted.push(SortEvent {
            kind: item.kind,
            id: item.id,
            outcome,
            slot,
            pos: item.pos,
        });
    }
}

/// Demo policy: organize when something is in a correct band and nothing is in
/// a wrong one
pub fn idle_wants_organize(state: &GameState) -> bool {
    let travel_y = state.tuning.travel_y;
    let mut any_correct = false;
    for item in state.items().filter(|i| i.on_belt(travel_y)) {
        match classify(item.kind, item.pos.x) {
            Some(outcome) if outcome.is_correct() => any_correct = true,
            Some(_) => return false,
            None => {}
        }
    }
    any_correct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn playing() -> GameState {
        let mut state = GameState::default();
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    fn run(state: &mut GameState, ticks: u32) {
        for _ in 0..ticks {
            tick(state, &TickInput::default());
        }
    }

    #[test]
    fn test_title_to_playing() {
        let mut state = GameState::default();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Title);
        assert!((state.pulse.scale - 1.1).abs() < 1e-5);

        let state = playing();
        assert_eq!(state.keys.items.len(), LANE_LENGTH);
        assert_eq!(state.trash.items.len(), LANE_LENGTH);
        // Start frame does not move the belt
        assert_eq!(state.keys.items[0].pos.x, 0.0);
    }

    #[test]
    fn test_organize_before_start_is_noop() {
        let mut state = GameState::default();
        let report = tick(
            &mut state,
            &TickInput {
                organize: true,
                ..Default::default()
            },
        );
        assert!(report.is_none());
        assert!(organize(&mut state).is_empty());
        assert_eq!(state.board.score, 0);
    }

    #[test]
    fn test_key_after_42_ticks_scores() {
        let mut state = playing();
        run(&mut state, 42);
        assert_eq!(state.keys.items[0].pos.x, 504.0);

        let report = organize(&mut state);
        assert_eq!(state.board.count(Outcome::KeyCorrect), 1);
        assert!(state.keys.items[0].is_sorted());
        // Trash 0 sits at 462, inside its discard band, for the other point
        assert_eq!(state.trash.items[0].pos.x, 900.0);
        assert_eq!(state.board.score, 2);
        assert_eq!(state.keys.items[0].pos, Vec2::new(0.0, 100.0));
        assert!(report.sorted.iter().any(|e| e.kind == ItemKind::Key
            && e.id == 0
            && e.outcome == Outcome::KeyCorrect));
    }

    #[test]
    fn test_trash_after_43_ticks_untouched() {
        let mut state = playing();
        run(&mut state, 43);
        assert_eq!(state.trash.items[0].pos.x, 473.0);

        let before = state.board.clone();
        let report = organize(&mut state);
        assert!(!state.trash.items[0].is_sorted());
        assert!(report.sorted.iter().all(|e| e.kind != ItemKind::Trash));
        // Key 0 is at 516 and still scores; the trash contributes nothing
        assert_eq!(state.board.score, before.score + report.score_delta);
        assert_eq!(state.board.count(Outcome::TrashCorrect), 0);
        assert_eq!(state.board.count(Outcome::TrashIncorrect), 0);
    }

    #[test]
    fn test_trash_in_sort_zone_loses_point() {
        let mut state = playing();
        state.trash.items[2].pos.x = 550.0;
        let report = organize(&mut state);
        assert_eq!(report.score_delta, -1);
        assert_eq!(state.board.score, -1);
        assert_eq!(
            state.trash.items[2].sorted,
            Some(SortedSlot {
                outcome: Outcome::TrashIncorrect,
                slot: 0
            })
        );
        assert_eq!(state.trash.items[2].pos, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_organize_twice_same_score() {
        let mut state = playing();
        run(&mut state, 42);
        organize(&mut state);
        let once = state.board.clone();
        let second = organize(&mut state);
        assert!(second.is_empty());
        assert_eq!(state.board, once);
    }

    #[test]
    fn test_sorted_items_never_move() {
        let mut state = playing();
        run(&mut state, 42);
        organize(&mut state);
        let pinned = state.keys.items[0].pos;
        run(&mut state, 200);
        assert_eq!(state.keys.items[0].pos, pinned);
    }

    #[test]
    fn test_grid_on_travel_line_stays_put() {
        let tuning = Tuning {
            grid_top: TRAVEL_Y,
            ..Default::default()
        };
        let mut state = GameState::new(tuning).unwrap();
        state.start();
        state.keys.items[0].pos.x = 550.0;
        organize(&mut state);

        // Row 0 lands back on the belt line, but the item is sorted
        let pinned = Vec2::new(0.0, TRAVEL_Y);
        assert_eq!(state.keys.items[0].pos, pinned);
        run(&mut state, 50);
        assert_eq!(state.keys.items[0].pos, pinned);

        let report = organize(&mut state);
        assert!(!report.sorted.iter().any(|e| e.kind == ItemKind::Key && e.id == 0));
        assert_eq!(state.board.count(Outcome::KeyCorrect), 1);
    }

    #[test]
    fn test_key_miss_band_uses_key_grid() {
        let mut state = playing();
        state.keys.items[0].pos.x = 425.0;
        state.keys.items[1].pos.x = 675.0;
        let report = organize(&mut state);
        assert_eq!(report.score_delta, -2);
        assert_eq!(state.keys.items[0].pos, Vec2::new(700.0, 100.0));
        assert_eq!(state.keys.items[1].pos, Vec2::new(740.0, 100.0));
    }

    #[test]
    fn test_idle_mode_plays_without_losing() {
        let mut state = GameState::default();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut lowest = 0;
        for _ in 0..2000 {
            tick(&mut state, &input);
            lowest = lowest.min(state.board.score);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.board.score > 0);
        assert_eq!(lowest, 0);
    }

    #[test]
    fn test_idle_policy_holds_on_wrong_band() {
        let mut state = playing();
        state.keys.items[0].pos.x = 550.0;
        assert!(idle_wants_organize(&state));
        state.trash.items[0].pos.x = 560.0;
        assert!(!idle_wants_organize(&state));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn scattered(key_xs: &[f32], trash_xs: &[f32]) -> GameState {
            let mut state = playing();
            for (item, &x) in state.keys.items.iter_mut().zip(key_xs) {
                item.pos.x = x;
            }
            for (item, &x) in state.trash.items.iter_mut().zip(trash_xs) {
                item.pos.x = x;
            }
            state
        }

        proptest! {
            #[test]
            fn organize_is_idempotent(
                key_xs in prop::collection::vec(300.0f32..800.0, LANE_LENGTH),
                trash_xs in prop::collection::vec(300.0f32..800.0, LANE_LENGTH),
            ) {
                let mut state = scattered(&key_xs, &trash_xs);
                organize(&mut state);
                let once = state.board.clone();
                organize(&mut state);
                prop_assert_eq!(state.board, once);
            }

            #[test]
            fn slots_are_unique_per_bucket(
                rounds in prop::collection::vec(
                    (prop::collection::vec(300.0f32..800.0, LANE_LENGTH),
                     prop::collection::vec(300.0f32..800.0, LANE_LENGTH)),
                    1..4,
                ),
            ) {
                let mut state = playing();
                for (key_xs, trash_xs) in &rounds {
                    for (item, &x) in state.keys.items.iter_mut().zip(key_xs) {
                        if !item.is_sorted() {
                            item.pos.x = x;
                        }
                    }
                    for (item, &x) in state.trash.items.iter_mut().zip(trash_xs) {
                        if !item.is_sorted() {
                            item.pos.x = x;
                        }
                    }
                    organize(&mut state);
                }

                let mut seen = std::collections::HashSet::new();
                for item in state.items() {
                    if let Some(slot) = item.sorted {
                        prop_assert!(seen.insert((slot.outcome, slot.slot)));
                    }
                }
                for outcome in Outcome::ALL {
                    let n = seen.iter().filter(|(o, _)| *o == outcome).count() as u32;
                    prop_assert_eq!(n, state.board.count(outcome));
                }
            }

            #[test]
            fn score_matches_outcomes(
                key_xs in prop::collection::vec(300.0f32..800.0, LANE_LENGTH),
                trash_xs in prop::collection::vec(300.0f32..800.0, LANE_LENGTH),
            ) {
                let mut state = scattered(&key_xs, &trash_xs);
                let report = organize(&mut state);
                let correct = report.sorted.iter().filter(|e| e.outcome.is_correct()).count() as i32;
                let wrong = report.sorted.len() as i32 - correct;
                prop_assert_eq!(state.board.score, correct - wrong);
                prop_assert_eq!(report.score_delta, state.board.score);
            }

            #[test]
            fn tick_moves_only_belt_items(
                ticks in 0u32..120,
                organize_at in 0u32..120,
            ) {
                let mut state = playing();
                for t in 0..ticks {
                    let before: Vec<_> = state.items().cloned().collect();
                    let input = TickInput { organize: t == organize_at, ..Default::default() };
                    tick(&mut state, &input);
                    for (old, new) in before.iter().zip(state.items()) {
                        if old.is_sorted() {
                            prop_assert_eq!(old.pos, new.pos);
                        } else if !new.is_sorted() {
                            let speed = old.kind.speed(&state.tuning);
                            prop_assert_eq!(new.pos.x, old.pos.x + speed);
                            prop_assert_eq!(new.pos.y, TRAVEL_Y);
                        }
                    }
                }
            }
        }
    }
}
