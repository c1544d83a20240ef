//! The game state machine.
//!
//! [`Game`] is owned by the host and is the only thing that moves a
//! [`GameState`] forward. Each method dispatches one [`Action`] through
//! [`reduce`]; nothing is shared between games.

pub mod actions;
pub mod discovery;
pub mod reducer;
pub mod state;

pub use actions::{Action, Missing, Outcome, Rejection};
pub use discovery::ItemFinder;
pub use reducer::{answer_matches, reduce, Transition};
pub use state::GameState;

use crate::config::GameConfig;
use crate::error::Result;
use crate::puzzle::{Catalog, Item};

#[derive(Debug, Clone)]
pub struct Game {
    initial: GameState,
    state: GameState,
}

impl Game {
    pub fn new(catalog: &Catalog, config: &GameConfig) -> Result<Self> {
        let initial = GameState::new(catalog, config)?;
        Ok(Self {
            state: initial.clone(),
            initial,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let current = std::mem::take(&mut self.state);
        let Transition { state, outcome } = reduce(current, action);
        self.state = state;
        outcome
    }

    pub fn start(&mut self) -> Outcome {
        self.dispatch(Action::Start)
    }

    pub fn collect_item(&mut self, item: Item) -> Outcome {
        self.dispatch(Action::CollectItem(item))
    }

    pub fn use_item(&mut self, item_id: &str, puzzle_id: &str) -> Outcome {
        self.dispatch(Action::UseItem {
            item_id: item_id.to_string(),
            puzzle_id: puzzle_id.to_string(),
        })
    }

    /// `true` only if the answer solved the puzzle.
    pub fn solve_puzzle(&mut self, room_id: &str, puzzle_id: &str, answer: &str) -> bool {
        self.dispatch(Action::SolvePuzzle {
            room_id: room_id.to_string(),
            puzzle_id: puzzle_id.to_string(),
            answer: answer.to_string(),
        }) == Outcome::Applied
    }

    pub fn change_room(&mut self, room_id: &str) -> Outcome {
        self.dispatch(Action::ChangeRoom(room_id.to_string()))
    }

    /// The hint text, or `None` when no hint was dispensed (and none was charged).
    pub fn use_hint(&mut self) -> Option<String> {
        match self.dispatch(Action::UseHint) {
            Outcome::HintRevealed(text) => Some(text),
            _ => None,
        }
    }

    pub fn tick_timer(&mut self) -> Outcome {
        self.dispatch(Action::TickTimer)
    }

    pub fn end_game(&mut self, won: bool) -> Outcome {
        self.dispatch(Action::EndGame { won })
    }

    /// Back to the snapshot the game was created from.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
    }

    /// Final score for a won game: 10 points per full minute left, minus 15 per hint.
    pub fn score(&self) -> Option<u32> {
        if !self.state.won {
            return None;
        }
        let time_bonus = (self.state.time_remaining / 60) * 10;
        let hint_penalty = self.state.hints_used.saturating_mul(15);
        Some((100 + time_bonus).saturating_sub(hint_penalty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::builtin_catalog;

    fn new_game() -> (Catalog, Game) {
        let catalog = builtin_catalog().unwrap();
        let game = Game::new(&catalog, &GameConfig::default()).unwrap();
        (catalog, game)
    }

    fn take(game: &mut Game, catalog: &Catalog, item_id: &str) {
        let item = catalog.item(item_id).unwrap().clone();
        assert_eq!(game.collect_item(item), Outcome::Applied);
    }

    #[test]
    fn echo_solves_riddle_book() {
        let (_, mut game) = new_game();
        assert!(game.solve_puzzle("mystery-room", "riddle-book", "Echo"));
        assert!(!game.solve_puzzle("mystery-room", "riddle-book", "Echo"));
        assert!(!game.state().is_room_complete("mystery-room"));
    }

    #[test]
    fn wrong_answer_returns_false() {
        let (_, mut game) = new_game();
        assert!(!game.solve_puzzle("mystery-room", "riddle-book", "wind"));
        assert!(!game.solve_puzzle("mystery-room", "keypad-puzzle", "1234"));
    }

    #[test]
    fn drawer_and_riddle_unlock_space_station() {
        let (catalog, mut game) = new_game();
        take(&mut game, &catalog, "key");
        assert_eq!(game.use_item("key", "locked-drawer"), Outcome::Applied);
        assert!(!game.state().holds("key"));
        assert!(game.solve_puzzle("mystery-room", "riddle-book", "echo"));
        assert!(game.state().is_reachable("sci-fi-room"));
        assert_eq!(game.change_room("sci-fi-room"), Outcome::Applied);
        assert_eq!(game.state().current_room().unwrap().name, "Abandoned Space Station");
    }

    #[test]
    fn hint_budget_is_enforced() {
        let config = GameConfig {
            max_hints: 2,
            ..GameConfig::default()
        };
        let mut game = Game::new(&builtin_catalog().unwrap(), &config).unwrap();
        assert!(game.use_hint().is_some());
        assert!(game.use_hint().is_some());
        assert_eq!(game.use_hint(), None);
        assert_eq!(game.state().hints_used, 2);
        assert_eq!(game.state().hints_remaining(), 0);
    }

    #[test]
    fn full_timer_runs_out_as_loss() {
        let (_, mut game) = new_game();
        game.start();
        for _ in 0..1800 {
            game.tick_timer();
        }
        let state = game.state();
        assert_eq!(state.time_remaining, 0);
        assert!(state.over);
        assert!(!state.won);
        assert_eq!(game.score(), None);
    }

    #[test]
    fn score_counts_minutes_and_hints() {
        let (_, mut game) = new_game();
        game.use_hint();
        for _ in 0..70 {
            game.tick_timer();
        }
        game.end_game(true);
        // 1730s left = 28 full minutes
        assert_eq!(game.score(), Some(100 + 280 - 15));
    }

    #[test]
    fn score_never_goes_negative() {
        let config = GameConfig {
            time_limit_secs: 30,
            max_hints: 10,
            ..GameConfig::default()
        };
        let mut game = Game::new(&builtin_catalog().unwrap(), &config).unwrap();
        for _ in 0..10 {
            game.use_hint();
        }
        game.end_game(true);
        assert_eq!(game.score(), Some(0));
    }

    #[test]
    fn reset_restores_initial_snapshot() {
        let (catalog, mut game) = new_game();
        let initial = game.state().clone();
        game.start();
        take(&mut game, &catalog, "key");
        game.use_item("key", "locked-drawer");
        game.tick_timer();
        game.reset();
        assert_eq!(game.state(), &initial);
    }

    #[test]
    fn games_are_independent() {
        let (_, mut a) = new_game();
        let (_, b) = new_game();
        a.solve_puzzle("mystery-room", "riddle-book", "echo");
        assert!(!b.state().is_puzzle_solved("riddle-book"));
        assert!(a.state().is_puzzle_solved("riddle-book"));
    }
}
