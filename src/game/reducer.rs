//! Pure reducer for game state transitions
//!
//! `reduce` takes ownership of the current state and returns the next one
//! together with an [`Outcome`]. It performs no I/O apart from `tracing`
//! diagnostics, and a state handed back with anything other than
//! `Outcome::Applied` / `Outcome::HintRevealed` is exactly the input state.

use tracing::{debug, info, warn};

use super::actions::{Action, Missing, Outcome, Rejection};
use super::state::GameState;
use crate::puzzle::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub outcome: Outcome,
}

impl Transition {
    fn applied(state: GameState) -> Self {
        Self {
            state,
            outcome: Outcome::Applied,
        }
    }

    fn unchanged(state: GameState, outcome: Outcome) -> Self {
        match &outcome {
            Outcome::NotFound(missing) => warn!(?missing, "unknown identifier, action ignored"),
            Outcome::Rejected(reason) => debug!(?reason, "action rejected"),
            Outcome::Applied | Outcome::HintRevealed(_) => {}
        }
        Self { state, outcome }
    }

    fn rejected(state: GameState, reason: Rejection) -> Self {
        Self::unchanged(state, Outcome::Rejected(reason))
    }
}

pub fn reduce(state: GameState, action: Action) -> Transition {
    if state.over {
        return Transition::rejected(state, Rejection::GameOver);
    }

    match action {
        Action::Start => start(state),
        Action::CollectItem(item) => collect_item(state, item),
        Action::UseItem { item_id, puzzle_id } => use_item(state, &item_id, &puzzle_id),
        Action::SolvePuzzle {
            room_id,
            puzzle_id,
            answer,
        } => solve_puzzle(state, &room_id, &puzzle_id, &answer),
        Action::ChangeRoom(room_id) => change_room(state, room_id),
        Action::UseHint => use_hint(state),
        Action::TickTimer => tick_timer(state),
        Action::EndGame { won } => end_game(state, won),
    }
}

fn start(mut state: GameState) -> Transition {
    if state.started {
        return Transition::rejected(state, Rejection::AlreadyStarted);
    }
    state.started = true;
    info!(room = %state.current_room, time = state.time_remaining, "game started");
    Transition::applied(state)
}

fn collect_item(mut state: GameState, item: Item) -> Transition {
    if state.holds(&item.id) {
        return Transition::rejected(state, Rejection::AlreadyHeld);
    }
    debug!(item = %item.id, "item collected");
    state.inventory.push(item);
    Transition::applied(state)
}

/// Finds the puzzle an item is applied to, or says why the item does nothing.
fn check_item(state: &GameState, item_id: &str, puzzle_id: &str) -> Result<usize, Outcome> {
    let room = state
        .current_room()
        .ok_or_else(|| Outcome::NotFound(Missing::Room(state.current_room.clone())))?;
    let index = room
        .puzzles
        .iter()
        .position(|p| p.id == puzzle_id)
        .ok_or_else(|| Outcome::NotFound(Missing::Puzzle(puzzle_id.to_string())))?;
    if !state.holds(item_id) {
        return Err(Outcome::NotFound(Missing::Item(item_id.to_string())));
    }

    let puzzle = &room.puzzles[index];
    if puzzle.solved {
        return Err(Outcome::Rejected(Rejection::AlreadySolved));
    }
    if puzzle.kind.takes_answer() {
        return Err(Outcome::Rejected(Rejection::NeedsAnswer));
    }
    if puzzle.solution != item_id {
        return Err(Outcome::Rejected(Rejection::WrongItem));
    }
    Ok(index)
}

fn use_item(mut state: GameState, item_id: &str, puzzle_id: &str) -> Transition {
    let index = match check_item(&state, item_id, puzzle_id) {
        Ok(index) => index,
        Err(outcome) => return Transition::unchanged(state, outcome),
    };

    let room_id = state.current_room.clone();
    if let Some(room) = state.rooms.get_mut(&room_id) {
        room.puzzles[index].solved = true;
    }
    if let Some(pos) = state.inventory.iter().position(|i| i.id == item_id) {
        state.inventory.remove(pos);
    }
    debug!(item = item_id, puzzle = puzzle_id, "item used");

    complete_room(&mut state, &room_id);
    Transition::applied(state)
}

/// Answers match ignoring case and surrounding whitespace, nothing else.
pub fn answer_matches(answer: &str, solution: &str) -> bool {
    answer.trim().to_lowercase() == solution.trim().to_lowercase()
}

fn check_answer(
    state: &GameState,
    room_id: &str,
    puzzle_id: &str,
    answer: &str,
) -> Result<usize, Outcome> {
    let room = state
        .room(room_id)
        .ok_or_else(|| Outcome::NotFound(Missing::Room(room_id.to_string())))?;
    let index = room
        .puzzles
        .iter()
        .position(|p| p.id == puzzle_id)
        .ok_or_else(|| Outcome::NotFound(Missing::Puzzle(puzzle_id.to_string())))?;

    let puzzle = &room.puzzles[index];
    if puzzle.solved {
        return Err(Outcome::Rejected(Rejection::AlreadySolved));
    }
    if !puzzle.kind.takes_answer() {
        return Err(Outcome::Rejected(Rejection::NeedsItem));
    }
    if !answer_matches(answer, &puzzle.solution) {
        return Err(Outcome::Rejected(Rejection::WrongAnswer));
    }
    Ok(index)
}

fn solve_puzzle(mut state: GameState, room_id: &str, puzzle_id: &str, answer: &str) -> Transition {
    let index = match check_answer(&state, room_id, puzzle_id, answer) {
        Ok(index) => index,
        Err(outcome) => return Transition::unchanged(state, outcome),
    };

    if let Some(room) = state.rooms.get_mut(room_id) {
        room.puzzles[index].solved = true;
    }
    debug!(room = room_id, puzzle = puzzle_id, "puzzle solved");

    complete_room(&mut state, room_id);
    Transition::applied(state)
}

/// Once every puzzle in `room_id` is solved, open its successor, or end the
/// game as won if it has none. `won` and `over` are always set together.
fn complete_room(state: &mut GameState, room_id: &str) {
    let next = match state.room(room_id) {
        Some(room) if room.all_solved() => room.next_room.clone(),
        _ => return,
    };

    match next {
        Some(next_id) => {
            if let Some(next_room) = state.rooms.get_mut(&next_id) {
                if next_room.locked {
                    next_room.locked = false;
                    info!(from = room_id, room = %next_id, "room unlocked");
                }
            }
        }
        None => {
            state.won = true;
            state.over = true;
            info!(
                room = room_id,
                time_remaining = state.time_remaining,
                hints_used = state.hints_used,
                "final room cleared, game won"
            );
        }
    }
}

fn change_room(mut state: GameState, room_id: String) -> Transition {
    let locked = match state.room(&room_id) {
        Some(room) => room.locked,
        None => return Transition::unchanged(state, Outcome::NotFound(Missing::Room(room_id))),
    };
    if locked {
        // Callers gate navigation on `locked`; this only traces it.
        debug!(room = %room_id, "entering a locked room");
    }
    state.current_room = room_id;
    Transition::applied(state)
}

fn use_hint(mut state: GameState) -> Transition {
    if state.hints_used >= state.max_hints {
        return Transition::rejected(state, Rejection::NoHintsLeft);
    }

    let hint = match state.current_room() {
        None => Err(Outcome::NotFound(Missing::Room(state.current_room.clone()))),
        Some(room) => room
            .first_unsolved()
            .map(|puzzle| puzzle.hint.clone())
            .ok_or(Outcome::Rejected(Rejection::RoomComplete)),
    };

    match hint {
        Ok(text) => {
            state.hints_used += 1;
            debug!(used = state.hints_used, max = state.max_hints, "hint revealed");
            Transition {
                state,
                outcome: Outcome::HintRevealed(text),
            }
        }
        Err(outcome) => Transition::unchanged(state, outcome),
    }
}

fn tick_timer(mut state: GameState) -> Transition {
    state.time_remaining = state.time_remaining.saturating_sub(1);
    if state.time_remaining == 0 {
        state.over = true;
        state.won = false;
        info!(hints_used = state.hints_used, "time expired, game lost");
    }
    Transition::applied(state)
}

fn end_game(mut state: GameState, won: bool) -> Transition {
    state.over = true;
    state.won = won;
    info!(won, "game ended");
    Transition::applied(state)
}
