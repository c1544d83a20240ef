//! Actions for the game state machine and what became of them.

use crate::puzzle::Item;

/// Everything a player (or the clock) can do to a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    CollectItem(Item),
    /// Apply a held item to a puzzle in the current room.
    UseItem {
        item_id: String,
        puzzle_id: String,
    },
    /// Submit a typed answer.
    SolvePuzzle {
        room_id: String,
        puzzle_id: String,
        answer: String,
    },
    ChangeRoom(String),
    UseHint,
    /// One unit of time elapsed. Sent by the host clock, not the player.
    TickTimer,
    EndGame {
        won: bool,
    },
}

/// Result of applying an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    HintRevealed(String),
    NotFound(Missing),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied | Outcome::HintRevealed(_))
    }
}

/// Which identifier failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Room(String),
    Puzzle(String),
    Item(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadyStarted,
    AlreadyHeld,
    AlreadySolved,
    WrongAnswer,
    WrongItem,
    /// A typed answer was sent to a puzzle that only opens with an item.
    NeedsItem,
    /// An item was applied to a puzzle that wants a typed answer.
    NeedsAnswer,
    NoHintsLeft,
    /// Hint asked for in a room with nothing left to solve.
    RoomComplete,
    GameOver,
}

impl Rejection {
    /// Player-facing explanation.
    pub fn message(self) -> &'static str {
        match self {
            Rejection::AlreadyStarted => "The game is already under way.",
            Rejection::AlreadyHeld => "You already have that.",
            Rejection::AlreadySolved => "That puzzle is already solved.",
            Rejection::WrongAnswer => "That's not the correct answer. Try again!",
            Rejection::WrongItem => "Nothing happens.",
            Rejection::NeedsItem => "This requires a specific item to unlock.",
            Rejection::NeedsAnswer => "That puzzle needs an answer, not an item.",
            Rejection::NoHintsLeft => {
                "No more hints available! Try to solve the puzzle on your own."
            }
            Rejection::RoomComplete => "Nothing left to solve here.",
            Rejection::GameOver => "The game is over.",
        }
    }
}
