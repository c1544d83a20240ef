//! The canonical game state and the read-only queries a front-end needs.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::puzzle::{Catalog, Item, Room};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub current_room: String,
    /// Held items, in pickup order. Never holds two items with the same id.
    pub inventory: Vec<Item>,
    /// Keys are fixed at creation; only puzzle and lock flags change.
    pub rooms: BTreeMap<String, Room>,
    pub time_remaining: u32,
    pub hints_used: u32,
    pub max_hints: u32,
    pub started: bool,
    pub over: bool,
    pub won: bool,
    /// Room the game started in, for walking the `next_room` chain.
    pub initial_room: String,
}

impl GameState {
    pub fn new(catalog: &Catalog, config: &GameConfig) -> Result<Self> {
        let rooms: BTreeMap<String, Room> = catalog
            .rooms
            .iter()
            .map(|room| (room.id.clone(), room.clone()))
            .collect();

        config.validate()?;
        match rooms.get(&config.initial_room) {
            None => return Err(GameError::UnknownRoom(config.initial_room.clone())),
            Some(room) if room.locked => {
                return Err(GameError::LockedInitialRoom(config.initial_room.clone()))
            }
            Some(_) => {}
        }

        Ok(Self {
            current_room: config.initial_room.clone(),
            inventory: Vec::new(),
            rooms,
            time_remaining: config.time_limit_secs,
            hints_used: 0,
            max_hints: config.max_hints,
            started: false,
            over: false,
            won: false,
            initial_room: config.initial_room.clone(),
        })
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.rooms.get(&self.current_room)
    }

    pub fn is_room_complete(&self, room_id: &str) -> bool {
        self.room(room_id).is_some_and(Room::all_solved)
    }

    pub fn is_reachable(&self, room_id: &str) -> bool {
        self.room(room_id).is_some_and(|room| !room.locked)
    }

    pub fn hints_remaining(&self) -> u32 {
        self.max_hints.saturating_sub(self.hints_used)
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|item| item.id == item_id)
    }

    /// True between `start` and the end of the game: the window in which the clock ticks.
    pub fn is_running(&self) -> bool {
        self.started && !self.over
    }

    pub fn is_puzzle_solved(&self, puzzle_id: &str) -> bool {
        self.rooms
            .values()
            .flat_map(|room| room.puzzles.iter())
            .any(|puzzle| puzzle.id == puzzle_id && puzzle.solved)
    }

    /// Rooms in play order, following `next_room` from the starting room.
    pub fn room_order(&self) -> Vec<&Room> {
        let mut order: Vec<&Room> = Vec::new();
        let mut next = Some(self.initial_room.as_str());
        while let Some(id) = next {
            let Some(room) = self.room(id) else { break };
            if order.iter().any(|seen| seen.id == room.id) {
                break;
            }
            order.push(room);
            next = room.next_room.as_deref();
        }
        order
    }
}
