pub mod loader;
pub mod types;

pub use loader::{builtin_catalog, load_catalog, load_room};
pub use types::{Catalog, Item, Puzzle, PuzzleKind, Room, Theme};
