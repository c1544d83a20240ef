use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(default = "default_usable")]
    pub usable: bool,
    /// Puzzle this item is meant to be applied to.
    #[serde(default)]
    pub used_on: Option<String>,
}

fn default_usable() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PuzzleKind {
    Riddle,
    Pattern,
    Combination,
    /// Solved by applying an inventory item, never by a typed answer.
    Item,
}

impl PuzzleKind {
    pub fn takes_answer(self) -> bool {
        !matches!(self, PuzzleKind::Item)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub id: String,
    pub kind: PuzzleKind,
    #[serde(default)]
    pub solved: bool,
    pub description: String,
    /// Expected answer, or the item id for item puzzles.
    pub solution: String,
    pub hint: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Mystery,
    SciFi,
    Horror,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Theme::Mystery => "mystery",
            Theme::SciFi => "sci-fi",
            Theme::Horror => "horror",
        }
    }
}

/// Header table of a room file.
#[derive(Debug, Deserialize)]
pub struct RoomMeta {
    pub id: String,
    pub name: String,
    pub theme: Theme,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub next_room: Option<String>,
    #[serde(default)]
    pub locked: bool,
}

/// On-disk layout of a `room_*.toml` file.
#[derive(Debug, Deserialize)]
pub struct RoomFile {
    pub room: RoomMeta,
    #[serde(rename = "puzzle", default)]
    pub puzzles: Vec<Puzzle>,
}

/// On-disk layout of `items.toml`.
#[derive(Debug, Deserialize)]
pub struct ItemFile {
    #[serde(rename = "item", default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub theme: Theme,
    pub description: String,
    pub image: String,
    pub puzzles: Vec<Puzzle>,
    /// `None` marks the final room.
    pub next_room: Option<String>,
    pub locked: bool,
}

impl Room {
    pub fn puzzle(&self, puzzle_id: &str) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| p.id == puzzle_id)
    }

    pub fn all_solved(&self) -> bool {
        self.puzzles.iter().all(|p| p.solved)
    }

    pub fn first_unsolved(&self) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| !p.solved)
    }

    pub fn is_final(&self) -> bool {
        self.next_room.is_none()
    }
}

impl From<RoomFile> for Room {
    fn from(file: RoomFile) -> Self {
        let RoomFile { room, puzzles } = file;
        Room {
            id: room.id,
            name: room.name,
            theme: room.theme,
            description: room.description,
            image: room.image,
            puzzles,
            next_room: room.next_room,
            locked: room.locked,
        }
    }
}

/// Static game content: every item and room, rooms in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub items: Vec<Item>,
    pub rooms: Vec<Room>,
}

impl Catalog {
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }
}
