use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::{Catalog, ItemFile, PuzzleKind, Room, RoomFile};
use crate::error::{GameError, Result};

const ITEMS_FILE: &str = "items.toml";
const ROOM_PATTERN: &str = "room_*.toml";

const BUILTIN_ITEMS: &str = include_str!("../../puzzles/items.toml");
const BUILTIN_ROOMS: [(&str, &str); 3] = [
    (
        "room_01_mystery.toml",
        include_str!("../../puzzles/room_01_mystery.toml"),
    ),
    (
        "room_02_sci_fi.toml",
        include_str!("../../puzzles/room_02_sci_fi.toml"),
    ),
    (
        "room_03_horror.toml",
        include_str!("../../puzzles/room_03_horror.toml"),
    ),
];

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| GameError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    toml::from_str(content).map_err(|source| GameError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_room(path: &Path) -> Result<Room> {
    let content = read(path)?;
    let file: RoomFile = parse(path, &content)?;
    Ok(file.into())
}

/// Loads `items.toml` and every `room_*.toml` in `dir`, then validates the result.
pub fn load_catalog(dir: &Path) -> Result<Catalog> {
    let items_path = dir.join(ITEMS_FILE);
    let items: ItemFile = parse(&items_path, &read(&items_path)?)?;

    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        ROOM_PATTERN
    );
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| GameError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        paths.push(path);
    }

    // Sort by filename so room_01, room_02, room_03 are in order
    paths.sort();

    let mut rooms = Vec::with_capacity(paths.len());
    for path in &paths {
        rooms.push(load_room(path)?);
    }

    let catalog = Catalog {
        items: items.items,
        rooms,
    };
    catalog.validate()?;
    debug!(
        dir = %dir.display(),
        items = catalog.items.len(),
        rooms = catalog.rooms.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// The default three-room game compiled into the binary.
pub fn builtin_catalog() -> Result<Catalog> {
    let items: ItemFile = parse(Path::new(ITEMS_FILE), BUILTIN_ITEMS)?;
    let mut rooms = Vec::with_capacity(BUILTIN_ROOMS.len());
    for (name, content) in BUILTIN_ROOMS {
        let file: RoomFile = parse(Path::new(name), content)?;
        rooms.push(file.into());
    }

    let catalog = Catalog {
        items: items.items,
        rooms,
    };
    catalog.validate()?;
    Ok(catalog)
}

impl Catalog {
    /// Checks the cross-references the game relies on but never re-checks at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.rooms.is_empty() {
            return Err(GameError::InvalidCatalog("no rooms".to_string()));
        }

        let mut item_ids = HashSet::new();
        for item in &self.items {
            if !item_ids.insert(item.id.as_str()) {
                return Err(GameError::InvalidCatalog(format!(
                    "duplicate item id '{}'",
                    item.id
                )));
            }
        }

        let mut room_ids = HashSet::new();
        let mut puzzle_ids = HashSet::new();
        for room in &self.rooms {
            if !room_ids.insert(room.id.as_str()) {
                return Err(GameError::InvalidCatalog(format!(
                    "duplicate room id '{}'",
                    room.id
                )));
            }
            for puzzle in &room.puzzles {
                if !puzzle_ids.insert(puzzle.id.as_str()) {
                    return Err(GameError::InvalidCatalog(format!(
                        "duplicate puzzle id '{}'",
                        puzzle.id
                    )));
                }
                if puzzle.kind == PuzzleKind::Item && !item_ids.contains(puzzle.solution.as_str()) {
                    return Err(GameError::InvalidCatalog(format!(
                        "puzzle '{}' needs unknown item '{}'",
                        puzzle.id, puzzle.solution
                    )));
                }
            }
        }

        for room in &self.rooms {
            if let Some(next) = &room.next_room {
                if !room_ids.contains(next.as_str()) {
                    return Err(GameError::InvalidCatalog(format!(
                        "room '{}' leads to unknown room '{}'",
                        room.id, next
                    )));
                }
            }
        }

        for item in &self.items {
            if let Some(target) = &item.used_on {
                if !puzzle_ids.contains(target.as_str()) {
                    return Err(GameError::InvalidCatalog(format!(
                        "item '{}' targets unknown puzzle '{}'",
                        item.id, target
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ITEMS: &str = r#"
[[item]]
id = "lamp"
name = "Oil Lamp"
description = "Still warm."
image = "lamp.png"
used_on = "cellar"
"#;

    const FIRST: &str = r#"
[room]
id = "hall"
name = "Hall"
theme = "mystery"
description = "A long hall."
image = "hall.png"
next_room = "vault"

[[puzzle]]
id = "cellar"
kind = "item"
description = "A dark cellar."
solution = "lamp"
hint = "Bring light."
"#;

    const SECOND: &str = r#"
[room]
id = "vault"
name = "Vault"
theme = "sci-fi"
description = "Steel everywhere."
image = "vault.png"
locked = true

[[puzzle]]
id = "dial"
kind = "combination"
description = "A dial."
solution = "42"
hint = "The answer to everything."
"#;

    fn write_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn builtin_catalog_matches_default_content() {
        let catalog = builtin_catalog().unwrap();
        let ids: Vec<_> = catalog.rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["mystery-room", "sci-fi-room", "horror-room"]);
        assert_eq!(catalog.items.len(), 5);
        assert!(!catalog.rooms[0].locked);
        assert!(catalog.rooms[1].locked && catalog.rooms[2].locked);
        assert!(catalog.rooms[2].is_final());
        assert_eq!(catalog.rooms[1].theme.label(), "sci-fi");
    }

    #[test]
    fn builtin_files_on_disk_load_the_same() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("puzzles");
        assert_eq!(load_catalog(&dir).unwrap(), builtin_catalog().unwrap());
    }

    #[test]
    fn rooms_load_in_file_name_order() {
        // written out of order on purpose
        let dir = write_dir(&[
            ("room_02_vault.toml", SECOND),
            ("items.toml", ITEMS),
            ("room_01_hall.toml", FIRST),
            ("notes.toml", "not a room"),
        ]);
        let catalog = load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.rooms[0].id, "hall");
        assert_eq!(catalog.rooms[1].id, "vault");
        assert_eq!(catalog.rooms[0].puzzles[0].kind, PuzzleKind::Item);
        assert!(!catalog.rooms[0].puzzles[0].solved);
        assert!(catalog.items[0].usable);
    }

    #[test]
    fn missing_items_file_is_io_error() {
        let dir = write_dir(&[("room_01_hall.toml", FIRST)]);
        let err = load_catalog(dir.path()).unwrap_err();
        assert!(matches!(err, GameError::Io { .. }));
    }

    #[test]
    fn malformed_room_is_parse_error() {
        let dir = write_dir(&[("items.toml", ITEMS), ("room_01_hall.toml", "[room]\nid = 3")]);
        let err = load_catalog(dir.path()).unwrap_err();
        assert!(matches!(err, GameError::Parse { .. }));
    }

    #[test]
    fn dangling_next_room_is_rejected() {
        let dir = write_dir(&[("items.toml", ITEMS), ("room_01_hall.toml", FIRST)]);
        let err = load_catalog(dir.path()).unwrap_err();
        assert!(matches!(err, GameError::InvalidCatalog(msg) if msg.contains("vault")));
    }

    #[test]
    fn item_puzzle_must_name_a_known_item() {
        let mut catalog = builtin_catalog().unwrap();
        catalog.items.retain(|i| i.id != "battery");
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, GameError::InvalidCatalog(msg) if msg.contains("battery")));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut catalog = builtin_catalog().unwrap();
        let copy = catalog.rooms[0].clone();
        catalog.rooms.push(copy);
        assert!(catalog.validate().is_err());

        let mut catalog = builtin_catalog().unwrap();
        let copy = catalog.items[0].clone();
        catalog.items.push(copy);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let catalog = Catalog {
            items: Vec::new(),
            rooms: Vec::new(),
        };
        assert!(catalog.validate().is_err());
    }
}
