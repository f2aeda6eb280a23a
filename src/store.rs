// Character persistence: the store boundary plus in-memory and JSON-file stores.
use crate::character::{Character, CharacterId};
use crate::error::StoreError;

use chrono::Local;
use std::collections::HashMap;
use std::fs::{File, create_dir_all, read_dir, remove_file, write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

// Read and write whole characters. Writes replace the stored copy.
pub trait CharacterStore: Send + Sync {
    fn read_character(&self, id: CharacterId) -> Result<Character, StoreError>;
    fn write_character(&self, character: &Character) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_characters(characters: impl IntoIterator<Item = Character>) -> Self {
        let characters = characters
            .into_iter()
            .map(|character| (character.id, character))
            .collect();
        Self {
            characters: RwLock::new(characters),
        }
    }

    pub fn len(&self) -> usize {
        self.characters.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CharacterStore for MemoryStore {
    fn read_character(&self, id: CharacterId) -> Result<Character, StoreError> {
        let characters = self.characters.read().map_err(|_| StoreError::Poisoned)?;
        characters
            .get(&id)
            .cloned()
            .ok_or(StoreError::CharacterNotFound(id))
    }

    fn write_character(&self, character: &Character) -> Result<(), StoreError> {
        let mut characters = self.characters.write().map_err(|_| StoreError::Poisoned)?;
        characters.insert(character.id, character.clone());
        Ok(())
    }
}

// One pretty-printed JSON file per character, named by id.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: CharacterId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    // File stems of every saved character.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut saves: Vec<String> = read_dir(&self.dir)?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.is_file() && path.extension()? == "json" {
                    path.file_stem()?.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();
        saves.sort();
        Ok(saves)
    }

    pub fn delete(&self, id: CharacterId) -> Result<(), StoreError> {
        match remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::CharacterNotFound(id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl CharacterStore for JsonFileStore {
    fn read_character(&self, id: CharacterId) -> Result<Character, StoreError> {
        let file = match File::open(self.path_for(id)) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::CharacterNotFound(id));
            }
            Err(e) => return Err(e.into()),
        };
        let character: Character = serde_json::from_reader(file)?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        log::debug!("[{timestamp}] loaded {} ({id})", character.name);
        Ok(character)
    }

    fn write_character(&self, character: &Character) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(character)?;
        write(self.path_for(character.id), serialized)?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        log::debug!("[{timestamp}] saved {} ({})", character.name, character.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterBuilder;

    #[test]
    fn memory_store_round_trips_and_reports_missing() {
        let store = MemoryStore::new();
        let character = CharacterBuilder::new("Ada").sand(4).build();
        store.write_character(&character).unwrap();

        assert_eq!(store.read_character(character.id).unwrap(), character);
        assert_eq!(store.len(), 1);

        let missing = CharacterId::new();
        assert!(matches!(
            store.read_character(missing),
            Err(StoreError::CharacterNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn json_store_lists_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("characters")).unwrap();
        let character = CharacterBuilder::new("Jeb").build();

        store.write_character(&character).unwrap();
        assert_eq!(store.list().unwrap(), vec![character.id.to_string()]);
        assert_eq!(store.read_character(character.id).unwrap(), character);

        store.delete(character.id).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(
            store.delete(character.id),
            Err(StoreError::CharacterNotFound(_))
        ));
    }
}
