//! Seams to the outside world: where raw games come from and where
//! assembled tables go.

use std::fs;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use tracing::{debug, warn};

use crate::error::{ExtractError, Result, StoreError};
use crate::models::{GameId, RawGameDocument};
use crate::table::Table;

/// Supplies raw play-by-play documents by game id.
pub trait GameSource {
    /// `ExtractError::NotFound` when the source has no such game.
    fn fetch(&self, game_id: GameId) -> Result<RawGameDocument>;
}

/// Reads `<root>/<game_id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, game_id: GameId) -> PathBuf {
        self.root.join(format!("{game_id}.json"))
    }

    /// Ids of every `<number>.json` file under the root, ascending.
    pub fn game_ids(&self) -> Result<Vec<GameId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).map(str::parse::<GameId>) {
                Some(Ok(id)) => ids.push(id),
                _ => debug!("Skipping non-game file {}", path.display()),
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

impl GameSource for DirectorySource {
    fn fetch(&self, game_id: GameId) -> Result<RawGameDocument> {
        let path = self.path_for(game_id);
        if !path.exists() {
            return Err(ExtractError::NotFound(game_id));
        }
        let content = fs::read_to_string(&path)?;
        RawGameDocument::from_json_str(&content)
    }
}

/// Documents held in memory, keyed by their own id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: FxHashMap<GameId, RawGameDocument>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents without an id are ignored.
    pub fn from_documents(documents: impl IntoIterator<Item = RawGameDocument>) -> Self {
        let mut source = Self::new();
        for doc in documents {
            source.insert(doc);
        }
        source
    }

    pub fn insert(&mut self, document: RawGameDocument) -> Option<GameId> {
        let Some(id) = document.id else {
            warn!("Ignoring document without id");
            return None;
        };
        self.documents.insert(id, document);
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl GameSource for MemorySource {
    fn fetch(&self, game_id: GameId) -> Result<RawGameDocument> {
        self.documents
            .get(&game_id)
            .cloned()
            .ok_or(ExtractError::NotFound(game_id))
    }
}

/// Keeps assembled tables under string keys.
pub trait TableStore {
    type Error: std::error::Error;

    fn store(&mut self, key: &str, table: &Table) -> std::result::Result<(), Self::Error>;
    fn load(&self, key: &str) -> std::result::Result<Table, Self::Error>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    tables: FxHashMap<String, Table>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl TableStore for MemoryTableStore {
    type Error = StoreError;

    fn store(&mut self, key: &str, table: &Table) -> std::result::Result<(), StoreError> {
        if key.trim().is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.tables.insert(key.to_string(), table.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> std::result::Result<Table, StoreError> {
        self.tables
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::Missing(key.to_string()))
    }
}
