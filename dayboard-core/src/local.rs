//! File-backed item repository.
//!
//! Stores each Local item as `<id>.json` in the board's data directory,
//! one file per record. Writes go through a temp file and an atomic
//! rename. Mutations that carry renumbering (status changes, reorders)
//! are replayed through a [`PartitionStore`] loaded from disk, so the
//! on-disk numbering follows exactly the same semantics as the in-memory
//! board.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{BoardError, BoardResult};
use crate::item::{Item, ItemId, ItemPatch, Status};
use crate::repo::ItemRepository;
use crate::store::PartitionStore;

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the item directory.
    pub fn open(dir: impl Into<PathBuf>) -> BoardResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn item_path(&self, id: ItemId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn read_item(path: &Path) -> BoardResult<Item> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| BoardError::Serialization(e.to_string()))
    }

    fn write_item(&self, item: &Item) -> BoardResult<()> {
        let path = self.item_path(item.id);
        let temp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(item)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        fs::write(&temp, content)?;
        fs::rename(&temp, &path)?;
        Ok(())
    }

    fn load_all(&self) -> BoardResult<Vec<Item>> {
        let mut items = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                items.push(Self::read_item(&path)?);
            }
        }
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    /// Replay a store-level mutation against the on-disk collection and
    /// persist every item the mutation touched.
    fn replay<F>(&self, mutate: F) -> BoardResult<Item>
    where
        F: FnOnce(&mut PartitionStore) -> BoardResult<Item>,
    {
        let before = self.load_all()?;
        let mut store = PartitionStore::new();
        store.replace_all(before.clone());

        let result = mutate(&mut store)?;

        let before_by_id: HashMap<ItemId, &Item> = before.iter().map(|i| (i.id, i)).collect();
        for item in store.snapshot() {
            if before_by_id.get(&item.id).is_none_or(|b| **b != item) {
                self.write_item(&item)?;
            }
        }
        Ok(result)
    }
}

#[async_trait]
impl ItemRepository for FileStore {
    async fn list(&self) -> BoardResult<Vec<Item>> {
        self.load_all()
    }

    async fn create(&self, item: &Item) -> BoardResult<Item> {
        self.write_item(item)?;
        Ok(item.clone())
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> BoardResult<Item> {
        let patch = patch.clone();
        self.replay(move |store| store.update(id, &patch))
    }

    async fn delete(&self, id: ItemId) -> BoardResult<()> {
        let path = self.item_path(id);
        if !path.exists() {
            return Err(BoardError::NotFound(id));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    async fn reorder(&self, id: ItemId, status: Status, order_index: u32) -> BoardResult<()> {
        self.replay(move |store| store.move_item(id, status, order_index as usize))?;
        Ok(())
    }
}
