//! The partitioned item store.
//!
//! Owns the Local items, one ordered list per lifecycle status. Every
//! mutation keeps the order-index bookkeeping honest: adds append at the
//! end of their partition, moves renumber both affected partitions to be
//! contiguous, deletes leave gaps (consumers sort by order index, they do
//! not assume contiguity after a delete).
//!
//! The store is synchronous and in-memory; optimistic persistence and
//! reconciliation live in [`crate::planner`].

use std::collections::BTreeMap;

use crate::error::{BoardError, BoardResult};
use crate::ident::IdAllocator;
use crate::item::{Item, ItemDraft, ItemId, ItemPatch, Source, Status};

#[derive(Debug, Default)]
pub struct PartitionStore {
    items: BTreeMap<ItemId, Item>,
    ids: IdAllocator,
}

impl PartitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all Local items and rebuild from the persistence
    /// collaborator's source of truth. Non-Local items are ignored; the
    /// store never owns them.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items.clear();
        for item in items.into_iter().filter(|i| i.source == Source::Local) {
            self.ids.observe(item.id);
            self.items.insert(item.id, item);
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All Local items, ascending by id.
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    /// Create an item at the end of its partition. Rejects an empty title
    /// before any state changes.
    pub fn add(&mut self, draft: ItemDraft) -> BoardResult<Item> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(BoardError::Validation("title must not be empty".into()));
        }

        let id = self.ids.next_id();
        let item = Item {
            id,
            title: title.to_string(),
            status: draft.status,
            order_index: self.partition_len(draft.status) as u32,
            priority: draft.priority,
            category: draft.category,
            scheduled: draft.scheduled,
            start_date: draft.start_date,
            end_date: draft.end_date,
            source: Source::Local,
            external_ref: None,
        };
        self.items.insert(id, item.clone());
        Ok(item)
    }

    /// Apply partial field changes. A patch without a `status` change
    /// never touches the order index; a patch that does change `status`
    /// goes through the move path, landing at the end of the destination
    /// partition.
    pub fn update(&mut self, id: ItemId, patch: &ItemPatch) -> BoardResult<Item> {
        let existing = self.items.get(&id).ok_or(BoardError::NotFound(id))?;
        if matches!(&patch.title, Some(t) if t.trim().is_empty()) {
            return Err(BoardError::Validation("title must not be empty".into()));
        }

        let new_status = patch.status.filter(|s| *s != existing.status);
        if let Some(item) = self.items.get_mut(&id) {
            patch.apply_fields(item);
        }
        if let Some(status) = new_status {
            return self.move_item(id, status, usize::MAX);
        }
        self.items.get(&id).cloned().ok_or(BoardError::NotFound(id))
    }

    /// Remove an item. The remaining order indexes in its partition are
    /// not renumbered.
    pub fn delete(&mut self, id: ItemId) -> BoardResult<Item> {
        self.items.remove(&id).ok_or(BoardError::NotFound(id))
    }

    /// Move an item to `status`, inserting at `target_index` (clamped to
    /// the partition length). Renumbers both the source and destination
    /// partitions so each is contiguous from 0 afterwards.
    pub fn move_item(
        &mut self,
        id: ItemId,
        status: Status,
        target_index: usize,
    ) -> BoardResult<Item> {
        let existing = self.items.get(&id).ok_or(BoardError::NotFound(id))?;
        let old_status = existing.status;

        if old_status != status {
            let remaining = self.partition_ids_excluding(old_status, id);
            self.renumber(&remaining);
        }

        let mut destination = self.partition_ids_excluding(status, id);
        let index = target_index.min(destination.len());
        destination.insert(index, id);

        if let Some(item) = self.items.get_mut(&id) {
            item.status = status;
        }
        self.renumber(&destination);

        self.items.get(&id).cloned().ok_or(BoardError::NotFound(id))
    }

    /// Items with this status, ascending by order index. Equal indexes
    /// (only possible via a bug) break ties toward the lower id so the
    /// ordering stays deterministic.
    pub fn list_by_status(&self, status: Status) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .items
            .values()
            .filter(|i| i.status == status)
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.order_index, i.id));
        items
    }

    pub fn partition_len(&self, status: Status) -> usize {
        self.items.values().filter(|i| i.status == status).count()
    }

    fn partition_ids_excluding(&self, status: Status, skip: ItemId) -> Vec<ItemId> {
        let mut keyed: Vec<(u32, ItemId)> = self
            .items
            .values()
            .filter(|i| i.status == status && i.id != skip)
            .map(|i| (i.order_index, i.id))
            .collect();
        keyed.sort_unstable();
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    fn renumber(&mut self, ids: &[ItemId]) {
        for (position, id) in ids.iter().enumerate() {
            if let Some(item) = self.items.get_mut(id) {
                item.order_index = position as u32;
            }
        }
    }
}
