//! The persistence collaborator for Local items.

use async_trait::async_trait;

use crate::error::BoardResult;
use crate::item::{Item, ItemId, ItemPatch, Status};

/// CRUD plus a reorder primitive over Local items, keyed by id.
///
/// All calls are asynchronous and may fail with a generic I/O-shaped
/// error; the planner treats every failure the same way (reconcile from
/// the source of truth and surface a user-visible error string), so
/// implementations don't need to distinguish failure modes.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list(&self) -> BoardResult<Vec<Item>>;

    async fn create(&self, item: &Item) -> BoardResult<Item>;

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> BoardResult<Item>;

    async fn delete(&self, id: ItemId) -> BoardResult<()>;

    /// Apply the same renumbering semantics as the in-memory move: insert
    /// at `order_index` in the `status` partition and renumber both
    /// affected partitions contiguously.
    async fn reorder(&self, id: ItemId, status: Status, order_index: u32) -> BoardResult<()>;
}
