//! The planner facade.
//!
//! One `Planner` per session: it owns the partition store and the
//! calendar mirror, recomputes the merged collection whenever either
//! side changes, and exposes the read model the presentation layer
//! renders from.
//!
//! Mutations are optimistic: the in-memory edit happens synchronously and
//! the collaborator call settles in a background task. A failed
//! settlement is not undone precisely; the planner records a user-visible
//! error and reloads all Local items from the persistence collaborator's
//! source of truth, so a failed move may visibly snap back to the last
//! known-good state. Mutations that target a mirrored calendar item are
//! routed to the calendar collaborator instead and only take local effect
//! once the mirror is re-fetched after a successful call.
//!
//! The planner must be used from within a tokio runtime; settlement tasks
//! are spawned on it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::calendar::{CalendarProvider, ExternalEvent, ExternalEventPatch};
use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::item::{EventTime, Item, ItemDraft, ItemId, ItemPatch, Status};
use crate::merge::merge_items;
use crate::repo::ItemRepository;
use crate::store::PartitionStore;
use crate::timeline::{TimelineBar, TimelineWindow};
use crate::views::{self, AgendaPage, DayBucket, MonthCell};

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ReadModel {
    pub items: Vec<Item>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

struct PlannerState {
    store: PartitionStore,
    external: Vec<Item>,
    merged: Vec<Item>,
    is_loading: bool,
    last_error: Option<String>,
}

impl PlannerState {
    fn remerge(&mut self) {
        self.merged = merge_items(&self.store.snapshot(), &self.external);
    }

    fn set_external(&mut self, events: &[ExternalEvent]) {
        self.external = events.iter().map(ExternalEvent::to_item).collect();
    }
}

#[derive(Clone)]
pub struct Planner {
    state: Arc<Mutex<PlannerState>>,
    repo: Arc<dyn ItemRepository>,
    calendar: Arc<dyn CalendarProvider>,
    config: Arc<BoardConfig>,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Planner {
    pub fn new(
        repo: Arc<dyn ItemRepository>,
        calendar: Arc<dyn CalendarProvider>,
        config: BoardConfig,
    ) -> Self {
        Planner {
            state: Arc::new(Mutex::new(PlannerState {
                store: PartitionStore::new(),
                external: Vec::new(),
                merged: Vec::new(),
                is_loading: false,
                last_error: None,
            })),
            repo,
            calendar,
            config: Arc::new(config),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, PlannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Loading & reconciliation
    // ------------------------------------------------------------------

    /// Load both sources. Called once at startup and on explicit refresh.
    ///
    /// A failing persistence collaborator is reported to the caller and
    /// recorded in the read model; an unreachable calendar just leaves
    /// the mirror empty, degrading the merge to local-only.
    pub async fn refresh(&self) -> BoardResult<()> {
        {
            let mut st = self.state();
            st.is_loading = true;
        }
        let local = self.repo.list().await;
        let external = self.calendar.list_upcoming(self.config.days_ahead).await;

        let mut st = self.state();
        st.is_loading = false;
        match external {
            Ok(events) => st.set_external(&events),
            Err(err) => {
                warn!(error = %err, "external calendar fetch failed");
                st.external.clear();
            }
        }
        let result = match local {
            Ok(items) => {
                st.store.replace_all(items);
                st.last_error = None;
                Ok(())
            }
            Err(err) => {
                st.last_error = Some(err.to_string());
                Err(err)
            }
        };
        st.remerge();
        result
    }

    /// Re-fetch the calendar mirror and replace it wholesale.
    pub async fn refresh_external(&self) {
        match self.calendar.list_upcoming(self.config.days_ahead).await {
            Ok(events) => {
                let mut st = self.state();
                st.set_external(&events);
                st.remerge();
            }
            Err(err) => {
                warn!(error = %err, "external calendar fetch failed");
                let mut st = self.state();
                st.external.clear();
                st.remerge();
            }
        }
    }

    /// Coarse rollback after a failed settlement: discard Local state and
    /// reload it from the source of truth.
    async fn reconcile(&self, message: String) {
        warn!(%message, "mutation failed, reloading from the store");
        {
            let mut st = self.state();
            st.last_error = Some(message);
        }
        match self.repo.list().await {
            Ok(items) => {
                let mut st = self.state();
                st.store.replace_all(items);
                st.remerge();
            }
            Err(err) => {
                let mut st = self.state();
                st.last_error = Some(err.to_string());
            }
        }
        if self.config.refresh_external_on_error {
            self.refresh_external().await;
        }
    }

    fn spawn_settlement(&self, task: impl Future<Output = ()> + Send + 'static) {
        let handle = tokio::spawn(task);
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }

    /// Await every outstanding settlement task. Shutdown paths call this
    /// so optimistic edits reach the collaborators before exit; tests use
    /// it to observe post-settlement state.
    pub async fn settled(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = {
                let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
                pending.drain(..).collect()
            };
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                let _ = handle.await;
            }
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create a Local item. It appears in the read model immediately;
    /// persistence settles in the background.
    pub fn add(&self, draft: ItemDraft) -> BoardResult<Item> {
        let item = {
            let mut st = self.state();
            let item = st.store.add(draft)?;
            st.remerge();
            item
        };
        debug!(id = item.id, "item added");

        let planner = self.clone();
        let created = item.clone();
        self.spawn_settlement(async move {
            if let Err(err) = planner.repo.create(&created).await {
                planner.reconcile(err.to_string()).await;
            }
        });
        Ok(item)
    }

    /// Apply partial field changes to an item. Local items update
    /// optimistically; calendar-mirrored items are routed to the provider
    /// and change only after the mirror re-fetch confirms them.
    pub fn update(&self, id: ItemId, patch: ItemPatch) -> BoardResult<Item> {
        if let Some(mirrored) = self.external_item(id) {
            return self.update_external(mirrored, &patch);
        }

        let item = {
            let mut st = self.state();
            let item = st.store.update(id, &patch)?;
            st.remerge();
            item
        };

        let planner = self.clone();
        self.spawn_settlement(async move {
            if let Err(err) = planner.repo.update(id, &patch).await {
                planner.reconcile(err.to_string()).await;
            }
        });
        Ok(item)
    }

    /// Delete an item. Local items disappear optimistically;
    /// calendar-mirrored items disappear once the provider call settles
    /// and the mirror is re-fetched.
    pub fn delete(&self, id: ItemId) -> BoardResult<()> {
        if let Some(mirrored) = self.external_item(id) {
            return self.delete_external(&mirrored);
        }

        {
            let mut st = self.state();
            st.store.delete(id)?;
            st.remerge();
        }

        let planner = self.clone();
        self.spawn_settlement(async move {
            if let Err(err) = planner.repo.delete(id).await {
                planner.reconcile(err.to_string()).await;
            }
        });
        Ok(())
    }

    /// Move an item to `status` at `index` (clamped), renumbering both
    /// affected partitions. Calendar-mirrored items have no board
    /// position and cannot be moved.
    pub fn move_item(&self, id: ItemId, status: Status, index: usize) -> BoardResult<Item> {
        if let Some(mirrored) = self.external_item(id) {
            return Err(BoardError::WrongSource {
                id,
                src: mirrored.source,
            });
        }

        let item = {
            let mut st = self.state();
            let item = st.store.move_item(id, status, index)?;
            st.remerge();
            item
        };

        let planner = self.clone();
        let order_index = item.order_index;
        self.spawn_settlement(async move {
            if let Err(err) = planner.repo.reorder(id, status, order_index).await {
                planner.reconcile(err.to_string()).await;
            }
        });
        Ok(item)
    }

    /// Create an event on the external calendar. The mirror picks it up
    /// once the provider call settles.
    pub fn add_to_calendar(
        &self,
        summary: String,
        start: EventTime,
        end: EventTime,
    ) -> BoardResult<()> {
        if summary.trim().is_empty() {
            return Err(BoardError::Validation("summary must not be empty".into()));
        }

        let planner = self.clone();
        self.spawn_settlement(async move {
            match planner.calendar.create(&summary, start, end).await {
                Ok(_) => planner.refresh_external().await,
                Err(err) => {
                    planner.record_error(err.to_string());
                    planner.refresh_external().await;
                }
            }
        });
        Ok(())
    }

    fn update_external(&self, mirrored: Item, patch: &ItemPatch) -> BoardResult<Item> {
        let external_ref = Self::external_ref_of(&mirrored)?;
        let external_patch = to_external_patch(patch);

        let planner = self.clone();
        self.spawn_settlement(async move {
            match planner.calendar.update(&external_ref, &external_patch).await {
                Ok(_) => planner.refresh_external().await,
                Err(err) => {
                    planner.record_error(err.to_string());
                    planner.refresh_external().await;
                }
            }
        });
        // No local effect yet: the mirror is replaced wholesale after the
        // provider call succeeds.
        Ok(mirrored)
    }

    fn delete_external(&self, mirrored: &Item) -> BoardResult<()> {
        let external_ref = Self::external_ref_of(mirrored)?;

        let planner = self.clone();
        self.spawn_settlement(async move {
            match planner.calendar.delete(&external_ref).await {
                Ok(()) => planner.refresh_external().await,
                Err(err) => {
                    planner.record_error(err.to_string());
                    planner.refresh_external().await;
                }
            }
        });
        Ok(())
    }

    fn external_ref_of(item: &Item) -> BoardResult<String> {
        item.external_ref
            .clone()
            .ok_or_else(|| BoardError::Provider("mirrored item has no provider reference".into()))
    }

    fn external_item(&self, id: ItemId) -> Option<Item> {
        self.state().external.iter().find(|i| i.id == id).cloned()
    }

    fn record_error(&self, message: String) {
        warn!(%message, "calendar mutation failed");
        self.state().last_error = Some(message);
    }

    // ------------------------------------------------------------------
    // Read model & queries
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> ReadModel {
        let st = self.state();
        ReadModel {
            items: st.merged.clone(),
            is_loading: st.is_loading,
            last_error: st.last_error.clone(),
        }
    }

    /// Local items with this status, in board order.
    pub fn list_by_status(&self, status: Status) -> Vec<Item> {
        self.state().store.list_by_status(status)
    }

    /// Merged items on this day, in display order.
    pub fn day_view(&self, date: NaiveDate) -> Vec<Item> {
        let st = self.state();
        let mut items = views::items_on_date(&st.merged, date);
        views::sort_for_display(&mut items);
        items
    }

    pub fn week_view(&self, anchor: NaiveDate) -> Vec<DayBucket> {
        views::week_view(&self.state().merged, anchor)
    }

    pub fn month_view(&self, anchor: NaiveDate) -> Vec<MonthCell> {
        views::month_grid(&self.state().merged, anchor)
    }

    /// Category-filtered, display-sorted, paginated list of all merged
    /// items.
    pub fn agenda(&self, category: Option<&str>, page: usize, page_size: usize) -> AgendaPage {
        let st = self.state();
        let mut items = views::filter_by_category(&st.merged, category);
        views::sort_for_display(&mut items);
        let total_pages = views::total_pages(items.len(), page_size);
        AgendaPage {
            items: views::paginate(&items, page_size, page),
            page,
            total_pages,
        }
    }

    /// Bar geometry for the merged items inside `window`.
    pub fn timeline(&self, window: &TimelineWindow) -> Vec<TimelineBar> {
        window.layout(&self.state().merged)
    }
}

/// Project the calendar-applicable fields out of an item patch. Board
/// concerns (status, priority, category) have no calendar counterpart.
fn to_external_patch(patch: &ItemPatch) -> ExternalEventPatch {
    ExternalEventPatch {
        summary: patch.title.clone(),
        start: patch.scheduled.clone(),
        end: patch.end_date.map(EventTime::Date),
    }
}
