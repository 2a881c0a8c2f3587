//! Planner facade behavior against in-memory collaborators: optimistic
//! visibility, settlement, coarse reconciliation, and routing of
//! calendar-mirrored mutations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use dayboard_core::{
    BoardConfig, BoardError, BoardResult, CalendarProvider, EventTime, ExternalEvent,
    ExternalEventPatch, Item, ItemDraft, ItemId, ItemPatch, ItemRepository, Planner, Source,
    Status,
};

// ----------------------------------------------------------------------
// Fakes
// ----------------------------------------------------------------------

/// In-memory persistence collaborator. Failure is switchable at runtime
/// so tests can exercise the reconciliation path.
#[derive(Default)]
struct FakeRepo {
    items: Mutex<HashMap<ItemId, Item>>,
    fail_writes: AtomicBool,
}

impl FakeRepo {
    fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> BoardResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(BoardError::Store("remote store unavailable".into()))
        } else {
            Ok(())
        }
    }

    fn contains(&self, id: ItemId) -> bool {
        self.items.lock().unwrap().contains_key(&id)
    }
}

#[async_trait]
impl ItemRepository for FakeRepo {
    async fn list(&self) -> BoardResult<Vec<Item>> {
        let mut items: Vec<Item> = self.items.lock().unwrap().values().cloned().collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn create(&self, item: &Item) -> BoardResult<Item> {
        self.check()?;
        self.items.lock().unwrap().insert(item.id, item.clone());
        Ok(item.clone())
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> BoardResult<Item> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let item = items.get_mut(&id).ok_or(BoardError::NotFound(id))?;
        patch.apply_fields(item);
        if let Some(status) = patch.status {
            item.status = status;
        }
        Ok(item.clone())
    }

    async fn delete(&self, id: ItemId) -> BoardResult<()> {
        self.check()?;
        self.items
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(BoardError::NotFound(id))
    }

    async fn reorder(&self, id: ItemId, status: Status, order_index: u32) -> BoardResult<()> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let item = items.get_mut(&id).ok_or(BoardError::NotFound(id))?;
        item.status = status;
        item.order_index = order_index;
        Ok(())
    }
}

/// In-memory calendar collaborator.
#[derive(Default)]
struct FakeCalendar {
    events: Mutex<Vec<ExternalEvent>>,
    fail: AtomicBool,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl FakeCalendar {
    fn with_events(events: Vec<ExternalEvent>) -> Self {
        FakeCalendar {
            events: Mutex::new(events),
            ..Default::default()
        }
    }

    fn check(&self) -> BoardResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(BoardError::Provider("calendar unreachable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn list_upcoming(&self, _days_ahead: i64) -> BoardResult<Vec<ExternalEvent>> {
        self.check()?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn create(
        &self,
        summary: &str,
        start: EventTime,
        end: EventTime,
    ) -> BoardResult<ExternalEvent> {
        self.check()?;
        let event = ExternalEvent {
            id: format!("evt_{summary}"),
            summary: summary.to_string(),
            start,
            end,
        };
        self.events.lock().unwrap().push(event.clone());
        Ok(event)
    }

    async fn update(
        &self,
        external_id: &str,
        patch: &ExternalEventPatch,
    ) -> BoardResult<ExternalEvent> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == external_id)
            .ok_or_else(|| BoardError::Provider(format!("no event {external_id}")))?;
        if let Some(summary) = &patch.summary {
            event.summary = summary.clone();
        }
        if let Some(start) = &patch.start {
            event.start = start.clone();
        }
        if let Some(end) = &patch.end {
            event.end = end.clone();
        }
        Ok(event.clone())
    }

    async fn delete(&self, external_id: &str) -> BoardResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != external_id);
        if events.len() == before {
            return Err(BoardError::Provider(format!("no event {external_id}")));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn draft(title: &str) -> ItemDraft {
    ItemDraft {
        title: title.to_string(),
        status: Status::Todo,
        priority: Default::default(),
        category: None,
        scheduled: EventTime::Date(day(2)),
        start_date: None,
        end_date: None,
    }
}

fn event(id: &str, summary: &str, d: u32) -> ExternalEvent {
    ExternalEvent {
        id: id.to_string(),
        summary: summary.to_string(),
        start: EventTime::Date(day(d)),
        end: EventTime::Date(day(d)),
    }
}

fn planner_with(repo: Arc<FakeRepo>, calendar: Arc<FakeCalendar>) -> Planner {
    Planner::new(repo, calendar, BoardConfig::default())
}

// ----------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------

#[tokio::test]
async fn add_is_visible_immediately_and_settles() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::default());
    let planner = planner_with(repo.clone(), calendar);

    let item = planner.add(draft("Water plants")).unwrap();

    // Optimistic: visible before settlement.
    assert!(planner.snapshot().items.iter().any(|i| i.id == item.id));

    planner.settled().await;
    assert!(repo.contains(item.id));
    assert!(planner.snapshot().last_error.is_none());
}

#[tokio::test]
async fn failed_settlement_snaps_back_and_reports() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::default());
    let planner = planner_with(repo.clone(), calendar);

    let kept = planner.add(draft("kept")).unwrap();
    planner.settled().await;

    repo.fail_writes(true);
    let lost = planner.add(draft("lost")).unwrap();
    assert_eq!(planner.snapshot().items.len(), 2);

    planner.settled().await;

    // The optimistic edit is rolled back wholesale to the repo's truth.
    let snapshot = planner.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].id, kept.id);
    assert!(!repo.contains(lost.id));
    assert!(snapshot.last_error.is_some());
}

#[tokio::test]
async fn failed_move_loses_later_unsettled_mutations_too() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::default());
    let planner = planner_with(repo.clone(), calendar);

    let a = planner.add(draft("a")).unwrap();
    planner.settled().await;

    // Every write fails from here on: the move and the follow-up add both
    // settle against a broken store and reconciliation reloads the truth.
    repo.fail_writes(true);
    planner.move_item(a.id, Status::Done, 0).unwrap();
    let b = planner.add(draft("b")).unwrap();
    planner.settled().await;

    let snapshot = planner.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].id, a.id);
    assert_eq!(snapshot.items[0].status, Status::Todo);
    assert!(!repo.contains(b.id));
}

#[tokio::test]
async fn move_settles_through_the_reorder_primitive() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::default());
    let planner = planner_with(repo.clone(), calendar);

    let a = planner.add(draft("a")).unwrap();
    let b = planner.add(draft("b")).unwrap();
    planner.settled().await;

    planner.move_item(b.id, Status::Doing, 0).unwrap();
    planner.settled().await;

    let listed = repo.list().await.unwrap();
    let moved = listed.iter().find(|i| i.id == b.id).unwrap();
    assert_eq!(moved.status, Status::Doing);
    assert_eq!(moved.order_index, 0);
    assert_eq!(planner.list_by_status(Status::Todo)[0].id, a.id);
}

#[tokio::test]
async fn refresh_merges_the_calendar_mirror() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::with_events(vec![event("evt_1", "Dentist", 3)]));
    let planner = planner_with(repo, calendar);

    planner.add(draft("Water plants")).unwrap();
    planner.settled().await;
    planner.refresh().await.unwrap();

    let snapshot = planner.snapshot();
    assert_eq!(snapshot.items.len(), 2);
    let mirrored = snapshot.items.iter().find(|i| i.id < 0).unwrap();
    assert_eq!(mirrored.title, "Dentist");
    assert_eq!(mirrored.source, Source::External);
}

#[tokio::test]
async fn unreachable_calendar_degrades_to_local_only() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::with_events(vec![event("evt_1", "Dentist", 3)]));
    calendar.fail.store(true, Ordering::SeqCst);
    let planner = planner_with(repo, calendar);

    planner.add(draft("only me")).unwrap();
    planner.settled().await;
    planner.refresh().await.unwrap();

    let snapshot = planner.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].title, "only me");
}

#[tokio::test]
async fn mirrored_updates_route_to_the_calendar() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::with_events(vec![event("evt_1", "Dentist", 3)]));
    let planner = planner_with(repo.clone(), calendar.clone());
    planner.refresh().await.unwrap();

    let mirrored_id = planner.snapshot().items[0].id;
    let patch = ItemPatch {
        title: Some("Dentist (moved)".to_string()),
        ..Default::default()
    };
    planner.update(mirrored_id, patch).unwrap();
    planner.settled().await;

    assert_eq!(calendar.update_calls.load(Ordering::SeqCst), 1);
    // The mirror re-fetch carried the provider's new truth into the board.
    let snapshot = planner.snapshot();
    assert_eq!(snapshot.items[0].title, "Dentist (moved)");
    // Nothing was written to the persistence collaborator.
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn mirrored_deletes_route_to_the_calendar() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::with_events(vec![event("evt_1", "Dentist", 3)]));
    let planner = planner_with(repo, calendar.clone());
    planner.refresh().await.unwrap();

    let mirrored_id = planner.snapshot().items[0].id;
    planner.delete(mirrored_id).unwrap();

    // Not optimistic: the mirror only changes after settlement.
    assert_eq!(planner.snapshot().items.len(), 1);
    planner.settled().await;

    assert_eq!(calendar.delete_calls.load(Ordering::SeqCst), 1);
    assert!(planner.snapshot().items.is_empty());
}

#[tokio::test]
async fn moving_a_mirrored_item_is_a_wrong_source_error() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::with_events(vec![event("evt_1", "Dentist", 3)]));
    let planner = planner_with(repo, calendar);
    planner.refresh().await.unwrap();

    let mirrored_id = planner.snapshot().items[0].id;
    let err = planner.move_item(mirrored_id, Status::Done, 0).unwrap_err();
    assert!(matches!(err, BoardError::WrongSource { .. }));
}

#[tokio::test]
async fn add_to_calendar_settles_into_the_mirror() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::default());
    let planner = planner_with(repo, calendar);

    planner
        .add_to_calendar(
            "Standup".to_string(),
            EventTime::Date(day(5)),
            EventTime::Date(day(5)),
        )
        .unwrap();

    // Not optimistic.
    assert!(planner.snapshot().items.is_empty());
    planner.settled().await;

    let snapshot = planner.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].title, "Standup");
    assert_eq!(snapshot.items[0].source, Source::External);
}

#[tokio::test]
async fn day_view_combines_both_sources_in_display_order() {
    let repo = Arc::new(FakeRepo::default());
    let calendar = Arc::new(FakeCalendar::with_events(vec![event("evt_1", "Dentist", 2)]));
    let planner = planner_with(repo, calendar);

    let mut high = draft("Ship release");
    high.priority = dayboard_core::Priority::High;
    planner.add(high).unwrap();
    planner.settled().await;
    planner.refresh().await.unwrap();

    let items = planner.day_view(day(2));
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Ship release", "Dentist"]);
}
