//! Property tests for the ordering invariant, the id mapping, pagination,
//! and timeline clamping.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use dayboard_core::ident::external_id_to_local_id;
use dayboard_core::views::paginate;
use dayboard_core::{
    EventTime, Item, ItemDraft, ItemId, PartitionStore, Priority, Source, Status, TimelineWindow,
};

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn draft(status: Status) -> ItemDraft {
    ItemDraft {
        title: "card".to_string(),
        status,
        priority: Priority::Medium,
        category: None,
        scheduled: EventTime::Date(base_day()),
        start_date: None,
        end_date: None,
    }
}

fn spanning(id: ItemId, start: NaiveDate, end: NaiveDate) -> Item {
    Item {
        id,
        title: "card".to_string(),
        status: Status::Todo,
        order_index: 0,
        priority: Priority::Medium,
        category: None,
        scheduled: EventTime::Date(start),
        start_date: Some(start),
        end_date: Some(end),
        source: Source::Local,
        external_ref: None,
    }
}

proptest! {
    /// After any sequence of adds and moves, every partition's order
    /// indexes are exactly 0..n-1.
    #[test]
    fn order_indexes_stay_contiguous(
        ops in proptest::collection::vec((0u8..2, 0u8..8, 0u8..3, 0u8..10), 1..40)
    ) {
        let mut store = PartitionStore::new();
        let mut ids: Vec<ItemId> = Vec::new();

        for (op, pick, status_pick, index) in ops {
            let status = Status::ALL[status_pick as usize];
            if op == 0 || ids.is_empty() {
                let item = store.add(draft(status)).unwrap();
                ids.push(item.id);
            } else {
                let id = ids[pick as usize % ids.len()];
                store.move_item(id, status, index as usize).unwrap();
            }
        }

        for status in Status::ALL {
            let listed = store.list_by_status(status);
            let indexes: Vec<u32> = listed.iter().map(|i| i.order_index).collect();
            let expected: Vec<u32> = (0..listed.len() as u32).collect();
            prop_assert_eq!(indexes, expected);
        }
    }

    /// The external mapping is total, deterministic, and always lands in
    /// the negative id space.
    #[test]
    fn external_mapping_is_negative_and_deterministic(native in ".*") {
        let mapped = external_id_to_local_id(&native);
        prop_assert!(mapped < 0);
        prop_assert_eq!(mapped, external_id_to_local_id(&native));
    }

    /// paginate(items, k, page).len() == min(k, max(0, len - k*(page-1)))
    #[test]
    fn pagination_window_sizes(
        count in 0usize..40,
        page_size in 1usize..10,
        page in 1usize..8,
    ) {
        let items: Vec<Item> = (0..count)
            .map(|i| spanning(i as ItemId + 1, base_day(), base_day()))
            .collect();

        let window = paginate(&items, page_size, page);
        let expected = count
            .saturating_sub(page_size * (page - 1))
            .min(page_size);
        prop_assert_eq!(window.len(), expected);
    }

    /// Bars never leave the window: spans entirely outside are dropped,
    /// partial overlaps are clamped into the pixel range.
    #[test]
    fn timeline_bars_stay_inside_the_window(
        start_offset in -15i64..45,
        span_days in 0i64..20,
    ) {
        let window = TimelineWindow::new(
            base_day(),
            base_day() + Duration::days(29),
            32.0,
        );
        let start = base_day() + Duration::days(start_offset);
        let end = start + Duration::days(span_days);
        let bars = window.layout(&[spanning(1, start, end)]);

        if end < window.start || start > window.end {
            prop_assert!(bars.is_empty());
        } else {
            prop_assert_eq!(bars.len(), 1);
            let bar = &bars[0];
            prop_assert!(bar.left >= 0.0);
            prop_assert!(bar.left + bar.width <= window.total_width() + f32::EPSILON);
            prop_assert!(bar.width >= window.day_width);
        }
    }
}
