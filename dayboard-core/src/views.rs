//! Pure view projections over the merged collection.
//!
//! Nothing here mutates anything: every function derives a display-ready
//! subset or ordering from the items it is handed, per rendering cycle.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::item::Item;

/// One day's items in the week strip or day list.
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub items: Vec<Item>,
}

/// One cell of the 6x7 month grid. Leading and trailing cells belong to
/// the adjacent months and are flagged accordingly.
#[derive(Debug, Clone, Serialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub items: Vec<Item>,
}

/// A page of the agenda list.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaPage {
    pub items: Vec<Item>,
    pub page: usize,
    pub total_pages: usize,
}

/// All items scheduled on exactly this day.
pub fn items_on_date(items: &[Item], date: NaiveDate) -> Vec<Item> {
    items
        .iter()
        .filter(|i| i.scheduled_date() == date)
        .cloned()
        .collect()
}

/// The Monday of the week containing `anchor`.
pub fn week_start(anchor: NaiveDate) -> NaiveDate {
    anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()))
}

/// Seven day buckets for the week containing `anchor`, each sorted for
/// display.
pub fn week_view(items: &[Item], anchor: NaiveDate) -> Vec<DayBucket> {
    let start = week_start(anchor);
    (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let mut day_items = items_on_date(items, date);
            sort_for_display(&mut day_items);
            DayBucket { date, items: day_items }
        })
        .collect()
}

/// The 42-cell grid for `anchor`'s month: six weeks starting on the
/// Monday of the week containing the 1st, padded with days from the
/// adjacent months so the grid is always complete.
pub fn month_grid(items: &[Item], anchor: NaiveDate) -> Vec<MonthCell> {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let start = week_start(first);
    (0..42)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let mut cell_items = items_on_date(items, date);
            sort_for_display(&mut cell_items);
            MonthCell {
                date,
                is_current_month: date.month() == anchor.month() && date.year() == anchor.year(),
                items: cell_items,
            }
        })
        .collect()
}

/// Exact-match category filter; `None` is the identity.
pub fn filter_by_category(items: &[Item], category: Option<&str>) -> Vec<Item> {
    match category {
        None => items.to_vec(),
        Some(wanted) => items
            .iter()
            .filter(|i| i.category.as_deref() == Some(wanted))
            .cloned()
            .collect(),
    }
}

/// The display order shared by the day list, the month-cell previews, and
/// the timeline rows: unfinished work first, then priority (high before
/// low), then time of day (all-day items first), then the lower id.
pub fn sort_for_display(items: &mut [Item]) {
    items.sort_by_key(|i| (i.is_done(), i.priority.rank(), i.scheduled.time_of_day(), i.id));
}

/// Fixed-size windowing. `page` is 1-based; out-of-range pages come back
/// empty rather than erroring.
pub fn paginate(items: &[Item], page_size: usize, page: usize) -> Vec<Item> {
    if page_size == 0 || page == 0 {
        return Vec::new();
    }
    items
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { count.div_ceil(page_size) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{EventTime, Priority, Source, Status};
    use chrono::{TimeZone, Utc};

    fn item(id: i64, title: &str) -> Item {
        Item {
            id,
            title: title.to_string(),
            status: Status::Todo,
            order_index: 0,
            priority: Priority::Medium,
            category: None,
            scheduled: EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
            start_date: None,
            end_date: None,
            source: Source::Local,
            external_ref: None,
        }
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn items_on_date_matches_the_scheduled_day() {
        let mut other_day = item(2, "later");
        other_day.scheduled = EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        let items = vec![item(1, "today"), other_day];

        let day = items_on_date(&items, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(titles(&day), vec!["today"]);
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-06-05 is a Thursday.
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        assert_eq!(week_start(anchor), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        // A Monday anchors its own week.
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn week_view_buckets_seven_days() {
        let items = vec![item(1, "monday thing")];
        let buckets = week_view(&items, NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(titles(&buckets[0].items), vec!["monday thing"]);
        assert!(buckets[1..].iter().all(|b| b.items.is_empty()));
    }

    #[test]
    fn month_grid_is_42_cells_with_adjacent_days_flagged() {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let grid = month_grid(&[], anchor);

        assert_eq!(grid.len(), 42);
        // June 2025 starts on a Sunday, so the grid leads with May days.
        assert_eq!(grid[0].date, NaiveDate::from_ymd_opt(2025, 5, 26).unwrap());
        assert!(!grid[0].is_current_month);
        let current: usize = grid.iter().filter(|c| c.is_current_month).count();
        assert_eq!(current, 30);
        // Consecutive days throughout.
        for pair in grid.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn category_filter_none_is_identity() {
        let mut work = item(1, "standup");
        work.category = Some("Work".to_string());
        let items = vec![work, item(2, "groceries")];

        assert_eq!(filter_by_category(&items, None).len(), 2);
        let filtered = filter_by_category(&items, Some("Work"));
        assert_eq!(titles(&filtered), vec!["standup"]);
        assert!(filter_by_category(&items, Some("work")).is_empty());
    }

    #[test]
    fn display_sort_orders_done_last_then_priority_then_time() {
        let mut done = item(1, "done");
        done.status = Status::Done;
        done.priority = Priority::High;

        let mut low_morning = item(2, "low morning");
        low_morning.priority = Priority::Low;
        low_morning.scheduled =
            EventTime::DateTime(Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap());

        let mut high_evening = item(3, "high evening");
        high_evening.priority = Priority::High;
        high_evening.scheduled =
            EventTime::DateTime(Utc.with_ymd_and_hms(2025, 6, 2, 19, 0, 0).unwrap());

        let mut high_allday = item(4, "high all day");
        high_allday.priority = Priority::High;

        let mut items = vec![done, low_morning, high_evening, high_allday];
        sort_for_display(&mut items);
        assert_eq!(
            titles(&items),
            vec!["high all day", "high evening", "low morning", "done"]
        );
    }

    #[test]
    fn display_sort_breaks_ties_by_lower_id() {
        let mut items = vec![item(9, "nine"), item(3, "three")];
        sort_for_display(&mut items);
        assert_eq!(titles(&items), vec!["three", "nine"]);
    }

    #[test]
    fn pagination_windows_and_total() {
        let items: Vec<Item> = (1..=7).map(|i| item(i, &format!("t{i}"))).collect();

        assert_eq!(titles(&paginate(&items, 3, 1)), vec!["t1", "t2", "t3"]);
        assert_eq!(titles(&paginate(&items, 3, 3)), vec!["t7"]);
        assert!(paginate(&items, 3, 4).is_empty());
        assert!(paginate(&items, 3, 0).is_empty());
        assert_eq!(total_pages(7, 3), 3);
        assert_eq!(total_pages(6, 3), 2);
        assert_eq!(total_pages(0, 3), 0);
    }
}
