//! Bar geometry for the horizontally scrollable timeline.
//!
//! Converts a visible day range plus the merged items into pixel-space
//! bars with a fixed per-day column width. The computation is continuous
//! (dates map to fractional x-coordinates) and the result is snapped to
//! column boundaries so bars line up with the day grid.

use chrono::NaiveDate;
use serde::Serialize;

use crate::item::{Item, ItemId, Priority};
use crate::views::sort_for_display;

/// The visible window: an inclusive day range and the column width.
///
/// Callers reject an empty or inverted range before building a window.
#[derive(Debug, Clone)]
pub struct TimelineWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub day_width: f32,
}

/// One laid-out bar, in pixels from the window's left edge.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineBar {
    pub item_id: ItemId,
    pub title: String,
    pub priority: Priority,
    pub done: bool,
    /// Row in the fixed visual order (shared with the list views).
    pub row: usize,
    pub left: f32,
    pub width: f32,
}

impl TimelineWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, day_width: f32) -> Self {
        TimelineWindow { start, end, day_width }
    }

    /// Days in the window, counting both endpoints.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn total_width(&self) -> f32 {
        self.num_days() as f32 * self.day_width
    }

    /// Continuous date-to-x mapping, clamped to the window's pixel range.
    fn x(&self, date: NaiveDate) -> f32 {
        let days = (date - self.start).num_days() as f32;
        let raw = days / self.num_days() as f32 * self.total_width();
        raw.clamp(0.0, self.total_width())
    }

    /// Lay out every item whose span intersects the window. Items are
    /// rowed in display order; spans are clamped to the window, given a
    /// one-column minimum width, and snapped to the day grid.
    pub fn layout(&self, items: &[Item]) -> Vec<TimelineBar> {
        let mut visible: Vec<Item> = items
            .iter()
            .filter(|i| i.span_start() <= self.end && i.span_end() >= self.start)
            .cloned()
            .collect();
        sort_for_display(&mut visible);

        visible
            .iter()
            .enumerate()
            .map(|(row, item)| {
                let effective_start = item.span_start().max(self.start);
                let effective_end = item.span_end().min(self.end);

                let raw_left = self.x(effective_start);
                let raw_width = (self.x(effective_end) - raw_left).max(self.day_width);

                let width = snap(raw_width, self.day_width).max(self.day_width);
                let left = snap(raw_left, self.day_width)
                    .min(self.total_width() - width)
                    .max(0.0);

                TimelineBar {
                    item_id: item.id,
                    title: item.title.clone(),
                    priority: item.priority,
                    done: item.is_done(),
                    row,
                    left,
                    width,
                }
            })
            .collect()
    }
}

/// Round to the nearest multiple of the column width.
fn snap(value: f32, column: f32) -> f32 {
    (value / column).round() * column
}
