//! The item model.
//!
//! An `Item` is the schedulable unit shared by the kanban board and the
//! calendar mirror: tasks and cards created locally, plus read-only items
//! mirrored from the external calendar. Everything downstream (merge,
//! views, timeline) works exclusively with these types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Item identity. Positive for locally-created items, negative for items
/// relabeled from the external calendar's id space.
pub type ItemId = i64;

/// The three lifecycle stages (the partition key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    Doing,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::Doing, Status::Done];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Todo
    }
}

/// Display priority. `rank` orders High before Medium before Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort key: lower rank sorts first.
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Who owns an item: the board's own store, or the external calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Local,
    External,
}

impl Source {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::External => "external",
        }
    }
}

/// When an item is scheduled: a precise instant, or a whole day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    /// The calendar day this time falls on (the bucketing key for
    /// day/week/month views).
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.date_naive(),
            Self::Date(d) => *d,
        }
    }

    /// Time-of-day sort key. All-day entries sort as midnight, ahead of
    /// any timed entry on the same day.
    pub fn time_of_day(&self) -> NaiveTime {
        match self {
            Self::DateTime(dt) => dt.time(),
            Self::Date(_) => NaiveTime::MIN,
        }
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => *dt,
            Self::Date(d) => d.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

/// A schedulable unit: a task or kanban card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub status: Status,
    /// Position within the item's status partition. Unique per partition;
    /// contiguous from 0 immediately after an add or a move.
    pub order_index: u32,
    pub priority: Priority,
    /// Free-text tag used for filtering and grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The day (and optionally time) the item belongs to.
    pub scheduled: EventTime,
    /// Multi-day span for the timeline; both default to the scheduled day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub source: Source,
    /// Identifier for routing mutations back to the external provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
}

impl Item {
    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    pub fn scheduled_date(&self) -> NaiveDate {
        self.scheduled.date()
    }

    /// First day of the timeline span.
    pub fn span_start(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| self.scheduled_date())
    }

    /// Last day of the timeline span (inclusive).
    pub fn span_end(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| self.scheduled_date())
    }
}

/// Input for creating an item: everything but the store-assigned id and
/// order index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
    pub scheduled: EventTime,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Partial field changes for an update. Fields left as `None` are
/// untouched; a `status` change is applied through the move path so the
/// destination partition stays contiguously numbered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub scheduled: Option<EventTime>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ItemPatch {
    /// Apply every field except `status` (the store owns status changes,
    /// which carry order-index bookkeeping with them).
    pub fn apply_fields(&self, item: &mut Item) {
        if let Some(title) = &self.title {
            item.title = title.trim().to_string();
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
        if let Some(category) = &self.category {
            item.category = Some(category.clone());
        }
        if let Some(scheduled) = &self.scheduled {
            item.scheduled = scheduled.clone();
        }
        if let Some(start_date) = self.start_date {
            item.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            item.end_date = Some(end_date);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.scheduled.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}
