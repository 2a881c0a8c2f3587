//! The external calendar collaborator surface.
//!
//! The board never owns calendar events: it mirrors them. Events arrive
//! through [`CalendarProvider::list_upcoming`], are relabeled into the
//! local id space, and are replaced wholesale on every re-fetch. Mutations
//! that target a mirrored item are routed back here instead of to the
//! persistence collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, BoardResult};
use crate::ident::external_id_to_local_id;
use crate::item::{EventTime, Item, Priority, Source, Status};

/// An event as reported by the external calendar, in its own id space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEvent {
    pub id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// Partial field changes for an external event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalEventPatch {
    pub summary: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

/// The external calendar collaborator.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Events from now through `days_ahead` days out.
    async fn list_upcoming(&self, days_ahead: i64) -> BoardResult<Vec<ExternalEvent>>;

    async fn create(
        &self,
        summary: &str,
        start: EventTime,
        end: EventTime,
    ) -> BoardResult<ExternalEvent>;

    async fn update(
        &self,
        external_id: &str,
        patch: &ExternalEventPatch,
    ) -> BoardResult<ExternalEvent>;

    async fn delete(&self, external_id: &str) -> BoardResult<()>;
}

impl ExternalEvent {
    /// Mirror this event into the item model under its mapped local id.
    ///
    /// Mirrored items always land in Todo at medium priority; their board
    /// position is never meaningful (the views order them by schedule).
    pub fn to_item(&self) -> Item {
        let start_date = self.start.date();
        let end_date = self.end.date();
        let multi_day = end_date > start_date;

        Item {
            id: external_id_to_local_id(&self.id),
            title: self.summary.clone(),
            status: Status::Todo,
            order_index: 0,
            priority: Priority::Medium,
            category: None,
            scheduled: self.start.clone(),
            start_date: multi_day.then_some(start_date),
            end_date: multi_day.then_some(end_date),
            source: Source::External,
            external_ref: Some(self.id.clone()),
        }
    }
}

/// Stand-in provider for boards with no calendar configured: the mirror
/// is always empty and mutation calls fail without side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCalendar;

#[async_trait]
impl CalendarProvider for NoCalendar {
    async fn list_upcoming(&self, _days_ahead: i64) -> BoardResult<Vec<ExternalEvent>> {
        Ok(Vec::new())
    }

    async fn create(
        &self,
        _summary: &str,
        _start: EventTime,
        _end: EventTime,
    ) -> BoardResult<ExternalEvent> {
        Err(BoardError::Provider("no calendar provider configured".into()))
    }

    async fn update(
        &self,
        _external_id: &str,
        _patch: &ExternalEventPatch,
    ) -> BoardResult<ExternalEvent> {
        Err(BoardError::Provider("no calendar provider configured".into()))
    }

    async fn delete(&self, _external_id: &str) -> BoardResult<()> {
        Err(BoardError::Provider("no calendar provider configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn to_item_maps_into_the_negative_id_space() {
        let event = ExternalEvent {
            id: "evt_42".to_string(),
            summary: "Dentist".to_string(),
            start: EventTime::DateTime(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()),
            end: EventTime::DateTime(Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap()),
        };

        let item = event.to_item();
        assert!(item.id < 0);
        assert_eq!(item.id, external_id_to_local_id("evt_42"));
        assert_eq!(item.title, "Dentist");
        assert_eq!(item.source, Source::External);
        assert_eq!(item.external_ref.as_deref(), Some("evt_42"));
        // Single-day events leave the span to default to the scheduled day.
        assert!(item.start_date.is_none());
        assert!(item.end_date.is_none());
    }

    #[test]
    fn to_item_keeps_multi_day_spans() {
        let event = ExternalEvent {
            id: "offsite".to_string(),
            summary: "Team offsite".to_string(),
            start: EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
            end: EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()),
        };

        let item = event.to_item();
        assert_eq!(item.span_start(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(item.span_end(), NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
    }
}
