//! Core engine for dayboard.
//!
//! This crate provides the planner/kanban engine shared by the dayboard
//! binaries and the website frontend:
//! - a status-partitioned, explicitly ordered item store
//! - a merge of locally-owned items with an external calendar mirror
//! - pure day/week/month/list view projections
//! - Gantt-style timeline bar geometry
//! - the planner facade tying them together with optimistic updates

pub mod calendar;
pub mod config;
pub mod error;
pub mod ident;
pub mod item;
pub mod local;
pub mod merge;
pub mod planner;
pub mod provider;
pub mod repo;
pub mod store;
pub mod timeline;
pub mod views;

pub use calendar::{CalendarProvider, ExternalEvent, ExternalEventPatch, NoCalendar};
pub use config::BoardConfig;
pub use error::{BoardError, BoardResult};
pub use item::{EventTime, Item, ItemDraft, ItemId, ItemPatch, Priority, Source, Status};
pub use local::FileStore;
pub use planner::{Planner, ReadModel};
pub use repo::ItemRepository;
pub use store::PartitionStore;
pub use timeline::{TimelineBar, TimelineWindow};
