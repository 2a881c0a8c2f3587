//! Edit an item's fields. Edits to calendar-mirrored items are routed to
//! the provider and show up after the mirror re-fetch.

use anyhow::Result;
use chrono::NaiveDate;
use dayboard_core::{EventTime, ItemId, ItemPatch, Planner, Priority, Status};
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(
    planner: &Planner,
    id: ItemId,
    title: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    category: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let patch = ItemPatch {
        title,
        status,
        priority,
        category,
        scheduled: date.map(EventTime::Date),
        start_date: None,
        end_date: None,
    };
    if patch.is_empty() {
        anyhow::bail!("nothing to change");
    }

    let item = planner.update(id, patch)?;
    println!("{} {}", "~".yellow(), item.render());

    super::finish(planner).await
}
