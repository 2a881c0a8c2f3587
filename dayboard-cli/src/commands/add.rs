//! Add an item to the board.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use dayboard_core::{EventTime, ItemDraft, Planner, Priority, Status};
use owo_colors::OwoColorize;

use crate::render::Render;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    planner: &Planner,
    title: String,
    date: Option<NaiveDate>,
    status: Option<Status>,
    priority: Option<Priority>,
    category: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let draft = ItemDraft {
        title,
        status: status.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        category,
        scheduled: EventTime::Date(date.unwrap_or_else(|| Utc::now().date_naive())),
        start_date: from,
        end_date: to,
    };

    let item = planner.add(draft)?;
    println!("{} {}", "+".green(), item.render());

    super::finish(planner).await
}
