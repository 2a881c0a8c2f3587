//! Move an item to a column and position.

use anyhow::Result;
use dayboard_core::{ItemId, Planner, Status};
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(
    planner: &Planner,
    id: ItemId,
    status: Status,
    index: Option<usize>,
) -> Result<()> {
    // No index means the end of the column; the store clamps.
    let index = index.unwrap_or(usize::MAX);
    let item = planner.move_item(id, status, index)?;
    println!("{} {}", "~".yellow(), item.render());

    super::finish(planner).await
}
