//! Delete an item.

use anyhow::Result;
use dayboard_core::{ItemId, Planner};
use owo_colors::OwoColorize;

pub async fn run(planner: &Planner, id: ItemId) -> Result<()> {
    planner.delete(id)?;
    println!("{} deleted {}", "-".red(), id);

    super::finish(planner).await
}
