//! Re-fetch the external calendar mirror.

use anyhow::Result;
use dayboard_core::{Planner, Source};
use owo_colors::OwoColorize;

pub async fn run(planner: &Planner) -> Result<()> {
    planner.refresh_external().await;

    let snapshot = planner.snapshot();
    if let Some(message) = snapshot.last_error {
        anyhow::bail!(message);
    }
    let mirrored = snapshot
        .items
        .iter()
        .filter(|i| i.source == Source::External)
        .count();
    println!("{} {} calendar events mirrored", "✓".green(), mirrored);
    Ok(())
}
