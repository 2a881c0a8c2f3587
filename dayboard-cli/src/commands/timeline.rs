//! Gantt-style timeline rendered as character bars.

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use dayboard_core::{Planner, Priority, TimelineWindow};
use owo_colors::OwoColorize;

/// Character cells per day; bars snap to this grid.
const CELLS_PER_DAY: f32 = 2.0;

pub fn run(planner: &Planner, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let from = from.unwrap_or_else(|| Utc::now().date_naive());
    let to = to.unwrap_or(from + Duration::days(13));
    if to < from {
        anyhow::bail!("timeline range ends before it starts");
    }

    let window = TimelineWindow::new(from, to, CELLS_PER_DAY);
    let bars = planner.timeline(&window);

    println!(
        "{}",
        format!("{} .. {} ({} days)", from, to, window.num_days()).bold()
    );
    if bars.is_empty() {
        println!("{}", "nothing in this window".dimmed());
        return Ok(());
    }

    for bar in bars {
        let offset = " ".repeat(bar.left as usize);
        let fill = "▇".repeat((bar.width as usize).max(1));
        let painted = if bar.done {
            fill.dimmed().to_string()
        } else {
            match bar.priority {
                Priority::High => fill.red().to_string(),
                Priority::Medium => fill.yellow().to_string(),
                Priority::Low => fill.blue().to_string(),
            }
        };
        println!("{offset}{painted}  {}", bar.title);
    }
    Ok(())
}
