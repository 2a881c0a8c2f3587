//! Show the 42-cell month grid, one line per week.

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use dayboard_core::Planner;
use owo_colors::OwoColorize;

pub fn run(planner: &Planner, anchor: Option<NaiveDate>) -> Result<()> {
    let anchor = anchor.unwrap_or_else(|| Utc::now().date_naive());
    let grid = planner.month_view(anchor);

    println!("{}", anchor.format("%B %Y").to_string().bold());
    println!(" Mon   Tue   Wed   Thu   Fri   Sat   Sun");

    for week in grid.chunks(7) {
        let mut line = String::new();
        for cell in week {
            // "dd·n" where n is how many items land on that day.
            let token = if cell.items.is_empty() {
                format!("{:2}   ", cell.date.day())
            } else {
                format!("{:2}·{:<2}", cell.date.day(), cell.items.len())
            };
            if cell.is_current_month {
                line.push_str(&format!(" {token}"));
            } else {
                line.push_str(&format!(" {}", token.dimmed()));
            }
        }
        println!("{line}");
    }
    Ok(())
}
