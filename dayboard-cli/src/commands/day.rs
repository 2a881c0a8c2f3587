//! List one day's items, local and mirrored, in display order.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use dayboard_core::Planner;
use owo_colors::OwoColorize;

use crate::render::{Render, day_header};

pub fn run(planner: &Planner, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let items = planner.day_view(date);

    println!("{}", day_header(date));
    if items.is_empty() {
        println!("   {}", "nothing scheduled".dimmed());
    }
    for item in items {
        println!("   {}", item.render());
    }
    Ok(())
}
