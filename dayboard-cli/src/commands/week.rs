//! Show the 7-day strip for the week containing a date.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use dayboard_core::Planner;
use owo_colors::OwoColorize;

use crate::render::{Render, day_header};

pub fn run(planner: &Planner, anchor: Option<NaiveDate>) -> Result<()> {
    let anchor = anchor.unwrap_or_else(|| Utc::now().date_naive());

    for bucket in planner.week_view(anchor) {
        let marker = if bucket.date == anchor { "▸" } else { " " };
        println!("{} {}", marker, day_header(bucket.date));
        if bucket.items.is_empty() {
            println!("     {}", "—".dimmed());
        }
        for item in bucket.items {
            println!("     {}", item.render());
        }
    }
    Ok(())
}
