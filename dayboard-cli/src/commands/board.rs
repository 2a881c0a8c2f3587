//! Show the kanban columns.

use anyhow::Result;
use dayboard_core::{Planner, Status};
use owo_colors::OwoColorize;

use crate::render::{Render, column_header};

pub fn run(planner: &Planner) -> Result<()> {
    for status in Status::ALL {
        let items = planner.list_by_status(status);
        println!("{} ({})", column_header(status), items.len());

        if items.is_empty() {
            println!("   {}", "(empty)".dimmed());
        }
        for item in items {
            println!("   {}", item.render());
        }
        println!();
    }
    Ok(())
}
