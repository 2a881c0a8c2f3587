//! Paginated list across every item, optionally filtered by category.

use anyhow::Result;
use dayboard_core::Planner;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(planner: &Planner, category: Option<String>, page: usize) -> Result<()> {
    let page_size = planner.config().page_size;
    let listing = planner.agenda(category.as_deref(), page, page_size);

    if listing.items.is_empty() {
        println!("{}", "nothing on this page".dimmed());
    }
    for item in &listing.items {
        println!("{} {}", item.scheduled_date().format("%m-%d").dimmed(), item.render());
    }
    if listing.total_pages > 1 {
        println!();
        println!("{}", format!("page {}/{}", listing.page, listing.total_pages).dimmed());
    }
    Ok(())
}
