//! Terminal rendering traits for dayboard types.
//!
//! Extension traits that add colored output to core types using
//! owo_colors, so commands only deal in strings.

use chrono::NaiveDate;
use dayboard_core::{EventTime, Item, Priority, Status};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Status {
    fn render(&self) -> String {
        match self {
            Status::Todo => "○".to_string(),
            Status::Doing => "◐".yellow().to_string(),
            Status::Done => "●".green().to_string(),
        }
    }
}

impl Render for Priority {
    fn render(&self) -> String {
        match self {
            Priority::High => "high".red().to_string(),
            Priority::Medium => "med".yellow().to_string(),
            Priority::Low => "low".dimmed().to_string(),
        }
    }
}

impl Render for Item {
    fn render(&self) -> String {
        let mut line = format!("{} {}", self.status.render(), self.title);

        if let EventTime::DateTime(dt) = &self.scheduled {
            line.push_str(&format!(" {}", dt.format("%H:%M").dimmed()));
        }
        line.push_str(&format!(" [{}]", self.priority.render()));
        if let Some(category) = &self.category {
            line.push_str(&format!(" {}", format!("#{category}").cyan()));
        }
        line.push_str(&format!(" {}", format!("({})", self.id).dimmed()));

        line
    }
}

pub fn column_header(status: Status) -> String {
    let label = status.to_string().to_uppercase();
    match status {
        Status::Todo => label.bold().to_string(),
        Status::Doing => label.yellow().bold().to_string(),
        Status::Done => label.green().bold().to_string(),
    }
}

pub fn day_header(date: NaiveDate) -> String {
    format!("{}", date.format("%a %Y-%m-%d")).bold().to_string()
}
