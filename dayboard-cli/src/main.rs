mod commands;
mod render;

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dayboard_core::provider::{Provider, ProviderConfig};
use dayboard_core::{
    BoardConfig, CalendarProvider, FileStore, ItemId, NoCalendar, Planner, Priority, Status,
};

#[derive(Parser)]
#[command(name = "dayboard")]
#[command(about = "Plan your days: kanban board, calendar views, and a timeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item to the board
    Add {
        title: String,

        /// Day the item belongs to (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Column to add into: todo | doing | done
        #[arg(short, long)]
        status: Option<Status>,

        /// high | medium | low
        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long)]
        category: Option<String>,

        /// Timeline span start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Timeline span end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Show the kanban columns
    Board,
    /// List one day's items
    Day { date: Option<NaiveDate> },
    /// Show the week strip containing a date
    Week { anchor: Option<NaiveDate> },
    /// Show the month grid containing a date
    Month { anchor: Option<NaiveDate> },
    /// Paginated list across every item
    Agenda {
        /// Only show items with this category
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Gantt-style timeline of item spans
    Timeline {
        /// Window start (YYYY-MM-DD, default today)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Window end (YYYY-MM-DD, default two weeks out)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Move an item to a column and position
    Move {
        id: ItemId,
        status: Status,

        /// Target position in the column (default: the end)
        index: Option<usize>,
    },
    /// Edit an item's fields
    Edit {
        id: ItemId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        status: Option<Status>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long)]
        category: Option<String>,

        /// Reschedule to this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Delete an item
    Rm { id: ItemId },
    /// Re-fetch the external calendar mirror
    Pull,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let planner = open_planner().await?;

    match cli.command {
        Commands::Add {
            title,
            date,
            status,
            priority,
            category,
            from,
            to,
        } => commands::add::run(&planner, title, date, status, priority, category, from, to).await,
        Commands::Board => commands::board::run(&planner),
        Commands::Day { date } => commands::day::run(&planner, date),
        Commands::Week { anchor } => commands::week::run(&planner, anchor),
        Commands::Month { anchor } => commands::month::run(&planner, anchor),
        Commands::Agenda { category, page } => commands::agenda::run(&planner, category, page),
        Commands::Timeline { from, to } => commands::timeline::run(&planner, from, to),
        Commands::Move { id, status, index } => {
            commands::mv::run(&planner, id, status, index).await
        }
        Commands::Edit {
            id,
            title,
            status,
            priority,
            category,
            date,
        } => commands::edit::run(&planner, id, title, status, priority, category, date).await,
        Commands::Rm { id } => commands::rm::run(&planner, id).await,
        Commands::Pull => commands::pull::run(&planner).await,
    }
}

async fn open_planner() -> Result<Planner> {
    let config = BoardConfig::load()?;
    let repo = Arc::new(FileStore::open(config.data_path()?)?);
    let calendar: Arc<dyn CalendarProvider> = match &config.calendar {
        Some(section) => Arc::new(Provider::new(
            &section.provider,
            ProviderConfig(section.config.clone()),
        )),
        None => Arc::new(NoCalendar),
    };

    let planner = Planner::new(repo, calendar, config);
    planner.refresh().await?;
    Ok(planner)
}
