mod routes;
mod singleton;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use dayboard_core::provider::{Provider, ProviderConfig};
use dayboard_core::{BoardConfig, CalendarProvider, FileStore, NoCalendar, Planner};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

const DEFAULT_PORT: u16 = 4106;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Ensure only one instance is running
    let _lock = singleton::acquire_lock()?;

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
    if let Err(err) = planner.refresh().await {
        // Serve anyway: the read model carries the error and a later
        // refresh can recover.
        eprintln!("warning: initial load failed: {err}");
    }

    let state = AppState::new(planner);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::items::router())
        .merge(routes::views::router())
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));
    println!("dayboard-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
