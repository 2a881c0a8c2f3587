//! View and timeline endpoints: pure reads over the merged collection.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use dayboard_core::views::{AgendaPage, DayBucket, MonthCell};
use dayboard_core::{BoardError, Item, TimelineBar, TimelineWindow};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/views/day", get(day))
        .route("/views/week", get(week))
        .route("/views/month", get(month))
        .route("/views/list", get(list))
        .route("/timeline", get(timeline))
}

#[derive(Deserialize)]
pub struct DayParams {
    pub date: Option<NaiveDate>,
}

/// GET /views/day?date=YYYY-MM-DD - that day's items, display-sorted
async fn day(State(state): State<AppState>, Query(params): Query<DayParams>) -> Json<Vec<Item>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    Json(state.planner().day_view(date))
}

#[derive(Deserialize)]
pub struct AnchorParams {
    pub anchor: Option<NaiveDate>,
}

/// GET /views/week?anchor=YYYY-MM-DD - the 7-day strip containing anchor
async fn week(
    State(state): State<AppState>,
    Query(params): Query<AnchorParams>,
) -> Json<Vec<DayBucket>> {
    let anchor = params.anchor.unwrap_or_else(|| Utc::now().date_naive());
    Json(state.planner().week_view(anchor))
}

/// GET /views/month?anchor=YYYY-MM-DD - the 42-cell grid for anchor's month
async fn month(
    State(state): State<AppState>,
    Query(params): Query<AnchorParams>,
) -> Json<Vec<MonthCell>> {
    let anchor = params.anchor.unwrap_or_else(|| Utc::now().date_naive());
    Json(state.planner().month_view(anchor))
}

#[derive(Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

/// GET /views/list?category=&page=&size= - paginated agenda
async fn list(State(state): State<AppState>, Query(params): Query<ListParams>) -> Json<AgendaPage> {
    let page = params.page.unwrap_or(1);
    let size = params.size.unwrap_or(state.planner().config().page_size);
    Json(state.planner().agenda(params.category.as_deref(), page, size))
}

#[derive(Deserialize)]
pub struct TimelineParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub day_width: Option<f32>,
}

#[derive(Serialize)]
pub struct TimelineResponse {
    pub total_width: f32,
    pub bars: Vec<TimelineBar>,
}

/// GET /timeline?from=&to=&day_width= - bar geometry for the window
async fn timeline(
    State(state): State<AppState>,
    Query(params): Query<TimelineParams>,
) -> Result<Json<TimelineResponse>, AppError> {
    if params.to < params.from {
        return Err(BoardError::Validation(format!(
            "timeline range ends ({}) before it starts ({})",
            params.to, params.from
        ))
        .into());
    }
    let day_width = params.day_width.unwrap_or(state.planner().config().day_width);
    if day_width <= 0.0 {
        return Err(BoardError::Validation("day_width must be positive".into()).into());
    }

    let window = TimelineWindow::new(params.from, params.to, day_width);
    Ok(Json(TimelineResponse {
        total_width: window.total_width(),
        bars: state.planner().timeline(&window),
    }))
}
