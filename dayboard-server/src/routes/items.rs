//! Item endpoints: the read model and the board mutations.
//!
//! Mutations return the optimistic result immediately; settlement against
//! the collaborators is observed through later GET /items responses.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;

use dayboard_core::{EventTime, Item, ItemDraft, ItemId, ItemPatch, ReadModel, Status};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", patch(update_item).delete(delete_item))
        .route("/items/{id}/move", post(move_item))
        .route("/calendar/events", post(create_calendar_event))
        .route("/refresh", post(refresh))
}

/// GET /items - the current read model
async fn list_items(State(state): State<AppState>) -> Json<ReadModel> {
    Json(state.planner().snapshot())
}

/// POST /items - create an item on the board
async fn create_item(
    State(state): State<AppState>,
    Json(draft): Json<ItemDraft>,
) -> Result<Json<Item>, AppError> {
    let item = state.planner().add(draft)?;
    Ok(Json(item))
}

/// PATCH /items/:id - partial update, routed by the item's source
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(fields): Json<ItemPatch>,
) -> Result<Json<Item>, AppError> {
    let item = state.planner().update(id, fields)?;
    Ok(Json(item))
}

/// DELETE /items/:id
async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<StatusCode, AppError> {
    state.planner().delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request body for a drag-and-drop move
#[derive(Deserialize)]
pub struct MoveRequest {
    pub status: Status,
    pub index: usize,
}

/// POST /items/:id/move - move a card, renumbering its partitions
async fn move_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Item>, AppError> {
    let item = state.planner().move_item(id, req.status, req.index)?;
    Ok(Json(item))
}

/// Request body for creating an event on the external calendar
#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// POST /calendar/events - create an event with the calendar provider
async fn create_calendar_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<StatusCode, AppError> {
    state
        .planner()
        .add_to_calendar(req.summary, req.start, req.end)?;
    Ok(StatusCode::ACCEPTED)
}

/// POST /refresh - reload both sources
async fn refresh(State(state): State<AppState>) -> Result<Json<ReadModel>, AppError> {
    state.planner().refresh().await?;
    Ok(Json(state.planner().snapshot()))
}
