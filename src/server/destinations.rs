use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::error::AppError;
use super::extract::JsonBody;
use super::{AppState, MessageResponse};
use crate::models::{Destination, DestinationDraft};

fn not_found(id: String) -> AppError {
    AppError::NotFound {
        kind: "destination",
        id,
    }
}

pub async fn list_destinations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Destination>>, AppError> {
    Ok(Json(state.destinations.list().await?))
}

pub async fn get_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Destination>, AppError> {
    match state.destinations.get_by_id(&id).await? {
        Some(destination) => Ok(Json(destination)),
        None => Err(not_found(id)),
    }
}

pub async fn create_destination(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<Destination>), AppError> {
    let draft = DestinationDraft::from_payload(payload)?;
    let destination = state.destinations.create(draft).await?;
    Ok((StatusCode::CREATED, Json(destination)))
}

pub async fn update_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody,
) -> Result<Json<Destination>, AppError> {
    Ok(Json(state.destinations.update(&id, patch).await?))
}

pub async fn delete_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.destinations.delete(&id).await?;
    Ok(Json(MessageResponse::new("Destination deleted successfully")))
}

pub async fn destinations_by_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<Vec<Destination>>, AppError> {
    Ok(Json(state.destinations.find_by_country(&country).await?))
}
