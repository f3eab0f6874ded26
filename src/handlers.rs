//! Plant CRUD handlers: list, create, read, update, delete.

use crate::error::{AppError, ErrorResponse};
use crate::model::{NewPlant, Plant, PlantPatch};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

/// Only plain ASCII digits name a row; signs, whitespace and overflow do not.
fn parse_id(id_str: &str) -> Result<i64, AppError> {
    if id_str.is_empty() || !id_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound);
    }
    id_str.parse().map_err(|_| AppError::NotFound)
}

/// An unreadable body (over the size limit, broken stream) is a rejected write like any other.
fn parse_object(body: Result<Bytes, BytesRejection>) -> Result<Map<String, Value>, AppError> {
    let body = body.map_err(|e| AppError::Validation(format!("body could not be read: {}", e.body_text())))?;
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("body is not valid JSON: {}", e)))?;
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::Validation("body must be a JSON object".into())),
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Plant>>, ErrorResponse> {
    let detail = state.error_detail;
    let plants = state.plants.find_all().await.map_err(|e| e.with_detail(detail))?;
    Ok(Json(plants))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let detail = state.error_detail;
    let new = parse_object(body)
        .and_then(|b| NewPlant::from_body(&b))
        .map_err(|e| e.with_detail(detail))?;
    let plant = state.plants.insert(&new).await.map_err(|e| e.with_detail(detail))?;
    tracing::info!(id = plant.id, "plant created");
    Ok((StatusCode::CREATED, Json(plant)))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Plant>, ErrorResponse> {
    let detail = state.error_detail;
    let id = parse_id(&id_str).map_err(|e| e.with_detail(detail))?;
    let plant = state
        .plants
        .find_by_id(id)
        .await
        .and_then(|p| p.ok_or(AppError::NotFound))
        .map_err(|e| e.with_detail(detail))?;
    Ok(Json(plant))
}

/// Existence is checked before the body is judged, so a missing id is 404 whatever the body.
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Plant>, ErrorResponse> {
    let detail = state.error_detail;
    let id = parse_id(&id_str).map_err(|e| e.with_detail(detail))?;
    if state
        .plants
        .find_by_id(id)
        .await
        .map_err(|e| e.with_detail(detail))?
        .is_none()
    {
        return Err(AppError::NotFound.with_detail(detail));
    }
    let patch = parse_object(body)
        .and_then(|b| PlantPatch::from_body(&b))
        .map_err(|e| e.with_detail(detail))?;
    let plant = state
        .plants
        .update(id, &patch)
        .await
        .and_then(|p| p.ok_or(AppError::NotFound))
        .map_err(|e| e.with_detail(detail))?;
    tracing::info!(id, "plant updated");
    Ok(Json(plant))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, ErrorResponse> {
    let detail = state.error_detail;
    let id = parse_id(&id_str).map_err(|e| e.with_detail(detail))?;
    let deleted = state.plants.delete(id).await.map_err(|e| e.with_detail(detail))?;
    if !deleted {
        return Err(AppError::NotFound.with_detail(detail));
    }
    tracing::info!(id, "plant deleted");
    Ok(StatusCode::NO_CONTENT)
}
