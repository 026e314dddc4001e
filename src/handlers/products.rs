//! Product handlers.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::AppJson;
use crate::models::ProductView;
use crate::response::{created, ok_message};
use crate::service::schemas;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn not_found(id: i64) -> AppError {
    tracing::debug!(id, "product not found");
    AppError::NotFound("Product not found".into())
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let product = state.store.get_product(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(ProductView::from(product)))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.store.list_products().await?))
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input = schemas::product(&body)?;
    let id = state.store.insert_product(&input).await?;
    Ok(created(id, "New product added successfully"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let input = schemas::product(&body)?;
    if !state.store.update_product(id, &input).await? {
        return Err(not_found(id));
    }
    Ok(ok_message("Product details updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.delete_product(id).await? {
        return Err(not_found(id));
    }
    Ok(ok_message("Product removed successfully"))
}
