//! Customer handlers.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::AppJson;
use crate::models::CustomerView;
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
    tracing::debug!(id, "customer not found");
    AppError::NotFound("Customer not found".into())
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let customer = state.store.get_customer(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(CustomerView::from(customer)))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.store.list_customers().await?))
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input = schemas::customer(&body)?;
    let id = state.store.insert_customer(&input).await?;
    tracing::info!(id, "customer created");
    Ok(created(id, "New customer added successfully"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let input = schemas::customer(&body)?;
    if !state.store.update_customer(id, &input).await? {
        return Err(not_found(id));
    }
    Ok(ok_message("Customer details updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.delete_customer(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, "customer removed");
    Ok(ok_message("Customer removed successfully"))
}
