//! Order handlers: place, read, and track.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::AppJson;
use crate::models::{OrderView, TrackOrderView};
use crate::response::created;
use crate::service::schemas;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn not_found(id: i64) -> AppError {
    tracing::debug!(id, "order not found");
    AppError::NotFound("Order not found".into())
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let order = state.store.get_order(id).await?.ok_or_else(|| not_found(id))?;
    let products = state.store.order_products(id).await?;
    Ok(Json(OrderView::new(order, products)))
}

/// Every listed product id must resolve, and each may appear once.
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input = schemas::order(&body)?;
    let found = state.store.find_products(&input.products).await?;
    if found.len() != input.products.len() {
        let unresolved = input.products.len() - found.len();
        return Err(AppError::BadRequest(format!(
            "{} of {} product IDs are invalid",
            unresolved,
            input.products.len()
        )));
    }
    let id = state.store.insert_order(&input).await?;
    tracing::info!(id, products = input.products.len(), "order placed");
    Ok(created(id, "New order placed successfully"))
}

pub async fn track(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let order = state.store.get_order(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(TrackOrderView::from(order)))
}
