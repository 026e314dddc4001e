//! Customer account handlers. Passwords are stored and returned as given.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::AppJson;
use crate::models::CustomerAccountInput;
use crate::response::{created, ok_message};
use crate::service::schemas;
use crate::state::AppState;
use crate::store::Store;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn not_found(id: i64) -> AppError {
    tracing::debug!(id, "customer account not found");
    AppError::NotFound("Customer account not found".into())
}

/// Schema check plus username uniqueness, reported together.
async fn load(store: &dyn Store, body: &Value, except_id: Option<i64>) -> Result<CustomerAccountInput, AppError> {
    let (input, mut errors) = schemas::customer_account(body);
    if let Some(username) = body.get("username").and_then(Value::as_str) {
        if store.username_taken(username, except_id).await? {
            errors.push("username", "Username already exists.");
        }
    }
    Ok(errors.finish(input)?)
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let account = state.store.get_account(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(account))
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input = load(state.store.as_ref(), &body, None).await?;
    let id = state.store.insert_account(&input).await?;
    tracing::info!(id, customer_id = input.customer_id, "customer account created");
    Ok(created(id, "New customer account added successfully"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let input = load(state.store.as_ref(), &body, Some(id)).await?;
    if !state.store.update_account(id, &input).await? {
        return Err(not_found(id));
    }
    Ok(ok_message("Customer account details updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.delete_account(id).await? {
        return Err(not_found(id));
    }
    Ok(ok_message("Customer account removed successfully"))
}
