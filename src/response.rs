//! Response bodies for writes. Reads serialize their view types directly.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Created {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

pub fn created(id: i64, message: impl Into<String>) -> (StatusCode, Json<Created>) {
    (
        StatusCode::CREATED,
        Json(Created {
            message: message.into(),
            id,
        }),
    )
}

pub fn ok_message(message: impl Into<String>) -> (StatusCode, Json<Message>) {
    (
        StatusCode::OK,
        Json(Message {
            message: message.into(),
        }),
    )
}
