//! HTTP handlers, one module per resource.

pub mod accounts;
pub mod customers;
pub mod orders;
pub mod products;

use crate::error::AppError;

/// Path ids are integers; anything else is a client error.
fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}
