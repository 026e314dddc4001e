//! Request validation: field rules and per-resource schemas.

pub mod schemas;
mod validation;
pub use validation::{FieldErrors, Fields};
