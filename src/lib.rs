//! E-commerce records API: customers, customer accounts, products and orders
//! over REST, stored in PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, ConfigError};
pub use routes::{app, common_routes, resource_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, PgStore, Store};
