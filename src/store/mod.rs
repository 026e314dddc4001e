//! Persistence for customers, accounts, products and orders.

mod postgres;
mod schema;

#[cfg(test)]
pub(crate) mod memory;

pub use postgres::PgStore;
pub use schema::ensure_schema;

use crate::error::AppError;
use crate::models::{
    Customer, CustomerAccountDetail, CustomerAccountInput, CustomerInput, Order, OrderInput, Product,
    ProductInput,
};
use async_trait::async_trait;
use sqlx::ConnectOptions;
use std::str::FromStr;

/// Storage operations used by the HTTP handlers. Each write commits on its own.
///
/// `update_*` and `delete_*` return `false` when no row has the given id.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, AppError>;
    async fn list_customers(&self) -> Result<Vec<Customer>, AppError>;
    async fn insert_customer(&self, input: &CustomerInput) -> Result<i64, AppError>;
    async fn update_customer(&self, id: i64, input: &CustomerInput) -> Result<bool, AppError>;
    /// Orders and accounts of the customer stay, with their customer_id cleared.
    async fn delete_customer(&self, id: i64) -> Result<bool, AppError>;

    async fn get_account(&self, id: i64) -> Result<Option<CustomerAccountDetail>, AppError>;
    /// True if another account (not `except_id`) already uses `username`.
    async fn username_taken(&self, username: &str, except_id: Option<i64>) -> Result<bool, AppError>;
    async fn insert_account(&self, input: &CustomerAccountInput) -> Result<i64, AppError>;
    async fn update_account(&self, id: i64, input: &CustomerAccountInput) -> Result<bool, AppError>;
    async fn delete_account(&self, id: i64) -> Result<bool, AppError>;

    async fn get_product(&self, id: i64) -> Result<Option<Product>, AppError>;
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;
    /// Products whose id is in `ids`; unknown ids are skipped.
    async fn find_products(&self, ids: &[i64]) -> Result<Vec<Product>, AppError>;
    async fn insert_product(&self, input: &ProductInput) -> Result<i64, AppError>;
    async fn update_product(&self, id: i64, input: &ProductInput) -> Result<bool, AppError>;
    /// Also drops the product from every order it was part of.
    async fn delete_product(&self, id: i64) -> Result<bool, AppError>;

    async fn get_order(&self, id: i64) -> Result<Option<Order>, AppError>;
    async fn order_products(&self, order_id: i64) -> Result<Vec<Product>, AppError>;
    /// Inserts the order and its association rows in one transaction.
    /// `input.products` must already be resolved against the product table.
    async fn insert_order(&self, input: &OrderInput) -> Result<i64, AppError>;
}

/// Create the database named in `database_url` if it does not exist, by
/// connecting to the `postgres` maintenance database on the same server.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
