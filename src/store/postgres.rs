//! PostgreSQL-backed store.

use super::Store;
use crate::error::AppError;
use crate::models::{
    Customer, CustomerAccountDetail, CustomerAccountInput, CustomerInput, Order, OrderInput, OrderProduct,
    Product, ProductInput,
};
use crate::service::FieldErrors;
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turns constraint violations into client errors; everything else stays a
/// database error.
fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        let violation = if db.is_unique_violation() {
            Some(Violation::Unique)
        } else if db.is_foreign_key_violation() {
            Some(Violation::ForeignKey)
        } else {
            None
        };
        if let Some(err) = violation.and_then(|v| client_error(v, db.constraint())) {
            return err;
        }
    }
    AppError::Db(e)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Violation {
    Unique,
    ForeignKey,
}

/// Client error for a violated constraint, by its default PostgreSQL name.
fn client_error(violation: Violation, constraint: Option<&str>) -> Option<AppError> {
    match (violation, constraint?) {
        (Violation::Unique, "customer_accounts_username_key") => {
            let mut errors = FieldErrors::default();
            errors.push("username", "Username already exists.");
            Some(AppError::Validation(errors))
        }
        (Violation::ForeignKey, "customer_accounts_customer_id_fkey" | "orders_customer_id_fkey") => Some(
            AppError::BadRequest("customer_id does not reference an existing customer".into()),
        ),
        (Violation::ForeignKey, "order_products_product_id_fkey") => Some(AppError::BadRequest(
            "one or more product IDs no longer exist".into(),
        )),
        _ => None,
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, Customer>("SELECT id, name, email, phone FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let rows = sqlx::query_as::<_, Customer>("SELECT id, name, email, phone FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_customer(&self, input: &CustomerInput) -> Result<i64, AppError> {
        let (id,): (i64,) =
            sqlx::query_as("INSERT INTO customers (name, email, phone) VALUES ($1, $2, $3) RETURNING id")
                .bind(&input.name)
                .bind(&input.email)
                .bind(&input.phone)
                .fetch_one(&self.pool)
                .await?;
        tracing::debug!(id, "customer inserted");
        Ok(id)
    }

    async fn update_customer(&self, id: i64, input: &CustomerInput) -> Result<bool, AppError> {
        let done = sqlx::query("UPDATE customers SET name = $2, email = $3, phone = $4 WHERE id = $1")
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete_customer(&self, id: i64) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn get_account(&self, id: i64) -> Result<Option<CustomerAccountDetail>, AppError> {
        let row = sqlx::query_as::<_, CustomerAccountDetail>(
            r#"
            SELECT a.username, a.password, a.customer_id, c.name, c.email, c.phone
            FROM customer_accounts a
            LEFT JOIN customers c ON c.id = a.customer_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn username_taken(&self, username: &str, except_id: Option<i64>) -> Result<bool, AppError> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM customer_accounts WHERE username = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(username)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn insert_account(&self, input: &CustomerAccountInput) -> Result<i64, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO customer_accounts (username, password, customer_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.username)
        .bind(&input.password)
        .bind(input.customer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(id)
    }

    async fn update_account(&self, id: i64, input: &CustomerAccountInput) -> Result<bool, AppError> {
        let done = sqlx::query(
            "UPDATE customer_accounts SET username = $2, password = $3, customer_id = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(&input.username)
        .bind(&input.password)
        .bind(input.customer_id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete_account(&self, id: i64) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM customer_accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, Product>("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>("SELECT id, name, price FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_products(&self, ids: &[i64]) -> Result<Vec<Product>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Product>("SELECT id, name, price FROM products WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_product(&self, input: &ProductInput) -> Result<i64, AppError> {
        let (id,): (i64,) = sqlx::query_as("INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id")
            .bind(&input.name)
            .bind(input.price)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update_product(&self, id: i64, input: &ProductInput) -> Result<bool, AppError> {
        let done = sqlx::query("UPDATE products SET name = $2, price = $3 WHERE id = $1")
            .bind(id)
            .bind(&input.name)
            .bind(input.price)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete_product(&self, id: i64) -> Result<bool, AppError> {
        // order_products rows go with it (ON DELETE CASCADE).
        let done = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, AppError> {
        let row = sqlx::query_as::<_, Order>(
            "SELECT id, date, delivery_date, status, customer_id FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn order_products(&self, order_id: i64) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.price
            FROM order_products op
            JOIN products p ON p.id = op.product_id
            WHERE op.order_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_order(&self, input: &OrderInput) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;
        let (order_id,): (i64,) = sqlx::query_as(
            "INSERT INTO orders (date, delivery_date, status, customer_id) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(input.date)
        .bind(input.delivery_date)
        .bind(&input.status)
        .bind(input.customer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let links = input.products.iter().map(|&product_id| OrderProduct { order_id, product_id });
        for link in links {
            sqlx::query("INSERT INTO order_products (order_id, product_id) VALUES ($1, $2)")
                .bind(link.order_id)
                .bind(link.product_id)
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;
        }
        tx.commit().await?;
        tracing::debug!(order_id, products = input.products.len(), "order inserted");
        Ok(order_id)
    }
}
