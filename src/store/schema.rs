//! Table DDL applied at startup. Idempotent: every statement is IF NOT EXISTS.

use crate::error::AppError;
use sqlx::PgPool;

const DDL: &[(&str, &str)] = &[
    (
        "customers",
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(320),
            phone VARCHAR(15)
        )
        "#,
    ),
    (
        "customer_accounts",
        r#"
        CREATE TABLE IF NOT EXISTS customer_accounts (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(255) NOT NULL UNIQUE,
            password VARCHAR(255) NOT NULL,
            customer_id BIGINT REFERENCES customers (id) ON DELETE SET NULL
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            price DOUBLE PRECISION NOT NULL CHECK (price >= 0)
        )
        "#,
    ),
    (
        "orders",
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            date DATE NOT NULL,
            delivery_date DATE NOT NULL,
            status TEXT NOT NULL,
            customer_id BIGINT REFERENCES customers (id) ON DELETE SET NULL
        )
        "#,
    ),
    (
        "order_products",
        r#"
        CREATE TABLE IF NOT EXISTS order_products (
            order_id BIGINT NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
            product_id BIGINT NOT NULL REFERENCES products (id) ON DELETE CASCADE,
            PRIMARY KEY (order_id, product_id)
        )
        "#,
    ),
];

/// Create all tables in dependency order.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for (table, ddl) in DDL {
        tracing::debug!(table = %table, "ensure table");
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
