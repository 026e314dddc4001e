//! PostgreSQL store tests.
//!
//! These tests require a reachable PostgreSQL server. `DATABASE_URL` selects
//! it (default `postgres://localhost/ecommerce_test`); the database and tables
//! are created if missing.
//!
//! Run with: cargo test -- --ignored

use chrono::NaiveDate;
use ecommerce_api::models::{CustomerAccountInput, CustomerInput, OrderInput, ProductInput};
use ecommerce_api::{ensure_database_exists, ensure_schema, AppError, PgStore, Store};

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/ecommerce_test".into());
    ensure_database_exists(&url).await.expect("create database");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect");
    ensure_schema(&pool).await.expect("schema");
    PgStore::new(pool)
}

/// Usernames must be unique across runs against a shared database.
fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

fn customer() -> CustomerInput {
    CustomerInput {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        phone: "555-0100".into(),
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn customer_crud() {
    let store = store().await;
    let id = store.insert_customer(&customer()).await.unwrap();

    let got = store.get_customer(id).await.unwrap().unwrap();
    assert_eq!(got.name, "Ada");
    assert_eq!(got.email.as_deref(), Some("ada@example.com"));

    let mut changed = customer();
    changed.phone = "555-0199".into();
    assert!(store.update_customer(id, &changed).await.unwrap());
    assert_eq!(store.get_customer(id).await.unwrap().unwrap().phone.as_deref(), Some("555-0199"));

    assert!(store.delete_customer(id).await.unwrap());
    assert!(store.get_customer(id).await.unwrap().is_none());
    assert!(!store.delete_customer(id).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn duplicate_username_is_a_validation_error() {
    let store = store().await;
    let cid = store.insert_customer(&customer()).await.unwrap();
    let account = CustomerAccountInput {
        username: unique("ada"),
        password: "analytical".into(),
        customer_id: cid,
    };
    store.insert_account(&account).await.unwrap();
    assert!(store.username_taken(&account.username, None).await.unwrap());

    let err = store.insert_account(&account).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn account_with_missing_customer_is_bad_request() {
    let store = store().await;
    let account = CustomerAccountInput {
        username: unique("ghost"),
        password: "boo-boo".into(),
        customer_id: i64::MAX,
    };
    let err = store.insert_account(&account).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn deleting_customer_clears_account_link() {
    let store = store().await;
    let cid = store.insert_customer(&customer()).await.unwrap();
    let aid = store
        .insert_account(&CustomerAccountInput {
            username: unique("linked"),
            password: "secret1".into(),
            customer_id: cid,
        })
        .await
        .unwrap();

    store.delete_customer(cid).await.unwrap();
    let detail = store.get_account(aid).await.unwrap().unwrap();
    assert_eq!(detail.customer_id, None);
    assert_eq!(detail.name, None);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn order_links_products() {
    let store = store().await;
    let cid = store.insert_customer(&customer()).await.unwrap();
    let p1 = store
        .insert_product(&ProductInput { name: "Widget".into(), price: 9.99 })
        .await
        .unwrap();
    let p2 = store
        .insert_product(&ProductInput { name: "Gadget".into(), price: 20.0 })
        .await
        .unwrap();

    let found = store.find_products(&[p1, p2, i64::MAX]).await.unwrap();
    assert_eq!(found.len(), 2);

    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let oid = store
        .insert_order(&OrderInput {
            date,
            delivery_date: date.succ_opt().unwrap(),
            status: "processing".into(),
            customer_id: cid,
            products: vec![p1, p2],
        })
        .await
        .unwrap();

    let order = store.get_order(oid).await.unwrap().unwrap();
    assert_eq!(order.date, date);
    assert_eq!(order.customer_id, Some(cid));
    let ids: Vec<i64> = store.order_products(oid).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![p1, p2]);

    store.delete_product(p1).await.unwrap();
    let ids: Vec<i64> = store.order_products(oid).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![p2]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn username_taken_ignores_only_the_given_account() {
    let store = store().await;
    let cid = store.insert_customer(&customer()).await.unwrap();
    let name = unique("shared");
    let owner = store
        .insert_account(&CustomerAccountInput {
            username: name.clone(),
            password: "secret1".into(),
            customer_id: cid,
        })
        .await
        .unwrap();
    let other = store
        .insert_account(&CustomerAccountInput {
            username: unique("other"),
            password: "secret2".into(),
            customer_id: cid,
        })
        .await
        .unwrap();

    assert!(!store.username_taken(&name, Some(owner)).await.unwrap());
    assert!(store.username_taken(&name, Some(other)).await.unwrap());

    let steal = CustomerAccountInput {
        username: name,
        password: "secret2".into(),
        customer_id: cid,
    };
    let err = store.update_account(other, &steal).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn order_with_vanished_product_is_bad_request() {
    let store = store().await;
    let cid = store.insert_customer(&customer()).await.unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let err = store
        .insert_order(&OrderInput {
            date,
            delivery_date: date,
            status: "processing".into(),
            customer_id: cid,
            products: vec![i64::MAX],
        })
        .await
        .unwrap_err();
    let AppError::BadRequest(message) = err else {
        panic!("expected bad request, got {err:?}");
    };
    assert!(message.contains("product IDs"), "{message}");
}
