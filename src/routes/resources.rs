//! Resource routes for customers, accounts, products and orders.

use crate::handlers::{accounts, customers, orders, products};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/:id",
            get(customers::read).put(customers::update).delete(customers::delete),
        )
        .route("/customer-accounts", post(accounts::create))
        .route(
            "/customer-accounts/:id",
            get(accounts::read).put(accounts::update).delete(accounts::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::read).put(products::update).delete(products::delete),
        )
        .route("/orders", post(orders::create))
        .route("/orders/:id", get(orders::read))
        .route("/orders/track-order/:id", get(orders::track))
        .with_state(state)
}
