//! Row types, validated inputs and response views for the four resources.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Single-customer read. The id is implied by the request path.
#[derive(Debug, Serialize)]
pub struct CustomerView {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Customer> for CustomerView {
    fn from(c: Customer) -> Self {
        Self {
            name: c.name,
            email: c.email,
            phone: c.phone,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CustomerAccountInput {
    pub username: String,
    pub password: String,
    pub customer_id: i64,
}

/// Account joined with its customer. Customer fields are null once the
/// customer row is gone.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct CustomerAccountDetail {
    pub username: String,
    pub password: String,
    pub customer_id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct ProductView {
    pub name: String,
    pub price: f64,
}

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        Self {
            name: p.name,
            price: p.price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub status: String,
    pub customer_id: Option<i64>,
}

/// Row of the order/product association table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderProduct {
    pub order_id: i64,
    pub product_id: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderInput {
    pub date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub status: String,
    pub customer_id: i64,
    pub products: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: i64,
    pub date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub status: String,
    pub customer_id: Option<i64>,
    pub products: Vec<Product>,
}

impl OrderView {
    pub fn new(order: Order, products: Vec<Product>) -> Self {
        Self {
            id: order.id,
            date: order.date,
            delivery_date: order.delivery_date,
            status: order.status,
            customer_id: order.customer_id,
            products,
        }
    }
}

/// Reduced order view for shipment tracking.
#[derive(Debug, Serialize)]
pub struct TrackOrderView {
    pub date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub status: String,
}

impl From<Order> for TrackOrderView {
    fn from(o: Order) -> Self {
        Self {
            date: o.date,
            delivery_date: o.delivery_date,
            status: o.status,
        }
    }
}
