//! In-memory store for router tests. Mirrors the PostgreSQL constraints the
//! handlers rely on: unique usernames, customer foreign keys (SET NULL on
//! delete) and association rows dropped with their product.

use super::Store;
use crate::error::AppError;
use crate::models::{
    Customer, CustomerAccountDetail, CustomerAccountInput, CustomerInput, Order, OrderInput,
    OrderProduct, Product, ProductInput,
};
use crate::service::FieldErrors;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

struct AccountRow {
    id: i64,
    username: String,
    password: String,
    customer_id: Option<i64>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    customers: BTreeMap<i64, Customer>,
    accounts: BTreeMap<i64, AccountRow>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
    order_products: Vec<OrderProduct>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_customer(&self, customer_id: i64) -> Result<(), AppError> {
        if self.customers.contains_key(&customer_id) {
            Ok(())
        } else {
            Err(AppError::BadRequest("customer_id does not reference an existing customer".into()))
        }
    }

    fn check_products(&self, ids: &[i64]) -> Result<(), AppError> {
        if ids.iter().all(|id| self.products.contains_key(id)) {
            Ok(())
        } else {
            Err(AppError::BadRequest("one or more product IDs no longer exist".into()))
        }
    }

    fn check_username(&self, username: &str, except_id: Option<i64>) -> Result<(), AppError> {
        if self.username_taken(username, except_id) {
            let mut errors = FieldErrors::default();
            errors.push("username", "Username already exists.");
            return Err(AppError::Validation(errors));
        }
        Ok(())
    }

    fn username_taken(&self, username: &str, except_id: Option<i64>) -> bool {
        self.accounts
            .values()
            .any(|a| a.username == username && Some(a.id) != except_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_ping: bool,
}

impl MemoryStore {
    /// A store whose ping fails, as if the database were down.
    pub fn unavailable() -> Self {
        Self {
            fail_ping: true,
            ..Self::default()
        }
    }

    pub fn order_count(&self) -> usize {
        self.tables.lock().unwrap().orders.len()
    }

    pub fn account_customer_id(&self, id: i64) -> Option<Option<i64>> {
        self.tables.lock().unwrap().accounts.get(&id).map(|a| a.customer_id)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_ping {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, AppError> {
        Ok(self.tables.lock().unwrap().customers.get(&id).cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.tables.lock().unwrap().customers.values().cloned().collect())
    }

    async fn insert_customer(&self, input: &CustomerInput) -> Result<i64, AppError> {
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        t.customers.insert(
            id,
            Customer {
                id,
                name: input.name.clone(),
                email: Some(input.email.clone()),
                phone: Some(input.phone.clone()),
            },
        );
        Ok(id)
    }

    async fn update_customer(&self, id: i64, input: &CustomerInput) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(match t.customers.get_mut(&id) {
            Some(c) => {
                c.name = input.name.clone();
                c.email = Some(input.email.clone());
                c.phone = Some(input.phone.clone());
                true
            }
            None => false,
        })
    }

    async fn delete_customer(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.customers.remove(&id).is_none() {
            return Ok(false);
        }
        for a in t.accounts.values_mut().filter(|a| a.customer_id == Some(id)) {
            a.customer_id = None;
        }
        for o in t.orders.values_mut().filter(|o| o.customer_id == Some(id)) {
            o.customer_id = None;
        }
        Ok(true)
    }

    async fn get_account(&self, id: i64) -> Result<Option<CustomerAccountDetail>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.accounts.get(&id).map(|a| {
            let customer = a.customer_id.and_then(|cid| t.customers.get(&cid));
            CustomerAccountDetail {
                username: a.username.clone(),
                password: a.password.clone(),
                customer_id: a.customer_id,
                name: customer.map(|c| c.name.clone()),
                email: customer.and_then(|c| c.email.clone()),
                phone: customer.and_then(|c| c.phone.clone()),
            }
        }))
    }

    async fn username_taken(&self, username: &str, except_id: Option<i64>) -> Result<bool, AppError> {
        Ok(self.tables.lock().unwrap().username_taken(username, except_id))
    }

    async fn insert_account(&self, input: &CustomerAccountInput) -> Result<i64, AppError> {
        let mut t = self.tables.lock().unwrap();
        t.check_username(&input.username, None)?;
        t.check_customer(input.customer_id)?;
        let id = t.next_id();
        t.accounts.insert(
            id,
            AccountRow {
                id,
                username: input.username.clone(),
                password: input.password.clone(),
                customer_id: Some(input.customer_id),
            },
        );
        Ok(id)
    }

    async fn update_account(&self, id: i64, input: &CustomerAccountInput) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        if !t.accounts.contains_key(&id) {
            return Ok(false);
        }
        t.check_username(&input.username, Some(id))?;
        t.check_customer(input.customer_id)?;
        if let Some(a) = t.accounts.get_mut(&id) {
            a.username = input.username.clone();
            a.password = input.password.clone();
            a.customer_id = Some(input.customer_id);
        }
        Ok(true)
    }

    async fn delete_account(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.lock().unwrap().accounts.remove(&id).is_some())
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.tables.lock().unwrap().products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.tables.lock().unwrap().products.values().cloned().collect())
    }

    async fn find_products(&self, ids: &[i64]) -> Result<Vec<Product>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn insert_product(&self, input: &ProductInput) -> Result<i64, AppError> {
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        t.products.insert(
            id,
            Product {
                id,
                name: input.name.clone(),
                price: input.price,
            },
        );
        Ok(id)
    }

    async fn update_product(&self, id: i64, input: &ProductInput) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(match t.products.get_mut(&id) {
            Some(p) => {
                p.name = input.name.clone();
                p.price = input.price;
                true
            }
            None => false,
        })
    }

    async fn delete_product(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.products.remove(&id).is_none() {
            return Ok(false);
        }
        t.order_products.retain(|link| link.product_id != id);
        Ok(true)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, AppError> {
        Ok(self.tables.lock().unwrap().orders.get(&id).cloned())
    }

    async fn order_products(&self, order_id: i64) -> Result<Vec<Product>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut products: Vec<Product> = t
            .order_products
            .iter()
            .filter(|link| link.order_id == order_id)
            .filter_map(|link| t.products.get(&link.product_id).cloned())
            .collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn insert_order(&self, input: &OrderInput) -> Result<i64, AppError> {
        let mut t = self.tables.lock().unwrap();
        t.check_customer(input.customer_id)?;
        t.check_products(&input.products)?;
        let order_id = t.next_id();
        t.orders.insert(
            order_id,
            Order {
                id: order_id,
                date: input.date,
                delivery_date: input.delivery_date,
                status: input.status.clone(),
                customer_id: Some(input.customer_id),
            },
        );
        t.order_products
            .extend(input.products.iter().map(|&product_id| OrderProduct { order_id, product_id }));
        Ok(order_id)
    }
}
