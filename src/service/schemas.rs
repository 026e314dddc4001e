//! Per-resource input schemas: raw JSON body in, typed input or field errors out.

use super::validation::{FieldErrors, Fields};
use crate::models::{CustomerAccountInput, CustomerInput, OrderInput, ProductInput};
use serde_json::Value;

const NAME_MAX: usize = 255;
const EMAIL_MAX: usize = 320;
const PHONE_MAX: usize = 15;
const USERNAME_MAX: usize = 255;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 255;

pub fn customer(body: &Value) -> Result<CustomerInput, FieldErrors> {
    let mut f = Fields::new(body, &["name", "email", "phone"]);
    let name = f.string("name");
    f.min_length("name", name.as_deref(), 1);
    f.max_length("name", name.as_deref(), NAME_MAX);
    let email = f.string("email");
    f.email("email", email.as_deref());
    f.max_length("email", email.as_deref(), EMAIL_MAX);
    let phone = f.string("phone");
    f.max_length("phone", phone.as_deref(), PHONE_MAX);

    let input = match (name, email, phone) {
        (Some(name), Some(email), Some(phone)) => Some(CustomerInput { name, email, phone }),
        _ => None,
    };
    f.errors.finish(input)
}

pub fn product(body: &Value) -> Result<ProductInput, FieldErrors> {
    let mut f = Fields::new(body, &["name", "price"]);
    let name = f.string("name");
    f.min_length("name", name.as_deref(), 1);
    f.max_length("name", name.as_deref(), NAME_MAX);
    let price = f.float("price");
    f.minimum("price", price, 0.0);

    let input = match (name, price) {
        (Some(name), Some(price)) => Some(ProductInput { name, price }),
        _ => None,
    };
    f.errors.finish(input)
}

/// Account fields only. Username uniqueness needs the store and is checked
/// by the caller, which adds to the returned errors.
pub fn customer_account(body: &Value) -> (Option<CustomerAccountInput>, FieldErrors) {
    let mut f = Fields::new(body, &["username", "password", "customer_id"]);
    let username = f.string("username");
    f.max_length("username", username.as_deref(), USERNAME_MAX);
    let password = f.string("password");
    f.min_length("password", password.as_deref(), PASSWORD_MIN);
    f.max_length("password", password.as_deref(), PASSWORD_MAX);
    let customer_id = f.integer("customer_id");

    let input = match (username, password, customer_id) {
        (Some(username), Some(password), Some(customer_id)) => Some(CustomerAccountInput {
            username,
            password,
            customer_id,
        }),
        _ => None,
    };
    (input, f.errors)
}

pub fn order(body: &Value) -> Result<OrderInput, FieldErrors> {
    let mut f = Fields::new(
        body,
        &["date", "delivery_date", "status", "customer_id", "products"],
    );
    let date = f.date("date");
    let delivery_date = f.date("delivery_date");
    let status = f.string("status");
    let customer_id = f.integer("customer_id");
    let products = f.integer_list("products");

    let input = match (date, delivery_date, status, customer_id, products) {
        (Some(date), Some(delivery_date), Some(status), Some(customer_id), Some(products)) => {
            Some(OrderInput {
                date,
                delivery_date,
                status,
                customer_id,
                products,
            })
        }
        _ => None,
    };
    f.errors.finish(input)
}
