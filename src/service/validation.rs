//! Field-level request validation. Errors for every field are collected before
//! the payload is rejected, so one response reports everything that is wrong.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

pub const MISSING: &str = "Missing data for required field.";
pub const NULL: &str = "Field may not be null.";
pub const UNKNOWN: &str = "Unknown field.";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern compiles")
});

/// Field name to messages, in field order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when nothing was reported and the value was built.
    pub fn finish<T>(self, value: Option<T>) -> Result<T, FieldErrors> {
        match value {
            Some(v) if self.is_empty() => Ok(v),
            _ => Err(self),
        }
    }
}

/// Reads typed fields out of a JSON object body, recording a message for
/// each field that is missing or malformed.
pub struct Fields<'a> {
    body: Option<&'a Map<String, Value>>,
    pub errors: FieldErrors,
}

impl<'a> Fields<'a> {
    /// Starts reading `body`. Keys outside `known` (other than `id`, which
    /// is ignored) are reported as unknown.
    pub fn new(body: &'a Value, known: &[&str]) -> Self {
        let mut errors = FieldErrors::default();
        let body = match body {
            Value::Object(m) => {
                let known: HashSet<&str> = known.iter().copied().collect();
                for key in m.keys() {
                    if key != "id" && !known.contains(key.as_str()) {
                        errors.push(key.clone(), UNKNOWN);
                    }
                }
                Some(m)
            }
            _ => {
                errors.push("_schema", "Invalid input type.");
                None
            }
        };
        Self { body, errors }
    }

    fn present(&mut self, field: &str) -> Option<&'a Value> {
        let body = self.body?;
        match body.get(field) {
            None => {
                self.errors.push(field, MISSING);
                None
            }
            Some(Value::Null) => {
                self.errors.push(field, NULL);
                None
            }
            Some(v) => Some(v),
        }
    }

    pub fn string(&mut self, field: &str) -> Option<String> {
        match self.present(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.errors.push(field, "Not a valid string.");
                None
            }
        }
    }

    pub fn float(&mut self, field: &str) -> Option<f64> {
        let v = self.present(field)?;
        let n = match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        };
        if n.is_none() {
            self.errors.push(field, "Not a valid number.");
        }
        n
    }

    pub fn integer(&mut self, field: &str) -> Option<i64> {
        let v = self.present(field)?;
        let n = as_integer(v);
        if n.is_none() {
            self.errors.push(field, "Not a valid integer.");
        }
        n
    }

    pub fn date(&mut self, field: &str) -> Option<NaiveDate> {
        let v = self.present(field)?;
        let d = v
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        if d.is_none() {
            self.errors.push(field, "Not a valid date.");
        }
        d
    }

    /// List of integers. Bad items are reported as `field.index`.
    pub fn integer_list(&mut self, field: &str) -> Option<Vec<i64>> {
        let Value::Array(items) = self.present(field)? else {
            self.errors.push(field, "Not a valid list.");
            return None;
        };
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match as_integer(item) {
                Some(n) => out.push(n),
                None => {
                    self.errors.push(format!("{}.{}", field, i), "Not a valid integer.");
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    pub fn min_length(&mut self, field: &str, value: Option<&str>, min: usize) {
        if let Some(s) = value {
            if s.chars().count() < min {
                self.errors.push(field, format!("Shorter than minimum length {}.", min));
            }
        }
    }

    pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(s) = value {
            if s.chars().count() > max {
                self.errors.push(field, format!("Longer than maximum length {}.", max));
            }
        }
    }

    pub fn minimum(&mut self, field: &str, value: Option<f64>, min: f64) {
        if let Some(n) = value {
            if n < min {
                self.errors.push(field, format!("Must be greater than or equal to {}.", min));
            }
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) {
        if let Some(s) = value {
            if !EMAIL_RE.is_match(s) {
                self.errors.push(field, "Not a valid email address.");
            }
        }
    }
}

fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
