//! Request validation
//!
//! Request bodies implement [`Validate`] and report every failing field at once
//! through [`FieldErrors`], which the server renders as `fieldErrors` in the
//! 400 response body.

use crate::{Error, Money, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Field name to message map, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Convert into `Ok(())` when empty, `Error::Validation` otherwise
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }

    pub fn not_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "must not be blank");
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().chars().count() > max {
            self.add(field, format!("size must be at most {}", max));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && !is_email(value.trim()) {
            self.add(field, "must be a well-formed email address");
        }
    }

    pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64) {
        if value < min {
            self.add(field, format!("must be greater than or equal to {}", min));
        } else if value > max {
            self.add(field, format!("must be less than or equal to {}", max));
        }
    }

    pub fn min(&mut self, field: &str, value: i64, min: i64) {
        if value < min {
            self.add(field, format!("must be greater than or equal to {}", min));
        }
    }

    /// Unwrap a required value, recording "must not be null" when absent
    pub fn required<T: Copy>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, "must not be null");
        }
        value
    }

    pub fn positive_money(&mut self, field: &str, value: Money) {
        if value.cents() <= 0 {
            self.add(field, "must be greater than 0");
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{} {}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Request bodies that can check themselves before reaching a service
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn is_email(value: &str) -> bool {
    email_regex().is_match(value)
}
