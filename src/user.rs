//! User accounts

/// A registered shop user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Always stored trimmed and lower-cased
    pub email: String,
    pub created_at: String,
}

impl User {
    /// Build a user that has not been persisted yet (id is assigned by the store)
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: 0,
            name: normalize_name(name),
            email: normalize_email(email),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
