//! User operations

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::storage::SqliteStore;
use crate::user::{normalize_email, normalize_name, User};
use crate::validation::Validate;
use crate::{Error, Result};

const EMAIL_EXISTS: &str = "Email already exists";

pub struct UserService<'a> {
    store: &'a SqliteStore,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Register a user. The email is trimmed and lower-cased before the uniqueness check.
    pub fn create(&self, req: &CreateUserRequest) -> Result<UserResponse> {
        req.validate()?;
        let mut user = User::new(&req.name, &req.email);

        if self.store.email_exists(&user.email)? {
            tracing::warn!("Rejected duplicate email {}", user.email);
            return Err(Error::conflict(EMAIL_EXISTS));
        }

        user.id = self.store.insert_user(&user)?;
        tracing::info!("Created user {} <{}>", user.id, user.email);
        Ok(user.into())
    }

    pub fn list(&self) -> Result<Vec<UserResponse>> {
        Ok(self.store.list_users()?.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, id: i64) -> Result<UserResponse> {
        self.find(id).map(Into::into)
    }

    pub fn update(&self, id: i64, req: &UpdateUserRequest) -> Result<UserResponse> {
        req.validate()?;
        let mut user = self.find(id)?;
        let email = normalize_email(&req.email);

        if email != user.email && self.store.email_exists(&email)? {
            return Err(Error::conflict(EMAIL_EXISTS));
        }

        user.name = normalize_name(&req.name);
        user.email = email;
        self.store.update_user(&user)?;
        tracing::info!("Updated user {}", id);
        Ok(user.into())
    }

    /// Delete a user and their reviews. Users with orders are kept.
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.store.user_exists(id)? {
            return Err(Error::not_found("User"));
        }
        if self.store.user_has_orders(id)? {
            return Err(Error::conflict("User has orders"));
        }
        self.store.delete_user(id)?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    fn find(&self, id: i64) -> Result<User> {
        tracing::debug!("Looking up user {}", id);
        self.store.get_user(id)?.ok_or_else(|| Error::not_found("User"))
    }
}
