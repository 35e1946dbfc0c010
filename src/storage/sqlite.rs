//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error, Money};
use crate::category::Category;
use crate::order::{Order, OrderItem, OrderStatus};
use crate::product::Product;
use crate::review::Review;
use crate::user::User;
use super::schema;

const USER_COLUMNS: &str = "id, name, email, created_at";
const CATEGORY_COLUMNS: &str = "id, name, slug, created_at";
const PRODUCT_COLUMNS: &str = "id, name, sku, price_cents, stock, category_id, created_at";
const ORDER_COLUMNS: &str = "id, user_id, status, created_at";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, unit_price_cents";
const REVIEW_COLUMNS: &str = "id, user_id, product_id, rating, comment, created_at";

/// SQLite-backed storage for the shop
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Run `f` inside a transaction. Any error rolls back every write made by `f`.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    fn exists(&self, sql: &str, params: impl rusqlite::Params) -> Result<bool> {
        let found: Option<i64> = self.conn.query_row(sql, params, |row| row.get(0)).optional()?;
        Ok(found.is_some())
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== User Operations ==========

    /// Insert a user and return its new id
    pub fn insert_user(&self, user: &User) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.name, user.email, user.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                [id],
                |row| self.row_to_user(row),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], |row| self.row_to_user(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    pub fn update_user(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3",
            params![user.name, user.email, user.id],
        )?;
        Ok(())
    }

    /// Delete a user; returns false when no row matched
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM users WHERE id = ?1", [id])? > 0)
    }

    pub fn user_exists(&self, id: i64) -> Result<bool> {
        self.exists("SELECT 1 FROM users WHERE id = ?1", [id])
    }

    pub fn email_exists(&self, email: &str) -> Result<bool> {
        self.exists("SELECT 1 FROM users WHERE email = ?1", [email])
    }

    pub fn user_has_orders(&self, user_id: i64) -> Result<bool> {
        self.exists("SELECT 1 FROM orders WHERE user_id = ?1 LIMIT 1", [user_id])
    }

    fn row_to_user(&self, row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    // ========== Category Operations ==========

    pub fn insert_category(&self, category: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name, slug, created_at) VALUES (?1, ?2, ?3)",
            params![category.name, category.slug, category.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS),
                [id],
                |row| self.row_to_category(row),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM categories ORDER BY id", CATEGORY_COLUMNS))?;
        let categories = stmt
            .query_map([], |row| self.row_to_category(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    pub fn update_category(&self, category: &Category) -> Result<()> {
        self.conn.execute(
            "UPDATE categories SET name = ?1, slug = ?2 WHERE id = ?3",
            params![category.name, category.slug, category.id],
        )?;
        Ok(())
    }

    pub fn delete_category(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM categories WHERE id = ?1", [id])? > 0)
    }

    pub fn category_exists(&self, id: i64) -> Result<bool> {
        self.exists("SELECT 1 FROM categories WHERE id = ?1", [id])
    }

    /// Whether another category already uses this name or slug.
    /// Name comparison ignores ASCII case.
    pub fn category_name_or_slug_taken(
        &self,
        name: &str,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM categories
             WHERE (name = ?1 COLLATE NOCASE OR slug = ?2) AND id != ?3",
            params![name, slug, exclude_id.unwrap_or(-1)],
        )
    }

    pub fn category_has_products(&self, category_id: i64) -> Result<bool> {
        self.exists("SELECT 1 FROM products WHERE category_id = ?1 LIMIT 1", [category_id])
    }

    fn row_to_category(&self, row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    // ========== Product Operations ==========

    pub fn insert_product(&self, product: &Product) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO products (name, sku, price_cents, stock, category_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                product.name,
                product.sku,
                product.price.cents(),
                product.stock,
                product.category_id,
                product.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_product(&self, id: i64) -> Result<Option<Product>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS),
                [id],
                |row| self.row_to_product(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// List products, optionally restricted to one category
    pub fn list_products(&self, category_id: Option<i64>) -> Result<Vec<Product>> {
        let products = if let Some(category_id) = category_id {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {} FROM products WHERE category_id = ?1 ORDER BY id",
                PRODUCT_COLUMNS
            ))?;
            stmt.query_map([category_id], |row| self.row_to_product(row))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = self
                .conn
                .prepare(&format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS))?;
            stmt.query_map([], |row| self.row_to_product(row))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(products)
    }

    pub fn update_product(&self, product: &Product) -> Result<()> {
        self.conn.execute(
            r#"
            UPDATE products
            SET name = ?1, sku = ?2, price_cents = ?3, stock = ?4, category_id = ?5
            WHERE id = ?6
            "#,
            params![
                product.name,
                product.sku,
                product.price.cents(),
                product.stock,
                product.category_id,
                product.id,
            ],
        )?;
        Ok(())
    }

    /// Add `delta` (possibly negative) to a product's stock
    pub fn adjust_stock(&self, product_id: i64, delta: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE products SET stock = stock + ?1 WHERE id = ?2",
            params![delta, product_id],
        )?;
        Ok(())
    }

    pub fn delete_product(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM products WHERE id = ?1", [id])? > 0)
    }

    pub fn sku_taken(&self, sku: &str, exclude_id: Option<i64>) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM products WHERE sku = ?1 AND id != ?2",
            params![sku, exclude_id.unwrap_or(-1)],
        )
    }

    pub fn product_in_orders(&self, product_id: i64) -> Result<bool> {
        self.exists("SELECT 1 FROM order_items WHERE product_id = ?1 LIMIT 1", [product_id])
    }

    fn row_to_product(&self, row: &rusqlite::Row) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            sku: row.get(2)?,
            price: Money::from_cents(row.get(3)?),
            stock: row.get(4)?,
            category_id: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    // ========== Order Operations ==========

    /// Insert an order with all of its items and return the order id.
    /// Callers that also touch stock should wrap this in [`SqliteStore::transaction`].
    pub fn insert_order(&self, order: &Order) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO orders (user_id, status, created_at) VALUES (?1, ?2, ?3)",
            params![order.user_id, order.status.as_str(), order.created_at],
        )?;
        let order_id = self.conn.last_insert_rowid();

        let mut stmt = self.conn.prepare(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;
        for item in &order.items {
            stmt.execute(params![order_id, item.product_id, item.quantity, item.unit_price.cents()])?;
        }

        Ok(order_id)
    }

    /// Get an order with its items
    pub fn get_order(&self, id: i64) -> Result<Option<Order>> {
        let order = self
            .conn
            .query_row(
                &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS),
                [id],
                |row| self.row_to_order(row),
            )
            .optional()?;

        match order {
            Some(mut order) => {
                order.items = self.get_order_items(order.id)?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// List orders with their items, optionally for one user
    pub fn list_orders(&self, user_id: Option<i64>) -> Result<Vec<Order>> {
        let mut orders = if let Some(user_id) = user_id {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY id",
                ORDER_COLUMNS
            ))?;
            stmt.query_map([user_id], |row| self.row_to_order(row))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = self
                .conn
                .prepare(&format!("SELECT {} FROM orders ORDER BY id", ORDER_COLUMNS))?;
            stmt.query_map([], |row| self.row_to_order(row))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };

        for order in &mut orders {
            order.items = self.get_order_items(order.id)?;
        }
        Ok(orders)
    }

    pub fn get_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM order_items WHERE order_id = ?1 ORDER BY id",
            ORDER_ITEM_COLUMNS
        ))?;
        let items = stmt
            .query_map([order_id], |row| {
                Ok(OrderItem {
                    id: row.get(0)?,
                    order_id: row.get(1)?,
                    product_id: row.get(2)?,
                    quantity: row.get(3)?,
                    unit_price: Money::from_cents(row.get(4)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    pub fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE orders SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(())
    }

    /// Helper to convert a row to an Order (items are loaded separately)
    fn row_to_order(&self, row: &rusqlite::Row) -> rusqlite::Result<Order> {
        let status_str: String = row.get(2)?;
        let status: OrderStatus = status_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Order {
            id: row.get(0)?,
            user_id: row.get(1)?,
            status,
            created_at: row.get(3)?,
            items: Vec::new(),
        })
    }

    // ========== Review Operations ==========

    pub fn insert_review(&self, review: &Review) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO reviews (user_id, product_id, rating, comment, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![review.user_id, review.product_id, review.rating, review.comment, review.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_review(&self, id: i64) -> Result<Option<Review>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLUMNS),
                [id],
                |row| self.row_to_review(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// List reviews, optionally for one product
    pub fn list_reviews(&self, product_id: Option<i64>) -> Result<Vec<Review>> {
        let reviews = if let Some(product_id) = product_id {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {} FROM reviews WHERE product_id = ?1 ORDER BY id",
                REVIEW_COLUMNS
            ))?;
            stmt.query_map([product_id], |row| self.row_to_review(row))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = self
                .conn
                .prepare(&format!("SELECT {} FROM reviews ORDER BY id", REVIEW_COLUMNS))?;
            stmt.query_map([], |row| self.row_to_review(row))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(reviews)
    }

    pub fn update_review(&self, review: &Review) -> Result<()> {
        self.conn.execute(
            "UPDATE reviews SET rating = ?1, comment = ?2 WHERE id = ?3",
            params![review.rating, review.comment, review.id],
        )?;
        Ok(())
    }

    pub fn delete_review(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM reviews WHERE id = ?1", [id])? > 0)
    }

    fn row_to_review(&self, row: &rusqlite::Row) -> rusqlite::Result<Review> {
        Ok(Review {
            id: row.get(0)?,
            user_id: row.get(1)?,
            product_id: row.get(2)?,
            rating: row.get(3)?,
            comment: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    // ========== Statistics ==========

    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            users: self.count("users")?,
            categories: self.count("categories")?,
            products: self.count("products")?,
            orders: self.count("orders")?,
            reviews: self.count("reviews")?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DbStats {
    pub users: usize,
    pub categories: usize,
    pub products: usize,
    pub orders: usize,
    pub reviews: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Users: {}", self.users)?;
        writeln!(f, "  Categories: {}", self.categories)?;
        writeln!(f, "  Products: {}", self.products)?;
        writeln!(f, "  Orders: {}", self.orders)?;
        writeln!(f, "  Reviews: {}", self.reviews)
    }
}
