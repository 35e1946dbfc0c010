//! Product categories

use crate::slug::slugify;

/// A product category. The slug is derived from the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: String,
}

impl Category {
    pub fn new(name: &str) -> Self {
        let name = name.trim().to_string();
        Self {
            id: 0,
            slug: slugify(&name),
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Change the name and recompute the slug
    pub fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
        self.slug = slugify(&self.name);
    }
}
