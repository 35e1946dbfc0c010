//! Category operations

use crate::category::Category;
use crate::dto::{CategoryRequest, CategoryResponse};
use crate::storage::SqliteStore;
use crate::validation::Validate;
use crate::{Error, Result};

pub struct CategoryService<'a> {
    store: &'a SqliteStore,
}

impl<'a> CategoryService<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    pub fn create(&self, req: &CategoryRequest) -> Result<CategoryResponse> {
        req.validate()?;
        let mut category = Category::new(&req.name);
        self.ensure_unique(&category, None)?;

        category.id = self.store.insert_category(&category)?;
        tracing::info!("Created category {} ({})", category.id, category.slug);
        Ok(category.into())
    }

    pub fn list(&self) -> Result<Vec<CategoryResponse>> {
        Ok(self.store.list_categories()?.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, id: i64) -> Result<CategoryResponse> {
        self.find(id).map(Into::into)
    }

    /// Rename a category; the slug follows the new name
    pub fn update(&self, id: i64, req: &CategoryRequest) -> Result<CategoryResponse> {
        req.validate()?;
        let mut category = self.find(id)?;
        category.rename(&req.name);
        self.ensure_unique(&category, Some(id))?;

        self.store.update_category(&category)?;
        tracing::info!("Updated category {} ({})", id, category.slug);
        Ok(category.into())
    }

    /// Delete an empty category
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.store.category_exists(id)? {
            return Err(Error::not_found("Category"));
        }
        if self.store.category_has_products(id)? {
            tracing::warn!("Refusing to delete category {} with products", id);
            return Err(Error::conflict("Category has products"));
        }
        self.store.delete_category(id)?;
        tracing::info!("Deleted category {}", id);
        Ok(())
    }

    fn ensure_unique(&self, category: &Category, exclude_id: Option<i64>) -> Result<()> {
        if self
            .store
            .category_name_or_slug_taken(&category.name, &category.slug, exclude_id)?
        {
            return Err(Error::conflict("Category already exists"));
        }
        Ok(())
    }

    fn find(&self, id: i64) -> Result<Category> {
        self.store.get_category(id)?.ok_or_else(|| Error::not_found("Category"))
    }
}
