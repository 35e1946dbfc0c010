//! Product operations

use crate::dto::{ProductRequest, ProductResponse};
use crate::product::Product;
use crate::storage::SqliteStore;
use crate::validation::Validate;
use crate::{Error, Money, Result};

pub struct ProductService<'a> {
    store: &'a SqliteStore,
}

/// Validated product fields pulled out of a request
struct ProductFields {
    price: Money,
    stock: i64,
    category_id: i64,
}

impl ProductFields {
    fn from_request(req: &ProductRequest) -> Result<Self> {
        req.validate()?;
        match (req.price, req.stock, req.category_id) {
            (Some(price), Some(stock), Some(category_id)) => Ok(Self { price, stock, category_id }),
            _ => Err(Error::BadRequest("price, stock and categoryId are required".into())),
        }
    }
}

impl<'a> ProductService<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    pub fn create(&self, req: &ProductRequest) -> Result<ProductResponse> {
        let fields = ProductFields::from_request(req)?;
        let mut product = Product::new(&req.name, &req.sku, fields.price, fields.stock, fields.category_id);
        self.check_references(&product, None)?;

        product.id = self.store.insert_product(&product)?;
        tracing::info!("Created product {} ({}) in category {}", product.id, product.sku, product.category_id);
        Ok(product.into())
    }

    /// List all products, or only those in `category_id`
    pub fn list(&self, category_id: Option<i64>) -> Result<Vec<ProductResponse>> {
        Ok(self.store.list_products(category_id)?.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, id: i64) -> Result<ProductResponse> {
        self.find(id).map(Into::into)
    }

    /// Replace every field of a product
    pub fn update(&self, id: i64, req: &ProductRequest) -> Result<ProductResponse> {
        let fields = ProductFields::from_request(req)?;
        let existing = self.find(id)?;

        let mut product = Product::new(&req.name, &req.sku, fields.price, fields.stock, fields.category_id);
        product.id = existing.id;
        product.created_at = existing.created_at;
        self.check_references(&product, Some(id))?;

        self.store.update_product(&product)?;
        tracing::info!("Updated product {}", id);
        Ok(product.into())
    }

    /// Delete a product and its reviews. Products that were ever ordered are kept.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.find(id)?;
        if self.store.product_in_orders(id)? {
            return Err(Error::conflict("Product is referenced by orders"));
        }
        self.store.delete_product(id)?;
        tracing::info!("Deleted product {}", id);
        Ok(())
    }

    fn check_references(&self, product: &Product, exclude_id: Option<i64>) -> Result<()> {
        if !self.store.category_exists(product.category_id)? {
            return Err(Error::not_found("Category"));
        }
        if self.store.sku_taken(&product.sku, exclude_id)? {
            return Err(Error::conflict("SKU already exists"));
        }
        Ok(())
    }

    fn find(&self, id: i64) -> Result<Product> {
        self.store.get_product(id)?.ok_or_else(|| Error::not_found("Product"))
    }
}
