//! Request and response bodies for the HTTP API
//!
//! All bodies use camelCase field names on the wire. Required ids and numbers in
//! requests are `Option`s so that a missing or `null` value is reported as a
//! field error instead of a deserialization failure.

use crate::category::Category;
use crate::order::{Order, OrderItem, OrderStatus};
use crate::product::Product;
use crate::review::{self, Review};
use crate::slug::slugify;
use crate::user::User;
use crate::validation::{FieldErrors, Validate};
use crate::{Money, Result};
use serde::{Deserialize, Serialize};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 200;
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
pub const MAX_SKU_LEN: usize = 64;

// ========== Users ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl CreateUserRequest {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into() }
    }
}

/// Full replacement of a user's fields
pub type UpdateUserRequest = CreateUserRequest;

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.not_blank("name", &self.name);
        errors.max_len("name", &self.name, MAX_NAME_LEN);
        errors.not_blank("email", &self.email);
        errors.email("email", &self.email);
        errors.max_len("email", &self.email, MAX_EMAIL_LEN);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

// ========== Categories ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
}

impl CategoryRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validate for CategoryRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.not_blank("name", &self.name);
        errors.max_len("name", &self.name, MAX_NAME_LEN);
        if slugify(&self.name).is_empty() {
            errors.add("name", "must contain at least one letter or digit");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            created_at: category.created_at,
        }
    }
}

// ========== Products ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub price: Option<Money>,
    pub stock: Option<i64>,
    pub category_id: Option<i64>,
}

impl ProductRequest {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        price: Money,
        stock: i64,
        category_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            price: Some(price),
            stock: Some(stock),
            category_id: Some(category_id),
        }
    }
}

impl Validate for ProductRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.not_blank("name", &self.name);
        errors.max_len("name", &self.name, MAX_PRODUCT_NAME_LEN);
        errors.not_blank("sku", &self.sku);
        errors.max_len("sku", &self.sku, MAX_SKU_LEN);
        if let Some(price) = errors.required("price", self.price) {
            errors.positive_money("price", price);
        }
        if let Some(stock) = errors.required("stock", self.stock) {
            errors.min("stock", stock, 0);
        }
        errors.required("categoryId", self.category_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub price: Money,
    pub stock: i64,
    pub category_id: i64,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            sku: product.sku,
            price: product.price,
            stock: product.stock,
            category_id: product.category_id,
            created_at: product.created_at,
        }
    }
}

// ========== Orders ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
}

impl CreateOrderItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id: Some(product_id), quantity: Some(quantity) }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<CreateOrderItem>,
}

impl CreateOrderRequest {
    pub fn new(user_id: i64, items: Vec<CreateOrderItem>) -> Self {
        Self { user_id: Some(user_id), items }
    }
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.required("userId", self.user_id);
        if self.items.is_empty() {
            errors.add("items", "must not be empty");
        }
        for (i, item) in self.items.iter().enumerate() {
            errors.required(&format!("items[{}].productId", i), item.product_id);
            let field = format!("items[{}].quantity", i);
            if let Some(quantity) = errors.required(&field, item.quantity) {
                errors.min(&field, quantity, 1);
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOrderRequest {
    pub status: Option<String>,
}

impl PatchOrderRequest {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: Some(status.into()) }
    }
}

impl Validate for PatchOrderRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        match &self.status {
            Some(status) => errors.not_blank("status", status),
            None => errors.add("status", "must not be null"),
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
    pub total: Money,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            total: order.total(),
            items: order.items.iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at,
        }
    }
}

// ========== Reviews ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl CreateReviewRequest {
    pub fn new(user_id: i64, product_id: i64, rating: i64, comment: Option<&str>) -> Self {
        Self {
            user_id: Some(user_id),
            product_id: Some(product_id),
            rating: Some(rating),
            comment: comment.map(str::to_string),
        }
    }
}

fn check_review_fields(errors: &mut FieldErrors, rating: Option<i64>, comment: Option<&str>) {
    if let Some(rating) = rating {
        errors.range("rating", rating, review::MIN_RATING, review::MAX_RATING);
    }
    if let Some(comment) = comment {
        errors.max_len("comment", comment, review::MAX_COMMENT_LEN);
    }
}

impl Validate for CreateReviewRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.required("userId", self.user_id);
        errors.required("productId", self.product_id);
        errors.required("rating", self.rating);
        check_review_fields(&mut errors, self.rating, self.comment.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchReviewRequest {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl PatchReviewRequest {
    pub fn new(rating: Option<i64>, comment: Option<&str>) -> Self {
        Self { rating, comment: comment.map(str::to_string) }
    }
}

impl Validate for PatchReviewRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        check_review_fields(&mut errors, self.rating, self.comment.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            product_id: review.product_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn field_errors(result: Result<()>) -> FieldErrors {
        match result {
            Err(Error::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_user_request_rules() {
        assert!(CreateUserRequest::new("Mehmet", "mehmet@ornek.com").validate().is_ok());

        let errors = field_errors(CreateUserRequest::new("", "yanlis").validate());
        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
    }

    #[test]
    fn test_user_request_missing_fields_are_blank() {
        let req: CreateUserRequest = serde_json::from_str("{}").unwrap();
        let errors = field_errors(req.validate());
        assert_eq!(errors.get("name"), Some("must not be blank"));
        assert_eq!(errors.get("email"), Some("must not be blank"));
    }

    #[test]
    fn test_category_request_needs_sluggable_name() {
        assert!(CategoryRequest::new("Elektronik").validate().is_ok());
        let errors = field_errors(CategoryRequest::new("???").validate());
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_product_request_rules() {
        let ok = ProductRequest::new("Kalem", "SKU-TR-77", Money::from_cents(1200), 20, 1);
        assert!(ok.validate().is_ok());

        let bad = ProductRequest::new("Kalem", "", Money::from_cents(0), -1, 1);
        let errors = field_errors(bad.validate());
        assert!(errors.contains("sku"));
        assert!(errors.contains("price"));
        assert!(errors.contains("stock"));

        let req: ProductRequest = serde_json::from_str(r#"{"name":"X","sku":"Y"}"#).unwrap();
        let errors = field_errors(req.validate());
        assert_eq!(errors.get("categoryId"), Some("must not be null"));
        assert_eq!(errors.get("price"), Some("must not be null"));
    }

    #[test]
    fn test_order_request_rules() {
        let ok = CreateOrderRequest::new(1, vec![CreateOrderItem::new(2, 1)]);
        assert!(ok.validate().is_ok());

        let empty = CreateOrderRequest::new(1, vec![]);
        assert!(field_errors(empty.validate()).contains("items"));

        let zero = CreateOrderRequest::new(1, vec![CreateOrderItem::new(2, 0)]);
        assert!(field_errors(zero.validate()).contains("items[0].quantity"));
    }

    #[test]
    fn test_order_patch_requires_status() {
        assert!(PatchOrderRequest::new("PAID").validate().is_ok());
        assert!(field_errors(PatchOrderRequest::default().validate()).contains("status"));
    }

    #[test]
    fn test_review_request_rules() {
        assert!(CreateReviewRequest::new(1, 2, 5, Some("ok")).validate().is_ok());
        assert!(field_errors(CreateReviewRequest::new(1, 2, 0, None).validate()).contains("rating"));
        assert!(field_errors(CreateReviewRequest::new(1, 2, 6, None).validate()).contains("rating"));

        let long = "a".repeat(601);
        let errors = field_errors(CreateReviewRequest::new(1, 2, 4, Some(long.as_str())).validate());
        assert!(errors.contains("comment"));

        let req: CreateReviewRequest =
            serde_json::from_str(r#"{"userId":null,"productId":2,"rating":3}"#).unwrap();
        assert_eq!(field_errors(req.validate()).get("userId"), Some("must not be null"));
    }

    #[test]
    fn test_review_patch_rules() {
        assert!(PatchReviewRequest::new(Some(4), None).validate().is_ok());
        assert!(PatchReviewRequest::new(None, None).validate().is_ok());
        assert!(field_errors(PatchReviewRequest::new(Some(7), None).validate()).contains("rating"));
    }

    #[test]
    fn test_response_field_names() {
        let json = serde_json::to_value(ReviewResponse {
            id: 1,
            user_id: 2,
            product_id: 3,
            rating: 5,
            comment: None,
            created_at: "now".into(),
        })
        .unwrap();
        assert_eq!(json["userId"], 2);
        assert_eq!(json["productId"], 3);
        assert_eq!(json["createdAt"], "now");
    }
}
