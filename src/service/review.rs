//! Review operations

use crate::dto::{CreateReviewRequest, PatchReviewRequest, ReviewResponse};
use crate::review::Review;
use crate::storage::SqliteStore;
use crate::validation::Validate;
use crate::{Error, Result};

pub struct ReviewService<'a> {
    store: &'a SqliteStore,
}

impl<'a> ReviewService<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Create a review. The user is checked before the product.
    pub fn create(&self, req: &CreateReviewRequest) -> Result<ReviewResponse> {
        req.validate()?;
        let (Some(user_id), Some(product_id), Some(rating)) = (req.user_id, req.product_id, req.rating)
        else {
            return Err(Error::BadRequest("userId, productId and rating are required".into()));
        };

        if !self.store.user_exists(user_id)? {
            return Err(Error::not_found("User"));
        }
        if self.store.get_product(product_id)?.is_none() {
            return Err(Error::not_found("Product"));
        }

        let mut review = Review::new(user_id, product_id, rating, req.comment.clone());
        review.id = self.store.insert_review(&review)?;
        tracing::info!("User {} reviewed product {} ({}/5)", user_id, product_id, rating);
        Ok(review.into())
    }

    /// List all reviews, or only those for `product_id`
    pub fn list(&self, product_id: Option<i64>) -> Result<Vec<ReviewResponse>> {
        Ok(self.store.list_reviews(product_id)?.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, id: i64) -> Result<ReviewResponse> {
        self.find(id).map(Into::into)
    }

    /// Update the rating and/or comment; absent fields stay as they are
    pub fn patch(&self, id: i64, req: &PatchReviewRequest) -> Result<ReviewResponse> {
        req.validate()?;
        let mut review = self.find(id)?;
        review.apply_patch(req.rating, req.comment.clone());
        self.store.update_review(&review)?;
        tracing::info!("Updated review {}", id);
        Ok(review.into())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete_review(id)? {
            return Err(Error::not_found("Review"));
        }
        tracing::info!("Deleted review {}", id);
        Ok(())
    }

    fn find(&self, id: i64) -> Result<Review> {
        self.store.get_review(id)?.ok_or_else(|| Error::not_found("Review"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::product::Product;
    use crate::user::User;
    use crate::Money;

    fn setup() -> (SqliteStore, i64, i64) {
        let store = SqliteStore::open_in_memory().unwrap();
        let user_id = store.insert_user(&User::new("Diana", "diana@example.com")).unwrap();
        let category_id = store.insert_category(&Category::new("Home")).unwrap();
        let product_id = store
            .insert_product(&Product::new("Chair", "SKU-CHAIR-001", Money::from_cents(14999), 15, category_id))
            .unwrap();
        (store, user_id, product_id)
    }

    #[test]
    fn test_create_missing_user_is_not_found() {
        let (store, user_id, product_id) = setup();
        let err = ReviewService::new(&store)
            .create(&CreateReviewRequest::new(user_id + 1, product_id + 1, 5, Some("ok")))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "User not found"));
    }

    #[test]
    fn test_create_missing_product_is_not_found() {
        let (store, user_id, product_id) = setup();
        let err = ReviewService::new(&store)
            .create(&CreateReviewRequest::new(user_id, product_id + 1, 5, Some("ok")))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "Product not found"));
    }

    #[test]
    fn test_create_and_get() {
        let (store, user_id, product_id) = setup();
        let svc = ReviewService::new(&store);
        let created = svc
            .create(&CreateReviewRequest::new(user_id, product_id, 4, Some("Good chair")))
            .unwrap();

        let fetched = svc.get(created.id).unwrap();
        assert_eq!(fetched.user_id, user_id);
        assert_eq!(fetched.product_id, product_id);
        assert_eq!(fetched.rating, 4);
        assert_eq!(fetched.comment.as_deref(), Some("Good chair"));
    }

    #[test]
    fn test_patch_updates_fields() {
        let (store, user_id, product_id) = setup();
        let svc = ReviewService::new(&store);
        let created = svc
            .create(&CreateReviewRequest::new(user_id, product_id, 2, Some("ok")))
            .unwrap();

        let res = svc.patch(created.id, &PatchReviewRequest::new(Some(5), Some("great"))).unwrap();
        assert_eq!(res.rating, 5);
        assert_eq!(res.comment.as_deref(), Some("great"));

        let res = svc.patch(created.id, &PatchReviewRequest::new(Some(3), None)).unwrap();
        assert_eq!(res.rating, 3);
        assert_eq!(res.comment.as_deref(), Some("great"));
    }

    #[test]
    fn test_patch_invalid_rating() {
        let (store, user_id, product_id) = setup();
        let svc = ReviewService::new(&store);
        let created = svc
            .create(&CreateReviewRequest::new(user_id, product_id, 4, Some("Nice color")))
            .unwrap();
        assert!(matches!(
            svc.patch(created.id, &PatchReviewRequest::new(Some(7), None)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_list_filtered_by_product() {
        let (store, user_id, product_id) = setup();
        let category_id = store.insert_category(&Category::new("Tech")).unwrap();
        let other = store
            .insert_product(&Product::new("Mouse", "SKU-PROD2", Money::from_cents(6000), 10, category_id))
            .unwrap();
        let svc = ReviewService::new(&store);
        svc.create(&CreateReviewRequest::new(user_id, product_id, 5, None)).unwrap();
        svc.create(&CreateReviewRequest::new(user_id, product_id, 4, None)).unwrap();
        svc.create(&CreateReviewRequest::new(user_id, other, 3, None)).unwrap();

        let reviews = svc.list(Some(product_id)).unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.product_id == product_id));
        assert_eq!(svc.list(None).unwrap().len(), 3);
    }

    #[test]
    fn test_delete_review() {
        let (store, user_id, product_id) = setup();
        let svc = ReviewService::new(&store);
        let created = svc.create(&CreateReviewRequest::new(user_id, product_id, 5, None)).unwrap();

        svc.delete(created.id).unwrap();
        assert!(matches!(svc.get(created.id), Err(Error::NotFound(_))));
        assert!(matches!(svc.delete(99999), Err(Error::NotFound(_))));
    }
}
