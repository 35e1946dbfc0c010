//! Product reviews

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const MAX_COMMENT_LEN: usize = 600;

/// A user's rating of a product, with an optional comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}

impl Review {
    pub fn new(user_id: i64, product_id: i64, rating: i64, comment: Option<String>) -> Self {
        Self {
            id: 0,
            user_id,
            product_id,
            rating,
            comment,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Apply a partial update. `None` leaves the field as it is.
    pub fn apply_patch(&mut self, rating: Option<i64>, comment: Option<String>) {
        if let Some(rating) = rating {
            self.rating = rating;
        }
        if let Some(comment) = comment {
            self.comment = Some(comment);
        }
    }
}
