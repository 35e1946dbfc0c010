//! Business rules per resource
//!
//! Each service borrows the store for the duration of one operation, validates
//! its request, enforces existence and uniqueness rules, and returns response
//! bodies ready to serialize.

pub mod user;
pub mod category;
pub mod product;
pub mod order;
pub mod review;

pub use user::UserService;
pub use category::CategoryService;
pub use product::ProductService;
pub use order::OrderService;
pub use review::ReviewService;
