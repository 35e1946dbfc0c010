use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Html,
    Json,
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use crate::dto::{
    CategoryRequest, CategoryResponse, CreateOrderRequest, CreateReviewRequest, CreateUserRequest,
    OrderResponse, PatchOrderRequest, PatchReviewRequest, ProductRequest, ProductResponse,
    ReviewResponse, UpdateUserRequest, UserResponse,
};
use crate::server::AppState;
use crate::server::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::server::openapi;
use crate::service::{CategoryService, OrderService, ProductService, ReviewService, UserService};
use crate::storage::SqliteStore;
use crate::Error;

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub product_id: Option<i64>,
}

/// `?productId=` with no value means no filter
fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => id.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Lock the store and run one service call against it
async fn with_store<T>(
    state: &AppState,
    f: impl FnOnce(&SqliteStore) -> crate::Result<T>,
) -> Result<T, ApiError> {
    let store = state.store.lock().await;
    f(&store).map_err(ApiError::from)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn api_docs() -> Json<serde_json::Value> {
    Json(openapi::document())
}

pub async fn docs_page() -> Html<String> {
    Html(openapi::docs_page())
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError(Error::NotFound(format!("No route for {}", uri.path())))
}

// ========== Users ==========

pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Vec<UserResponse>> {
    with_store(&state, |s| UserService::new(s).list()).await.map(Json)
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Created<UserResponse> {
    let user = with_store(&state, |s| UserService::new(s).create(&req)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<UserResponse> {
    with_store(&state, |s| UserService::new(s).get(id)).await.map(Json)
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    with_store(&state, |s| UserService::new(s).update(id, &req)).await.map(Json)
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    with_store(&state, |s| UserService::new(s).delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Categories ==========

pub async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CategoryResponse>> {
    with_store(&state, |s| CategoryService::new(s).list()).await.map(Json)
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Created<CategoryResponse> {
    let category = with_store(&state, |s| CategoryService::new(s).create(&req)).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<CategoryResponse> {
    with_store(&state, |s| CategoryService::new(s).get(id)).await.map(Json)
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> ApiResult<CategoryResponse> {
    with_store(&state, |s| CategoryService::new(s).update(id, &req)).await.map(Json)
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    with_store(&state, |s| CategoryService::new(s).delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Products ==========

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> ApiResult<Vec<ProductResponse>> {
    with_store(&state, |s| ProductService::new(s).list(filter.category_id)).await.map(Json)
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ProductRequest>,
) -> Created<ProductResponse> {
    let product = with_store(&state, |s| ProductService::new(s).create(&req)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ProductResponse> {
    with_store(&state, |s| ProductService::new(s).get(id)).await.map(Json)
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<ProductRequest>,
) -> ApiResult<ProductResponse> {
    with_store(&state, |s| ProductService::new(s).update(id, &req)).await.map(Json)
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    with_store(&state, |s| ProductService::new(s).delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Orders ==========

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<OrderFilter>,
) -> ApiResult<Vec<OrderResponse>> {
    with_store(&state, |s| OrderService::new(s).list(filter.user_id)).await.map(Json)
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Created<OrderResponse> {
    let order = with_store(&state, |s| OrderService::new(s).create(&req)).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<OrderResponse> {
    with_store(&state, |s| OrderService::new(s).get(id)).await.map(Json)
}

pub async fn patch_order(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<PatchOrderRequest>,
) -> ApiResult<OrderResponse> {
    with_store(&state, |s| OrderService::new(s).patch_status(id, &req)).await.map(Json)
}

// ========== Reviews ==========

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<ReviewFilter>,
) -> ApiResult<Vec<ReviewResponse>> {
    with_store(&state, |s| ReviewService::new(s).list(filter.product_id)).await.map(Json)
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateReviewRequest>,
) -> Created<ReviewResponse> {
    let review = with_store(&state, |s| ReviewService::new(s).create(&req)).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn get_review(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ReviewResponse> {
    with_store(&state, |s| ReviewService::new(s).get(id)).await.map(Json)
}

pub async fn patch_review(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<PatchReviewRequest>,
) -> ApiResult<ReviewResponse> {
    with_store(&state, |s| ReviewService::new(s).patch(id, &req)).await.map(Json)
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    with_store(&state, |s| ReviewService::new(s).delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;

    fn filter(uri: &str) -> Result<Option<i64>, String> {
        let uri: Uri = uri.parse().unwrap();
        Query::<ReviewFilter>::try_from_uri(&uri)
            .map(|q| q.0.product_id)
            .map_err(|e| e.to_string())
    }

    #[test]
    fn test_filter_values() {
        assert_eq!(filter("/api/reviews?productId=7"), Ok(Some(7)));
        assert_eq!(filter("/api/reviews"), Ok(None));
        assert_eq!(filter("/api/reviews?productId="), Ok(None));
        assert!(filter("/api/reviews?productId=abc").is_err());
    }
}
