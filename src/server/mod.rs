use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::storage::SqliteStore;

pub mod error;
pub mod openapi;
pub mod routes;

/// Server state
///
/// A single SQLite connection is shared by all requests; the mutex serializes
/// every service call.
pub struct AppState {
    pub store: Mutex<SqliteStore>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Arc<Self> {
        Arc::new(Self { store: Mutex::new(store) })
    }
}

/// Build the application router with all API routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(openapi::DOCS_PATH, get(routes::api_docs))
        .route("/swagger-ui", get(routes::docs_page))
        .route("/api/users", get(routes::list_users).post(routes::create_user))
        .route(
            "/api/users/{id}",
            get(routes::get_user).put(routes::update_user).delete(routes::delete_user),
        )
        .route("/api/categories", get(routes::list_categories).post(routes::create_category))
        .route(
            "/api/categories/{id}",
            get(routes::get_category).put(routes::update_category).delete(routes::delete_category),
        )
        .route("/api/products", get(routes::list_products).post(routes::create_product))
        .route(
            "/api/products/{id}",
            get(routes::get_product).put(routes::update_product).delete(routes::delete_product),
        )
        .route("/api/orders", get(routes::list_orders).post(routes::create_order))
        .route("/api/orders/{id}", get(routes::get_order).patch(routes::patch_order))
        .route("/api/reviews", get(routes::list_reviews).post(routes::create_review))
        .route(
            "/api/reviews/{id}",
            get(routes::get_review).patch(routes::patch_review).delete(routes::delete_review),
        )
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, store: SqliteStore) -> anyhow::Result<()> {
    let app = router(AppState::new(store));
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn start_server(host: &str, port: u16, store: SqliteStore) -> anyhow::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!("Starting server on {}", addr);
    println!("🛒 Mini Commerce API running at http://{}", addr);
    println!("📖 API docs at http://{}/swagger-ui", addr);

    serve(listener, store).await
}
