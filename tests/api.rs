//! End-to-end scenarios against a live server on an ephemeral port

use minicommerce::dto::{
    CategoryRequest, CategoryResponse, CreateOrderItem, CreateOrderRequest, CreateReviewRequest,
    CreateUserRequest, OrderResponse, ProductRequest, ProductResponse, ReviewResponse, UserResponse,
};
use minicommerce::{Money, OrderStatus, SqliteStore};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

struct TestApp {
    base: String,
    client: Client,
}

impl TestApp {
    async fn spawn() -> Self {
        let store = SqliteStore::open_in_memory().unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            minicommerce::server::serve(listener, store).await.unwrap();
        });
        Self {
            base: format!("http://{}", addr),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post<T: serde::Serialize>(&self, path: &str, body: &T) -> reqwest::Response {
        self.client.post(self.url(path)).json(body).send().await.unwrap()
    }

    async fn patch(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.patch(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    async fn create_user(&self, name: &str, email: &str) -> UserResponse {
        let res = self.post("/api/users", &CreateUserRequest::new(name, email)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn create_category(&self, name: &str) -> CategoryResponse {
        let res = self.post("/api/categories", &CategoryRequest::new(name)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn create_product(&self, name: &str, sku: &str, price: &str, stock: i64, category_id: i64) -> ProductResponse {
        let req = ProductRequest::new(name, sku, price.parse::<Money>().unwrap(), stock, category_id);
        let res = self.post("/api/products", &req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn create_review(&self, user_id: i64, product_id: i64, rating: i64, comment: &str) -> ReviewResponse {
        let req = CreateReviewRequest::new(user_id, product_id, rating, Some(comment));
        let res = self.post("/api/reviews", &req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }
}

#[tokio::test]
async fn user_lifecycle_create_get_delete() {
    let app = TestApp::spawn().await;
    let created = app.create_user("Mehmet", "mehmet@ornek.com").await;

    let fetched: UserResponse = app.get(&format!("/api/users/{}", created.id)).await.json().await.unwrap();
    assert_eq!(fetched.name, "Mehmet");

    let res = app.delete(&format!("/api/users/{}", created.id)).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.get(&format!("/api/users/{}", created.id)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn duplicate_email_returns_conflict() {
    let app = TestApp::spawn().await;
    app.create_user("Ali", "ali@ornek.com").await;

    let res = app.post("/api/users", &CreateUserRequest::new("Ali 2", " ALI@ornek.com ")).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn category_delete_with_products_returns_conflict() {
    let app = TestApp::spawn().await;
    let cat = app.create_category("Elektronik").await;
    app.create_product("Kulaklik", "SKU-TR-99", "250.00", 5, cat.id).await;

    let res = app.delete(&format!("/api/categories/{}", cat.id)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn order_creation_decreases_stock() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Zeynep", "zeynep@ornek.com").await;
    let cat = app.create_category("Ofis").await;
    let product = app.create_product("Defter", "SKU-TR-10", "30.00", 10, cat.id).await;

    let before: ProductResponse = app.get(&format!("/api/products/{}", product.id)).await.json().await.unwrap();
    assert_eq!(before.stock, 10);

    let req = CreateOrderRequest::new(user.id, vec![CreateOrderItem::new(product.id, 2)]);
    let res = app.post("/api/orders", &req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: OrderResponse = res.json().await.unwrap();
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.total, Money::from_cents(6000));

    let after: ProductResponse = app.get(&format!("/api/products/{}", product.id)).await.json().await.unwrap();
    assert_eq!(after.stock, 8);
}

#[tokio::test]
async fn order_exceeding_stock_returns_conflict() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Can", "can@ornek.com").await;
    let cat = app.create_category("Oyuncak").await;
    let product = app.create_product("Top", "SKU-TR-01", "15.99", 1, cat.id).await;

    let req = CreateOrderRequest::new(user.id, vec![CreateOrderItem::new(product.id, 2)]);
    assert_eq!(app.post("/api/orders", &req).await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn review_patch_updates_rating_and_comment() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Ahmet", "ahmet@ornek.com").await;
    let cat = app.create_category("Ev").await;
    let product = app.create_product("Masa Lambasi", "SKU-TR-55", "120.00", 3, cat.id).await;
    let review = app.create_review(user.id, product.id, 3, "idare eder").await;

    let res = app
        .patch(&format!("/api/reviews/{}", review.id), json!({"rating": 5, "comment": "cok iyi"}))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let patched: ReviewResponse = res.json().await.unwrap();
    assert_eq!(patched.rating, 5);
    assert_eq!(patched.comment.as_deref(), Some("cok iyi"));
}

#[tokio::test]
async fn review_patch_only_rating_keeps_comment() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Frank", "frank@example.com").await;
    let cat = app.create_category("Food").await;
    let product = app.create_product("Snack", "SKU-SNACK-001", "5.99", 100, cat.id).await;
    let review = app.create_review(user.id, product.id, 2, "Not great").await;

    let res = app
        .patch(&format!("/api/reviews/{}", review.id), json!({"rating": 4, "comment": null}))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["rating"], 4);
    assert_eq!(body["comment"], "Not great");

    let res = app.patch(&format!("/api/reviews/{}", review.id), json!({"rating": 7})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_status_created_to_paid_then_terminal() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Elif", "elif@ornek.com").await;
    let cat = app.create_category("Kirtasiye").await;
    let product = app.create_product("Kalem", "SKU-TR-77", "12.00", 20, cat.id).await;

    let req = CreateOrderRequest::new(user.id, vec![CreateOrderItem::new(product.id, 1)]);
    let order: OrderResponse = app.post("/api/orders", &req).await.json().await.unwrap();

    let res = app.patch(&format!("/api/orders/{}", order.id), json!({"status": "PAID"})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "PAID");

    let res = app.patch(&format!("/api/orders/{}", order.id), json!({"status": "CANCELLED"})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let orders: Vec<OrderResponse> = app.get(&format!("/api/orders?userId={}", user.id)).await.json().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Paid);
}

#[tokio::test]
async fn validation_errors_return_400() {
    let app = TestApp::spawn().await;

    let res = app.post("/api/users", &json!({"name": "", "email": "yanlis"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["fieldErrors"]["name"].is_string());
    assert!(body["fieldErrors"]["email"].is_string());

    let res = app
        .client
        .post(app.url("/api/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get("/api/users/abc").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_validation_rules() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Alice", "alice@example.com").await;
    let cat = app.create_category("Books").await;
    let product = app.create_product("Book", "SKU-BOOK-001", "19.99", 50, cat.id).await;

    for rating in [0, 6] {
        let req = CreateReviewRequest::new(user.id, product.id, rating, Some("Bad rating"));
        assert_eq!(app.post("/api/reviews", &req).await.status(), StatusCode::BAD_REQUEST);
    }

    let long = "a".repeat(601);
    let req = CreateReviewRequest::new(user.id, product.id, 4, Some(long.as_str()));
    assert_eq!(app.post("/api/reviews", &req).await.status(), StatusCode::BAD_REQUEST);

    let body = json!({"userId": null, "productId": product.id, "rating": 3, "comment": "Comment"});
    assert_eq!(app.post("/api/reviews", &body).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reviews_filtered_by_product() {
    let app = TestApp::spawn().await;
    let user1 = app.create_user("User A", "usera@example.com").await;
    let user2 = app.create_user("User B", "userb@example.com").await;
    let cat = app.create_category("Tech").await;
    let product1 = app.create_product("Product1", "SKU-PROD1", "50.00", 10, cat.id).await;
    let product2 = app.create_product("Product2", "SKU-PROD2", "60.00", 10, cat.id).await;

    app.create_review(user1.id, product1.id, 5, "Review for product 1").await;
    app.create_review(user2.id, product1.id, 4, "Another review for product 1").await;
    app.create_review(user1.id, product2.id, 3, "Review for product 2").await;

    let all: Vec<ReviewResponse> = app.get("/api/reviews").await.json().await.unwrap();
    assert_eq!(all.len(), 3);

    let filtered: Vec<ReviewResponse> = app
        .get(&format!("/api/reviews?productId={}", product1.id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|r| r.product_id == product1.id));
}

#[tokio::test]
async fn unknown_review_is_not_found() {
    let app = TestApp::spawn().await;
    assert_eq!(app.get("/api/reviews/99999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete("/api/reviews/99999").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_delete_then_get_is_not_found() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Henry", "henry@example.com").await;
    let cat = app.create_category("Garden").await;
    let product = app.create_product("Plant", "SKU-PLANT-001", "25.00", 20, cat.id).await;
    let review = app.create_review(user.id, product.id, 5, "Beautiful plant").await;

    let path = format!("/api/reviews/{}", review.id);
    assert_eq!(app.delete(&path).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.get(&path).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let res = app.get("/v3/api-docs").await;
    assert_eq!(res.status(), StatusCode::OK);
    let doc: Value = res.json().await.unwrap();
    assert!(doc["paths"]["/api/orders/{id}"]["patch"].is_object());

    let res = app.get("/swagger-ui").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("swagger-ui"));

    let res = app.get("/health").await;
    let health: Value = res.json().await.unwrap();
    assert_eq!(health["status"], "UP");
}

#[tokio::test]
async fn deleting_ordered_user_or_product_returns_conflict() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Deniz", "deniz@ornek.com").await;
    let cat = app.create_category("Mutfak").await;
    let product = app.create_product("Tencere", "SKU-TR-42", "450.00", 4, cat.id).await;
    app.create_review(user.id, product.id, 5, "saglam").await;

    let req = CreateOrderRequest::new(user.id, vec![CreateOrderItem::new(product.id, 1)]);
    assert_eq!(app.post("/api/orders", &req).await.status(), StatusCode::CREATED);

    let res = app.delete(&format!("/api/users/{}", user.id)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User has orders");

    let res = app.delete(&format!("/api/products/{}", product.id)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product is referenced by orders");

    let reviews: Vec<ReviewResponse> = app.get("/api/reviews").await.json().await.unwrap();
    assert_eq!(reviews.len(), 1);
}

#[tokio::test]
async fn empty_filter_lists_everything() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Selin", "selin@ornek.com").await;
    let cat = app.create_category("Bahce").await;
    let product = app.create_product("Kurek", "SKU-TR-31", "80.00", 6, cat.id).await;
    app.create_review(user.id, product.id, 4, "iyi").await;

    let res = app.get("/api/reviews?productId=").await;
    assert_eq!(res.status(), StatusCode::OK);
    let reviews: Vec<ReviewResponse> = res.json().await.unwrap();
    assert_eq!(reviews.len(), 1);

    let res = app.get("/api/products?categoryId=").await;
    assert_eq!(res.status(), StatusCode::OK);
    let products: Vec<ProductResponse> = res.json().await.unwrap();
    assert_eq!(products.len(), 1);
}
