//! OpenAPI 3 document for the HTTP API and the docs page that renders it

use serde_json::{json, Map, Value};

pub const DOCS_PATH: &str = "/v3/api-docs";

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn json_body(schema: Value) -> Value {
    json!({ "content": { "application/json": { "schema": schema } } })
}

fn error_response(description: &str) -> Value {
    let mut response = json_body(schema_ref("ErrorResponse"));
    response["description"] = json!(description);
    response
}

fn ok_response(description: &str, schema: Value) -> Value {
    let mut response = json_body(schema);
    response["description"] = json!(description);
    response
}

fn id_param(name: &str) -> Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn filter_param(name: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "schema": { "type": "integer", "format": "int64" }
    })
}

/// Collection and item paths for one resource.
///
/// `item_ops` lists which of `get`, `put`, `patch`, `delete` the item path supports.
fn resource_paths(
    paths: &mut Map<String, Value>,
    base: &str,
    tag: &str,
    request: &str,
    patch_request: Option<&str>,
    response: &str,
    filter: Option<&str>,
    item_ops: &[&str],
) {
    let list_params: Vec<Value> = filter.map(filter_param).into_iter().collect();
    paths.insert(
        base.to_string(),
        json!({
            "get": {
                "tags": [tag],
                "summary": format!("List {}", tag.to_lowercase()),
                "parameters": list_params,
                "responses": {
                    "200": ok_response("OK", json!({ "type": "array", "items": schema_ref(response) })),
                    "400": error_response("Invalid query parameter"),
                }
            },
            "post": {
                "tags": [tag],
                "summary": format!("Create {}", response.trim_end_matches("Response").to_lowercase()),
                "requestBody": { "required": true, "content": { "application/json": { "schema": schema_ref(request) } } },
                "responses": {
                    "201": ok_response("Created", schema_ref(response)),
                    "400": error_response("Validation failed"),
                    "404": error_response("Referenced entity not found"),
                    "409": error_response("Conflict with existing data"),
                }
            }
        }),
    );

    let mut item = Map::new();
    for op in item_ops {
        let operation = match *op {
            "get" => json!({
                "tags": [tag],
                "parameters": [id_param("id")],
                "responses": {
                    "200": ok_response("OK", schema_ref(response)),
                    "404": error_response("Not found"),
                }
            }),
            "put" => json!({
                "tags": [tag],
                "parameters": [id_param("id")],
                "requestBody": { "required": true, "content": { "application/json": { "schema": schema_ref(request) } } },
                "responses": {
                    "200": ok_response("OK", schema_ref(response)),
                    "400": error_response("Validation failed"),
                    "404": error_response("Not found"),
                    "409": error_response("Conflict with existing data"),
                }
            }),
            "patch" => json!({
                "tags": [tag],
                "parameters": [id_param("id")],
                "requestBody": { "required": true, "content": { "application/json": { "schema": schema_ref(patch_request.unwrap_or(request)) } } },
                "responses": {
                    "200": ok_response("OK", schema_ref(response)),
                    "400": error_response("Validation failed"),
                    "404": error_response("Not found"),
                    "409": error_response("Conflict with current state"),
                }
            }),
            "delete" => json!({
                "tags": [tag],
                "parameters": [id_param("id")],
                "responses": {
                    "204": { "description": "Deleted" },
                    "404": error_response("Not found"),
                    "409": error_response("Still referenced"),
                }
            }),
            _ => continue,
        };
        item.insert(op.to_string(), operation);
    }
    paths.insert(format!("{}/{{id}}", base), Value::Object(item));
}

fn schemas() -> Value {
    let id = json!({ "type": "integer", "format": "int64" });
    let money = json!({ "type": "number", "multipleOf": 0.01 });
    let timestamp = json!({ "type": "string", "format": "date-time" });

    json!({
        "CreateUserRequest": {
            "type": "object",
            "required": ["name", "email"],
            "properties": {
                "name": { "type": "string", "maxLength": 100 },
                "email": { "type": "string", "format": "email", "maxLength": 200 }
            }
        },
        "UserResponse": {
            "type": "object",
            "properties": { "id": id, "name": { "type": "string" }, "email": { "type": "string" }, "createdAt": timestamp }
        },
        "CategoryRequest": {
            "type": "object",
            "required": ["name"],
            "properties": { "name": { "type": "string", "maxLength": 100 } }
        },
        "CategoryResponse": {
            "type": "object",
            "properties": { "id": id, "name": { "type": "string" }, "slug": { "type": "string" }, "createdAt": timestamp }
        },
        "ProductRequest": {
            "type": "object",
            "required": ["name", "sku", "price", "stock", "categoryId"],
            "properties": {
                "name": { "type": "string", "maxLength": 200 },
                "sku": { "type": "string", "maxLength": 64 },
                "price": { "type": "number", "multipleOf": 0.01, "exclusiveMinimum": 0 },
                "stock": { "type": "integer", "minimum": 0 },
                "categoryId": id
            }
        },
        "ProductResponse": {
            "type": "object",
            "properties": {
                "id": id, "name": { "type": "string" }, "sku": { "type": "string" },
                "price": money, "stock": { "type": "integer" }, "categoryId": id, "createdAt": timestamp
            }
        },
        "CreateOrderItem": {
            "type": "object",
            "required": ["productId", "quantity"],
            "properties": { "productId": id, "quantity": { "type": "integer", "minimum": 1 } }
        },
        "CreateOrderRequest": {
            "type": "object",
            "required": ["userId", "items"],
            "properties": {
                "userId": id,
                "items": { "type": "array", "minItems": 1, "items": schema_ref("CreateOrderItem") }
            }
        },
        "PatchOrderRequest": {
            "type": "object",
            "required": ["status"],
            "properties": { "status": { "type": "string", "enum": ["CREATED", "PAID", "CANCELLED"] } }
        },
        "OrderItemResponse": {
            "type": "object",
            "properties": { "productId": id, "quantity": { "type": "integer" }, "unitPrice": money, "lineTotal": money }
        },
        "OrderResponse": {
            "type": "object",
            "properties": {
                "id": id, "userId": id,
                "status": { "type": "string", "enum": ["CREATED", "PAID", "CANCELLED"] },
                "items": { "type": "array", "items": schema_ref("OrderItemResponse") },
                "total": money, "createdAt": timestamp
            }
        },
        "CreateReviewRequest": {
            "type": "object",
            "required": ["userId", "productId", "rating"],
            "properties": {
                "userId": id, "productId": id,
                "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                "comment": { "type": "string", "maxLength": 600, "nullable": true }
            }
        },
        "PatchReviewRequest": {
            "type": "object",
            "properties": {
                "rating": { "type": "integer", "minimum": 1, "maximum": 5, "nullable": true },
                "comment": { "type": "string", "maxLength": 600, "nullable": true }
            }
        },
        "ReviewResponse": {
            "type": "object",
            "properties": {
                "id": id, "userId": id, "productId": id,
                "rating": { "type": "integer" }, "comment": { "type": "string", "nullable": true },
                "createdAt": timestamp
            }
        },
        "ErrorResponse": {
            "type": "object",
            "properties": {
                "status": { "type": "integer" },
                "error": { "type": "string" },
                "message": { "type": "string" },
                "fieldErrors": { "type": "object", "additionalProperties": { "type": "string" } }
            }
        }
    })
}

/// Build the OpenAPI document describing every route the server exposes
pub fn document() -> Value {
    let mut paths = Map::new();
    resource_paths(&mut paths, "/api/users", "Users", "CreateUserRequest", None, "UserResponse", None, &["get", "put", "delete"]);
    resource_paths(&mut paths, "/api/categories", "Categories", "CategoryRequest", None, "CategoryResponse", None, &["get", "put", "delete"]);
    resource_paths(&mut paths, "/api/products", "Products", "ProductRequest", None, "ProductResponse", Some("categoryId"), &["get", "put", "delete"]);
    resource_paths(&mut paths, "/api/orders", "Orders", "CreateOrderRequest", Some("PatchOrderRequest"), "OrderResponse", Some("userId"), &["get", "patch"]);
    resource_paths(&mut paths, "/api/reviews", "Reviews", "CreateReviewRequest", Some("PatchReviewRequest"), "ReviewResponse", Some("productId"), &["get", "patch", "delete"]);
    paths.insert(
        "/health".to_string(),
        json!({ "get": { "tags": ["Health"], "responses": { "200": { "description": "Service is up" } } } }),
    );

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Mini Commerce API",
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": paths,
        "components": { "schemas": schemas() }
    })
}

/// HTML page that loads Swagger UI from a CDN and points it at [`DOCS_PATH`]
pub fn docs_page() -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Mini Commerce API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "{}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##,
        DOCS_PATH
    )
}
