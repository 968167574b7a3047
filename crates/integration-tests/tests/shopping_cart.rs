//! End-to-end shopping cart scenarios over the HTTP surface.
//!
//! Needs a migrated, seeded `PostgreSQL`; see the crate docs for setup.
//! The seeded catalog has products 1 and 2 in store 1 and product 16 in
//! store 2.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use mercado_integration_tests::TestContext;

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router call is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn add_to_cart(router: &Router, product_id: i64, quantity: i64) -> (StatusCode, Value) {
    let request = Request::post("/shopping/cart")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"productId": product_id, "quantity": quantity}).to_string(),
        ))
        .expect("build request");
    send(router, request).await
}

async fn get_cart(router: &Router) -> (StatusCode, Value) {
    let request = Request::get("/shopping/cart")
        .body(Body::empty())
        .expect("build request");
    send(router, request).await
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL (mercado-cli migrate + seed)"]
async fn scenario_a_same_store_adds_share_one_cart() {
    let ctx = TestContext::new().await;

    let (status, body) = add_to_cart(&ctx.router, 1, 2).await;
    assert_eq!(status, StatusCode::CREATED);
    let c1 = body["id"].as_i64().expect("cart id");

    let (status, body) = add_to_cart(&ctx.router, 2, 3).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"].as_i64(), Some(c1));

    let (status, cart) = get_cart(&ctx.router).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["id"].as_i64(), Some(c1));
    let items = cart["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["quantity"].as_i64(), Some(2));
    assert_eq!(items[1]["quantity"].as_i64(), Some(3));
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL (mercado-cli migrate + seed)"]
async fn scenario_b_store_switch_opens_new_cart() {
    let ctx = TestContext::new().await;

    let (_, body) = add_to_cart(&ctx.router, 1, 2).await;
    let c1 = body["id"].as_i64().expect("cart id");
    add_to_cart(&ctx.router, 2, 3).await;

    let (status, body) = add_to_cart(&ctx.router, 16, 3).await;
    assert_eq!(status, StatusCode::CREATED);
    let c2 = body["id"].as_i64().expect("cart id");
    assert_ne!(c1, c2);

    let (_, cart) = get_cart(&ctx.router).await;
    assert_eq!(cart["id"].as_i64(), Some(c2));
    let items = cart["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"].as_i64(), Some(16));
    assert_eq!(items[0]["quantity"].as_i64(), Some(3));

    // The store-1 cart is soft-closed, not deleted.
    let (active,): (bool,) = sqlx::query_as("SELECT active FROM carts WHERE id = $1")
        .bind(i32::try_from(c1).expect("cart id fits i32"))
        .fetch_one(&ctx.pool)
        .await
        .expect("old cart still exists");
    assert!(!active);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL (mercado-cli migrate + seed)"]
async fn scenario_c_update_sets_quantity_directly() {
    let ctx = TestContext::new().await;

    let (_, body) = add_to_cart(&ctx.router, 1, 2).await;
    let c1 = body["id"].as_i64().expect("cart id");
    add_to_cart(&ctx.router, 2, 3).await;

    let request = Request::put(format!("/shopping/cart/{c1}/items/1"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"quantity": 5}).to_string()))
        .expect("build request");
    let (status, _) = send(&ctx.router, request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, cart) = get_cart(&ctx.router).await;
    let items = cart["items"].as_array().expect("items array");
    assert_eq!(items[0]["quantity"].as_i64(), Some(5));
    assert_eq!(items[1]["quantity"].as_i64(), Some(3));
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL (mercado-cli migrate + seed)"]
async fn scenario_d_remove_is_idempotent() {
    let ctx = TestContext::new().await;

    let (_, body) = add_to_cart(&ctx.router, 1, 2).await;
    let c1 = body["id"].as_i64().expect("cart id");
    add_to_cart(&ctx.router, 2, 3).await;

    for _ in 0..2 {
        let request = Request::delete(format!("/shopping/cart/{c1}/items/1"))
            .body(Body::empty())
            .expect("build request");
        let (status, _) = send(&ctx.router, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, cart) = get_cart(&ctx.router).await;
    let items = cart["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"].as_i64(), Some(2));
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL (mercado-cli migrate + seed)"]
async fn empty_state_returns_null_cart() {
    let ctx = TestContext::new().await;
    let (status, cart) = get_cart(&ctx.router).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cart.is_null());
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL (mercado-cli migrate + seed)"]
async fn add_validates_at_the_boundary() {
    let ctx = TestContext::new().await;

    // Missing fields
    let request = Request::post("/shopping/cart")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"productId": 1}).to_string()))
        .expect("build request");
    let (status, _) = send(&ctx.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown product
    let (status, _) = add_to_cart(&ctx.router, 9999, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Non-positive quantity
    let (status, _) = add_to_cart(&ctx.router, 1, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
