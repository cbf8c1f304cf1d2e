//! Proxy behaviour of the storefront against a stub backend.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use bazaar_integration_tests::{SYSTEM_KEY, StubBackend, TestStorefront};
use serde_json::{Value, json};

#[tokio::test]
async fn missing_backend_config_returns_500_without_calling_out() {
    let backend = StubBackend::builder().spawn().await;
    let storefront = TestStorefront::spawn(None).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/banners"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "message": "Server configuration error" }));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn system_key_and_bearer_reach_backend_unchanged() {
    let detail = json!({ "order_no": "ORD-1001", "status": "shipped", "lines": [] });
    let backend = StubBackend::builder()
        .respond(Method::GET, "/v1/orders/ORD-1001", StatusCode::OK, detail.clone())
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/orders/ORD-1001"))
        .bearer_auth("user-token.abc")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["cache-control"], "no-store, max-age=0");
    assert_eq!(resp.json::<Value>().await.unwrap(), detail);

    let seen = backend.only_request();
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.header("x-system-key"), Some(SYSTEM_KEY));
    assert_eq!(seen.header("authorization"), Some("Bearer user-token.abc"));
    assert_eq!(seen.header("cache-control"), Some("no-store"));
}

#[tokio::test]
async fn bearer_route_without_token_never_reaches_backend() {
    let backend = StubBackend::builder().spawn().await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .post(storefront.url("/api/warranty/claim"))
        .json(&json!({ "serial": "SN-1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn public_route_sends_no_authorization() {
    let backend = StubBackend::builder()
        .respond(Method::GET, "/v1/categories", StatusCode::OK, json!([{ "slug": "desks" }]))
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/categories"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let seen = backend.only_request();
    assert_eq!(seen.header("x-system-key"), Some(SYSTEM_KEY));
    assert!(seen.header("authorization").is_none());
}

#[tokio::test]
async fn upstream_error_status_and_body_forwarded_verbatim() {
    let upstream = json!({ "error": "serial already registered", "code": 4091 });
    let backend = StubBackend::builder()
        .respond(
            Method::POST,
            "/v1/warranty/activate",
            StatusCode::CONFLICT,
            upstream.clone(),
        )
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .post(storefront.url("/api/warranty/activate"))
        .bearer_auth("tok")
        .json(&json!({ "serial": "SN-1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(resp.json::<Value>().await.unwrap(), upstream);
    assert_eq!(backend.only_request().body, Some(json!({ "serial": "SN-1" })));
}

#[tokio::test]
async fn upstream_error_without_json_gets_generic_message() {
    let backend = StubBackend::builder()
        .respond_text(Method::GET, "/v1/banners", StatusCode::BAD_GATEWAY, "upstream down")
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/banners"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn product_listing_is_reshaped_and_query_forwarded() {
    let backend = StubBackend::builder()
        .respond(
            Method::GET,
            "/v1/products",
            StatusCode::OK,
            json!({ "data": [ {
                "info_rows": [
                    { "slug": "oak-desk", "name": "Oak Desk", "price": "250.00", "old_price": 300 },
                    { "slug": "lamp", "name": "Lamp", "price": 40 }
                ],
                "total_rows": 17
            } ] }),
        )
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/products?category=desks&page=2"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 17);
    assert_eq!(body["data"]["items"][0]["slug"], "oak-desk");
    assert_eq!(body["data"]["items"][1]["slug"], "lamp");

    let seen = backend.only_request();
    assert_eq!(seen.query.as_deref(), Some("category=desks&page=2"));
}

#[tokio::test]
async fn unexpected_upstream_shape_is_500_not_empty_list() {
    let backend = StubBackend::builder()
        .respond(
            Method::GET,
            "/v1/products/search",
            StatusCode::OK,
            json!({ "results": [] }),
        )
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/products/search?q=oak"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn rejected_coupon_is_200_with_failure_envelope() {
    let backend = StubBackend::builder()
        .respond(
            Method::POST,
            "/v1/coupons/apply",
            StatusCode::OK,
            json!({ "valid": false, "code": "SPRING", "message": "Coupon has expired" }),
        )
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .post(storefront.url("/api/coupons/apply"))
        .bearer_auth("tok")
        .json(&json!({ "code": "  SPRING  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "message": "Coupon has expired" }));
    assert_eq!(backend.only_request().body, Some(json!({ "code": "SPRING" })));
}

#[tokio::test]
async fn contact_form_is_trimmed_before_forwarding() {
    let backend = StubBackend::builder()
        .respond(Method::POST, "/v1/contact", StatusCode::OK, json!({ "ok": true }))
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .post(storefront.url("/api/contact"))
        .json(&json!({
            "name": "  Ada  ",
            "email": " Ada@Shop.Test ",
            "message": " Where is my desk? "
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let sent = backend.only_request().body.unwrap();
    assert_eq!(sent["name"], "Ada");
    assert_eq!(sent["email"], "ada@shop.test");
    assert_eq!(sent["message"], "Where is my desk?");
}

#[tokio::test]
async fn dynamic_segments_are_encoded() {
    let backend = StubBackend::builder()
        .respond(
            Method::GET,
            "/v1/pages/about%20us",
            StatusCode::OK,
            json!({ "title": "About us" }),
        )
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/pages/about%20us"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(backend.only_request().path, "/v1/pages/about%20us");
}

#[tokio::test]
async fn order_history_is_reshaped_into_listing() {
    let backend = StubBackend::builder()
        .respond(
            Method::GET,
            "/v1/orders/history",
            StatusCode::OK,
            json!({ "data": [ { "info_rows": [
                {
                    "order_no": "ORD-1001",
                    "placed_at": "2026-09-30T10:15:00Z",
                    "status": "shipped",
                    "total": "540.00",
                    "item_count": 3
                },
                {
                    "order_no": "ORD-1002",
                    "placed_at": "2026-10-02T08:00:00Z",
                    "status": "pending",
                    "total": "40.00"
                }
            ], "total_rows": 7 } ] }),
        )
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/orders?page=2&status=shipped"))
        .bearer_auth("user-token.abc")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 7);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["order_no"], "ORD-1001");
    assert_eq!(items[0]["item_count"], 3);
    assert!(items[1]["item_count"].is_null());

    let seen = backend.only_request();
    assert_eq!(seen.path, "/v1/orders/history");
    assert_eq!(seen.query.as_deref(), Some("page=2&status=shipped"));
    assert_eq!(seen.header("authorization"), Some("Bearer user-token.abc"));
    assert_eq!(seen.header("x-system-key"), Some(SYSTEM_KEY));
}

#[tokio::test]
async fn wishlist_check_wraps_backend_verdict() {
    let backend = StubBackend::builder()
        .respond(
            Method::GET,
            "/v1/wishlist/check",
            StatusCode::OK,
            json!({ "in_wishlist": true }),
        )
        .spawn()
        .await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/wishlist/check?slug=%20oak-desk%20"))
        .bearer_auth("user-token.abc")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({ "success": true, "data": { "slug": "oak-desk", "in_wishlist": true } })
    );

    let seen = backend.only_request();
    assert_eq!(seen.query.as_deref(), Some("slug=oak-desk"));
    assert_eq!(seen.header("authorization"), Some("Bearer user-token.abc"));
}

#[tokio::test]
async fn wishlist_check_without_slug_never_reaches_backend() {
    let backend = StubBackend::builder().spawn().await;
    let storefront = TestStorefront::spawn(Some(&backend)).await;

    let resp = storefront
        .client
        .get(storefront.url("/api/wishlist/check"))
        .bearer_auth("user-token.abc")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(backend.requests().is_empty());
}
