#![allow(clippy::unwrap_used)]
// Integration tests for `ProductClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_api::{Error, ProductBody, ProductClient, ProductId};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ProductClient) {
    let server = MockServer::start().await;
    let client = ProductClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn backpack() -> serde_json::Value {
    json!({
        "id": 1,
        "title": "Fjallraven - Foldsack No. 1 Backpack",
        "price": 109.95,
        "description": "Your perfect pack for everyday use",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        "rating": { "rate": 3.9, "count": 120 }
    })
}

fn lamp_body() -> ProductBody {
    ProductBody {
        title: "Desk Lamp".into(),
        price: 24.5,
        description: "Warm light".into(),
        category: "home".into(),
        image: "https://example.test/lamp.png".into(),
    }
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_products() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            backpack(),
            { "id": 2, "title": "Mens Casual T-Shirt", "price": 22.3,
              "description": "Slim fit", "category": "men's clothing",
              "image": "https://fakestoreapi.com/img/2.jpg" }
        ])))
        .mount(&server)
        .await;

    let products = client.list_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id.as_str(), "1");
    assert_eq!(products[0].rating.unwrap().count, 120);
    assert_eq!(products[1].title, "Mens Casual T-Shirt");
    assert!(products[1].rating.is_none());
}

#[tokio::test]
async fn test_get_product() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backpack()))
        .mount(&server)
        .await;

    let product = client.get_product(&ProductId::from(1)).await.unwrap();
    assert_eq!(product.category, "men's clothing");
    assert!((product.price - 109.95).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_get_unknown_product_with_empty_body_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/999"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let result = client.get_product(&ProductId::from(999)).await;
    assert!(
        matches!(result, Err(ref e) if e.is_not_found()),
        "expected not-found, got: {result:?}"
    );
}

#[tokio::test]
async fn test_get_product_404() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.get_product(&ProductId::from(42)).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn test_product_id_is_a_single_path_segment() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/..%2Fusers"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.get_product(&ProductId::from("../users")).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn test_dot_id_sends_no_request() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.delete_product(&ProductId::from("..")).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_product_posts_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(json!({
            "title": "Desk Lamp",
            "price": 24.5,
            "description": "Warm light",
            "category": "home",
            "image": "https://example.test/lamp.png"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 21,
            "title": "Desk Lamp",
            "price": 24.5,
            "description": "Warm light",
            "category": "home",
            "image": "https://example.test/lamp.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_product(&lamp_body()).await.unwrap();
    assert_eq!(created.id.as_str(), "21");
}

#[tokio::test]
async fn test_update_product_uses_put() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/products/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Desk Lamp"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .update_product(&ProductId::from(7), &lamp_body())
        .await
        .unwrap();
    assert_eq!(updated.id.as_str(), "7");
}

#[tokio::test]
async fn test_delete_product() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/products/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backpack()))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_product(&ProductId::from(3)).await.unwrap();
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    match client.list_products().await {
        Err(Error::Http { status, ref message }) => {
            assert_eq!(status, 503);
            assert!(message.contains("maintenance"), "got: {message}");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_products().await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => assert!(body.contains("oops")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
