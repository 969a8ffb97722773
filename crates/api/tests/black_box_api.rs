use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use catalog_api::app::{build_app, services};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = build_app(Arc::new(services::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn rpc(&self, cmd: &str, payload: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(format!("{}/rpc", self.base_url))
            .json(&json!({ "cmd": cmd, "payload": payload }))
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn seed(&self, n: usize) {
        for i in 1..=n {
            let (status, _) = self
                .rpc(
                    "create_product",
                    json!({ "name": format!("Product {i}"), "price": i as f64 * 1.5 }),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn ids(page: &Value) -> Vec<i64> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn create_then_find_one_round_trips_the_product() {
    let server = TestServer::spawn().await;

    let (status, created) = server
        .rpc("create_product", json!({ "name": "Desk", "price": 120.75 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);
    assert_eq!(created["available"], true);

    let (status, found) = server.rpc("find_one_product", json!({ "id": 1 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["name"], "Desk");
    assert_eq!(found["price"], 120.75);
}

#[tokio::test]
async fn pagination_reports_meta_and_tolerates_pages_past_the_end() {
    let server = TestServer::spawn().await;
    server.seed(5).await;

    let (status, page) = server
        .rpc("find_all_products", json!({ "page": 2, "limit": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&page), vec![3, 4]);
    assert_eq!(page["meta"], json!({ "page": 2, "total": 5, "lastPage": 3 }));

    let (status, beyond) = server
        .rpc("find_all_products", json!({ "page": 10, "limit": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&beyond).is_empty());
    assert_eq!(beyond["meta"]["lastPage"], 3);
}

#[tokio::test]
async fn removed_product_is_gone_and_second_removal_is_404() {
    let server = TestServer::spawn().await;
    server.seed(2).await;

    let (status, removed) = server.rpc("delete_product", json!({ "id": 1 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["available"], false);

    let (status, body) = server.rpc("delete_product", json!({ "id": 1 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": 404, "message": "Product with id 1 not found" }));

    let (status, _) = server.rpc("find_one_product", json!({ "id": 1 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = server.rpc("find_all_products", json!({})).await;
    assert_eq!(ids(&page), vec![2]);
}

#[tokio::test]
async fn update_changes_fields_but_not_identity() {
    let server = TestServer::spawn().await;
    server.seed(1).await;

    let (status, updated) = server
        .rpc("update_product", json!({ "id": 1, "price": 9.99 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["name"], "Product 1");
    assert_eq!(updated["price"], 9.99);
}

#[tokio::test]
async fn validate_collapses_duplicates_and_reports_missing_ids() {
    let server = TestServer::spawn().await;
    server.seed(2).await;

    let (status, products) = server.rpc("validate_products", json!([1, 1, 2])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 2);

    let (status, empty) = server.rpc("validate_products", json!([])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!([]));

    let (status, body) = server.rpc("find_one_product", json!({ "id": 0 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product with id 0 not found");

    let (status, body) = server.rpc("validate_products", json!([1, 2, 3])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["message"], "Some products were not found");
    assert_eq!(body["missing"], json!([3]));
}

#[tokio::test]
async fn bad_messages_are_rejected_with_400() {
    let server = TestServer::spawn().await;

    let (status, body) = server.rpc("explode", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _) = server
        .rpc("create_product", json!({ "name": "Bad", "price": -3 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .rpc("create_product", json!({ "name": "Too precise", "price": 1.23456 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(format!("{}/rpc", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn health_is_ok_and_request_id_is_echoed() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .get(format!("{}/health", server.base_url))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "trace-me-123"
    );
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let res = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("x-request-id").is_some());
}
