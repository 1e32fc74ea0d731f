use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::get};
use salesdash::clients::ProductFeedClient;
use salesdash::db::Store;
use salesdash::services::{IngestError, IngestService};
use serde_json::{Value, json};

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn feed() -> Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        },
        {
            "id": 2,
            "title": "Mens Casual T-Shirt",
            "price": 44.6,
            "description": "Slim-fitting style",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "sold": true,
            "dateOfSale": "2021-10-27T20:29:54+05:30"
        }
    ])
}

fn client(base: &str, path: &str) -> Arc<ProductFeedClient> {
    Arc::new(ProductFeedClient::with_shared_client(
        reqwest::Client::new(),
        format!("{base}{path}"),
    ))
}

#[tokio::test]
async fn test_ingest_from_http_feed() {
    let base = serve(Router::new().route("/feed.json", get(|| async { Json(feed()) }))).await;
    let store = Store::new("sqlite::memory:").await.unwrap();

    let service = IngestService::new(store.clone(), client(&base, "/feed.json"));
    let report = service.initialize().await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(store.count_transactions().await.unwrap(), 2);

    let november = store
        .list_transactions_by_month("November".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(november.len(), 1);
    assert_eq!(november[0].title, "Fjallraven Backpack");
    assert_eq!(november[0].date_of_sale, "2021-11-27T20:29:54+05:30");
}

#[tokio::test]
async fn test_ingest_upstream_error_status() {
    let base = serve(Router::new().route(
        "/feed.json",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    ))
    .await;
    let store = Store::new("sqlite::memory:").await.unwrap();

    let result = IngestService::new(store.clone(), client(&base, "/feed.json"))
        .initialize()
        .await;

    match result {
        Err(IngestError::Fetch(msg)) => assert!(msg.contains("503"), "{msg}"),
        other => panic!("expected fetch error, got {other:?}"),
    }
    assert_eq!(store.count_transactions().await.unwrap(), 0);
}

#[tokio::test]
async fn test_ingest_malformed_body() {
    let base = serve(Router::new().route("/feed.json", get(|| async { "not json" }))).await;
    let store = Store::new("sqlite::memory:").await.unwrap();

    let result = IngestService::new(store.clone(), client(&base, "/feed.json"))
        .initialize()
        .await;

    assert!(matches!(result, Err(IngestError::Fetch(_))));
    assert_eq!(store.count_transactions().await.unwrap(), 0);
}
