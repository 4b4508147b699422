//! Order creation against a mock collect gateway.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use edupay_core::config::GatewayConfig;
use edupay_core::gateway::{GatewayClient, GatewayError};
use edupay_core::services::payments::{PaymentError, PaymentService};
use edupay_core::store::PaymentStore;
use edupay_core::store::memory::InMemoryStore;
use edupay_sdk::objects::create_payment::CreatePaymentRequest;
use edupay_sdk::objects::{PaymentStatus, StudentInfo};

#[derive(Clone, Default)]
struct GatewayHits(Arc<AtomicUsize>);

async fn collect_with_urls(State(hits): State<GatewayHits>, Json(body): Json<Value>) -> Json<Value> {
    hits.0.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "payment_url": "https://pg.example/pay/abc",
        "redirect_url": "https://school.example/thanks",
        "collect_request_id": body["order_id"],
    }))
}

async fn collect_bare(State(hits): State<GatewayHits>) -> Json<Value> {
    hits.0.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "ok": true }))
}

async fn collect_reject(State(hits): State<GatewayHits>) -> impl IntoResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "school not registered" })),
    )
}

/// Binds a mock gateway on an OS-assigned port and serves it in the
/// background for the rest of the test.
async fn start_gateway(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn service_at(store: Arc<InMemoryStore>, addr: SocketAddr) -> PaymentService {
    let config = GatewayConfig {
        school_id: "65b0e6293e9f76a9694d84b4".to_string(),
        merchant_key: "mk-test".to_string(),
        api_key: "ak-test".to_string(),
        create_collect_url: url::Url::parse(&format!("http://{addr}/create-collect-request"))
            .unwrap(),
    };
    PaymentService::new(store, GatewayClient::new(config))
}

fn request() -> CreatePaymentRequest {
    CreatePaymentRequest {
        trustee_id: "65b0e552dd31950a9b41c5ba".to_string(),
        student_info: StudentInfo {
            name: "John Doe".to_string(),
            id: "STU001".to_string(),
            email: "john.doe@example.com".to_string(),
        },
        gateway_name: "PhonePe".to_string(),
        order_amount: Decimal::from(2000),
        transaction_amount: Decimal::from(2200),
        payment_mode: "upi".to_string(),
    }
}

fn assert_custom_order_id_shape(id: &str) {
    let parts: Vec<&str> = id.splitn(3, '_').collect();
    assert_eq!(parts.len(), 3, "unexpected id shape: {id}");
    assert_eq!(parts[0], "ORD");
    assert!(
        parts[1].bytes().all(|b| b.is_ascii_digit()),
        "non-digit millis in {id}"
    );
    assert!(
        !parts[2].is_empty() && parts[2].bytes().all(|b| b.is_ascii_alphanumeric()),
        "non-alnum suffix in {id}"
    );
}

#[tokio::test]
async fn create_returns_gateway_urls_and_a_generated_id() {
    let addr = start_gateway(
        Router::new()
            .route("/create-collect-request", post(collect_with_urls))
            .with_state(GatewayHits::default()),
    )
    .await;
    let store = Arc::new(InMemoryStore::new());
    let service = service_at(store.clone(), addr);

    let response = service.create_payment(request()).await.unwrap();

    assert!(response.success);
    assert_eq!(response.message, "Payment request created successfully");
    assert_custom_order_id_shape(&response.order_id);
    assert_eq!(
        response.payment_url.as_deref(),
        Some("https://pg.example/pay/abc")
    );
    assert_eq!(
        response.redirect_url.as_deref(),
        Some("https://school.example/thanks")
    );
    assert_eq!(response.raw_response["collect_request_id"], response.order_id);

    // The persisted rows share the internal id and start out pending.
    let record = store
        .find_transaction(&response.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.order.collect_id, response.collect_id);
    assert_eq!(record.order.school_id, "65b0e6293e9f76a9694d84b4");
    assert_eq!(record.status.status, PaymentStatus::Pending);
    assert_eq!(record.status.order_amount, Decimal::from(2000));
    assert_eq!(record.status.transaction_amount, Decimal::from(2200));
}

#[tokio::test]
async fn missing_urls_come_back_as_none_not_an_error() {
    let addr = start_gateway(
        Router::new()
            .route("/create-collect-request", post(collect_bare))
            .with_state(GatewayHits::default()),
    )
    .await;
    let service = service_at(Arc::new(InMemoryStore::new()), addr);

    let response = service.create_payment(request()).await.unwrap();

    assert!(response.success);
    assert_eq!(response.payment_url, None);
    assert_eq!(response.redirect_url, None);
    assert_eq!(response.raw_response, json!({ "ok": true }));
}

#[tokio::test]
async fn rows_persist_when_the_gateway_rejects() {
    let addr = start_gateway(
        Router::new()
            .route("/create-collect-request", post(collect_reject))
            .with_state(GatewayHits::default()),
    )
    .await;
    let store = Arc::new(InMemoryStore::new());
    let service = service_at(store.clone(), addr);

    let err = service.create_payment(request()).await.unwrap_err();

    match &err {
        PaymentError::Gateway(GatewayError::Rejected { status, .. }) => assert_eq!(*status, 400),
        other => panic!("expected gateway rejection, got {other:?}"),
    }
    assert_eq!(err.client_message(), "school not registered");

    // The order and its pending status were written before the call
    // and survive it, recoverable out of band.
    assert_eq!(store.count_orders().await.unwrap(), 1);
    let (rows, total) = store
        .list_transactions(
            &Default::default(),
            Default::default(),
            edupay_core::store::Page { page: 1, limit: 10 },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].status.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn unreachable_gateway_is_reported_unavailable() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = Arc::new(InMemoryStore::new());
    let service = service_at(store.clone(), addr);

    let err = service.create_payment(request()).await.unwrap_err();
    assert!(matches!(
        err,
        PaymentError::Gateway(GatewayError::Unavailable(_))
    ));
    assert_eq!(store.count_orders().await.unwrap(), 1);
}

#[tokio::test]
async fn invalid_requests_touch_neither_store_nor_gateway() {
    let hits = GatewayHits::default();
    let addr = start_gateway(
        Router::new()
            .route("/create-collect-request", post(collect_with_urls))
            .with_state(hits.clone()),
    )
    .await;
    let store = Arc::new(InMemoryStore::new());
    let service = service_at(store.clone(), addr);

    let mut bad = request();
    bad.order_amount = Decimal::ZERO;
    let err = service.create_payment(bad).await.unwrap_err();

    assert!(matches!(err, PaymentError::Validation(_)));
    assert_eq!(store.count_orders().await.unwrap(), 0);
    assert_eq!(hits.0.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creations_mint_distinct_order_ids() {
    let addr = start_gateway(
        Router::new()
            .route("/create-collect-request", post(collect_with_urls))
            .with_state(GatewayHits::default()),
    )
    .await;
    let store = Arc::new(InMemoryStore::new());
    let service = Arc::new(service_at(store.clone(), addr));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..12 {
        let service = service.clone();
        tasks.spawn(async move { service.create_payment(request()).await });
    }

    let mut ids = std::collections::HashSet::new();
    while let Some(result) = tasks.join_next().await {
        let response = result.unwrap().unwrap();
        assert!(ids.insert(response.order_id), "duplicate order id minted");
    }

    assert_eq!(ids.len(), 12);
    assert_eq!(store.count_orders().await.unwrap(), 12);
}
