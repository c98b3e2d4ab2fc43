//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::CorrelationId;
use domain::{Cart, CustomerId, CustomerIdentity, Money, Product};
use metrics_exporter_prometheus::PrometheusHandle;
use repository::InMemoryOrderRepository;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> (
    axum::Router,
    Arc<api::AppState<InMemoryOrderRepository>>,
) {
    let state = api::create_default_state();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

fn product(id: &str, cents: i64) -> Product {
    Product::new(
        id,
        format!("Product {id}"),
        Money::from_cents(cents),
        "Acme Goods",
        "misc",
    )
}

fn checkout_body(correlation_id: CorrelationId) -> serde_json::Value {
    let mut cart = Cart::new();
    cart.add_item(&product("SKU-001", 400), 2).unwrap();
    cart.add_item(&product("SKU-002", 200), 1).unwrap();

    let identity = CustomerIdentity::new(CustomerId::new(), "Asha Rao", "asha@example.com", 0);

    serde_json::json!({
        "mode": "cart",
        "snapshot": cart.snapshot(),
        "customer": identity,
        "shipping": {
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
            "address": "14 Lakeview Road",
            "city": "Bengaluru",
            "state": "KA",
            "zip": "560001",
            "country": "IN"
        },
        "payment_method": "upi",
        "correlation_id": correlation_id
    })
}

async fn post_json(app: axum::Router, uri: &str, body: &serde_json::Value) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get_uri(app: axum::Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();

    let response = get_uri(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_checkout_happy_path() {
    let (app, _) = setup();

    let response = post_json(app, "/checkout", &checkout_body(CorrelationId::new())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = response_json(response).await;
    assert_eq!(json["status"], "confirmed");
    assert_eq!(json["clear_cart"], true);
    assert_eq!(json["breakdown"]["subtotal"], 1000);
    assert_eq!(json["breakdown"]["shipping_fee"], 0);
    assert_eq!(json["breakdown"]["tax"], 180);
    assert_eq!(json["breakdown"]["total"], 1180);
    assert!(json["payment_intent_id"].as_str().is_some());
    assert!(json["order_number"].as_str().unwrap().starts_with("ORD-"));
}

#[tokio::test]
async fn test_checkout_validation_failure_returns_field_map() {
    let (app, _) = setup();

    let mut body = checkout_body(CorrelationId::new());
    body["shipping"]["email"] = serde_json::json!("not-an-email");
    body["shipping"]["zip"] = serde_json::json!("");

    let response = post_json(app, "/checkout", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert!(json["fields"]["email"].as_str().is_some());
    assert!(json["fields"]["zip"].as_str().is_some());
}

#[tokio::test]
async fn test_checkout_payment_failure_returns_resume_info() {
    let (app, state) = setup();
    let correlation_id = CorrelationId::new();

    state.gateway.set_fail_on_confirm(true);
    let response = post_json(app.clone(), "/checkout", &checkout_body(correlation_id)).await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let json = response_json(response).await;
    let order_id = json["order_id"].as_str().unwrap().to_string();
    let intent_id = json["payment_intent_id"].as_str().unwrap().to_string();

    // The order is pending and retrievable
    let get_response = get_uri(app.clone(), &format!("/orders/{order_id}")).await;
    assert_eq!(get_response.status(), StatusCode::OK);
    let order_json = response_json(get_response).await;
    assert_eq!(order_json["status"], "pending");

    // Retrying the same correlation ID reuses order and intent
    state.gateway.set_fail_on_confirm(false);
    let retry = post_json(app, "/checkout", &checkout_body(correlation_id)).await;
    assert_eq!(retry.status(), StatusCode::CREATED);
    let retry_json = response_json(retry).await;
    assert_eq!(retry_json["order_id"], order_id.as_str());
    assert_eq!(retry_json["payment_intent_id"], intent_id.as_str());
}

#[tokio::test]
async fn test_get_order_and_list() {
    let (app, _) = setup();

    let body = checkout_body(CorrelationId::new());
    let customer_id = body["customer"]["id"].as_str().unwrap().to_string();
    let response = post_json(app.clone(), "/checkout", &body).await;
    let created = response_json(response).await;
    let order_id = created["order_id"].as_str().unwrap();

    let response = get_uri(app.clone(), &format!("/orders/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["total_cents"], 1180);

    let response = get_uri(app, &format!("/orders?customer_id={customer_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_order_rejects_bad_id() {
    let (app, _) = setup();

    let response = get_uri(app, "/orders/not-a-hex-id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_advance_and_conflict() {
    let (app, _) = setup();

    let response = post_json(app.clone(), "/checkout", &checkout_body(CorrelationId::new())).await;
    let created = response_json(response).await;
    let order_id = created["order_id"].as_str().unwrap().to_string();

    // confirmed → processing is the next step
    let response = post_json(
        app.clone(),
        &format!("/orders/{order_id}/status"),
        &serde_json::json!({ "status": "processing" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "processing");

    // Skipping to delivered is rejected
    let response = post_json(
        app.clone(),
        &format!("/orders/{order_id}/status"),
        &serde_json::json!({ "status": "delivered" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Cancel after processing started is also rejected
    let response = post_json(
        app,
        &format!("/orders/{order_id}/status"),
        &serde_json::json!({ "status": "cancelled" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_track_by_order_number_and_miss() {
    let (app, _) = setup();

    let response = post_json(app.clone(), "/checkout", &checkout_body(CorrelationId::new())).await;
    let created = response_json(response).await;
    let order_number = created["order_number"].as_str().unwrap().to_string();
    let order_id = created["order_id"].as_str().unwrap().to_string();

    let response = get_uri(app.clone(), &format!("/track/{order_number}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "confirmed");
    assert_eq!(json["timeline"].as_array().unwrap().len(), 2);

    // Internal ID works too
    let response = get_uri(app.clone(), &format!("/track/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_uri(app, "/track/ORD-NOPE").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup();

    let response = get_uri(app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
}
