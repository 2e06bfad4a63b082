use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use storefront_cart::CartEngine;
use storefront_catalog::Catalog;
use storefront_checkout::{
    CheckoutBridge, CheckoutConfig, CheckoutError, CheckoutRequest, HttpPaymentProvider,
    PaymentProvider, ProviderError,
};
use storefront_core::ProductId;

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, CheckoutRequest)>>>,
}

struct StubProvider {
    base_url: String,
    captured: Captured,
    handle: tokio::task::JoinHandle<()>,
}

impl StubProvider {
    async fn spawn() -> Self {
        let captured = Captured::default();

        let app = Router::new()
            .route("/v1/sessions", post(create_session))
            .route(
                "/v1/broken",
                post(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
            )
            .route("/v1/garbled", post(|| async { "not json" }))
            .with_state(captured.clone());

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
            captured,
            handle,
        }
    }

    fn config(&self, path: &str) -> CheckoutConfig {
        CheckoutConfig::new(
            "pk_test_stub",
            format!("{}{}", self.base_url, path),
            "https://shop.test",
        )
        .unwrap()
    }
}

impl Drop for StubProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_session(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Json<serde_json::Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let id = format!("cs_{}", request.request_id.simple());
    captured.requests.lock().unwrap().push((auth, request));

    Json(json!({
        "id": id,
        "url": format!("https://pay.example.test/c/{id}"),
    }))
}

fn cart_with_watch_and_lamp() -> CartEngine {
    let catalog = Catalog::fixture();
    let mut cart = CartEngine::new();
    cart.add(catalog.get(ProductId::new(1)).unwrap());
    cart.add(catalog.get(ProductId::new(6)).unwrap());
    cart.set_quantity(ProductId::new(6), 3);
    cart
}

#[tokio::test]
async fn posts_request_with_bearer_credential() {
    let stub = StubProvider::spawn().await;
    let config = stub.config("/v1/sessions");
    let bridge = CheckoutBridge::new(config.clone(), HttpPaymentProvider::new(&config).unwrap());

    let redirect = bridge
        .checkout(&cart_with_watch_and_lamp().snapshot())
        .await
        .unwrap();

    assert!(redirect.url().starts_with("https://pay.example.test/c/cs_"));

    let captured = stub.captured.requests.lock().unwrap();
    assert_eq!(captured.len(), 1);
    let (auth, request) = &captured[0];
    assert_eq!(auth.as_deref(), Some("Bearer pk_test_stub"));
    assert_eq!(request.request_id, redirect.request_id);
    assert_eq!(request.line_items.len(), 2);
    assert_eq!(request.line_items[0].unit_amount_minor_units, 19999);
    assert_eq!(request.line_items[1].unit_amount_minor_units, 12999);
    assert_eq!(request.line_items[1].quantity, 3);
    assert_eq!(request.success_url, "https://shop.test/success");
    assert_eq!(request.cancel_url, "https://shop.test/cancel");
}

#[tokio::test]
async fn non_success_status_becomes_api_error() {
    let stub = StubProvider::spawn().await;
    let provider = HttpPaymentProvider::new(&stub.config("/v1/broken")).unwrap();
    let request =
        CheckoutRequest::from_snapshot(&cart_with_watch_and_lamp().snapshot(), &stub.config("/v1/broken"))
            .unwrap();

    let err = provider.create_session(&request).await.unwrap_err();

    assert_eq!(
        err,
        ProviderError::Api {
            status: 502,
            body: "upstream unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn unparseable_response_becomes_parse_error() {
    let stub = StubProvider::spawn().await;
    let config = stub.config("/v1/garbled");
    let bridge = CheckoutBridge::new(config.clone(), HttpPaymentProvider::new(&config).unwrap());

    let err = bridge
        .checkout(&cart_with_watch_and_lamp().snapshot())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Provider(ProviderError::Parse(_))));
}

#[tokio::test]
async fn unreachable_endpoint_becomes_network_error() {
    // Bind then drop a listener so the port is (almost certainly) closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = CheckoutConfig::new(
        "pk_test_stub",
        format!("http://{}/v1/sessions", addr),
        "https://shop.test",
    )
    .unwrap();
    let bridge = CheckoutBridge::new(config.clone(), HttpPaymentProvider::new(&config).unwrap());

    let err = bridge
        .checkout(&cart_with_watch_and_lamp().snapshot())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Provider(ProviderError::Network(_))));
}
