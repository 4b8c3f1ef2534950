#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use banklink::adapters::api;
use banklink::domain::error::PaymentError;
use banklink::domain::payment::PaymentStatus;
use banklink::domain::provider::{
    CreatePaymentRequest, CreatedPayment, IssuedToken, PaymentProvider,
};
use banklink::infra::memory::InMemoryPayments;
use banklink::services::coordinator::PaymentCoordinator;
use banklink::{AppConfig, AppState};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

pub const CALLBACK_URL: &str = "http://localhost:3000/api/callback";
pub const RESULT_PAGE_URL: &str = "http://localhost/index.html";
pub const FRONTEND_ORIGIN: &str = "http://localhost";

/// Scripted stand-in for the TrueLayer API. Counts token issuances and
/// records the last payment-creation payload so tests can assert on both.
pub struct ScriptedProvider {
    token_calls: AtomicUsize,
    token_ttl_secs: AtomicU64,
    issue_delay_ms: AtomicU64,
    fail_token: AtomicBool,
    created: Mutex<Option<CreatedPayment>>,
    status: Mutex<PaymentStatus>,
    banks: Mutex<Vec<u8>>,
    last_create: Mutex<Option<CreatePaymentRequest>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            token_calls: AtomicUsize::new(0),
            token_ttl_secs: AtomicU64::new(3600),
            issue_delay_ms: AtomicU64::new(0),
            fail_token: AtomicBool::new(false),
            created: Mutex::new(Some(CreatedPayment {
                simp_id: "tl_default".to_string(),
                auth_uri: "https://auth.example/x".to_string(),
            })),
            status: Mutex::new(PaymentStatus::Executed),
            banks: Mutex::new(br#"{"results":[]}"#.to_vec()),
            last_create: Mutex::new(None),
        }
    }
}

impl ScriptedProvider {
    pub fn with_token_ttl(self, secs: u64) -> Self {
        self.token_ttl_secs.store(secs, Ordering::SeqCst);
        self
    }

    pub fn with_issue_delay(self, delay: Duration) -> Self {
        self.issue_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
        self
    }

    pub fn with_created(self, simp_id: &str, auth_uri: &str) -> Self {
        *self.created.lock().unwrap() = Some(CreatedPayment {
            simp_id: simp_id.to_string(),
            auth_uri: auth_uri.to_string(),
        });
        self
    }

    pub fn with_banks(self, body: &[u8]) -> Self {
        *self.banks.lock().unwrap() = body.to_vec();
        self
    }

    pub fn set_status(&self, status: PaymentStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_fail_token(&self, fail: bool) {
        self.fail_token.store(fail, Ordering::SeqCst);
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn last_create_request(&self) -> Option<CreatePaymentRequest> {
        self.last_create.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for ScriptedProvider {
    async fn issue_token(&self) -> Result<IssuedToken, PaymentError> {
        let delay = self.issue_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let n = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_token.load(Ordering::SeqCst) {
            return Err(PaymentError::Upstream("scripted token failure".into()));
        }
        Ok(IssuedToken {
            access_token: format!("tok-{n}"),
            expires_in: self.token_ttl_secs.load(Ordering::SeqCst),
        })
    }

    async fn create_payment(
        &self,
        _token: &str,
        request: &CreatePaymentRequest,
    ) -> Result<CreatedPayment, PaymentError> {
        *self.last_create.lock().unwrap() = Some(request.clone());
        self.created
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| PaymentError::Upstream("scripted creation failure".into()))
    }

    async fn payment_status(
        &self,
        _token: &str,
        _simp_id: &str,
    ) -> Result<PaymentStatus, PaymentError> {
        Ok(self.status.lock().unwrap().clone())
    }

    async fn list_providers(&self) -> Result<Vec<u8>, PaymentError> {
        Ok(self.banks.lock().unwrap().clone())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        callback_url: CALLBACK_URL.to_string(),
        result_page_url: RESULT_PAGE_URL.to_string(),
        frontend_origin: FRONTEND_ORIGIN.to_string(),
    }
}

pub struct TestBackend {
    pub app: Router,
    pub repo: Arc<InMemoryPayments>,
    pub provider: Arc<ScriptedProvider>,
}

/// Full backend wired to the in-memory store and a scripted provider.
pub fn backend_with(provider: ScriptedProvider) -> TestBackend {
    let provider = Arc::new(provider);
    let repo = Arc::new(InMemoryPayments::new());
    let coordinator = PaymentCoordinator::new(repo.clone(), provider.clone());
    let state = AppState {
        coordinator: Arc::new(coordinator),
        config: Arc::new(test_config()),
    };
    TestBackend {
        app: api::router(state),
        repo,
        provider,
    }
}

pub fn backend() -> TestBackend {
    backend_with(ScriptedProvider::default())
}

/// Payment-creation payload with the full beneficiary field set.
pub fn pay_request(uuid: &str) -> CreatePaymentRequest {
    CreatePaymentRequest {
        uuid: uuid.to_string(),
        amount: 1299,
        currency: "GBP".to_string(),
        beneficiary_name: "Test Merchant".to_string(),
        beneficiary_reference: "ref-1".to_string(),
        beneficiary_sort_code: "040004".to_string(),
        beneficiary_account_number: "12345678".to_string(),
        remitter_reference: "order-1".to_string(),
        redirect_uri: CALLBACK_URL.to_string(),
        remitter_provider_id: "mock-payments-gb-redirect".to_string(),
    }
}

// ── HTTP helpers ───────────────────────────────────────────────────────────

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    (status, headers, body)
}

pub async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, bytes) = send(app, request).await;
    (status, parse_json(&bytes))
}

pub async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let (status, _, bytes) = send(app, request).await;
    (status, parse_json(&bytes))
}

fn parse_json(bytes: &Bytes) -> serde_json::Value {
    if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap_or(serde_json::Value::Null)
    }
}
