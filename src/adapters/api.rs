use {
    super::api_errors::ApiError,
    crate::AppState,
    crate::domain::{payment::PaymentRecord, provider::CreatePaymentRequest},
    axum::{
        Json, Router,
        extract::{Path, Query, State, rejection::JsonRejection},
        http::{HeaderValue, StatusCode, header},
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    serde::{Deserialize, Serialize},
    tower_http::cors::CorsLayer,
    uuid::Uuid,
};

#[derive(Debug, Deserialize)]
struct SavePaymentRequest {
    receiver_id: String,
    amount: i64,
}

#[derive(Debug, Serialize)]
struct PreparePaymentResponse {
    uuid: String,
}

#[derive(Debug, Serialize)]
struct PayResponse {
    url: String,
}

#[derive(Debug, Serialize)]
struct GetPaymentDataResponse {
    uuid: String,
    receiver_id: String,
    amount: i64,
    status: String,
    truelayer_payment_id: String,
}

impl From<PaymentRecord> for GetPaymentDataResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            uuid: record.id.to_string(),
            receiver_id: record.receiver_id,
            amount: record.amount.minor_units(),
            status: record.status.to_string(),
            truelayer_payment_id: record.truelayer_id.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    payment_id: Option<String>,
}

/// Wires the five payment routes plus CORS for the configured
/// front-end origin.
pub fn router(state: AppState) -> Router {
    let origin = state
        .config
        .frontend_origin
        .parse::<HeaderValue>()
        .expect("invalid front-end origin");
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/payment", post(prepare_payment))
        .route("/api/payment/{uuid}", get(get_payment_data))
        .route("/api/pay", post(pay))
        .route("/api/callback", get(bank_callback))
        .route("/api/banks", get(get_banks))
        .layer(cors)
        .with_state(state)
}

async fn prepare_payment(
    State(state): State<AppState>,
    payload: Result<Json<SavePaymentRequest>, JsonRejection>,
) -> Result<Json<PreparePaymentResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::bad_request(format!("Unable to parse request body: {e}")))?;

    let uuid = state
        .coordinator
        .prepare(&request.receiver_id, request.amount)
        .await
        .map_err(|e| ApiError::bad_request(format!("Unable to process payment preparation: {e}")))?;

    Ok(Json(PreparePaymentResponse {
        uuid: uuid.to_string(),
    }))
}

async fn pay(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<Json<PayResponse>, ApiError> {
    let Json(mut request) = payload
        .map_err(|e| ApiError::bad_request(format!("Unable to parse request body: {e}")))?;

    if request.redirect_uri.is_empty() {
        request.redirect_uri = state.config.callback_url.clone();
    }

    let url = state
        .coordinator
        .request_payment_url(&request)
        .await
        .map_err(|e| ApiError::bad_request(format!("Unable to process payment request: {e}")))?;

    Ok(Json(PayResponse { url }))
}

/// The bank sends the user here after authorization (or cancellation).
/// Reconciles the record, then bounces the user to the front-end result
/// page with the local uuid.
async fn bank_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    let payment_id = params
        .payment_id
        .ok_or_else(|| ApiError::bad_request("Invalid input: payment_id parameter missing"))?;

    let record = state
        .coordinator
        .reconcile_callback(&payment_id)
        .await
        .map_err(|e| ApiError::internal(format!("Unable to process bank callback: {e}")))?;

    let location = format!(
        "{}?uuid={}&notify=true",
        state.config.result_page_url, record.id
    );
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

async fn get_banks(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state
        .coordinator
        .list_banks()
        .await
        .map_err(|e| ApiError::bad_request(format!("Unable to process getting banks: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn get_payment_data(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<GetPaymentDataResponse>, ApiError> {
    let id = Uuid::parse_str(&uuid)
        .map_err(|e| ApiError::bad_request(format!("Invalid input: malformed uuid: {e}")))?;

    let record = state
        .coordinator
        .get_payment(id)
        .await
        .map_err(|e| ApiError::bad_request(format!("Unable to process getting payment data: {e}")))?;

    Ok(Json(GetPaymentDataResponse::from(record)))
}
