use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// User-visible failure. Handlers pick the status per entry point
/// (user-initiated flows are 400, server-side reconciliation is 500);
/// the body is always `{"message": ...}`.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 4xx is the caller's problem; anything else gets logged here.
        if !self.status.is_client_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        }

        let body = serde_json::json!({ "message": self.message });
        (self.status, Json(body)).into_response()
    }
}
