pub mod adapters;
pub mod domain;
pub mod infra;
pub mod services;

use {crate::services::coordinator::PaymentCoordinator, std::sync::Arc};

/// URLs the request adapter needs; injected so deployments differ
/// without code change.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Default `redirect_uri` for payment creation — our own callback route.
    pub callback_url: String,
    /// Front-end page the user lands on after the bank callback.
    pub result_page_url: String,
    /// Origin allowed by CORS.
    pub frontend_origin: String,
}

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<PaymentCoordinator>,
    pub config: Arc<AppConfig>,
}
