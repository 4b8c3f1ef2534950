use {
    banklink::{
        AppConfig, AppState,
        adapters::{
            api,
            truelayer::{SANDBOX_AUTH_URL, SANDBOX_PAY_URL, TrueLayerProvider},
        },
        infra::postgres::payment_repo::PostgresPayments,
        services::coordinator::PaymentCoordinator,
    },
    sqlx::postgres::PgPoolOptions,
    std::{env, sync::Arc, time::Duration},
    tokio::signal,
};

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let client_id = env::var("TRUELAYER_CLIENT_ID").expect("TRUELAYER_CLIENT_ID must be set");
    let client_secret =
        env::var("TRUELAYER_CLIENT_SECRET").expect("TRUELAYER_CLIENT_SECRET must be set");

    let auth_base = env_or("TRUELAYER_AUTH_URL", SANDBOX_AUTH_URL);
    let pay_base = env_or("TRUELAYER_PAY_URL", SANDBOX_PAY_URL);
    let config = AppConfig {
        callback_url: env_or("CALLBACK_URL", "http://localhost:3000/api/callback"),
        result_page_url: env_or("RESULT_PAGE_URL", "http://localhost/index.html"),
        frontend_origin: env_or("FRONTEND_ORIGIN", "http://localhost"),
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .expect("failed to connect to database");

    let repo = PostgresPayments::new(pool);
    repo.ensure_schema()
        .await
        .expect("failed to create payments table");
    tracing::info!("payments schema ready");

    let provider = TrueLayerProvider::new(auth_base, pay_base, client_id, client_secret);
    let coordinator = PaymentCoordinator::new(Arc::new(repo), Arc::new(provider));

    let state = AppState {
        coordinator: Arc::new(coordinator),
        config: Arc::new(config),
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    tracing::info!("listening on 0.0.0.0:3000");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
