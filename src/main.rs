use dotenvy::dotenv;
use septalyze_backend::config::AppConfig;
use septalyze_backend::infrastructure::{database, seed};
use septalyze_backend::services::analyze::AnalyzeService;
use septalyze_backend::services::fallback::CannedScenarios;
use septalyze_backend::services::inference::HttpInferenceGateway;
use septalyze_backend::services::storage::LocalImageStore;
use septalyze_backend::services::token::TokenService;
use septalyze_backend::{AppState, create_app};
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing with EnvFilter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "septalyze_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Septalyze API...");

    let config = AppConfig::from_env();
    info!(
        "🧠 Inference endpoint: {} (connect {}s, total {}s)",
        config.inference_url,
        config.inference_connect_timeout_secs,
        config.inference_request_timeout_secs
    );

    let db = database::setup_database(&config.database_url).await?;
    seed::seed_demo_users(&db).await?;

    let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl_secs));
    let analyzer = Arc::new(AnalyzeService::new(
        db.clone(),
        Arc::new(HttpInferenceGateway::new(&config)?),
        Arc::new(CannedScenarios),
        Arc::new(LocalImageStore::new(&config.upload_dir)),
    ));

    let state = AppState {
        db,
        tokens,
        analyzer,
        config: config.clone(),
    };

    let app = create_app(state).layer(
        TraceLayer::new_for_http()
            .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                info!("📥 {} {}", request.method(), request.uri());
            })
            .on_response(
                |response: &axum::http::Response<_>,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    info!(
                        "📤 Finished in {:?} with status {}",
                        latency,
                        response.status()
                    );
                },
            ),
    );

    info!("✅ Server ready at http://{}", config.bind_addr);
    info!("📖 Swagger UI: http://{}/swagger-ui", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
