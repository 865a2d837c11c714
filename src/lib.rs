pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::services::analyze::AnalyzeService;
use crate::services::token::TokenService;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::auth::signup,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::analyze::analyze_scan,
        api::handlers::patients::list_patients,
        api::handlers::patients::create_patient,
        api::handlers::history::scan_history,
        api::handlers::reports::get_reports,
        api::handlers::reports::create_report,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            api::handlers::auth::LoginRequest,
            api::handlers::auth::SignupRequest,
            api::handlers::auth::UserInfo,
            api::handlers::auth::LoginResponse,
            api::handlers::auth::SignupResponse,
            api::handlers::auth::LogoutResponse,
            api::handlers::analyze::AnalyzeRequest,
            api::handlers::analyze::AnalyzeResponse,
            api::handlers::patients::PatientListResponse,
            api::handlers::patients::CreatePatientResponse,
            api::handlers::history::HistoryEntry,
            api::handlers::history::HistoryResponse,
            api::handlers::reports::CreateReportRequest,
            api::handlers::reports::ReportListResponse,
            api::handlers::reports::CreateReportResponse,
            models::Detection,
            models::PatientUpload,
            entities::patients::Model,
            entities::reports::Model,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "analysis", description = "Scan analysis and history"),
        (name = "patients", description = "Patient registry"),
        (name = "reports", description = "Report management"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenService>,
    pub analyzer: Arc<AnalyzeService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/auth/signup", post(api::handlers::auth::signup))
        .route("/auth/login", post(api::handlers::auth::login))
        // Logout accepts a bearer token by convention but never
        // inspects it; expiry is the only invalidation mechanism.
        .route("/auth/logout", post(api::handlers::auth::logout))
        .route(
            "/analyze",
            post(api::handlers::analyze::analyze_scan)
                .layer(axum::extract::DefaultBodyLimit::max(
                    state.config.max_upload_size + 1024 * 1024, // multipart overhead
                ))
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                )),
        )
        .route(
            "/patients",
            get(api::handlers::patients::list_patients)
                .post(api::handlers::patients::create_patient)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                )),
        )
        .route(
            "/history",
            get(api::handlers::history::scan_history).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::auth_middleware,
            )),
        )
        .route(
            "/reports",
            get(api::handlers::reports::get_reports)
                .post(api::handlers::reports::create_report)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                )),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
