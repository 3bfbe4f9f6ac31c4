pub mod auth;
pub mod middleware;
pub mod pages;
pub mod rest;
pub mod state;
pub mod storage;
pub mod templates;

use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use middleware::{require_api_session, require_institution_session, require_patient_session};
pub use rest::ApiDoc;
pub use state::AppState;

/// Builds the complete application router.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/", get(pages::landing_page))
        .route("/{portal}/auth", get(auth::auth_page))
        .route("/{portal}/login", post(auth::login_handler))
        .route("/{portal}/signup", post(auth::signup_handler))
        .route("/{portal}/logout", post(auth::logout_handler));

    // Patient pages (session required, redirect to login otherwise)
    let patient_routes = Router::new()
        .route("/patient/dashboard", get(pages::patient_dashboard))
        .route("/reports/view", get(pages::report_view))
        .route("/reports/download", get(pages::report_download))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_patient_session,
        ));

    let institution_routes = Router::new()
        .route("/institution/dashboard", get(pages::institution_dashboard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_institution_session,
        ));

    // JSON API (session required, 401 otherwise)
    let api_routes = Router::new()
        .route("/api/reports", get(rest::list_reports_handler))
        .route("/api/reports/{id}", get(rest::get_report_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_api_session,
        ));

    let mut app_router = Router::new()
        .merge(public_routes)
        .merge(patient_routes)
        .merge(institution_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = app_state.config.cors_origin.as_deref() {
        match origin.parse::<HeaderValue>() {
            Ok(origin) => {
                let cors = CorsLayer::new()
                    .allow_origin(origin)
                    .allow_credentials(true)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([CONTENT_TYPE, ACCEPT]);
                app_router = app_router.layer(cors);
            }
            Err(e) => warn!("ignoring invalid CORS_ORIGIN '{}': {}", origin, e),
        }
    }

    // Merge the app router with the Swagger UI router for a complete application.
    Router::new()
        .merge(app_router.with_state(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
