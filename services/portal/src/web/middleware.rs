//! services/portal/src/web/middleware.rs
//!
//! Session gate for protected routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use report_portal_core::{Navigation, Portal};
use serde_json::json;
use std::sync::Arc;

use crate::web::state::AppState;

/// Checks the session once, when the page loads.
///
/// If valid, inserts the `Session` into request extensions for handlers to use.
/// If absent or expired, clears whatever is left of it and hands back `Err` with
/// the cleared jar and the login path.
fn check_session(
    state: &AppState,
    portal: Portal,
    req: &mut Request,
) -> Result<(), (CookieJar, &'static str)> {
    let jar = CookieJar::from_headers(req.headers());
    let mut controller = state.controller(portal, jar);
    match controller.initialize() {
        Navigation::Stay(session) => {
            req.extensions_mut().insert(session);
            Ok(())
        }
        Navigation::Redirect(to) => Err((controller.into_storage().into_jar(), to)),
    }
}

async fn gate_page(state: &AppState, portal: Portal, mut req: Request, next: Next) -> Response {
    match check_session(state, portal, &mut req) {
        Ok(()) => next.run(req).await,
        Err((jar, to)) => (jar, Redirect::to(to)).into_response(),
    }
}

/// Patient pages: redirect to the patient login when unauthenticated.
pub async fn require_patient_session(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    gate_page(&state, Portal::Patient, req, next).await
}

/// Institution pages: redirect to the institution login when unauthenticated.
pub async fn require_institution_session(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    gate_page(&state, Portal::Institution, req, next).await
}

/// JSON routes answer 401 instead of redirecting.
pub async fn require_api_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    match check_session(&state, Portal::Patient, &mut req) {
        Ok(()) => next.run(req).await,
        Err((jar, _)) => (
            StatusCode::UNAUTHORIZED,
            jar,
            Json(json!({ "error": "Not authenticated" })),
        )
            .into_response(),
    }
}
