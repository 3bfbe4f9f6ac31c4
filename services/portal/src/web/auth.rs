//! services/portal/src/web/auth.rs
//!
//! Login, signup and logout for both portals.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use report_portal_core::{LoginForm, Navigation, Portal, SignupForm, ValidationError};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;
use crate::web::templates::{render_auth_page, AuthMode};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, Default)]
pub struct AuthPageQuery {
    pub mode: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub registration_id: Option<String>,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn parse_portal(raw: &str) -> Result<Portal, Response> {
    raw.parse::<Portal>().map_err(|e| {
        warn!("unknown portal requested: {}", e);
        StatusCode::NOT_FOUND.into_response()
    })
}

fn navigate(jar: CookieJar, nav: Navigation) -> Response {
    match nav {
        Navigation::Redirect(to) => (jar, Redirect::to(to)).into_response(),
        Navigation::Stay(_) => (jar, StatusCode::NO_CONTENT).into_response(),
    }
}

fn rejected(state: &AppState, portal: Portal, mode: AuthMode, error: &ValidationError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(render_auth_page(
            portal,
            mode,
            Some(&error.to_string()),
            state.footer_year(),
        )),
    )
        .into_response()
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /{portal}/auth - Login/signup page. Already signed-in users go straight
/// to their dashboard.
pub async fn auth_page(
    State(state): State<Arc<AppState>>,
    Path(portal): Path<String>,
    Query(query): Query<AuthPageQuery>,
    jar: CookieJar,
) -> Response {
    let portal = match parse_portal(&portal) {
        Ok(portal) => portal,
        Err(response) => return response,
    };

    let mut controller = state.controller(portal, jar);
    match controller.initialize() {
        Navigation::Stay(_) => {
            let jar = controller.into_storage().into_jar();
            (jar, Redirect::to(portal.dashboard_path())).into_response()
        }
        Navigation::Redirect(_) => {
            let jar = controller.into_storage().into_jar();
            let mode = AuthMode::from_query(query.mode.as_deref());
            let page = render_auth_page(portal, mode, None, state.footer_year());
            (jar, Html(page)).into_response()
        }
    }
}

/// POST /{portal}/login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Path(portal): Path<String>,
    jar: CookieJar,
    Form(req): Form<LoginRequest>,
) -> Response {
    let portal = match parse_portal(&portal) {
        Ok(portal) => portal,
        Err(response) => return response,
    };

    let form = LoginForm {
        email: req.email,
        password: req.password,
    };
    let mut controller = state.controller(portal, jar);
    match controller.submit_login(&form).await {
        Ok(nav) => navigate(controller.into_storage().into_jar(), nav),
        Err(e) => rejected(&state, portal, AuthMode::Login, &e),
    }
}

/// POST /{portal}/signup
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Path(portal): Path<String>,
    jar: CookieJar,
    Form(req): Form<SignupRequest>,
) -> Response {
    let portal = match parse_portal(&portal) {
        Ok(portal) => portal,
        Err(response) => return response,
    };

    let registration_id = match portal {
        Portal::Patient => None,
        Portal::Institution => Some(req.registration_id.unwrap_or_default()),
    };
    let form = SignupForm {
        name: req.name,
        email: req.email,
        password: req.password,
        confirm_password: req.confirm_password,
        registration_id,
    };
    let mut controller = state.controller(portal, jar);
    match controller.submit_signup(&form).await {
        Ok(nav) => navigate(controller.into_storage().into_jar(), nav),
        Err(e) => rejected(&state, portal, AuthMode::Signup, &e),
    }
}

/// POST /{portal}/logout - Clears the session and returns to the login page.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Path(portal): Path<String>,
    jar: CookieJar,
) -> Response {
    let portal = match parse_portal(&portal) {
        Ok(portal) => portal,
        Err(response) => return response,
    };

    let mut controller = state.controller(portal, jar);
    let nav = controller.logout();
    navigate(controller.into_storage().into_jar(), nav)
}
