//! services/portal/src/web/pages.rs
//!
//! HTML pages: landing, dashboards and the report view.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use report_portal_core::{
    DateRange, DetailView, FilterCriteria, FilterOptions, Portal, RenderModel, Session,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::IntoParams;

use crate::web::state::AppState;
use crate::web::templates::{
    render_dashboard, render_institution_dashboard, render_landing_page, render_report_not_found,
    render_report_page,
};

//=========================================================================================
// Query Types
//=========================================================================================

/// Dashboard filters and paging, as carried in the query string.
#[derive(Debug, Deserialize, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// `all`, `lastMonth`, `last3Months` or `last6Months`.
    pub date_range: Option<String>,
    /// Case-insensitive substring of the report type, or `all`.
    pub report_type: Option<String>,
    /// Case-insensitive substring of the institution, or `all`.
    pub institution: Option<String>,
    /// 1-based page the user is on.
    pub page: Option<usize>,
    /// Page step to apply from `page` (usually -1 or 1).
    pub delta: Option<isize>,
}

impl DashboardQuery {
    pub fn criteria(&self) -> FilterCriteria {
        let raw_range = self.date_range.as_deref().unwrap_or("all");
        let date_range = raw_range.parse::<DateRange>().unwrap_or_else(|e| {
            warn!("ignoring date range filter: {}", e);
            DateRange::All
        });
        FilterCriteria::from_selection(
            date_range,
            self.report_type.as_deref().unwrap_or("all"),
            self.institution.as_deref().unwrap_or("all"),
        )
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Report id, e.g. `RPT12345`.
    pub id: Option<String>,
}

/// What the dashboard needs to render one request.
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub options: FilterOptions,
    pub model: RenderModel,
}

/// Runs the dashboard events a request describes: filter, land on the requested
/// page, then apply the page step.
pub async fn dashboard_model(state: &AppState, jar: CookieJar, query: &DashboardQuery) -> DashboardView {
    let criteria = query.criteria();
    let mut controller = state.controller(Portal::Patient, jar);
    let mut model = controller.apply_filter(&criteria).await;
    if let Some(page) = query.page {
        model = controller.go_to_page(page);
    }
    if let Some(delta) = query.delta.filter(|d| *d != 0) {
        model = controller.change_page(delta);
    }
    debug!(
        page = model.current_page,
        max_page = model.max_page,
        "dashboard rendered"
    );
    DashboardView {
        criteria,
        options: controller.filter_options().clone(),
        model,
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /
pub async fn landing_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_landing_page(state.footer_year()))
}

/// GET /patient/dashboard
pub async fn patient_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<DashboardQuery>,
    jar: CookieJar,
) -> Html<String> {
    let view = dashboard_model(&state, jar, &query).await;
    Html(render_dashboard(
        &session,
        &view.criteria,
        &view.options,
        &view.model,
        state.footer_year(),
    ))
}

/// GET /institution/dashboard
pub async fn institution_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Html<String> {
    Html(render_institution_dashboard(&session, state.footer_year()))
}

/// GET /reports/view?id=
pub async fn report_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
    jar: CookieJar,
) -> Response {
    let year = state.footer_year();
    let controller = state.controller(Portal::Patient, jar);
    match controller.report_detail(query.id.as_deref()).await {
        DetailView::Found(detail) => Html(render_report_page(&detail, year)).into_response(),
        DetailView::NotFound => {
            (StatusCode::NOT_FOUND, Html(render_report_not_found(year))).into_response()
        }
    }
}

/// GET /reports/download?id= - The report as a plain-text attachment.
pub async fn report_download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
    jar: CookieJar,
) -> Response {
    let controller = state.controller(Portal::Patient, jar);
    match controller.download_report(query.id.as_deref()).await {
        Some(download) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.file_name),
                ),
            ],
            download.content,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html(render_report_not_found(state.footer_year())),
        )
            .into_response(),
    }
}
