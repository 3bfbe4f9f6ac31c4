//! services/portal/src/web/rest.rs
//!
//! Contains the Axum handlers for the JSON endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::pages::{dashboard_model, DashboardQuery};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::CookieJar;
use report_portal_core::view::{RenderModel, ReportDetail, ReportRow};
use report_portal_core::{DetailView, Portal};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_reports_handler,
        get_report_handler,
    ),
    components(
        schemas(ReportPageResponse, ReportRowResponse, ReportDetailResponse, ErrorResponse)
    ),
    tags(
        (name = "Report Portal API", description = "Filtered, paginated access to the report catalog.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// One row of the reports table.
#[derive(Serialize, ToSchema)]
pub struct ReportRowResponse {
    id: String,
    date_issued: String,
    report_type: String,
    institution: String,
    status: String,
    view_href: String,
}

impl From<ReportRow> for ReportRowResponse {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            date_issued: row.date_issued,
            report_type: row.report_type,
            institution: row.institution,
            status: row.status.to_string(),
            view_href: row.view_href,
        }
    }
}

/// The current page of filtered reports.
#[derive(Serialize, ToSchema)]
pub struct ReportPageResponse {
    rows: Vec<ReportRowResponse>,
    current_page: usize,
    max_page: usize,
    total_count: usize,
}

impl From<RenderModel> for ReportPageResponse {
    fn from(model: RenderModel) -> Self {
        Self {
            rows: model.rows.into_iter().map(ReportRowResponse::from).collect(),
            current_page: model.current_page,
            max_page: model.max_page,
            total_count: model.total_count,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ReportDetailResponse {
    id: String,
    date_issued: String,
    institution: String,
    report_type: String,
    status: String,
    findings: String,
    doctor_notes: String,
    download_href: String,
}

impl From<ReportDetail> for ReportDetailResponse {
    fn from(detail: ReportDetail) -> Self {
        Self {
            id: detail.id,
            date_issued: detail.date_issued,
            institution: detail.institution,
            report_type: detail.report_type,
            status: detail.status.to_string(),
            findings: detail.findings,
            doctor_notes: detail.doctor_notes,
            download_href: detail.download_href,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    error: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the reports matching the filters, one page at a time.
#[utoipa::path(
    get,
    path = "/api/reports",
    params(DashboardQuery),
    responses(
        (status = 200, description = "The requested page of reports", body = ReportPageResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
pub async fn list_reports_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
    jar: CookieJar,
) -> Json<ReportPageResponse> {
    let view = dashboard_model(&state, jar, &query).await;
    Json(ReportPageResponse::from(view.model))
}

/// Fetch a single report.
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "The report id, e.g. RPT12345.")
    ),
    responses(
        (status = 200, description = "The report", body = ReportDetailResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    )
)]
pub async fn get_report_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Response {
    let controller = state.controller(Portal::Patient, jar);
    match controller.report_detail(Some(&id)).await {
        DetailView::Found(detail) => Json(ReportDetailResponse::from(detail)).into_response(),
        DetailView::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Report not found".to_string(),
            }),
        )
            .into_response(),
    }
}
