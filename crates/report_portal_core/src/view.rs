//! crates/report_portal_core/src/view.rs
//!
//! Render models handed to the presentation layer. Plain data only: no markup,
//! no escaping, no knowledge of how rows end up on screen.

use chrono::NaiveDate;

use crate::domain::{Report, Session};

pub const PLATFORM_NAME: &str = "Universal Diagnosis Platform";

/// Where the presentation layer should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Stay on the current page with this session.
    Stay(Session),
    Redirect(&'static str),
}

/// One line of the reports table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: String,
    pub date_issued: String,
    pub report_type: String,
    pub institution: String,
    pub status: &'static str,
    pub view_href: String,
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            date_issued: format_date(report.date_issued),
            report_type: report.report_type.clone(),
            institution: report.institution.clone(),
            status: report.status.label(),
            view_href: view_href(&report.id),
        }
    }
}

/// The current page of the dashboard table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub rows: Vec<ReportRow>,
    pub current_page: usize,
    pub max_page: usize,
    pub total_count: usize,
}

impl RenderModel {
    /// Rendered as "No reports found".
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.max_page
    }

    pub fn page_summary(&self) -> String {
        format!("Page {} of {}", self.current_page, self.max_page)
    }
}

/// The values offered by the report type and institution filters, taken from
/// the catalog in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub report_types: Vec<String>,
    pub institutions: Vec<String>,
}

impl FilterOptions {
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut options = Self::default();
        for report in reports {
            if !options.report_types.contains(&report.report_type) {
                options.report_types.push(report.report_type.clone());
            }
            if !options.institutions.contains(&report.institution) {
                options.institutions.push(report.institution.clone());
            }
        }
        options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDetail {
    pub id: String,
    pub date_issued: String,
    pub institution: String,
    pub report_type: String,
    pub status: &'static str,
    pub findings: String,
    pub doctor_notes: String,
    pub download_href: String,
}

impl From<&Report> for ReportDetail {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            date_issued: report.date_issued.to_string(),
            institution: report.institution.clone(),
            report_type: report.report_type.clone(),
            status: report.status.label(),
            findings: report.findings.clone(),
            doctor_notes: report.doctor_notes.clone(),
            download_href: download_href(&report.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Found(ReportDetail),
    NotFound,
}

/// A plain-text copy of a report offered as a file download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDownload {
    pub file_name: String,
    pub content: String,
}

impl From<&ReportDetail> for ReportDownload {
    fn from(detail: &ReportDetail) -> Self {
        let content = format!(
            "{PLATFORM_NAME}\n\
             Report ID: {}\n\
             Date Issued: {}\n\
             Institution: {}\n\
             Report Type: {}\n\
             \n\
             Findings:\n\
             {}\n\
             \n\
             Doctor's Notes:\n\
             {}\n",
            detail.id,
            detail.date_issued,
            detail.institution,
            detail.report_type,
            detail.findings,
            detail.doctor_notes,
        );
        Self {
            file_name: format!("report_{}.txt", detail.id),
            content,
        }
    }
}

/// "Mar 15, 2024".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn view_href(id: &str) -> String {
    format!("/reports/view?id={}", urlencoding::encode(id))
}

pub fn download_href(id: &str) -> String {
    format!("/reports/download?id={}", urlencoding::encode(id))
}

pub fn welcome_message(session: &Session) -> String {
    format!("Welcome, {}!", session.display_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportStatus;

    fn blood_test() -> Report {
        Report {
            id: "RPT12345".to_string(),
            date_issued: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            report_type: "Blood Test".to_string(),
            institution: "City Hospital".to_string(),
            status: ReportStatus::Ready,
            findings: "Normal blood sugar levels.".to_string(),
            doctor_notes: "Monitor diet regularly.".to_string(),
        }
    }

    #[test]
    fn test_row_view_data() {
        let row = ReportRow::from(&blood_test());
        assert_eq!(row.date_issued, "Mar 5, 2024");
        assert_eq!(row.status, "Ready to View");
        assert_eq!(row.view_href, "/reports/view?id=RPT12345");
    }

    #[test]
    fn test_hrefs_encode_the_id() {
        let report = Report {
            id: "RPT 1&page=2#x".to_string(),
            ..blood_test()
        };
        assert_eq!(
            ReportRow::from(&report).view_href,
            "/reports/view?id=RPT%201%26page%3D2%23x"
        );
        assert_eq!(
            ReportDetail::from(&report).download_href,
            "/reports/download?id=RPT%201%26page%3D2%23x"
        );
    }

    #[test]
    fn test_filter_options_follow_catalog() {
        let xray = Report {
            id: "RPT2".to_string(),
            report_type: "X-Ray".to_string(),
            institution: "General Hospital".to_string(),
            ..blood_test()
        };
        let mri = Report {
            id: "RPT3".to_string(),
            report_type: "MRI".to_string(),
            ..blood_test()
        };
        let options = FilterOptions::from_reports(&[blood_test(), xray, mri]);
        assert_eq!(options.report_types, vec!["Blood Test", "X-Ray", "MRI"]);
        assert_eq!(options.institutions, vec!["City Hospital", "General Hospital"]);
    }

    #[test]
    fn test_download_layout() {
        let detail = ReportDetail::from(&blood_test());
        let download = ReportDownload::from(&detail);
        assert_eq!(download.file_name, "report_RPT12345.txt");
        assert!(download.content.starts_with("Universal Diagnosis Platform\nReport ID: RPT12345\n"));
        assert!(download.content.contains("Date Issued: 2024-03-05\n"));
        assert!(download.content.contains("\nFindings:\nNormal blood sugar levels.\n"));
        assert!(download.content.ends_with("Doctor's Notes:\nMonitor diet regularly.\n"));
    }

    #[test]
    fn test_page_flags() {
        let model = RenderModel {
            rows: Vec::new(),
            current_page: 1,
            max_page: 0,
            total_count: 0,
        };
        assert!(model.is_empty());
        assert!(!model.has_prev_page());
        assert!(!model.has_next_page());
        assert_eq!(model.page_summary(), "Page 1 of 0");
    }
}
