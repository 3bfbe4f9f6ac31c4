//! services/portal/src/adapters/catalog.rs
//!
//! The in-memory report catalog, the concrete implementation of the `ReportCatalog`
//! port from the `core` crate. It serves the fixed set of mock reports the portal
//! ships with; a real backing store can replace it without touching the query logic.

use async_trait::async_trait;
use chrono::NaiveDate;
use report_portal_core::domain::{Report, ReportStatus};
use report_portal_core::ports::{PortError, PortResult, ReportCatalog};

//=========================================================================================
// Raw Mock Records
//=========================================================================================

struct MockReportRecord {
    id: &'static str,
    date_issued: &'static str,
    report_type: &'static str,
    institution: &'static str,
    status: ReportStatus,
    findings: &'static str,
    doctor_notes: &'static str,
}

impl MockReportRecord {
    fn to_domain(&self) -> PortResult<Report> {
        let date_issued = NaiveDate::parse_from_str(self.date_issued, "%Y-%m-%d").map_err(|e| {
            PortError::Unexpected(format!("bad issue date for {}: {}", self.id, e))
        })?;
        Ok(Report {
            id: self.id.to_string(),
            date_issued,
            report_type: self.report_type.to_string(),
            institution: self.institution.to_string(),
            status: self.status,
            findings: self.findings.to_string(),
            doctor_notes: self.doctor_notes.to_string(),
        })
    }
}

const MOCK_REPORTS: [MockReportRecord; 3] = [
    MockReportRecord {
        id: "RPT12345",
        date_issued: "2024-03-15",
        report_type: "Blood Test",
        institution: "City Hospital",
        status: ReportStatus::Ready,
        findings: "Normal blood sugar levels.",
        doctor_notes: "Monitor diet regularly.",
    },
    MockReportRecord {
        id: "RPT12346",
        date_issued: "2024-03-10",
        report_type: "X-Ray",
        institution: "General Hospital",
        status: ReportStatus::Ready,
        findings: "No fractures detected.",
        doctor_notes: "Follow up in 2 weeks.",
    },
    MockReportRecord {
        id: "RPT12347",
        date_issued: "2024-02-28",
        report_type: "MRI",
        institution: "City Hospital",
        status: ReportStatus::Ready,
        findings: "Normal brain scan results.",
        doctor_notes: "No further action required.",
    },
];

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A read-only catalog held in memory.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    reports: Vec<Report>,
}

impl MockCatalog {
    /// Loads the built-in mock reports.
    pub fn new() -> PortResult<Self> {
        let reports = MOCK_REPORTS
            .iter()
            .map(MockReportRecord::to_domain)
            .collect::<PortResult<Vec<_>>>()?;
        Ok(Self { reports })
    }

    /// A catalog over an arbitrary report set.
    pub fn from_reports(reports: Vec<Report>) -> Self {
        Self { reports }
    }
}

//=========================================================================================
// `ReportCatalog` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReportCatalog for MockCatalog {
    async fn list(&self) -> PortResult<Vec<Report>> {
        Ok(self.reports.clone())
    }

    async fn get(&self, id: &str) -> PortResult<Report> {
        self.reports
            .iter()
            .find(|report| report.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Report {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_reports_load_in_order() {
        let catalog = MockCatalog::new().unwrap();
        let ids: Vec<_> = catalog
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["RPT12345", "RPT12346", "RPT12347"]);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let catalog = MockCatalog::new().unwrap();
        let report = catalog.get("RPT12347").await.unwrap();
        assert_eq!(report.report_type, "MRI");
        assert_eq!(report.date_issued, NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());

        assert!(matches!(
            catalog.get("RPT99999").await,
            Err(PortError::NotFound(_))
        ));
    }
}
