//! crates/report_portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portal.
//! These structs are independent of any storage or rendering technology.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

/// Processing status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Pending,
    Ready,
}

impl ReportStatus {
    /// The label shown to patients in the reports table.
    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Ready => "Ready to View",
        }
    }
}

/// A single medical report. Created when the catalog is loaded and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: String,
    pub date_issued: NaiveDate,
    pub report_type: String,
    pub institution: String,
    pub status: ReportStatus,
    pub findings: String,
    pub doctor_notes: String,
}

/// Represents a logged-in identity, the portal it signed in to and the moment
/// the login happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub portal: Portal,
    pub display_name: String,
    pub email: String,
    pub login_timestamp: DateTime<Utc>,
}

/// The audience a login or dashboard belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Portal {
    Patient,
    Institution,
}

impl Portal {
    pub fn as_str(self) -> &'static str {
        match self {
            Portal::Patient => "patient",
            Portal::Institution => "institution",
        }
    }

    /// Where control goes when the portal has no valid session.
    pub fn login_path(self) -> &'static str {
        match self {
            Portal::Patient => "/patient/auth",
            Portal::Institution => "/institution/auth",
        }
    }

    /// Where control goes after a successful login or signup.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Portal::Patient => "/patient/dashboard",
            Portal::Institution => "/institution/dashboard",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

impl FromStr for Portal {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Portal::Patient),
            "institution" => Ok(Portal::Institution),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// How far back the dashboard looks when filtering by issue date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    LastMonth,
    Last3Months,
    Last6Months,
}

impl DateRange {
    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::LastMonth => "lastMonth",
            DateRange::Last3Months => "last3Months",
            DateRange::Last6Months => "last6Months",
        }
    }

    /// Number of calendar months covered, `None` for an unbounded range.
    pub fn months(self) -> Option<u32> {
        match self {
            DateRange::All => None,
            DateRange::LastMonth => Some(1),
            DateRange::Last3Months => Some(3),
            DateRange::Last6Months => Some(6),
        }
    }
}

impl FromStr for DateRange {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(DateRange::All),
            "lastMonth" => Ok(DateRange::LastMonth),
            "last3Months" => Ok(DateRange::Last3Months),
            "last6Months" => Ok(DateRange::Last6Months),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// The filters applied to the catalog. `None` stands for "all".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub report_type: Option<String>,
    pub institution: Option<String>,
}

impl FilterCriteria {
    /// Builds criteria from the raw select values, treating `"all"` and blanks as unconstrained.
    pub fn from_selection(date_range: DateRange, report_type: &str, institution: &str) -> Self {
        Self {
            date_range,
            report_type: selection(report_type),
            institution: selection(institution),
        }
    }
}

fn selection(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Pagination position over the filtered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size,
        }
    }
}
