//! crates/report_portal_core/src/query.rs
//!
//! Filtering and pagination over the report catalog. Every function here is pure;
//! the caller supplies the reports and the current time.

use chrono::{DateTime, Months, NaiveDate, Utc};

use crate::domain::{DateRange, FilterCriteria, Report};

/// Earliest issue date a report may have to pass `range`, relative to `now`.
pub fn date_bound(range: DateRange, now: DateTime<Utc>) -> Option<NaiveDate> {
    let months = range.months()?;
    now.date_naive().checked_sub_months(Months::new(months))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Applies the date range, then the report type, then the institution filter.
/// The result keeps catalog order.
pub fn filter(reports: &[Report], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<Report> {
    let bound = date_bound(criteria.date_range, now);

    reports
        .iter()
        .filter(|report| bound.is_none_or(|b| report.date_issued >= b))
        .filter(|report| {
            criteria
                .report_type
                .as_deref()
                .is_none_or(|wanted| contains_ignore_case(&report.report_type, wanted))
        })
        .filter(|report| {
            criteria
                .institution
                .as_deref()
                .is_none_or(|wanted| contains_ignore_case(&report.institution, wanted))
        })
        .cloned()
        .collect()
}

/// The items on `page` (1-based). Pages outside the data, page 0 and a zero page
/// size all give an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// `ceil(count / page_size)`, zero when there is nothing to show.
pub fn max_page(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Moves `current` by `delta`, leaving it unchanged when the target falls outside `[1, max_page]`.
pub fn change_page(current: usize, delta: isize, max_page: usize) -> usize {
    match current.checked_add_signed(delta) {
        Some(target) if (1..=max_page).contains(&target) => target,
        _ => current,
    }
}

/// Pulls an externally requested page back into `[1, max_page]`. An empty
/// result set still sits on page 1.
pub fn clamp_page(page: usize, max_page: usize) -> usize {
    page.clamp(1, max_page.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportStatus;
    use chrono::TimeZone;

    fn report(id: &str, date: (i32, u32, u32), report_type: &str, institution: &str) -> Report {
        Report {
            id: id.to_string(),
            date_issued: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            report_type: report_type.to_string(),
            institution: institution.to_string(),
            status: ReportStatus::Ready,
            findings: String::new(),
            doctor_notes: String::new(),
        }
    }

    fn catalog() -> Vec<Report> {
        vec![
            report("RPT12345", (2024, 3, 15), "Blood Test", "City Hospital"),
            report("RPT12346", (2024, 3, 10), "X-Ray", "General Hospital"),
            report("RPT12347", (2024, 2, 28), "MRI", "City Hospital"),
        ]
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn ids(reports: &[Report]) -> Vec<&str> {
        reports.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_all_criteria_returns_catalog_in_order() {
        let result = filter(&catalog(), &FilterCriteria::default(), at(2024, 3, 20));
        assert_eq!(ids(&result), vec!["RPT12345", "RPT12346", "RPT12347"]);
    }

    #[test]
    fn test_last_month_keeps_recent_reports() {
        let criteria = FilterCriteria {
            date_range: DateRange::LastMonth,
            ..Default::default()
        };
        let result = filter(&catalog(), &criteria, at(2024, 4, 12));
        assert_eq!(ids(&result), vec!["RPT12345"]);
    }

    #[test]
    fn test_date_bound_is_inclusive() {
        let criteria = FilterCriteria {
            date_range: DateRange::LastMonth,
            ..Default::default()
        };
        let result = filter(&catalog(), &criteria, at(2024, 4, 10));
        assert_eq!(ids(&result), vec!["RPT12345", "RPT12346"]);
    }

    #[test]
    fn test_date_bounds_per_range() {
        let now = at(2024, 8, 31);
        assert_eq!(date_bound(DateRange::All, now), None);
        assert_eq!(date_bound(DateRange::LastMonth, now), NaiveDate::from_ymd_opt(2024, 7, 31));
        assert_eq!(date_bound(DateRange::Last3Months, now), NaiveDate::from_ymd_opt(2024, 5, 31));
        // Month arithmetic clamps to the last day of shorter months.
        assert_eq!(date_bound(DateRange::Last6Months, now), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_type_and_institution_match_case_insensitive_substrings() {
        let criteria = FilterCriteria {
            report_type: Some("x-ray".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&catalog(), &criteria, at(2024, 3, 20))), vec!["RPT12346"]);

        let criteria = FilterCriteria {
            institution: Some("CITY".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter(&catalog(), &criteria, at(2024, 3, 20))),
            vec!["RPT12345", "RPT12347"]
        );
    }

    #[test]
    fn test_filter_is_monotonic() {
        let now = at(2024, 3, 20);
        let reports = catalog();
        let base = FilterCriteria {
            institution: Some("hospital".to_string()),
            ..Default::default()
        };
        let narrowed = [
            FilterCriteria {
                date_range: DateRange::LastMonth,
                ..base.clone()
            },
            FilterCriteria {
                report_type: Some("mri".to_string()),
                ..base.clone()
            },
            FilterCriteria {
                institution: Some("general hospital".to_string()),
                ..base.clone()
            },
        ];

        let base_len = filter(&reports, &base, now).len();
        for criteria in &narrowed {
            let result = filter(&reports, criteria, now);
            assert!(result.len() <= base_len, "{criteria:?}");
            // Still a subsequence of the catalog.
            let mut positions = result
                .iter()
                .map(|r| reports.iter().position(|c| c.id == r.id).unwrap());
            let mut last = positions.next();
            for p in positions {
                assert!(Some(p) > last);
                last = Some(p);
            }
        }
    }

    #[test]
    fn test_paginate_length_formula() {
        let items: Vec<u32> = (0..23).collect();
        for size in 1..=12usize {
            for page in 1..=6usize {
                let expected = size.min(items.len().saturating_sub((page - 1) * size));
                assert_eq!(paginate(&items, page, size).len(), expected, "page={page} size={size}");
            }
        }
    }

    #[test]
    fn test_paginate_slices() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&items, 1, 10), &items[0..10]);
        assert_eq!(paginate(&items, 3, 10), &[21, 22, 23, 24, 25]);
        assert!(paginate(&items, 4, 10).is_empty());
        assert!(paginate(&items, 0, 10).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
        assert!(paginate::<u32>(&[], 1, 10).is_empty());
    }

    #[test]
    fn test_change_page_stays_in_bounds() {
        assert_eq!(change_page(2, -1, 3), 1);
        assert_eq!(change_page(1, -1, 3), 1);
        assert_eq!(change_page(3, 1, 3), 3);
        assert_eq!(change_page(1, 1, 3), 2);
        assert_eq!(change_page(1, 1, 0), 1);
        assert_eq!(change_page(1, 5, 3), 1);
    }

    #[test]
    fn test_max_page_and_clamp() {
        assert_eq!(max_page(0, 10), 0);
        assert_eq!(max_page(3, 10), 1);
        assert_eq!(max_page(10, 10), 1);
        assert_eq!(max_page(11, 10), 2);
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(7, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
    }
}
