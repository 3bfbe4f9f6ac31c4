//! services/portal/src/web/templates.rs
//!
//! HTML rendering for the portal pages. Every dynamic value passes through
//! `escape_html` before it reaches the markup.

use report_portal_core::domain::{DateRange, FilterCriteria, Portal};
use report_portal_core::view::{
    welcome_message, FilterOptions, RenderModel, ReportDetail, PLATFORM_NAME,
};
use report_portal_core::Session;

const BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
        header { background: #ffffff; padding: 1.5rem; border-bottom: 1px solid #e2e8f0; display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; }
        header h1 { margin: 0; font-size: 1.35rem; }
        main { padding: 2rem 1.5rem; max-width: 960px; margin: 0 auto; box-sizing: border-box; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.5rem; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); margin-bottom: 1.5rem; }
        .tabs { display: flex; gap: 1rem; margin-bottom: 1.25rem; }
        .tabs a { padding: 0.5rem 0.9rem; border-bottom: 2px solid transparent; color: #64748b; text-decoration: none; font-weight: 600; }
        .tabs a.active { color: #1d4ed8; border-color: #1d4ed8; }
        label { display: block; margin: 0.75rem 0 0.35rem; font-weight: 600; }
        input, select { width: 100%; padding: 0.7rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #f8fafc; box-sizing: border-box; }
        button { padding: 0.75rem 1.2rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; margin-top: 1rem; }
        button:hover { background: #1d4ed8; }
        .filters { display: grid; grid-template-columns: repeat(3, 1fr) auto; gap: 1rem; align-items: end; }
        table { width: 100%; border-collapse: collapse; background: #ffffff; }
        th, td { padding: 0.75rem 1rem; border-bottom: 1px solid #e2e8f0; text-align: left; font-size: 0.92rem; }
        th { background: #f1f5f9; }
        .empty { text-align: center; color: #64748b; }
        .status-tag { display: inline-flex; padding: 0.2rem 0.7rem; border-radius: 999px; font-size: 0.8rem; font-weight: 600; background: #dcfce7; color: #166534; }
        .pagination { display: flex; justify-content: space-between; align-items: center; margin-top: 1rem; }
        .pagination a { color: #2563eb; text-decoration: none; font-weight: 600; }
        .pagination .disabled { color: #94a3b8; }
        .error-box { padding: 0.85rem 1rem; border-radius: 8px; background: #fee2e2; color: #b91c1c; margin-bottom: 1rem; }
        dl { display: grid; grid-template-columns: max-content 1fr; gap: 0.5rem 1.5rem; }
        dt { font-weight: 600; color: #475569; }
        .actions { display: flex; gap: 1rem; }
        .actions a { display: inline-block; padding: 0.7rem 1.1rem; border-radius: 8px; background: #2563eb; color: #fff; text-decoration: none; font-weight: 600; }
        .link-button { background: none; color: #2563eb; padding: 0; margin: 0; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }
        @media print { header form, .actions, .app-footer { display: none; } }
"#;

pub fn escape_html(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wraps a page body in the shared document shell. `year` is the footer copyright year.
fn layout(title: &str, header_extra: &str, body: &str, year: i32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} | {platform}</title>
    <style>{styles}</style>
</head>
<body>
    <header><h1>{platform}</h1>{header_extra}</header>
    <main>
{body}
    </main>
    <footer class="app-footer">&copy; {year} {platform}</footer>
</body>
</html>"#,
        title = escape_html(title),
        platform = PLATFORM_NAME,
        styles = BASE_STYLES,
        header_extra = header_extra,
        body = body,
        year = year,
    )
}

fn logout_form(portal: Portal) -> String {
    format!(
        r#"<form method="post" action="/{portal}/logout"><button type="submit" class="link-button">Log out</button></form>"#,
        portal = portal.as_str()
    )
}

fn portal_title(portal: Portal) -> &'static str {
    match portal {
        Portal::Patient => "Patient",
        Portal::Institution => "Institution",
    }
}

pub fn render_landing_page(year: i32) -> String {
    let body = r#"        <section class="panel">
            <h2>Welcome</h2>
            <p>View and share your medical reports securely.</p>
            <div class="actions">
                <a href="/patient/auth">Patient access</a>
                <a href="/institution/auth">Institution access</a>
            </div>
        </section>"#;
    layout("Home", "", body, year)
}

/// Which of the two forms the auth page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("signup") => AuthMode::Signup,
            _ => AuthMode::Login,
        }
    }
}

pub fn render_auth_page(portal: Portal, mode: AuthMode, error: Option<&str>, year: i32) -> String {
    let p = portal.as_str();
    let (login_class, signup_class) = match mode {
        AuthMode::Login => ("active", ""),
        AuthMode::Signup => ("", "active"),
    };
    let error_html = error
        .map(|message| {
            format!(
                r#"<div class="error-box" role="alert">{}</div>"#,
                escape_html(message)
            )
        })
        .unwrap_or_default();

    let form = match mode {
        AuthMode::Login => format!(
            r#"<form method="post" action="/{p}/login" id="loginForm">
                <label for="loginEmail">Email</label>
                <input id="loginEmail" name="email" type="email" autocomplete="email">
                <label for="loginPassword">Password</label>
                <input id="loginPassword" name="password" type="password" autocomplete="current-password">
                <button type="submit">Log in</button>
            </form>"#
        ),
        AuthMode::Signup => {
            let (name_label, registration) = match portal {
                Portal::Patient => ("Full name", String::new()),
                Portal::Institution => (
                    "Institution name",
                    r#"<label for="registrationId">Registration ID</label>
                <input id="registrationId" name="registration_id" type="text">"#
                        .to_string(),
                ),
            };
            format!(
                r#"<form method="post" action="/{p}/signup" id="signupForm">
                <label for="signupName">{name_label}</label>
                <input id="signupName" name="name" type="text" autocomplete="name">
                {registration}
                <label for="signupEmail">Email</label>
                <input id="signupEmail" name="email" type="email" autocomplete="email">
                <label for="signupPassword">Password</label>
                <input id="signupPassword" name="password" type="password" autocomplete="new-password">
                <label for="confirmPassword">Confirm password</label>
                <input id="confirmPassword" name="confirm_password" type="password" autocomplete="new-password">
                <button type="submit">Create account</button>
            </form>"#
            )
        }
    };

    let body = format!(
        r#"        <section class="panel">
            <h2>{title} Portal</h2>
            <nav class="tabs">
                <a href="/{p}/auth?mode=login" class="{login_class}">Login</a>
                <a href="/{p}/auth?mode=signup" class="{signup_class}">Sign Up</a>
            </nav>
            {error_html}
            {form}
        </section>"#,
        title = portal_title(portal),
    );
    layout(&format!("{} Login", portal_title(portal)), "", &body, year)
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    )
}

/// The current filters as a query string, so pagination links keep them.
fn filter_query(criteria: &FilterCriteria) -> String {
    format!(
        "dateRange={}&reportType={}&institution={}",
        criteria.date_range.as_str(),
        urlencoding::encode(criteria.report_type.as_deref().unwrap_or("all")),
        urlencoding::encode(criteria.institution.as_deref().unwrap_or("all")),
    )
}

pub fn render_dashboard(
    session: &Session,
    criteria: &FilterCriteria,
    options: &FilterOptions,
    model: &RenderModel,
    year: i32,
) -> String {
    let date_options = [
        (DateRange::All, "All dates"),
        (DateRange::LastMonth, "Last month"),
        (DateRange::Last3Months, "Last 3 months"),
        (DateRange::Last6Months, "Last 6 months"),
    ]
    .iter()
    .map(|(range, label)| option(range.as_str(), label, criteria.date_range == *range))
    .collect::<String>();

    let type_options = options
        .report_types
        .iter()
        .map(|t| option(t, t, criteria.report_type.as_deref() == Some(t.as_str())))
        .collect::<String>();
    let institution_options = options
        .institutions
        .iter()
        .map(|i| option(i, i, criteria.institution.as_deref() == Some(i.as_str())))
        .collect::<String>();

    let rows = if model.is_empty() {
        r#"<tr><td colspan="5" class="empty">No reports found</td></tr>"#.to_string()
    } else {
        model
            .rows
            .iter()
            .map(|row| {
                format!(
                    r#"<tr>
                    <td>{}</td>
                    <td>{}</td>
                    <td>{}</td>
                    <td><span class="status-tag">{}</span></td>
                    <td><a href="{}">View Report</a></td>
                </tr>"#,
                    escape_html(&row.date_issued),
                    escape_html(&row.report_type),
                    escape_html(&row.institution),
                    escape_html(row.status),
                    escape_html(&row.view_href),
                )
            })
            .collect::<String>()
    };

    let base = filter_query(criteria);
    let page = model.current_page;
    let prev = if model.has_prev_page() {
        format!(
            r#"<a id="prevPage" href="/patient/dashboard?{}">&larr; Previous</a>"#,
            escape_html(&format!("{base}&page={page}&delta=-1"))
        )
    } else {
        r#"<span id="prevPage" class="disabled">&larr; Previous</span>"#.to_string()
    };
    let next = if model.has_next_page() {
        format!(
            r#"<a id="nextPage" href="/patient/dashboard?{}">Next &rarr;</a>"#,
            escape_html(&format!("{base}&page={page}&delta=1"))
        )
    } else {
        r#"<span id="nextPage" class="disabled">Next &rarr;</span>"#.to_string()
    };

    let body = format!(
        r#"        <section class="panel">
            <h2 class="welcome-message">{welcome}</h2>
            <form method="get" action="/patient/dashboard" class="filters">
                <div><label for="dateRange">Date range</label><select id="dateRange" name="dateRange">{date_options}</select></div>
                <div><label for="reportType">Report type</label><select id="reportType" name="reportType">{all_types}{type_options}</select></div>
                <div><label for="institution">Institution</label><select id="institution" name="institution">{all_institutions}{institution_options}</select></div>
                <div><button type="submit">Apply</button></div>
            </form>
        </section>
        <section class="panel">
            <table>
                <thead><tr><th>Date</th><th>Type</th><th>Institution</th><th>Status</th><th>Action</th></tr></thead>
                <tbody id="reportsTableBody">{rows}</tbody>
            </table>
            <div class="pagination">{prev}<span id="pageInfo">{summary}</span>{next}</div>
        </section>"#,
        welcome = escape_html(&welcome_message(session)),
        all_types = option("all", "All types", criteria.report_type.is_none()),
        all_institutions = option("all", "All institutions", criteria.institution.is_none()),
        summary = escape_html(&model.page_summary()),
    );
    layout("My Reports", &logout_form(Portal::Patient), &body, year)
}

pub fn render_institution_dashboard(session: &Session, year: i32) -> String {
    let body = format!(
        r#"        <section class="panel">
            <h2 id="welcomeMessage">Welcome, {}</h2>
            <p>Signed in as {}.</p>
        </section>"#,
        escape_html(&session.display_name),
        escape_html(&session.email),
    );
    layout("Institution Dashboard", &logout_form(Portal::Institution), &body, year)
}

pub fn render_report_page(detail: &ReportDetail, year: i32) -> String {
    let body = format!(
        r#"        <section class="panel">
            <h2>Report <span id="reportId">{id}</span></h2>
            <dl>
                <dt>Date issued</dt><dd id="dateIssued">{date}</dd>
                <dt>Institution</dt><dd id="institution">{institution}</dd>
                <dt>Report type</dt><dd id="reportType">{report_type}</dd>
                <dt>Status</dt><dd><span class="status-tag">{status}</span></dd>
            </dl>
            <h3>Findings</h3>
            <p id="findings">{findings}</p>
            <h3>Doctor's Notes</h3>
            <p id="doctorNotes">{notes}</p>
            <div class="actions">
                <a href="{download}">Download</a>
                <a href="javascript:window.print()">Print</a>
                <a href="/patient/dashboard">Back to Dashboard</a>
            </div>
        </section>"#,
        id = escape_html(&detail.id),
        date = escape_html(&detail.date_issued),
        institution = escape_html(&detail.institution),
        report_type = escape_html(&detail.report_type),
        status = escape_html(detail.status),
        findings = escape_html(&detail.findings),
        notes = escape_html(&detail.doctor_notes),
        download = escape_html(&detail.download_href),
    );
    layout(&format!("Report {}", detail.id), &logout_form(Portal::Patient), &body, year)
}

pub fn render_report_not_found(year: i32) -> String {
    let body = r#"        <section class="panel" style="text-align: center;">
            <h2>Report Not Found</h2>
            <p>The requested report could not be found.</p>
            <a href="/patient/dashboard">Back to Dashboard</a>
        </section>"#;
    layout("Report Not Found", "", body, year)
}
