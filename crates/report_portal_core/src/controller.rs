//! crates/report_portal_core/src/controller.rs
//!
//! The view controller reacts to user actions (form submits, filter changes, page
//! changes, report lookups) and produces render models. It is the only part of the
//! core with side effects: session storage writes and navigation decisions.

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::{FilterCriteria, PageState, Portal, Report};
use crate::ports::{Clock, PortError, ReportCatalog, SessionStorage};
use crate::query;
use crate::session::{SessionStore, DEFAULT_SESSION_TTL_HOURS};
use crate::validator::{self, AuthPolicy, LoginForm, SignupForm, ValidationError};
use crate::view::{
    DetailView, FilterOptions, Navigation, RenderModel, ReportDetail, ReportDownload, ReportRow,
};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_AUTH_DELAY: std::time::Duration = std::time::Duration::from_millis(1000);

/// Per-portal form rules and the name shown after a plain login.
#[derive(Debug, Clone)]
pub struct PortalProfile {
    pub policy: AuthPolicy,
    pub login_display_name: String,
}

/// Settings shared by every controller instance.
#[derive(Debug, Clone)]
pub struct PortalSettings {
    pub page_size: usize,
    /// Stand-in for a network round-trip during login and signup.
    pub auth_delay: std::time::Duration,
    pub session_ttl: Duration,
    pub patient: PortalProfile,
    pub institution: PortalProfile,
}

impl PortalSettings {
    pub fn profile(&self, portal: Portal) -> &PortalProfile {
        match portal {
            Portal::Patient => &self.patient,
            Portal::Institution => &self.institution,
        }
    }
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            auth_delay: DEFAULT_AUTH_DELAY,
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            patient: PortalProfile {
                policy: AuthPolicy::strict(),
                login_display_name: "John Doe".to_string(),
            },
            institution: PortalProfile {
                policy: AuthPolicy::strict(),
                login_display_name: "City Hospital".to_string(),
            },
        }
    }
}

pub struct ViewController<S> {
    portal: Portal,
    catalog: Arc<dyn ReportCatalog>,
    clock: Arc<dyn Clock>,
    settings: Arc<PortalSettings>,
    sessions: SessionStore<S>,
    options: FilterOptions,
    filtered: Vec<Report>,
    page: PageState,
}

impl<S: SessionStorage> ViewController<S> {
    pub fn new(
        portal: Portal,
        catalog: Arc<dyn ReportCatalog>,
        clock: Arc<dyn Clock>,
        settings: Arc<PortalSettings>,
        storage: S,
    ) -> Self {
        let sessions = SessionStore::with_ttl(storage, settings.session_ttl);
        let page = PageState::new(settings.page_size);
        Self {
            portal,
            catalog,
            clock,
            settings,
            sessions,
            options: FilterOptions::default(),
            filtered: Vec::new(),
            page,
        }
    }

    pub fn portal(&self) -> Portal {
        self.portal
    }

    /// Session gate run when a protected page loads. An expired session is cleared
    /// and the caller is sent to the login page.
    pub fn initialize(&mut self) -> Navigation {
        match self.sessions.current(self.portal, self.clock.now()) {
            Some(session) => Navigation::Stay(session),
            None => {
                debug!(portal = %self.portal, "no valid session, redirecting to login");
                Navigation::Redirect(self.portal.login_path())
            }
        }
    }

    pub async fn submit_login(&mut self, form: &LoginForm) -> Result<Navigation, ValidationError> {
        let profile = self.settings.profile(self.portal).clone();
        if let Err(e) = validator::validate_login(form, &profile.policy) {
            warn!(portal = %self.portal, "login rejected: {}", e);
            return Err(e);
        }

        self.simulate_round_trip().await;
        let email = form.email.trim();
        self.sessions
            .create_session(self.portal, &profile.login_display_name, email, self.clock.now());
        info!(portal = %self.portal, email = %email, "login succeeded");
        Ok(Navigation::Redirect(self.portal.dashboard_path()))
    }

    pub async fn submit_signup(&mut self, form: &SignupForm) -> Result<Navigation, ValidationError> {
        if self.portal == Portal::Institution && form.registration_id.is_none() {
            warn!(portal = %self.portal, "signup rejected: missing registration id");
            return Err(ValidationError::MissingFields);
        }
        let policy = self.settings.profile(self.portal).policy;
        if let Err(e) = validator::validate_signup(form, &policy) {
            warn!(portal = %self.portal, "signup rejected: {}", e);
            return Err(e);
        }

        self.simulate_round_trip().await;
        let email = form.email.trim();
        self.sessions
            .create_session(self.portal, form.name.trim(), email, self.clock.now());
        info!(portal = %self.portal, email = %email, "signup succeeded");
        Ok(Navigation::Redirect(self.portal.dashboard_path()))
    }

    pub fn logout(&mut self) -> Navigation {
        self.sessions.clear();
        info!(portal = %self.portal, "logged out");
        Navigation::Redirect(self.portal.login_path())
    }

    /// Recomputes the filtered reports and returns to the first page.
    pub async fn apply_filter(&mut self, criteria: &FilterCriteria) -> RenderModel {
        let reports = match self.catalog.list().await {
            Ok(reports) => reports,
            Err(e) => {
                error!("failed to list reports: {}", e);
                Vec::new()
            }
        };
        self.options = FilterOptions::from_reports(&reports);
        self.filtered = query::filter(&reports, criteria, self.clock.now());
        self.page.current_page = 1;
        debug!(
            matched = self.filtered.len(),
            total = reports.len(),
            "filter applied: {:?}",
            criteria
        );
        self.render()
    }

    /// Jumps to a page requested from outside, clamped to the available pages.
    pub fn go_to_page(&mut self, page: usize) -> RenderModel {
        self.page.current_page = query::clamp_page(page, self.max_page());
        self.render()
    }

    pub fn change_page(&mut self, delta: isize) -> RenderModel {
        self.page.current_page = query::change_page(self.page.current_page, delta, self.max_page());
        self.render()
    }

    /// Filter choices from the catalog as of the last `apply_filter`.
    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn render(&self) -> RenderModel {
        let rows = query::paginate(&self.filtered, self.page.current_page, self.page.page_size)
            .iter()
            .map(ReportRow::from)
            .collect();
        RenderModel {
            rows,
            current_page: self.page.current_page,
            max_page: self.max_page(),
            total_count: self.filtered.len(),
        }
    }

    /// Looks up a report for the detail view. Missing and unknown ids both
    /// render the not-found state.
    pub async fn report_detail(&self, id: Option<&str>) -> DetailView {
        let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
            return DetailView::NotFound;
        };
        match self.catalog.get(id).await {
            Ok(report) => DetailView::Found(ReportDetail::from(&report)),
            Err(PortError::NotFound(_)) => {
                debug!(id = %id, "report not found");
                DetailView::NotFound
            }
            Err(e) => {
                error!(id = %id, "failed to load report: {}", e);
                DetailView::NotFound
            }
        }
    }

    pub async fn download_report(&self, id: Option<&str>) -> Option<ReportDownload> {
        match self.report_detail(id).await {
            DetailView::Found(detail) => Some(ReportDownload::from(&detail)),
            DetailView::NotFound => None,
        }
    }

    pub fn storage(&self) -> &S {
        self.sessions.storage()
    }

    pub fn into_storage(self) -> S {
        self.sessions.into_storage()
    }

    fn max_page(&self) -> usize {
        query::max_page(self.filtered.len(), self.page.page_size)
    }

    async fn simulate_round_trip(&self) {
        if !self.settings.auth_delay.is_zero() {
            tokio::time::sleep(self.settings.auth_delay).await;
        }
    }
}
