//! services/portal/src/web/state.rs
//!
//! Defines the application's shared state and the per-request controller factory.

use crate::config::Config;
use crate::web::storage::CookieStorage;
use axum_extra::extract::cookie::CookieJar;
use chrono::Datelike;
use report_portal_core::ports::{Clock, ReportCatalog};
use report_portal_core::{Portal, PortalSettings, ViewController};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ReportCatalog>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
    pub settings: Arc<PortalSettings>,
}

impl AppState {
    pub fn new(config: Arc<Config>, catalog: Arc<dyn ReportCatalog>, clock: Arc<dyn Clock>) -> Self {
        let settings = Arc::new(config.portal_settings());
        Self {
            catalog,
            clock,
            config,
            settings,
        }
    }

    /// Copyright year shown in page footers, read from the injected clock.
    pub fn footer_year(&self) -> i32 {
        self.clock.now().year()
    }

    /// A fresh controller for one request, reading the session from the request cookies.
    pub fn controller(&self, portal: Portal, jar: CookieJar) -> ViewController<CookieStorage> {
        ViewController::new(
            portal,
            self.catalog.clone(),
            self.clock.clone(),
            self.settings.clone(),
            CookieStorage::new(jar),
        )
    }
}
