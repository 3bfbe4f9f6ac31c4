//! services/portal/src/web/storage.rs
//!
//! Browser-session storage backed by cookies. Cookies are written without a
//! `Max-Age`, so they end with the browser session just like `sessionStorage`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use report_portal_core::ports::SessionStorage;

/// A `SessionStorage` over the request's cookie jar. Writes and removals are
/// collected in the jar and sent back with the response.
#[derive(Debug, Clone, Default)]
pub struct CookieStorage {
    jar: CookieJar,
}

impl CookieStorage {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl SessionStorage for CookieStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|cookie| cookie.value().to_string())
    }

    fn set_item(&mut self, key: &str, value: String) {
        let mut cookie = Cookie::new(key.to_string(), value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.add(cookie);
    }

    fn remove_item(&mut self, key: &str) {
        let mut removal = Cookie::from(key.to_string());
        removal.set_path("/");
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.remove(removal);
    }
}
