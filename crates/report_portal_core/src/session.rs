//! crates/report_portal_core/src/session.rs
//!
//! Session lifecycle over a `SessionStorage`: create, validate (expiring after a TTL)
//! and clear. The storage keys are always written and removed together.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::domain::{Portal, Session};
use crate::ports::SessionStorage;

pub const EMAIL_KEY: &str = "email";
pub const DISPLAY_NAME_KEY: &str = "displayName";
pub const LOGIN_TIMESTAMP_KEY: &str = "loginTimestamp";
/// Which portal issued the session. A session only opens that portal's pages.
pub const PORTAL_KEY: &str = "portal";

/// Every key owned by the session.
pub const SESSION_KEYS: [&str; 4] = [EMAIL_KEY, DISPLAY_NAME_KEY, LOGIN_TIMESTAMP_KEY, PORTAL_KEY];

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// True when `now` is more than `ttl` past the login. A session exactly `ttl` old is still valid.
pub fn is_expired(session: &Session, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(session.login_timestamp) > ttl
}

/// Validity check for a possibly absent session.
pub fn is_valid(session: Option<&Session>, now: DateTime<Utc>, ttl: Duration) -> bool {
    session.is_some_and(|s| !is_expired(s, now, ttl))
}

pub struct SessionStore<S> {
    storage: S,
    ttl: Duration,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_ttl(storage, Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    pub fn with_ttl(storage: S, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Records the identity and login time, replacing any previous session.
    pub fn create_session(
        &mut self,
        portal: Portal,
        display_name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Session {
        let session = Session {
            portal,
            display_name: display_name.to_string(),
            email: email.to_string(),
            login_timestamp: now,
        };
        self.storage.set_item(EMAIL_KEY, session.email.clone());
        self.storage
            .set_item(DISPLAY_NAME_KEY, session.display_name.clone());
        self.storage
            .set_item(LOGIN_TIMESTAMP_KEY, session.login_timestamp.to_rfc3339());
        self.storage.set_item(PORTAL_KEY, portal.as_str().to_string());
        info!(portal = %portal, email = %session.email, "session created");
        session
    }

    /// Reads the stored session without judging its age.
    pub fn load(&self) -> Option<Session> {
        let email = self.storage.get_item(EMAIL_KEY)?;
        let display_name = self.storage.get_item(DISPLAY_NAME_KEY)?;
        let raw_timestamp = self.storage.get_item(LOGIN_TIMESTAMP_KEY)?;
        let login_timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
            .ok()?
            .with_timezone(&Utc);
        let portal = self.storage.get_item(PORTAL_KEY)?.parse::<Portal>().ok()?;
        Some(Session {
            portal,
            display_name,
            email,
            login_timestamp,
        })
    }

    /// The stored session if it is still valid for `portal`. Expired, partial or
    /// corrupt sessions are cleared and reported as absent. A session from the
    /// other portal is left in place but does not count.
    pub fn current(&mut self, portal: Portal, now: DateTime<Utc>) -> Option<Session> {
        match self.load() {
            Some(session) if is_expired(&session, now, self.ttl) => {
                warn!(email = %session.email, "session expired, clearing");
                self.clear();
                None
            }
            Some(session) if session.portal != portal => {
                debug!(
                    signed_in = %session.portal,
                    requested = %portal,
                    "session belongs to another portal"
                );
                None
            }
            Some(session) => Some(session),
            None => {
                if self.has_leftovers() {
                    warn!("incomplete session found in storage, clearing");
                    self.clear();
                }
                None
            }
        }
    }

    pub fn is_valid(&mut self, portal: Portal, now: DateTime<Utc>) -> bool {
        self.current(portal, now).is_some()
    }

    pub fn clear(&mut self) {
        for key in SESSION_KEYS {
            self.storage.remove_item(key);
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn has_leftovers(&self) -> bool {
        SESSION_KEYS
            .iter()
            .any(|key| self.storage.get_item(key).is_some())
    }
}
