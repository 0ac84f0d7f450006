//! An in-memory [`CookieDocument`] that applies writes the way a browser
//! applies assignments to `document.cookie`.
//!
//! Cookies are keyed by name, domain and path. A write whose `domain` does
//! not domain-match the current host is ignored, a write without `domain` is
//! host-only, and a write without `path` gets the default path of the current
//! location. A non-positive `max-age` or a past `expires` removes the cookie.
//! `secure` and `samesite` are accepted and ignored.

use std::sync::{Mutex, MutexGuard, PoisonError};

use cookie::{Cookie, ParseError};
use time::OffsetDateTime;

use crate::{CookieDocument, Location};

#[derive(Debug)]
pub struct MemoryDocument {
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    location: Location,
    cookie_enabled: Option<bool>,
    cookies: Vec<StoredCookie>,
}

#[derive(Debug, Clone)]
struct StoredCookie {
    name: String,
    value: String,
    domain: String,
    host_only: bool,
    path: String,
    expires_at: Option<OffsetDateTime>,
}

impl StoredCookie {
    fn same_key(&self, other: &StoredCookie) -> bool {
        self.name == other.name
            && self.domain == other.domain
            && self.host_only == other.host_only
            && self.path == other.path
    }

    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    fn is_visible(&self, hostname: &str, pathname: &str) -> bool {
        let domain_ok = if self.host_only {
            self.domain == hostname
        } else {
            domain_match(hostname, &self.domain)
        };
        domain_ok && path_match(pathname, &self.path)
    }

    fn render(&self) -> String {
        if self.name.is_empty() {
            self.value.clone()
        } else {
            format!("{}={}", self.name, self.value)
        }
    }
}

impl MemoryDocument {
    pub fn new(location: Location) -> Self {
        Self {
            state: Mutex::new(State {
                location,
                cookie_enabled: None,
                cookies: Vec::new(),
            }),
        }
    }

    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Location::parse(url).map(Self::new)
    }

    /// Set the reported flag. With `Some(false)` every write is dropped, as a
    /// browser with cookies disabled does.
    #[must_use]
    pub fn with_cookie_enabled(self, cookie_enabled: Option<bool>) -> Self {
        self.lock().cookie_enabled = cookie_enabled;
        self
    }

    /// Move to another page. Stored cookies are kept; what [`cookie`] shows
    /// follows the new host and path.
    ///
    /// [`cookie`]: CookieDocument::cookie
    pub fn navigate(&self, location: Location) {
        self.lock().location = location;
    }

    /// Number of unexpired cookies in every scope, visible or not.
    pub fn len(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        self.lock()
            .cookies
            .iter()
            .filter(|cookie| !cookie.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies one write and reports whether it landed in the scope of the
    /// current page. Dropped writes report `false`.
    pub(crate) fn apply(&self, raw: &str) -> bool {
        let mut state = self.lock();
        if state.cookie_enabled == Some(false) {
            return false;
        }

        let Some(parsed) = parse(raw) else {
            return false;
        };

        let hostname = state.location.hostname().to_ascii_lowercase();
        let (domain, host_only) = match parsed.domain() {
            Some(domain) if !domain.is_empty() => {
                let domain = domain.trim_start_matches('.').to_ascii_lowercase();
                if !domain_match(&hostname, &domain) {
                    tracing::warn!(%domain, %hostname, "ignoring cookie for foreign domain");
                    return false;
                }
                (domain, false)
            }
            _ => (hostname, true),
        };

        let path = match parsed.path() {
            Some(path) if path.starts_with('/') => path.to_owned(),
            _ => default_path(state.location.pathname()),
        };

        let now = OffsetDateTime::now_utc();
        let expires_at = match (parsed.max_age(), parsed.expires_datetime()) {
            (Some(max_age), _) => Some(now.saturating_add(max_age)),
            (None, expires) => expires,
        };

        let cookie = StoredCookie {
            name: parsed.name().to_owned(),
            value: parsed.value().to_owned(),
            domain,
            host_only,
            path,
            expires_at,
        };
        let in_scope = cookie.is_visible(state.location.hostname(), state.location.pathname());

        let existing = state
            .cookies
            .iter()
            .position(|stored| stored.same_key(&cookie));
        match (existing, cookie.is_expired(now)) {
            (Some(index), true) => {
                state.cookies.remove(index);
            }
            (Some(index), false) => state.cookies[index] = cookie,
            (None, true) => {}
            (None, false) => state.cookies.push(cookie),
        }
        in_scope
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieDocument for MemoryDocument {
    fn cookie(&self) -> String {
        let now = OffsetDateTime::now_utc();
        let mut state = self.lock();
        state.cookies.retain(|cookie| !cookie.is_expired(now));

        let hostname = state.location.hostname();
        let pathname = state.location.pathname();
        let mut visible: Vec<&StoredCookie> = state
            .cookies
            .iter()
            .filter(|cookie| cookie.is_visible(hostname, pathname))
            .collect();
        // Longer paths first; the sort is stable so creation order breaks ties.
        visible.sort_by(|a, b| b.path.len().cmp(&a.path.len()));

        visible
            .iter()
            .map(|cookie| cookie.render())
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn set_cookie(&self, raw: &str) {
        self.apply(raw);
    }

    fn location(&self) -> Location {
        self.lock().location.clone()
    }

    fn cookie_enabled(&self) -> Option<bool> {
        self.lock().cookie_enabled
    }
}

fn parse(raw: &str) -> Option<Cookie<'static>> {
    match Cookie::parse(raw.to_owned()) {
        Ok(cookie) => Some(cookie),
        // A nameless cookie (`value` or `=value`); its attributes are dropped.
        Err(ParseError::MissingPair | ParseError::EmptyName) => {
            let pair = raw.split(';').next().unwrap_or_default();
            let value = pair.split_once('=').map_or(pair, |(_, value)| value);
            Some(Cookie::new("", value.trim().to_owned()))
        }
        Err(err) => {
            tracing::warn!(err = %err, "ignoring unparseable cookie write");
            None
        }
    }
}

fn domain_match(hostname: &str, domain: &str) -> bool {
    hostname == domain
        || hostname
            .strip_suffix(domain)
            .is_some_and(|rest| rest.ends_with('.'))
}

fn path_match(request_path: &str, cookie_path: &str) -> bool {
    request_path == cookie_path
        || request_path.strip_prefix(cookie_path).is_some_and(|rest| {
            cookie_path.ends_with('/') || rest.starts_with('/')
        })
}

fn default_path(pathname: &str) -> String {
    match pathname.rfind('/') {
        Some(0) | None => "/".to_owned(),
        Some(index) => pathname[..index].to_owned(),
    }
}
