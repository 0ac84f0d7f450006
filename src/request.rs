use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard, PoisonError},
};

use http::{Request, header};

use crate::{CookieDocument, Location, MemoryDocument};

/// A [`CookieDocument`] for one HTTP request.
///
/// Reads see the request's `Cookie` header. Writes are kept in order, to be
/// sent back as `Set-Cookie` headers, and applied to an in-memory jar so later
/// reads in the same request see them. Once a write for a name lands in the
/// scope of the request's page, the request cookies of that name are hidden.
#[derive(Debug)]
pub struct RequestDocument {
    request_cookies: String,
    overlay: MemoryDocument,
    writes: Mutex<Writes>,
}

#[derive(Debug, Default)]
struct Writes {
    names: HashSet<String>,
    set_cookies: Vec<String>,
}

impl RequestDocument {
    pub fn new<C: Into<String>>(location: Location, request_cookies: C) -> Self {
        Self {
            request_cookies: request_cookies.into(),
            overlay: MemoryDocument::new(location).with_cookie_enabled(Some(true)),
            writes: Mutex::new(Writes::default()),
        }
    }

    /// Builds the document from the request target and `Cookie` headers.
    /// Returns `None` when the request names no host.
    pub fn from_request<B>(req: &Request<B>) -> Option<Self> {
        let authority = match req.uri().authority() {
            Some(authority) => authority.as_str().to_owned(),
            None => req.headers().get(header::HOST)?.to_str().ok()?.to_owned(),
        };
        let scheme = req.uri().scheme_str().unwrap_or("https");
        let url = format!("{scheme}://{authority}{}", req.uri().path());
        let location = Location::parse(&url).ok()?;

        let request_cookies = req
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");

        Some(Self::new(location, request_cookies))
    }

    /// Drains the writes recorded so far, oldest first.
    pub fn take_set_cookies(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().set_cookies)
    }

    fn lock(&self) -> MutexGuard<'_, Writes> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieDocument for RequestDocument {
    fn cookie(&self) -> String {
        let writes = self.lock();
        let mut entries: Vec<String> = self
            .request_cookies
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter(|entry| !writes.names.contains(entry_name(entry)))
            .map(str::to_owned)
            .collect();

        let overlay = self.overlay.cookie();
        if !overlay.is_empty() {
            entries.push(overlay);
        }
        entries.join("; ")
    }

    fn set_cookie(&self, cookie: &str) {
        let in_scope = self.overlay.apply(cookie);
        let mut writes = self.lock();
        if in_scope {
            writes.names.insert(entry_name(cookie).to_owned());
        }
        writes.set_cookies.push(cookie.to_owned());
    }

    fn location(&self) -> Location {
        self.overlay.location()
    }

    /// The server cannot know until the client sends cookies back.
    fn cookie_enabled(&self) -> Option<bool> {
        (!self.request_cookies.trim().is_empty()).then_some(true)
    }
}

/// The name of a `name=value` entry, or `""` for a nameless one.
fn entry_name(entry: &str) -> &str {
    let pair = entry.split(';').next().unwrap_or_default();
    match pair.split_once('=') {
        Some((name, _)) => name.trim(),
        None => "",
    }
}
