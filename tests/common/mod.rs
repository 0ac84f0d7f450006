#![allow(dead_code)]

// Shared helpers for integration tests.
use axum::body::Body;
use csrf_cookies::{CookieStore, MemoryDocument};
use http::{HeaderMap, Response, header};
use http_body_util::BodyExt as _;

pub fn store(url: &str) -> CookieStore<MemoryDocument> {
    CookieStore::new(MemoryDocument::parse(url).expect("location parses"))
}

pub async fn body_string(body: Body) -> String {
    let bytes = body
        .collect()
        .await
        .expect("body collects successfully")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| {
            value
                .to_str()
                .expect("set-cookie header is valid utf-8")
                .to_owned()
        })
        .collect()
}

pub fn set_cookies_of(res: &Response<Body>) -> Vec<String> {
    set_cookies(res.headers())
}

/// Serves a fixed jar and records every write.
#[derive(Debug)]
pub struct RecordingDocument {
    jar: String,
    location: csrf_cookies::Location,
    writes: std::sync::Mutex<Vec<String>>,
}

impl RecordingDocument {
    pub fn new(url: &str, jar: &str) -> Self {
        Self {
            jar: jar.to_owned(),
            location: csrf_cookies::Location::parse(url).expect("location parses"),
            writes: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("writes lock").clone()
    }
}

impl csrf_cookies::CookieDocument for RecordingDocument {
    fn cookie(&self) -> String {
        self.jar.clone()
    }

    fn set_cookie(&self, cookie: &str) {
        self.writes.lock().expect("writes lock").push(cookie.to_owned());
    }

    fn location(&self) -> csrf_cookies::Location {
        self.location.clone()
    }

    fn cookie_enabled(&self) -> Option<bool> {
        None
    }
}
