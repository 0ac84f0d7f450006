//! [`CookieDocument`] bound to the page the module runs in.

use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Window};

use crate::{CookieDocument, Location};

#[derive(Debug, Clone)]
pub struct BrowserDocument {
    window: Window,
    document: HtmlDocument,
    fallback: Location,
}

impl BrowserDocument {
    /// `None` outside a window with an HTML document (workers, XML documents).
    ///
    /// The location at construction is used whenever a later `href` cannot be
    /// read or parsed.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?.dyn_into::<HtmlDocument>().ok()?;
        let fallback = Location::parse(&window.location().href().ok()?).ok()?;
        Some(Self {
            window,
            document,
            fallback,
        })
    }
}

impl CookieDocument for BrowserDocument {
    fn cookie(&self) -> String {
        self.document.cookie().unwrap_or_default()
    }

    fn set_cookie(&self, cookie: &str) {
        if let Err(err) = self.document.set_cookie(cookie) {
            tracing::warn!(err = ?err, "document rejected cookie write");
        }
    }

    fn location(&self) -> Location {
        let Ok(href) = self.window.location().href() else {
            return self.fallback.clone();
        };
        Location::parse(&href).unwrap_or_else(|err| {
            tracing::warn!(err = %err, %href, "unparseable page location");
            self.fallback.clone()
        })
    }

    fn cookie_enabled(&self) -> Option<bool> {
        let navigator = self.window.navigator();
        Reflect::get(navigator.as_ref(), &JsValue::from_str("cookieEnabled"))
            .ok()?
            .as_bool()
    }
}
