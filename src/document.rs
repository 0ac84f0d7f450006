use std::{fmt::Debug, sync::Arc};

use url::Url;

/// The ambient cookie surface of a page: the serialized cookie string, the
/// page location and the host's cookie-enabled flag.
///
/// Reads return the whole jar as `name=value` pairs joined by `; `. Each
/// write is one `name=value; attr=val; ...` string, applied the way a browser
/// applies an assignment to `document.cookie`.
pub trait CookieDocument: Debug {
    fn cookie(&self) -> String;
    fn set_cookie(&self, cookie: &str);
    fn location(&self) -> Location;

    /// `None` when the host does not report the flag.
    fn cookie_enabled(&self) -> Option<bool>;
}

impl<D: CookieDocument + ?Sized> CookieDocument for &D {
    fn cookie(&self) -> String {
        (**self).cookie()
    }

    fn set_cookie(&self, cookie: &str) {
        (**self).set_cookie(cookie)
    }

    fn location(&self) -> Location {
        (**self).location()
    }

    fn cookie_enabled(&self) -> Option<bool> {
        (**self).cookie_enabled()
    }
}

impl<D: CookieDocument + ?Sized> CookieDocument for Arc<D> {
    fn cookie(&self) -> String {
        (**self).cookie()
    }

    fn set_cookie(&self, cookie: &str) {
        (**self).set_cookie(cookie)
    }

    fn location(&self) -> Location {
        (**self).location()
    }

    fn cookie_enabled(&self) -> Option<bool> {
        (**self).cookie_enabled()
    }
}

/// The URL of the page a [`CookieDocument`] belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Empty for URLs without a host.
    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Resolve `href` against this location. Hrefs that do not parse resolve
    /// to `None`.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.url.join(href).ok()
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_parts() {
        let location = Location::parse("https://help.example.com/guide/page.html?q=1")
            .expect("location parses");
        assert_eq!(location.hostname(), "help.example.com");
        assert_eq!(location.pathname(), "/guide/page.html");

        let resolved = location.resolve("../api").expect("relative href resolves");
        assert_eq!(resolved.as_str(), "https://help.example.com/api");

        let blank = Location::parse("about:blank").expect("location parses");
        assert_eq!(blank.hostname(), "");
    }
}
