use std::borrow::Cow;

use crate::SameSite;

/// Defaults applied by [`CookieStore`](crate::CookieStore) and
/// [`CsrfGuard`](crate::CsrfGuard).
#[derive(Debug, Clone)]
pub struct CookieStoreConfig {
    pub(crate) path: Option<Cow<'static, str>>,
    pub(crate) same_site: Option<SameSite>,
    pub(crate) probe_name: Cow<'static, str>,
    pub(crate) csrf_cookie_name: Cow<'static, str>,
    pub(crate) trusted_suffix: Cow<'static, str>,
}

impl Default for CookieStoreConfig {
    fn default() -> Self {
        Self {
            path: Some("/".into()),
            same_site: Some(SameSite::Lax),
            probe_name: "this_is_a_test_cookie".into(),
            csrf_cookie_name: "__Host-js_csrf".into(),
            trusted_suffix: ".dropbox.com".into(),
        }
    }
}

impl CookieStoreConfig {
    /// Path used by `create` when [`CookieOptions`](crate::CookieOptions)
    /// does not name one.
    #[must_use]
    pub fn with_path<P: Into<Cow<'static, str>>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn without_path(mut self) -> Self {
        self.path = None;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    #[must_use]
    pub fn without_same_site(mut self) -> Self {
        self.same_site = None;
        self
    }

    #[must_use]
    pub fn with_probe_name<N: Into<Cow<'static, str>>>(mut self, name: N) -> Self {
        self.probe_name = name.into();
        self
    }

    #[must_use]
    pub fn with_csrf_cookie_name<N: Into<Cow<'static, str>>>(mut self, name: N) -> Self {
        self.csrf_cookie_name = name.into();
        self
    }

    /// Host suffix the CSRF token may be sent to. The suffix is anchored at a
    /// label boundary, so a missing leading `.` is added. Hosts are compared
    /// in lowercase, so the suffix is lowercased too.
    #[must_use]
    pub fn with_trusted_suffix<S: Into<Cow<'static, str>>>(mut self, suffix: S) -> Self {
        let suffix = suffix.into().to_ascii_lowercase();
        self.trusted_suffix = if suffix.starts_with('.') {
            suffix.into()
        } else {
            format!(".{suffix}").into()
        };
        self
    }

    pub fn trusted_suffix(&self) -> &str {
        &self.trusted_suffix
    }

    pub fn csrf_cookie_name(&self) -> &str {
        &self.csrf_cookie_name
    }
}
