use crate::{
    CookieDocument, CookieStore,
    error::{Error, Result},
};

/// Keeps the CSRF token inside the trusted domain.
///
/// Callers check every destination with [`assert_trusted_domain`] before
/// attaching the token from [`read_csrf_token`]. A failed check is fatal to
/// the request: the token must not be sent anywhere else instead.
///
/// [`assert_trusted_domain`]: CsrfGuard::assert_trusted_domain
/// [`read_csrf_token`]: CsrfGuard::read_csrf_token
#[derive(Debug, Clone)]
pub struct CsrfGuard<D: CookieDocument> {
    store: CookieStore<D>,
}

impl<D: CookieDocument> CsrfGuard<D> {
    pub fn new(store: CookieStore<D>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CookieStore<D> {
        &self.store
    }

    /// Fails unless the host of `url` ends with the trusted suffix.
    ///
    /// `url` is resolved against the current location, so relative URLs
    /// (and URLs without a host) are checked against the current hostname.
    /// The suffix starts with `.`, so `notdropbox.com` and the bare
    /// `dropbox.com` are both rejected for `.dropbox.com`.
    pub fn assert_trusted_domain(&self, url: &str) -> Result<()> {
        let location = self.store.document().location();
        let hostname = location
            .resolve(url)
            .and_then(|resolved| resolved.host_str().map(str::to_owned))
            .filter(|hostname| !hostname.is_empty())
            .unwrap_or_else(|| location.hostname().to_owned());

        if hostname.ends_with(self.store.config().trusted_suffix()) {
            Ok(())
        } else {
            tracing::warn!(%hostname, "refusing to send the CSRF token");
            Err(Error::UntrustedDomain { hostname })
        }
    }

    pub fn read_csrf_token(&self) -> Result<Option<String>> {
        self.store.read(self.store.config().csrf_cookie_name())
    }
}

impl<D: CookieDocument> From<CookieStore<D>> for CsrfGuard<D> {
    fn from(store: CookieStore<D>) -> Self {
        Self::new(store)
    }
}
