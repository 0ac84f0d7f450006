//! Validation and serialization of the cookie strings written to a
//! [`CookieDocument`](crate::CookieDocument).
//!
//! The output follows the `document.cookie` assignment convention:
//! `name=value; max-age=N; domain=D; path=P; samesite=S; secure`, with the
//! optional attributes left out when absent.

use std::borrow::Cow;

use crate::{
    SameSite,
    config::CookieStoreConfig,
    error::{Error, Field, Result},
};

const ILLEGAL_CHARACTERS: [char; 2] = ['=', ';'];

pub(crate) const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Per-call attributes for [`CookieStore::create`](crate::CookieStore::create).
///
/// Path and same-site fall back to [`CookieStoreConfig`] (`/` and `lax` by
/// default) unless set or explicitly removed here.
#[derive(Debug, Clone, Default)]
pub struct CookieOptions {
    pub(crate) max_age_days: Option<f64>,
    pub(crate) domain: Option<Cow<'static, str>>,
    pub(crate) path: Option<Option<Cow<'static, str>>>,
    pub(crate) same_site: Option<Option<SameSite>>,
}

impl CookieOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifetime in days, converted to a `max-age` in seconds. A lifetime of
    /// zero writes a session cookie.
    #[must_use]
    pub fn with_max_age_days(mut self, days: f64) -> Self {
        self.max_age_days = Some(days);
        self
    }

    #[must_use]
    pub fn with_domain<D: Into<Cow<'static, str>>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_path<P: Into<Cow<'static, str>>>(mut self, path: P) -> Self {
        self.path = Some(Some(path.into()));
        self
    }

    #[must_use]
    pub fn without_path(mut self) -> Self {
        self.path = Some(None);
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(Some(same_site));
        self
    }

    #[must_use]
    pub fn without_same_site(mut self) -> Self {
        self.same_site = Some(None);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Attributes<'a> {
    pub(crate) max_age: Option<f64>,
    pub(crate) domain: Option<&'a str>,
    pub(crate) path: Option<&'a str>,
    pub(crate) same_site: Option<SameSite>,
}

impl<'a> Attributes<'a> {
    pub(crate) fn resolve(
        options: &'a CookieOptions,
        config: &'a CookieStoreConfig,
    ) -> Result<Self> {
        let max_age = options
            .max_age_days
            .map(|days| finite_max_age(days * SECONDS_PER_DAY).map_err(|_| not_numeric(days)))
            .transpose()?;

        let path = match &options.path {
            Some(path) => path.as_deref(),
            None => config.path.as_deref(),
        };

        Ok(Self {
            max_age,
            domain: options.domain.as_deref(),
            path,
            same_site: options.same_site.unwrap_or(config.same_site),
        })
    }
}

pub(crate) fn validate(input: &str, field: Field, allow_empty: bool) -> Result<()> {
    if !allow_empty && input.is_empty() {
        return Err(Error::Empty(field));
    }
    if input.contains(ILLEGAL_CHARACTERS) {
        return Err(Error::IllegalCharacters(field));
    }
    Ok(())
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    validate(name, Field::Name, false)
}

/// Validate every part of a write and render it. Nothing is rendered unless
/// all parts are valid.
pub(crate) fn serialize(name: &str, value: &str, attributes: &Attributes<'_>) -> Result<String> {
    validate_name(name)?;
    validate(value, Field::Value, true)?;

    // Zero, empty and missing attributes are all left out.
    let max_age = attributes.max_age.filter(|seconds| *seconds != 0.0);
    if let Some(seconds) = max_age {
        finite_max_age(seconds)?;
    }
    let domain = attributes.domain.filter(|domain| !domain.is_empty());
    if let Some(domain) = domain {
        validate(domain, Field::Domain, false)?;
    }
    let path = attributes.path.filter(|path| !path.is_empty());
    if let Some(path) = path {
        validate(path, Field::Path, false)?;
    }

    let mut parts = vec![format!("{name}={value}")];
    if let Some(seconds) = max_age {
        parts.push(format!("max-age={}", format_seconds(seconds)));
    }
    if let Some(domain) = domain {
        parts.push(format!("domain={domain}"));
    }
    if let Some(path) = path {
        parts.push(format!("path={path}"));
    }
    if let Some(same_site) = attributes.same_site {
        parts.push(format!("samesite={}", same_site_token(same_site)));
    }
    parts.push("secure".to_owned());

    Ok(parts.join("; "))
}

fn finite_max_age(seconds: f64) -> Result<f64> {
    if seconds.is_finite() {
        Ok(seconds)
    } else {
        Err(not_numeric(seconds))
    }
}

fn not_numeric(value: f64) -> Error {
    Error::NotNumeric {
        field: Field::MaxAge,
        value,
    }
}

fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 && seconds.abs() < i64::MAX as f64 {
        (seconds as i64).to_string()
    } else {
        seconds.to_string()
    }
}

fn same_site_token(same_site: SameSite) -> &'static str {
    match same_site {
        SameSite::Strict => "strict",
        SameSite::Lax => "lax",
        SameSite::None => "none",
    }
}
