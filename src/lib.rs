//! Document-cookie helpers and a CSRF token domain guard.
//!
//! [`CookieStore`] creates, reads and deletes cookies through a
//! [`CookieDocument`]: the `document.cookie` model of one serialized jar string
//! for reads and one `name=value; attr=val` string per write. [`CsrfGuard`]
//! reads the CSRF token cookie and refuses to release it to hosts outside the
//! trusted domain suffix.
//!
//! Documents:
//! - [`MemoryDocument`] applies writes with browser cookie semantics in memory.
//! - [`RequestDocument`] binds to one HTTP request; [`CookieDocumentLayer`]
//!   inserts it into request extensions as [`RequestCookies`] and sends its
//!   writes back as `Set-Cookie` headers.
//! - `BrowserDocument` (`browser` feature) is the real page, through `web-sys`.
//!
//! # Deleting
//! A cookie's domain and path cannot be read back from the jar, so
//! [`CookieStore::delete`] expires the name under every domain and path scope
//! the current location could have written it in. A [`CookieStore::read`]
//! that finds several non-empty copies of a name runs the same sweep and
//! returns `None`.

#[cfg(feature = "browser")]
mod browser;
mod config;
mod document;
mod error;
mod format;
mod guard;
pub mod layer;
mod memory;
mod request;
pub mod scope;
mod store;

pub use cookie::SameSite;

pub use crate::config::CookieStoreConfig;
pub use crate::document::{CookieDocument, Location};
pub use crate::error::{Error, Field, Result};
pub use crate::format::CookieOptions;
pub use crate::guard::CsrfGuard;
pub use crate::layer::{CookieDocumentLayer, RequestCookies};
pub use crate::memory::MemoryDocument;
pub use crate::request::RequestDocument;
pub use crate::store::CookieStore;

#[cfg(feature = "browser")]
pub use crate::browser::BrowserDocument;
