use crate::{
    CookieDocument, CookieOptions, SameSite,
    config::CookieStoreConfig,
    error::Result,
    format::{self, Attributes},
    scope,
};

/// Cookie operations over a [`CookieDocument`].
///
/// The store keeps no state of its own: every call reads or writes the
/// document directly.
#[derive(Debug, Clone)]
pub struct CookieStore<D: CookieDocument> {
    document: D,
    config: CookieStoreConfig,
}

impl<D: CookieDocument> CookieStore<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            config: CookieStoreConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CookieStoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn config(&self) -> &CookieStoreConfig {
        &self.config
    }

    /// Write `name=value` with the given attributes. Every write is marked
    /// `secure`.
    ///
    /// Nothing is written when any part fails validation.
    pub fn create(&self, name: &str, value: &str, options: &CookieOptions) -> Result<()> {
        let attributes = Attributes::resolve(options, &self.config)?;
        self.write(name, value, &attributes)
    }

    /// The value of `name`, or `None` when no cookie of that name is visible.
    ///
    /// A cookie present with an empty value reads as `Some("")`. When more
    /// than one non-empty value is visible the jar is in an ambiguous state:
    /// the cookie is deleted from every scope and `None` is returned.
    pub fn read(&self, name: &str) -> Result<Option<String>> {
        format::validate_name(name)?;

        let jar = self.document.cookie();
        let mut has_empty = false;
        let mut values = Vec::new();
        for entry in jar.split(';') {
            let (entry_name, value) = entry.split_once('=').unwrap_or((entry, ""));
            if entry_name.trim() != name {
                continue;
            }
            match value.trim() {
                "" => has_empty = true,
                value => values.push(value.to_owned()),
            }
        }

        match values.len() {
            0 if has_empty => Ok(Some(String::new())),
            0 => Ok(None),
            1 => Ok(values.pop()),
            count => {
                tracing::warn!(name, count, "ambiguous cookie, deleting every copy");
                self.delete(name)?;
                Ok(None)
            }
        }
    }

    /// Expire `name` under every domain and path scope the current location
    /// could have set it in.
    ///
    /// The scope a cookie was written under cannot be read back from the jar,
    /// so every combination of no domain or a hostname suffix with no path or
    /// a path prefix is overwritten with `max-age=-1`.
    pub fn delete(&self, name: &str) -> Result<()> {
        format::validate_name(name)?;

        let location = self.document.location();
        let domains: Vec<Option<String>> = std::iter::once(None)
            .chain(scope::hostname_suffixes(location.hostname()).into_iter().map(Some))
            .collect();
        let paths: Vec<Option<String>> = std::iter::once(None)
            .chain(scope::path_prefixes(location.pathname()).into_iter().map(Some))
            .collect();

        tracing::debug!(
            name,
            writes = domains.len() * paths.len(),
            "expiring cookie in every scope"
        );

        for domain in &domains {
            for path in &paths {
                let attributes = Attributes {
                    max_age: Some(-1.0),
                    domain: domain.as_deref(),
                    path: path.as_deref(),
                    same_site: Some(SameSite::Lax),
                };
                self.write(name, "", &attributes)?;
            }
        }

        Ok(())
    }

    /// Trusts the host's flag when it reports `true`. Otherwise writes a
    /// nameless probe cookie and checks that it shows up in the jar.
    pub fn are_enabled(&self) -> bool {
        if self.document.cookie_enabled() == Some(true) {
            return true;
        }
        let probe: &str = &self.config.probe_name;
        self.document.set_cookie(probe);
        self.document.cookie().contains(probe)
    }

    fn write(&self, name: &str, value: &str, attributes: &Attributes<'_>) -> Result<()> {
        let cookie = format::serialize(name, value, attributes)?;
        self.document.set_cookie(&cookie);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{Error, Field, Location, MemoryDocument};

    /// Records every write and serves a fixed jar string.
    #[derive(Debug)]
    struct RecordingDocument {
        jar: String,
        location: Location,
        writes: Mutex<Vec<String>>,
    }

    impl RecordingDocument {
        fn new(url: &str, jar: &str) -> Self {
            Self {
                jar: jar.to_owned(),
                location: Location::parse(url).expect("location parses"),
                writes: Mutex::new(Vec::new()),
            }
        }

        fn writes(&self) -> Vec<String> {
            self.writes.lock().expect("writes lock").clone()
        }
    }

    impl CookieDocument for RecordingDocument {
        fn cookie(&self) -> String {
            self.jar.clone()
        }

        fn set_cookie(&self, cookie: &str) {
            self.writes.lock().expect("writes lock").push(cookie.to_owned());
        }

        fn location(&self) -> Location {
            self.location.clone()
        }

        fn cookie_enabled(&self) -> Option<bool> {
            None
        }
    }

    #[test]
    fn create_serializes_defaults() {
        let doc = RecordingDocument::new("https://www.example.com/", "");
        let store = CookieStore::new(&doc);

        store
            .create("foo", "bar", &CookieOptions::new())
            .expect("create succeeds");
        store
            .create(
                "foo",
                "bar",
                &CookieOptions::new()
                    .with_max_age_days(1.0)
                    .with_domain("example.com"),
            )
            .expect("create succeeds");

        assert_eq!(
            doc.writes(),
            [
                "foo=bar; path=/; samesite=lax; secure",
                "foo=bar; max-age=86400; domain=example.com; path=/; samesite=lax; secure",
            ]
        );
    }

    #[test]
    fn invalid_create_writes_nothing() {
        let doc = RecordingDocument::new("https://www.example.com/", "");
        let store = CookieStore::new(&doc);

        let err = store
            .create("fo;o", "bar", &CookieOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::IllegalCharacters(Field::Name)));

        let err = store
            .create("foo", "bar", &CookieOptions::new().with_domain("a=b"))
            .unwrap_err();
        assert!(matches!(err, Error::IllegalCharacters(Field::Domain)));

        assert!(doc.writes().is_empty());
    }

    #[test]
    fn overflowing_max_age_writes_nothing() {
        let doc = RecordingDocument::new("https://www.example.com/", "");
        let store = CookieStore::new(&doc);

        let err = store
            .create("foo", "bar", &CookieOptions::new().with_max_age_days(f64::MAX))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NotNumeric {
                field: Field::MaxAge,
                ..
            }
        ));
        assert!(doc.writes().is_empty());
    }

    #[test]
    fn every_write_is_secure() {
        let doc = RecordingDocument::new("https://www.example.com/a", "a=1; a=2");
        let config = CookieStoreConfig::default()
            .without_path()
            .without_same_site();
        let store = CookieStore::new(&doc).with_config(config);

        store
            .create("foo", "bar", &CookieOptions::new())
            .expect("create succeeds");
        assert_eq!(store.read("a").expect("read succeeds"), None);

        let writes = doc.writes();
        assert_eq!(writes[0], "foo=bar; secure");
        assert_eq!(writes.len(), 17);
        assert!(writes.iter().all(|w| w.ends_with("; secure")));
    }

    #[test]
    fn read_policy() {
        let doc = RecordingDocument::new("https://www.example.com/", "a=1; b=; c; d = 4 ");
        let store = CookieStore::new(&doc);

        assert_eq!(store.read("a").expect("read succeeds").as_deref(), Some("1"));
        assert_eq!(store.read("b").expect("read succeeds").as_deref(), Some(""));
        assert_eq!(store.read("c").expect("read succeeds").as_deref(), Some(""));
        assert_eq!(store.read("d").expect("read succeeds").as_deref(), Some("4"));
        assert_eq!(store.read("e").expect("read succeeds"), None);
        assert!(doc.writes().is_empty());
    }

    #[test]
    fn read_keeps_text_after_first_equals() {
        let doc = RecordingDocument::new("https://www.example.com/", "token=abc==");
        let store = CookieStore::new(&doc);
        assert_eq!(
            store.read("token").expect("read succeeds").as_deref(),
            Some("abc==")
        );
    }

    #[test]
    fn single_value_wins_over_empty_copies() {
        let doc = RecordingDocument::new("https://www.example.com/", "a=; a=1; a=");
        let store = CookieStore::new(&doc);
        assert_eq!(store.read("a").expect("read succeeds").as_deref(), Some("1"));
    }

    #[test]
    fn ambiguous_read_deletes_every_scope() {
        let doc = RecordingDocument::new("https://www.example.com/a", "a=1; a=2");
        let store = CookieStore::new(&doc);

        assert_eq!(store.read("a").expect("read succeeds"), None);

        // {none, www.example.com, example.com, com} x {none, /a, /a/, /}
        let writes = doc.writes();
        assert_eq!(writes.len(), 16);
        assert_eq!(writes[0], "a=; max-age=-1; samesite=lax; secure");
        assert!(writes.contains(
            &"a=; max-age=-1; domain=example.com; path=/a/; samesite=lax; secure".to_owned()
        ));
        assert_eq!(
            writes[15],
            "a=; max-age=-1; domain=com; path=/; samesite=lax; secure"
        );
    }

    #[test]
    fn delete_validates_name() {
        let doc = RecordingDocument::new("https://www.example.com/", "");
        let store = CookieStore::new(&doc);
        assert!(matches!(store.delete(""), Err(Error::Empty(Field::Name))));
        assert!(matches!(store.read("a=b"), Err(Error::IllegalCharacters(Field::Name))));
        assert!(doc.writes().is_empty());
    }

    #[test]
    fn are_enabled_trusts_reported_flag() {
        let doc = MemoryDocument::parse("https://www.example.com/")
            .expect("location parses")
            .with_cookie_enabled(Some(true));
        let store = CookieStore::new(&doc);
        assert!(store.are_enabled());
        assert!(doc.is_empty());
    }

    #[test]
    fn are_enabled_probes_without_flag() {
        let doc = RecordingDocument::new("https://www.example.com/", "");
        let store = CookieStore::new(&doc);
        assert!(!store.are_enabled());
        assert_eq!(doc.writes(), ["this_is_a_test_cookie"]);

        let doc = MemoryDocument::parse("https://www.example.com/").expect("location parses");
        assert!(CookieStore::new(&doc).are_enabled());

        let doc = MemoryDocument::parse("https://www.example.com/")
            .expect("location parses")
            .with_cookie_enabled(Some(false));
        assert!(!CookieStore::new(&doc).are_enabled());
    }
}
