use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// The cookie field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Value,
    Domain,
    Path,
    MaxAge,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "Cookie name",
            Field::Value => "Cookie value",
            Field::Domain => "Cookie domain",
            Field::Path => "Cookie path",
            Field::MaxAge => "Cookie max age",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} must not be empty")]
    Empty(Field),

    #[error("{0} contains illegal characters")]
    IllegalCharacters(Field),

    #[error("{field} must be numeric, but was {value}")]
    NotNumeric { field: Field, value: f64 },

    /// The CSRF token must not be sent to this host. Callers must abort the
    /// request rather than retry elsewhere.
    #[error("Cannot send the CSRF token to {hostname}")]
    UntrustedDomain { hostname: String },
}

impl Error {
    pub fn field(&self) -> Option<Field> {
        match self {
            Error::Empty(field) | Error::IllegalCharacters(field) => Some(*field),
            Error::NotNumeric { field, .. } => Some(*field),
            Error::UntrustedDomain { .. } => None,
        }
    }
}
