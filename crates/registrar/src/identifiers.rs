//! Newtype identifiers interpolated into API request paths.
//!
//! Both identifiers end up as a single path segment (`/2/domains/{domain}`,
//! `/2/domains/accounts/{account}/domains`). The transport performs no
//! escaping, so construction rejects values that would split or terminate a
//! segment, and the dot segments URL parsing would collapse. Nothing else is
//! validated; the registrar decides what a real account or domain is.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped path-segment newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! segment_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty
            /// or is not usable as a single URL path segment.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if is_path_segment(&v) { Some(Self(v)) } else { None }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidIdentifier;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or_else(|| InvalidIdentifier {
                    kind: stringify!($name),
                    value: s.to_owned(),
                })
            }
        }
    };
}

fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && !is_dot_segment(value)
        && !value
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
}

/// `.` and `..`, including percent-encoded dots, are collapsed by URL parsing.
fn is_dot_segment(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().replace("%2e", ".").as_str(),
        "." | ".."
    )
}

/// A string could not be turned into an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "invalid {kind} '{value}': must be non-empty, not '.' or '..', and contain no '/', '?', '#' or whitespace"
)]
pub struct InvalidIdentifier {
    /// Name of the identifier type that rejected the value.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

segment_id! {
    /// Identifies an Infomaniak account owning a set of domains.
    ///
    /// Kept as a string: the CLI receives it from flags, files, or the
    /// environment and only ever interpolates it into a path.
    AccountId
}

segment_id! {
    /// A registrable domain name as known to the registrar (e.g. `example.ch`).
    DomainName
}
