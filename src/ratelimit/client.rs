//! Caller identifier handling.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A key that identifies one rate-limited caller.
///
/// The identifier is the caller's raw credential, so the `Display` form
/// prints a short fingerprint instead of the value itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Create a client id from a credential string.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A stable, non-reversible label for logs.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.0)
    }
}

/// Fingerprint an identifier without allocating a `ClientId`.
pub(crate) fn fingerprint(identifier: &str) -> String {
    let mut hasher = DefaultHasher::new();
    identifier.hash(&mut hasher);
    format!("client#{:08x}", hasher.finish() as u32)
}

impl Borrow<str> for ClientId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fingerprint())
    }
}
