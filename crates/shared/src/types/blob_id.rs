//! Opaque blob identifiers assigned by the storage backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the backend returns for a stored blob.
///
/// No format is assumed; the value is passed through as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(String);

impl BlobId {
    /// Wraps a backend-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BlobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BlobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_id_serializes_transparently() {
        let id = BlobId::new("M4hsZGQ1oCktdzegB6HnI6Mi28S2nqOPHxK-W7_4BUk");
        assert_eq!(
            serde_json::to_string(&id).expect("serialize"),
            "\"M4hsZGQ1oCktdzegB6HnI6Mi28S2nqOPHxK-W7_4BUk\""
        );
    }

    #[test]
    fn test_blob_id_display() {
        assert_eq!(BlobId::from("abc").to_string(), "abc");
    }
}
