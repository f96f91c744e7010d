//! Stored refresh token record.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The current refresh token of one owner.
///
/// There is at most one record per `owner_key`. Issuing a new pair replaces
/// the record, which is what invalidates the previous refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRecord {
    /// Member id the token belongs to.
    pub owner_key: String,

    /// The refresh token value.
    pub token: String,

    /// When this record was written.
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
}

impl RefreshTokenRecord {
    /// Creates a record issued now.
    #[must_use]
    pub fn new(owner_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner_key: owner_key.into(),
            token: token.into(),
            issued_at: OffsetDateTime::now_utc(),
        }
    }

    /// Returns `true` if `presented` is the token held by this record.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        self.token == presented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let record = RefreshTokenRecord::new("42", "R");
        assert!(record.matches("R"));
        assert!(!record.matches("R2"));
    }

    #[test]
    fn test_serialization() {
        let record = RefreshTokenRecord::new("42", "R");

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"ownerKey\":\"42\""));
        assert!(json.contains("\"issuedAt\""));

        let deserialized: RefreshTokenRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.owner_key, record.owner_key);
        assert_eq!(deserialized.token, record.token);
    }
}
