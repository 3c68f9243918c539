use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bearer token cached for one client identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub client_identity: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(client_identity: String, access_token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            client_identity,
            access_token,
            expires_at,
        }
    }

    /// Usable iff `expires_at > now`; a token expiring exactly now is already stale.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub fn to_record(&self) -> TokenRecord {
        TokenRecord {
            access_token: self.access_token.to_owned(),
            expires_at: self.expires_at,
        }
    }
}

/// Persisted form of a [`CachedToken`]; the identity is the record key, not part of the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn into_token(self, client_identity: &str) -> CachedToken {
        CachedToken::new(client_identity.to_owned(), self.access_token, self.expires_at)
    }
}
