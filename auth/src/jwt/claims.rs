use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Generic JWT claims structure.
///
/// Registered claims used by session tokens plus custom fields via the `extra` map.
/// All standard fields are optional; services decide which ones they require.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create session claims with a fresh token id and absolute expiration.
    ///
    /// # Arguments
    /// * `subject` - Identifier of the authenticated entity
    /// * `lifetime` - Time until the token expires, measured from now
    ///
    /// # Returns
    /// Claims with sub, iat, exp and a random UUID v4 jti set
    pub fn for_session(subject: impl ToString, lifetime: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + lifetime;

        Self {
            sub: Some(subject.to_string()),
            exp: Some(expiration.timestamp()),
            iat: Some(now.timestamp()),
            jti: Some(Uuid::new_v4().to_string()),
            ..Self::default()
        }
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Read a custom string field.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }

    /// Read a custom integer field.
    pub fn extra_i64(&self, key: &str) -> Option<i64> {
        self.extra.get(key).and_then(|v| v.as_i64())
    }

    /// Seconds left before expiration, `None` without an `exp` claim.
    ///
    /// Never negative: an expired token has zero seconds left.
    pub fn remaining_seconds(&self, current_timestamp: i64) -> Option<i64> {
        self.exp.map(|exp| (exp - current_timestamp).max(0))
    }
}
