use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token pair issued by the auth endpoints.
///
/// `expires_at` is the absolute expiry instant; the wire format carries it as
/// Unix seconds under `expiry`. TTL is always derived from it, never stored.
/// A token with no `refresh_token` or no `expires_at` is a valid state (a
/// non-expiring token type, or an external issuer) and is simply never
/// refreshed proactively.
///
/// # Example
/// ```no_run
/// use flagdeck::auth::AuthToken;
/// use chrono::{Duration, Utc};
///
/// let token = AuthToken {
///     access_token: "access".to_string(),
///     token_type: "Bearer".to_string(),
///     refresh_token: Some("refresh".to_string()),
///     expires_at: Some(Utc::now() + Duration::minutes(30)),
/// };
/// assert!(token.is_refreshable());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(
        rename = "expiry",
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AuthToken {
    /// Remaining lifetime relative to `now`; negative once expired.
    /// `None` when the token carries no expiry.
    pub fn ttl(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at.map(|expires_at| expires_at - now)
    }

    /// Whether this token can be refreshed proactively.
    pub fn is_refreshable(&self) -> bool {
        self.refresh_token.is_some() && self.expires_at.is_some()
    }

    /// Value for the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        let scheme = if self.token_type.is_empty() {
            "Bearer"
        } else {
            self.token_type.as_str()
        };
        format!("{scheme} {}", self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(refresh: Option<&str>, expires_at: Option<DateTime<Utc>>) -> AuthToken {
        AuthToken {
            access_token: "access".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_at,
        }
    }

    #[test]
    fn ttl_is_negative_after_expiry() {
        let now = Utc::now();
        let t = token(Some("r"), Some(now - Duration::seconds(5)));
        assert!(t.ttl(now).unwrap() < Duration::zero());
    }

    #[test]
    fn refreshable_requires_refresh_token_and_expiry() {
        let now = Utc::now();
        assert!(token(Some("r"), Some(now)).is_refreshable());
        assert!(!token(None, Some(now)).is_refreshable());
        assert!(!token(Some("r"), None).is_refreshable());
    }

    #[test]
    fn authorization_value_uses_token_type() {
        let mut t = token(None, None);
        assert_eq!(t.authorization_value(), "Bearer access");
        t.token_type = String::new();
        assert_eq!(t.authorization_value(), "Bearer access");
    }

    #[test]
    fn expiry_serializes_as_unix_seconds() {
        let t = token(
            Some("r"),
            Some(DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
        );
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["expiry"], 1_700_000_000);
        assert_eq!(value["accessToken"], "access");
        assert_eq!(value["refreshToken"], "r");
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let t: AuthToken =
            serde_json::from_str(r#"{"accessToken":"a","tokenType":"Bearer"}"#).unwrap();
        assert!(t.refresh_token.is_none());
        assert!(t.expires_at.is_none());
        assert!(!t.is_refreshable());
    }
}
