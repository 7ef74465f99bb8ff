//! Sessions tie a cookie value to a signed-in user.
//!
//! The sign-in flow creates them; every request looks one up to decide
//! whether it is anonymous.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use studio_core::UserId;

/// Opaque session token as carried in the `session` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

/// A sign-in with a fixed lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Starts a session for `user_id` lasting `lifetime` from now.
    ///
    /// A negative lifetime yields a session that is already expired.
    #[must_use]
    pub fn new(id: SessionId, user_id: UserId, lifetime: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            id,
            user_id,
            created_at,
            expires_at: created_at + lifetime,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session no longer authenticates at `instant`.
    #[must_use]
    pub fn is_expired_at(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SessionId {
        SessionId::from("01J9ZQ4X6G0000000000000000")
    }

    #[test]
    fn token_displays_verbatim() {
        assert_eq!(token().to_string(), "01J9ZQ4X6G0000000000000000");
        assert_eq!(token().as_str(), token().to_string());
    }

    #[test]
    fn lifetime_sets_expiry() {
        let member = UserId::new();
        let session = Session::new(token(), member, Duration::minutes(120));

        assert_eq!(session.user_id(), member);
        assert_eq!(
            session.expires_at() - session.created_at(),
            Duration::minutes(120)
        );
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let session = Session::new(token(), UserId::new(), Duration::minutes(5));
        let expiry = session.expires_at();

        assert!(!session.is_expired_at(expiry - Duration::seconds(1)));
        assert!(session.is_expired_at(expiry));
        assert!(session.is_valid());
    }

    #[test]
    fn negative_lifetime_is_already_expired() {
        let session = Session::new(token(), UserId::new(), Duration::seconds(-1));
        assert!(session.is_expired());
        assert!(!session.is_valid());
    }

    #[test]
    fn session_serializes_token_transparently() {
        let session = Session::new(token(), UserId::new(), Duration::hours(1));
        let json = serde_json::to_value(&session).expect("serialize");
        assert_eq!(json["id"], "01J9ZQ4X6G0000000000000000");
    }
}
