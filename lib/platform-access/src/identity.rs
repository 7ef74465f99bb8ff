//! The identity making a request.

use studio_core::UserId;

use crate::user::User;

/// Who is making a request: an anonymous visitor or an authenticated user.
///
/// The identity is a per-request snapshot; it is resolved once from the
/// session and handed to the policy gate and the authorizer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    /// No valid session.
    #[default]
    Anonymous,
    /// A signed-in user.
    Authenticated(User),
}

impl Identity {
    /// Returns the authenticated user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// Returns the authenticated user's ID, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user().map(User::id)
    }

    /// Returns true for anonymous visitors.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Returns true if the identity is an authenticated administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self::Authenticated(user)
    }
}
