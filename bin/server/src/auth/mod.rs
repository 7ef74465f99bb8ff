//! Authentication and admission for the Studio server.
//!
//! This module provides:
//! - Identity resolution from the session cookie ([`CurrentIdentity`])
//! - Admission of protected requests through the policy gate and the
//!   channel authorizer ([`admit`], [`AccessRejection`])
//! - Session and policy acknowledgment routes
//! - Channel invitation routes
//!
//! # Authentication
//!
//! Signing in is handled by an external identity collaborator that creates
//! sessions in the store. This module only reads them: a request without a
//! usable session is anonymous.

pub mod invitations;
pub mod middleware;
pub mod routes;

use crate::config::SessionConfig;
use crate::store::MemoryStore;
use std::sync::Arc;
use studio_authz::{AccessControl, Authorizer};
use studio_core::UserId;
use studio_platform_access::{PolicyGate, Session};

pub use middleware::{AccessRejection, CurrentIdentity, RequireUser, admit, require_policies};
pub use routes::{acknowledge_policy, login_page, logout, policy_update_page};
pub use invitations::{accept_invitation, decline_invitation, invitations_page};

/// Shared application state.
pub struct AppState {
    /// User, channel and session storage.
    pub store: Arc<MemoryStore>,
    /// Policy gate followed by the channel authorizer.
    pub access: AccessControl,
    /// Session configuration.
    pub session_config: SessionConfig,
}

impl AppState {
    /// Creates application state over a store and a policy gate.
    pub fn new(store: Arc<MemoryStore>, policies: PolicyGate, session_config: SessionConfig) -> Self {
        let authorizer = Authorizer::new(store.clone());
        Self {
            store,
            access: AccessControl::new(Arc::new(policies), authorizer),
            session_config,
        }
    }

    /// Returns the policy gate.
    pub fn policies(&self) -> &PolicyGate {
        self.access.policies()
    }

    /// Starts a session lasting the configured duration.
    ///
    /// Called by the sign-in collaborator once credentials are verified.
    pub async fn start_session(&self, user_id: UserId) -> Session {
        let lifetime = chrono::Duration::minutes(self.session_config.duration_minutes);
        self.store.create_session(user_id, lifetime).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_platform_access::PolicyConfig;

    #[tokio::test]
    async fn sessions_last_the_configured_duration() {
        let store = Arc::new(MemoryStore::new());
        let gate = PolicyGate::new(PolicyConfig::default()).expect("valid config");
        let session_config = SessionConfig {
            duration_minutes: 30,
            ..SessionConfig::default()
        };
        let state = AppState::new(store.clone(), gate, session_config);

        let user_id = UserId::new();
        let session = state.start_session(user_id).await;

        assert_eq!(
            session.expires_at() - session.created_at(),
            chrono::Duration::minutes(30)
        );
        assert_eq!(session.user_id(), user_id);
        assert_eq!(store.delete_expired().await, 0);
    }
}
