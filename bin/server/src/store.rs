//! In-memory persistence for users, channels, invitations and sessions.
//!
//! Each map sits behind its own `RwLock`; callers get clones, so a request
//! works on a consistent snapshot and never holds a lock across an await.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rootcause::prelude::Report;
use std::collections::HashMap;
use studio_authz::{AuthzError, Capability, Channel, ChannelDirectory, Invitation};
use studio_core::{ChannelId, InvitationId, UserId};
use studio_platform_access::{AuthenticationError, Identity, Session, SessionId, User};
use tokio::sync::RwLock;
use tracing::debug;

/// Generates a new opaque session ID.
pub fn generate_session_id() -> SessionId {
    SessionId::new(ulid::Ulid::new().to_string())
}

/// Process-local store standing in for the database.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    channels: RwLock<HashMap<ChannelId, Channel>>,
    invitations: RwLock<HashMap<InvitationId, Invitation>>,
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user.
    pub async fn save_user(&self, user: User) {
        self.users.write().await.insert(user.id(), user);
    }

    /// Finds a user by ID.
    pub async fn find_user(&self, id: UserId) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// Applies a change to a stored user and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no user has this ID.
    pub async fn update_user(
        &self,
        id: UserId,
        change: impl FnOnce(&mut User),
    ) -> Result<User, Report<AuthenticationError>> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AuthenticationError::UserNotFound {
                user_id: id.to_string(),
            })?;
        change(user);
        Ok(user.clone())
    }

    /// Returns the number of stored users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Inserts or replaces a channel.
    pub async fn save_channel(&self, channel: Channel) {
        self.channels.write().await.insert(channel.id(), channel);
    }

    /// Applies a change to a stored channel's relationship sets.
    ///
    /// # Errors
    ///
    /// Returns `ChannelNotFound` if no channel has this ID.
    pub async fn update_channel(
        &self,
        id: ChannelId,
        change: impl FnOnce(&mut Channel),
    ) -> Result<Channel, Report<AuthzError>> {
        let mut channels = self.channels.write().await;
        let channel = channels
            .get_mut(&id)
            .ok_or_else(|| AuthzError::ChannelNotFound {
                channel_id: id.to_string(),
            })?;
        change(channel);
        Ok(channel.clone())
    }

    /// Returns the number of stored channels.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Invites a user to a channel.
    ///
    /// # Errors
    ///
    /// Returns `ChannelNotFound` for unknown channels and `InvalidShareMode`
    /// if `share_mode` grants nothing.
    pub async fn invite(
        &self,
        channel_id: ChannelId,
        invitee: UserId,
        share_mode: Capability,
    ) -> Result<Invitation, Report<AuthzError>> {
        if !self.channels.read().await.contains_key(&channel_id) {
            return Err(AuthzError::ChannelNotFound {
                channel_id: channel_id.to_string(),
            }
            .into());
        }

        let invitation = Invitation::new(channel_id, invitee, share_mode)?;
        self.invitations
            .write()
            .await
            .insert(invitation.id(), invitation.clone());
        debug!(invitation_id = %invitation.id(), %channel_id, "invitation created");
        Ok(invitation)
    }

    /// Finds an invitation addressed to `invitee`.
    pub async fn find_invitation(&self, id: InvitationId, invitee: UserId) -> Option<Invitation> {
        self.invitations
            .read()
            .await
            .get(&id)
            .filter(|invitation| invitation.invitee() == invitee)
            .cloned()
    }

    /// Lists the user's unanswered invitations.
    pub async fn pending_invitations(&self, invitee: UserId) -> Vec<Invitation> {
        let mut pending: Vec<Invitation> = self
            .invitations
            .read()
            .await
            .values()
            .filter(|invitation| invitation.invitee() == invitee && invitation.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(Invitation::id);
        pending
    }

    /// Accepts an invitation and adds the invitee to the channel.
    ///
    /// # Errors
    ///
    /// Returns `InvitationNotFound` unless the invitation exists and is
    /// addressed to `invitee`, `InvitationClosed` if it was already
    /// answered, or `ChannelNotFound` if the channel is gone.
    pub async fn accept_invitation(
        &self,
        id: InvitationId,
        invitee: UserId,
    ) -> Result<Channel, Report<AuthzError>> {
        let mut invitations = self.invitations.write().await;
        let invitation = addressed_to(&mut invitations, id, invitee)?;

        let mut channels = self.channels.write().await;
        let channel = channels.get_mut(&invitation.channel_id()).ok_or_else(|| {
            AuthzError::ChannelNotFound {
                channel_id: invitation.channel_id().to_string(),
            }
        })?;
        invitation.accept(channel)?;
        Ok(channel.clone())
    }

    /// Declines an invitation without granting access.
    ///
    /// # Errors
    ///
    /// Returns `InvitationNotFound` or `InvitationClosed` as for
    /// [`MemoryStore::accept_invitation`].
    pub async fn decline_invitation(
        &self,
        id: InvitationId,
        invitee: UserId,
    ) -> Result<Invitation, Report<AuthzError>> {
        let mut invitations = self.invitations.write().await;
        let invitation = addressed_to(&mut invitations, id, invitee)?;
        invitation.decline()?;
        Ok(invitation.clone())
    }

    /// Creates and stores a session for the user.
    pub async fn create_session(&self, user_id: UserId, duration: Duration) -> Session {
        let session = Session::new(generate_session_id(), user_id, duration);
        self.sessions
            .write()
            .await
            .insert(session.id().clone(), session.clone());
        session
    }

    /// Deletes a session. Returns false if it did not exist.
    pub async fn delete_session(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Deletes all expired sessions and returns how many were removed.
    pub async fn delete_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    /// Resolves a session cookie value to the signed-in user.
    ///
    /// Expired sessions are deleted on sight.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or if its
    /// user no longer exists.
    pub async fn resolve_identity(
        &self,
        session_id: &SessionId,
    ) -> Result<Identity, Report<AuthenticationError>> {
        let session = self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| AuthenticationError::InvalidSession {
                session_id: session_id.to_string(),
            })?;

        if session.is_expired() {
            self.delete_session(session_id).await;
            return Err(AuthenticationError::SessionExpired {
                session_id: session_id.to_string(),
            }
            .into());
        }

        let user = self.find_user(session.user_id()).await.ok_or_else(|| {
            AuthenticationError::UserNotFound {
                user_id: session.user_id().to_string(),
            }
        })?;

        debug!(user_id = %user.id(), "resolved session");
        Ok(Identity::Authenticated(user))
    }
}

fn addressed_to(
    invitations: &mut HashMap<InvitationId, Invitation>,
    id: InvitationId,
    invitee: UserId,
) -> Result<&mut Invitation, Report<AuthzError>> {
    invitations
        .get_mut(&id)
        .filter(|invitation| invitation.invitee() == invitee)
        .ok_or_else(|| {
            AuthzError::InvitationNotFound {
                invitation_id: id.to_string(),
            }
            .into()
        })
}

#[async_trait]
impl ChannelDirectory for MemoryStore {
    async fn find_channel(&self, id: ChannelId) -> studio_core::Result<Option<Channel>, AuthzError> {
        Ok(self.channels.read().await.get(&id).cloned())
    }
}
