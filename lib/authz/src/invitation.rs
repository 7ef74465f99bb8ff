//! Channel invitations.
//!
//! An invitation offers one user editor or viewer access to one channel.
//! Accepting it adds the user to the matching relationship set; declining
//! closes it without granting anything.

use rootcause::prelude::Report;
use studio_core::{ChannelId, InvitationId, UserId};

use crate::error::AuthzError;
use crate::types::{Capability, Channel};

/// An offer of access to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    id: InvitationId,
    channel_id: ChannelId,
    invitee: UserId,
    share_mode: Capability,
    accepted: bool,
    declined: bool,
}

impl Invitation {
    /// Creates a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShareMode` if `share_mode` is [`Capability::None`].
    pub fn new(
        channel_id: ChannelId,
        invitee: UserId,
        share_mode: Capability,
    ) -> Result<Self, Report<AuthzError>> {
        if !share_mode.can_view() {
            return Err(AuthzError::InvalidShareMode.into());
        }
        Ok(Self {
            id: InvitationId::new(),
            channel_id,
            invitee,
            share_mode,
            accepted: false,
            declined: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> InvitationId {
        self.id
    }

    #[must_use]
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    #[must_use]
    pub fn invitee(&self) -> UserId {
        self.invitee
    }

    /// Returns the access granted on acceptance.
    #[must_use]
    pub fn share_mode(&self) -> Capability {
        self.share_mode
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    #[must_use]
    pub fn is_declined(&self) -> bool {
        self.declined
    }

    /// Returns true until the invitation is accepted or declined.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.accepted && !self.declined
    }

    /// Accepts the invitation and grants its share mode on `channel`.
    ///
    /// # Errors
    ///
    /// Returns `InvitationClosed` if already answered, or `ChannelNotFound`
    /// if `channel` is not the invited channel.
    pub fn accept(&mut self, channel: &mut Channel) -> Result<(), Report<AuthzError>> {
        self.ensure_pending()?;
        if channel.id() != self.channel_id {
            return Err(AuthzError::ChannelNotFound {
                channel_id: self.channel_id.to_string(),
            }
            .into());
        }

        match self.share_mode {
            Capability::Editor => channel.add_editor(self.invitee),
            Capability::Viewer => channel.add_viewer(self.invitee),
            Capability::None => return Err(AuthzError::InvalidShareMode.into()),
        };
        self.accepted = true;
        Ok(())
    }

    /// Declines the invitation. No access is granted.
    ///
    /// # Errors
    ///
    /// Returns `InvitationClosed` if already answered.
    pub fn decline(&mut self) -> Result<(), Report<AuthzError>> {
        self.ensure_pending()?;
        self.declined = true;
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), Report<AuthzError>> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(AuthzError::InvitationClosed {
                invitation_id: self.id.to_string(),
            }
            .into())
        }
    }
}
