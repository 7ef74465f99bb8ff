//! Authorization error types.

use std::fmt;

/// Errors raised by channel directories.
///
/// The authorizer never surfaces these to callers; a failed lookup decides
/// as if the identity had no relationship to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The directory could not be queried.
    DirectoryUnavailable {
        /// Error details.
        details: String,
    },
    /// A membership change referenced a channel that does not exist.
    ChannelNotFound {
        /// The channel that was referenced.
        channel_id: String,
    },
    /// No pending invitation with this ID exists for the user.
    InvitationNotFound { invitation_id: String },
    /// The invitation was already accepted or declined.
    InvitationClosed { invitation_id: String },
    /// An invitation must grant viewer or editor access.
    InvalidShareMode,
}

impl fmt::Display for AuthzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryUnavailable { details } => {
                write!(f, "channel directory unavailable: {}", details)
            }
            Self::ChannelNotFound { channel_id } => {
                write!(f, "channel '{}' not found", channel_id)
            }
            Self::InvitationNotFound { invitation_id } => {
                write!(f, "invitation '{}' not found", invitation_id)
            }
            Self::InvitationClosed { invitation_id } => {
                write!(f, "invitation '{}' was already answered", invitation_id)
            }
            Self::InvalidShareMode => write!(f, "invitations must grant view or edit access"),
        }
    }
}

impl std::error::Error for AuthzError {}
