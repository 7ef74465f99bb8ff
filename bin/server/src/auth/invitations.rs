//! Channel invitation routes.
//!
//! Invitees list, accept and decline their own invitations. Accepting adds
//! them to the channel's editor or viewer set; declining grants nothing.

use axum::{
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;
use studio_authz::Capability;
use studio_core::InvitationId;
use studio_platform_access::{Identity, User};
use tracing::info;

use super::{
    AccessRejection, AppState,
    middleware::{RequireUser, found, require_policies},
};
use crate::error::InvitationError;

/// Path of the invitation list.
pub const INVITATIONS_PATH: &str = "/invitations/";

fn share_label(share_mode: Capability) -> &'static str {
    if share_mode.can_write() { "edit" } else { "view" }
}

/// Lists the signed-in user's pending invitations.
pub async fn invitations_page(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
) -> Result<String, AccessRejection> {
    require_policies(&state, &Identity::from(user.clone()), INVITATIONS_PATH)?;

    let pending = state.store.pending_invitations(user.id()).await;
    if pending.is_empty() {
        return Ok("No pending invitations".to_string());
    }

    let lines: Vec<String> = pending
        .iter()
        .map(|invitation| {
            format!(
                "- {} {} ({})",
                invitation.id(),
                invitation.channel_id(),
                share_label(invitation.share_mode())
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Accepts an invitation and opens the channel.
///
/// # Errors
///
/// Unknown ids answer 404 and answered invitations 409.
pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Path(invitation_id): Path<String>,
) -> Result<Response, InvitationError> {
    let id = pending_invitation(&state, &user, &invitation_id).await?;

    let channel = state
        .store
        .accept_invitation(id, user.id())
        .await
        .map_err(|report| InvitationError::Store {
            details: report.to_string(),
        })?;

    info!(user_id = %user.id(), invitation_id = %id, channel_id = %channel.id(), "invitation accepted");
    Ok(found(&format!("/channels/{}", channel.id())))
}

/// Declines an invitation.
///
/// # Errors
///
/// Unknown ids answer 404 and answered invitations 409.
pub async fn decline_invitation(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Path(invitation_id): Path<String>,
) -> Result<Response, InvitationError> {
    let id = pending_invitation(&state, &user, &invitation_id).await?;

    state
        .store
        .decline_invitation(id, user.id())
        .await
        .map_err(|report| InvitationError::Store {
            details: report.to_string(),
        })?;

    info!(user_id = %user.id(), invitation_id = %id, "invitation declined");
    Ok(found(INVITATIONS_PATH))
}

/// Checks the policy gate and resolves a pending invitation addressed to `user`.
async fn pending_invitation(
    state: &AppState,
    user: &User,
    reference: &str,
) -> Result<InvitationId, InvitationError> {
    require_policies(state, &Identity::from(user.clone()), INVITATIONS_PATH)?;

    let not_found = || InvitationError::NotFound {
        invitation_id: reference.to_string(),
    };
    let id: InvitationId = reference.parse().map_err(|_| not_found())?;
    let invitation = state
        .store
        .find_invitation(id, user.id())
        .await
        .ok_or_else(not_found)?;

    if !invitation.is_pending() {
        return Err(InvitationError::AlreadyAnswered {
            invitation_id: reference.to_string(),
        });
    }
    Ok(id)
}
