//! Domain error types for server operations.
//!
//! Handlers log internal details and answer with user-safe messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::auth::AccessRejection;

/// Errors from the policy acknowledgment form.
#[derive(Debug)]
pub enum PolicyUpdateError {
    /// The submitted policy id is not in the mandatory set.
    UnknownPolicy { policy_id: String },
    /// The signed-in user's record disappeared mid-request.
    AccountMissing { details: String },
}

impl fmt::Display for PolicyUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPolicy { policy_id } => write!(f, "unknown policy '{}'", policy_id),
            Self::AccountMissing { details } => {
                write!(f, "account missing during policy update: {}", details)
            }
        }
    }
}

impl std::error::Error for PolicyUpdateError {}

impl IntoResponse for PolicyUpdateError {
    fn into_response(self) -> Response {
        match &self {
            Self::UnknownPolicy { .. } => {
                tracing::debug!(error = %self, "bad policy acknowledgment");
                (StatusCode::BAD_REQUEST, "Unknown policy").into_response()
            }
            Self::AccountMissing { .. } => {
                tracing::error!(error = %self, "policy acknowledgment failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Errors from answering a channel invitation.
#[derive(Debug)]
pub enum InvitationError {
    /// The request did not pass the identity or policy checks.
    Rejected(AccessRejection),
    /// No invitation with this id is addressed to the user.
    NotFound { invitation_id: String },
    /// The invitation was already accepted or declined.
    AlreadyAnswered { invitation_id: String },
    /// The store failed while applying the answer.
    Store { details: String },
}

impl fmt::Display for InvitationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "request rejected: {:?}", rejection),
            Self::NotFound { invitation_id } => {
                write!(f, "invitation '{}' not found", invitation_id)
            }
            Self::AlreadyAnswered { invitation_id } => {
                write!(f, "invitation '{}' was already answered", invitation_id)
            }
            Self::Store { details } => write!(f, "invitation update failed: {}", details),
        }
    }
}

impl std::error::Error for InvitationError {}

impl From<AccessRejection> for InvitationError {
    fn from(rejection: AccessRejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl IntoResponse for InvitationError {
    fn into_response(self) -> Response {
        match self {
            Self::Rejected(rejection) => rejection.into_response(),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Self::AlreadyAnswered { .. } => {
                (StatusCode::CONFLICT, "Invitation already answered").into_response()
            }
            Self::Store { .. } => {
                tracing::error!(error = %self, "invitation update failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
