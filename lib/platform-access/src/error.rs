//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `AuthenticationError`: Failures resolving who is making a request
//! - `PolicyError`: Invalid policy configuration or acknowledgment requests

use std::fmt;

/// Errors from authentication operations.
///
/// These never reach the policy gate or the authorizer: a request whose
/// identity cannot be established is treated as anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// Session not found or invalid.
    InvalidSession { session_id: String },
    /// Session has expired.
    SessionExpired { session_id: String },
    /// The session refers to a user that no longer exists.
    UserNotFound { user_id: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSession { session_id } => {
                write!(f, "invalid session: {session_id}")
            }
            Self::SessionExpired { session_id } => {
                write!(f, "session has expired: {session_id}")
            }
            Self::UserNotFound { user_id } => {
                write!(f, "user not found: {user_id}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// Errors from policy configuration and acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The same policy id is configured more than once.
    DuplicatePolicy { policy_id: String },
    /// A policy was configured with an empty id.
    EmptyPolicyId,
    /// The requested policy is not part of the mandatory set.
    UnknownPolicy { policy_id: String },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePolicy { policy_id } => {
                write!(f, "policy '{policy_id}' is configured more than once")
            }
            Self::EmptyPolicyId => {
                write!(f, "policy id must not be empty")
            }
            Self::UnknownPolicy { policy_id } => {
                write!(f, "unknown policy: {policy_id}")
            }
        }
    }
}

impl std::error::Error for PolicyError {}
