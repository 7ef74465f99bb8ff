//! User account type.
//!
//! A `User` is the persisted account behind an authenticated identity. It
//! carries the administrative flag and the record of which policy versions
//! the user has acknowledged; both are mutated only by explicit actions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use studio_core::UserId;

use crate::policy::{Policy, PolicyId};

/// Record of a user accepting a specific version of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAcknowledgment {
    /// The policy version (effective date) that was acknowledged.
    pub version: NaiveDate,
    /// When the acknowledgment was recorded.
    pub acknowledged_at: DateTime<Utc>,
}

/// A registered user of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal platform user ID.
    id: UserId,
    /// Login email address.
    email: String,
    /// User's display name.
    display_name: Option<String>,
    /// Whether the user may use the administration surface.
    is_admin: bool,
    /// Latest acknowledged version per policy id.
    policies: BTreeMap<PolicyId, PolicyAcknowledgment>,
    /// When the user record was created.
    created_at: DateTime<Utc>,
    /// When the user record was last updated.
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, non-admin user with no acknowledged policies.
    #[must_use]
    pub fn new(email: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            display_name: None,
            is_admin: false,
            policies: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the user's internal platform ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the user's display name, if set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns true if the user has administrative access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns the user's policy acknowledgments keyed by policy id.
    #[must_use]
    pub fn policies(&self) -> &BTreeMap<PolicyId, PolicyAcknowledgment> {
        &self.policies
    }

    /// Returns when the user was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the user was last updated.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if the user acknowledged this policy at its current
    /// version or a later one.
    #[must_use]
    pub fn has_acknowledged(&self, policy: &Policy) -> bool {
        self.policies
            .get(policy.id())
            .is_some_and(|ack| ack.version >= policy.version())
    }

    /// Records acknowledgment of the given policy version.
    pub fn acknowledge_policy(&mut self, policy: &Policy) {
        let now = Utc::now();
        self.policies.insert(
            policy.id().clone(),
            PolicyAcknowledgment {
                version: policy.version(),
                acknowledged_at: now,
            },
        );
        self.updated_at = now;
    }

    /// Grants or revokes administrative access.
    pub fn set_admin(&mut self, is_admin: bool) {
        self.is_admin = is_admin;
        self.updated_at = Utc::now();
    }

    /// Sets the user's display name.
    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }
}
