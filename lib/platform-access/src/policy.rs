//! Mandatory policies and the gate that enforces them.
//!
//! A policy is a published document (terms of service, privacy policy, ...)
//! identified by a stable id and versioned by its effective date. Publishing a
//! new version invalidates acknowledgments of earlier versions.
//!
//! The set of mandatory policies is loaded once at startup and injected into
//! [`PolicyGate`]; the gate never mutates it.

use chrono::NaiveDate;
use rootcause::Report;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tracing::debug;

use crate::error::PolicyError;
use crate::user::User;

/// Stable identifier of a policy document, e.g. `terms_of_service`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    /// Creates a policy id from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the policy id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PolicyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A published version of a policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// The policy identifier.
    id: PolicyId,
    /// Effective date of this version.
    version: NaiveDate,
}

impl Policy {
    /// Creates a policy version.
    #[must_use]
    pub fn new(id: impl Into<String>, version: NaiveDate) -> Self {
        Self {
            id: PolicyId::new(id),
            version,
        }
    }

    /// Returns the policy identifier.
    #[must_use]
    pub fn id(&self) -> &PolicyId {
        &self.id
    }

    /// Returns the effective date of this version.
    #[must_use]
    pub fn version(&self) -> NaiveDate {
        self.version
    }
}

/// The mandatory policy set, loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Policies every user must acknowledge before using the platform.
    #[serde(default = "default_mandatory_policies")]
    mandatory: Vec<Policy>,
}

fn default_policy_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 10, 1).unwrap_or_default()
}

fn default_mandatory_policies() -> Vec<Policy> {
    vec![
        Policy::new("terms_of_service", default_policy_date()),
        Policy::new("privacy_policy", default_policy_date()),
    ]
}

impl PolicyConfig {
    /// Creates a configuration with the given mandatory policies.
    #[must_use]
    pub fn new(mandatory: Vec<Policy>) -> Self {
        Self { mandatory }
    }

    /// Returns the mandatory policies.
    #[must_use]
    pub fn mandatory(&self) -> &[Policy] {
        &self.mandatory
    }

    /// Checks that policy ids are non-empty and unique.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending policy.
    pub fn validate(&self) -> Result<(), Report<PolicyError>> {
        let mut seen = HashSet::new();
        for policy in &self.mandatory {
            if policy.id.as_str().trim().is_empty() {
                return Err(PolicyError::EmptyPolicyId.into());
            }
            if !seen.insert(policy.id.as_str()) {
                return Err(PolicyError::DuplicatePolicy {
                    policy_id: policy.id.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mandatory: default_mandatory_policies(),
        }
    }
}

/// Forces acknowledgment of every mandatory policy before resource access.
#[derive(Debug, Clone)]
pub struct PolicyGate {
    config: PolicyConfig,
}

impl PolicyGate {
    /// Creates a gate over a validated policy configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails [`PolicyConfig::validate`].
    pub fn new(config: PolicyConfig) -> Result<Self, Report<PolicyError>> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the ids of mandatory policies the user has not acknowledged
    /// at their current version.
    ///
    /// Must only be called for authenticated users.
    #[must_use]
    pub fn check_policies(&self, user: &User) -> BTreeSet<PolicyId> {
        let outstanding: BTreeSet<PolicyId> = self
            .outstanding(user)
            .into_iter()
            .map(|policy| policy.id.clone())
            .collect();

        debug!(
            user_id = %user.id(),
            outstanding = outstanding.len(),
            "checked mandatory policies"
        );
        outstanding
    }

    /// Returns the full records of policies the user still has to acknowledge.
    #[must_use]
    pub fn outstanding(&self, user: &User) -> Vec<&Policy> {
        self.config
            .mandatory
            .iter()
            .filter(|policy| !user.has_acknowledged(policy))
            .collect()
    }

    /// Looks up a mandatory policy by id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPolicy` if the id is not part of the mandatory set.
    pub fn policy(&self, id: &str) -> Result<&Policy, Report<PolicyError>> {
        self.config
            .mandatory
            .iter()
            .find(|policy| policy.id.as_str() == id)
            .ok_or_else(|| {
                PolicyError::UnknownPolicy {
                    policy_id: id.to_string(),
                }
                .into()
            })
    }

    /// Returns the injected configuration.
    #[must_use]
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn terms() -> Policy {
        Policy::new("terms_of_service", date(2019, 10, 1))
    }

    fn privacy() -> Policy {
        Policy::new("privacy_policy", date(2019, 10, 1))
    }

    fn gate(policies: Vec<Policy>) -> PolicyGate {
        PolicyGate::new(PolicyConfig::new(policies)).expect("valid config")
    }

    fn new_user() -> User {
        User::new("user@example.com".to_string())
    }

    #[test]
    fn new_user_has_every_policy_outstanding() {
        let gate = gate(vec![terms(), privacy()]);
        let outstanding = gate.check_policies(&new_user());

        assert_eq!(outstanding.len(), 2);
        assert!(outstanding.contains(&PolicyId::from("terms_of_service")));
        assert!(outstanding.contains(&PolicyId::from("privacy_policy")));
    }

    #[test]
    fn compliant_user_has_nothing_outstanding() {
        let gate = gate(vec![terms(), privacy()]);
        let mut user = new_user();
        user.acknowledge_policy(&terms());
        user.acknowledge_policy(&privacy());

        assert!(gate.check_policies(&user).is_empty());
        assert!(gate.outstanding(&user).is_empty());
    }

    #[test]
    fn returns_exactly_the_unacknowledged_subset() {
        let gate = gate(vec![terms(), privacy()]);
        let mut user = new_user();
        user.acknowledge_policy(&terms());

        let outstanding = gate.check_policies(&user);
        assert_eq!(
            outstanding.into_iter().collect::<Vec<_>>(),
            vec![PolicyId::from("privacy_policy")]
        );
    }

    #[test]
    fn new_version_invalidates_prior_acknowledgment() {
        let mut user = new_user();
        user.acknowledge_policy(&terms());

        let republished = Policy::new("terms_of_service", date(2020, 3, 15));
        let gate = gate(vec![republished.clone()]);
        assert_eq!(gate.check_policies(&user).len(), 1);

        user.acknowledge_policy(&republished);
        assert!(gate.check_policies(&user).is_empty());
    }

    #[test]
    fn acknowledgments_of_unconfigured_policies_are_ignored() {
        let mut user = new_user();
        user.acknowledge_policy(&Policy::new("community_standards", date(2019, 10, 1)));

        let gate = gate(vec![terms()]);
        assert_eq!(gate.check_policies(&user).len(), 1);
    }

    #[test]
    fn empty_configuration_never_gates() {
        let gate = gate(Vec::new());
        assert!(gate.check_policies(&new_user()).is_empty());
    }

    #[test]
    fn duplicate_policy_ids_are_rejected() {
        let result = PolicyGate::new(PolicyConfig::new(vec![terms(), terms()]));
        assert!(result.is_err());
    }

    #[test]
    fn empty_policy_id_is_rejected() {
        let config = PolicyConfig::new(vec![Policy::new(" ", date(2019, 10, 1))]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn policy_lookup_by_id() {
        let gate = gate(vec![terms()]);
        assert_eq!(gate.policy("terms_of_service").expect("known"), &terms());
        assert!(gate.policy("cookie_policy").is_err());
    }

    #[test]
    fn default_config_has_terms_and_privacy() {
        let config = PolicyConfig::default();
        let ids: Vec<&str> = config.mandatory().iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["terms_of_service", "privacy_policy"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_deserializes_dates() {
        let json = r#"{"mandatory":[{"id":"terms_of_service","version":"2021-06-01"}]}"#;
        let config: PolicyConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.mandatory()[0].version(), date(2021, 6, 1));
    }

    #[test]
    fn config_defaults_when_mandatory_missing() {
        let config: PolicyConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, PolicyConfig::default());
    }
}
