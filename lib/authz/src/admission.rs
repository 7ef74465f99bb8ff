//! Request admission: the policy gate followed by the authorizer.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::BTreeSet;
use std::sync::Arc;
use studio_platform_access::{Identity, PolicyGate, PolicyId};
use tracing::{info, instrument};

use crate::authorizer::Authorizer;
use crate::types::{AccessRequest, Decision};

/// Path of the login page.
pub const LOGIN_PATH: &str = "/accounts/";

/// Path of the policy acceptance page.
pub const POLICY_UPDATE_PATH: &str = "/policies/update";

/// Characters escaped in the `next` query value. Path separators stay
/// readable; query delimiters are escaped.
const NEXT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builds the login URL that resumes at `next` after sign-in.
#[must_use]
pub fn login_url(next: &str) -> String {
    format!("{LOGIN_PATH}?next={}", utf8_percent_encode(next, NEXT_VALUE))
}

/// The outcome of admitting a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The user must acknowledge policies before anything else.
    PolicyUpdateRequired {
        /// Policies not yet acknowledged at their current version.
        outstanding: BTreeSet<PolicyId>,
        /// The original destination, for resuming afterwards.
        next: String,
    },
    /// The policy gate passed (or did not apply); the authorizer decided.
    Decided(Decision),
}

impl Admission {
    /// Returns the HTTP status the dispatcher must answer with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::PolicyUpdateRequired { .. } => 302,
            Self::Decided(decision) => decision.status(),
        }
    }

    /// Returns the redirect location, if any.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::PolicyUpdateRequired { .. } => Some(POLICY_UPDATE_PATH.to_string()),
            Self::Decided(decision) => decision.location(),
        }
    }

    /// Returns the redirect hops this admission starts.
    ///
    /// Terminal outcomes produce an empty chain.
    #[must_use]
    pub fn chain(&self) -> RedirectChain {
        let mut chain = RedirectChain::new();
        if let Some(location) = self.location() {
            chain.push(Hop::new(self.status(), location));
        }
        chain
    }
}

/// One redirect followed on the way to the final response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// The redirect status.
    pub status: u16,
    /// Where the redirect points.
    pub location: String,
}

impl Hop {
    /// Creates a hop.
    #[must_use]
    pub fn new(status: u16, location: impl Into<String>) -> Self {
        Self {
            status,
            location: location.into(),
        }
    }
}

/// The ordered redirects a request went through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectChain {
    hops: Vec<Hop>,
}

impl RedirectChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a hop.
    pub fn push(&mut self, hop: Hop) {
        self.hops.push(hop);
    }

    /// Returns the hops in order.
    #[must_use]
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// Returns the number of hops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Returns true if no redirect was followed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Returns where the last redirect pointed.
    #[must_use]
    pub fn last_location(&self) -> Option<&str> {
        self.hops.last().map(|hop| hop.location.as_str())
    }
}

/// Runs the policy gate and then the authorizer for each request.
#[derive(Clone)]
pub struct AccessControl {
    policies: Arc<PolicyGate>,
    authorizer: Authorizer,
}

impl AccessControl {
    /// Creates the admission pipeline.
    pub fn new(policies: Arc<PolicyGate>, authorizer: Authorizer) -> Self {
        Self {
            policies,
            authorizer,
        }
    }

    /// Returns the policy gate.
    #[must_use]
    pub fn policies(&self) -> &PolicyGate {
        &self.policies
    }

    /// Admits a request.
    ///
    /// Authenticated users with outstanding policies are sent to the policy
    /// page whatever they asked for; the authorizer is not consulted.
    /// Anonymous visitors skip the gate and are sent to login by the
    /// authorizer.
    #[instrument(skip(self, identity), fields(target = %request.target))]
    pub async fn admit(&self, identity: &Identity, request: &AccessRequest) -> Admission {
        if let Some(gated) = self.gate(identity, &request.path) {
            return gated;
        }

        Admission::Decided(self.authorizer.authorize(identity, request).await)
    }

    /// Runs only the policy gate, for pages open to everyone.
    ///
    /// Returns `None` for anonymous visitors and compliant users.
    #[must_use]
    pub fn gate(&self, identity: &Identity, path: &str) -> Option<Admission> {
        let user = identity.user()?;
        let outstanding = self.policies.check_policies(user);
        if outstanding.is_empty() {
            return None;
        }

        info!(
            user_id = %user.id(),
            outstanding = outstanding.len(),
            "redirecting to policy update"
        );
        Some(Admission::PolicyUpdateRequired {
            outstanding,
            next: path.to_string(),
        })
    }
}
