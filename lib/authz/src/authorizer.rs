//! Resource authorization for channels and the administration surface.

use async_trait::async_trait;
use std::sync::Arc;
use studio_core::{ChannelId, Result, UserId};
use studio_platform_access::Identity;
use tracing::{debug, info, instrument, warn};

use crate::error::AuthzError;
use crate::types::{AccessRequest, Capability, Channel, Decision, Grant, Target};

/// Source of channel relationship data.
///
/// Implemented by the persistence layer. Implementations return a consistent
/// snapshot of the channel; the authorizer does no locking of its own.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Looks up a channel by ID. `Ok(None)` means the channel does not exist.
    async fn find_channel(&self, id: ChannelId) -> Result<Option<Channel>, AuthzError>;
}

/// Decides a request given the identity's capability on the target channel.
///
/// Rules, first match wins:
/// 1. Administration: anonymous redirects to login, non-admins are forbidden,
///    admins are allowed.
/// 2. Channel: anonymous redirects to login, no relationship is not found,
///    viewers get read-only access and editors read-write access.
///
/// `capability` is ignored for the administration surface and for anonymous
/// identities.
#[must_use]
pub fn decide(identity: &Identity, request: &AccessRequest, capability: Capability) -> Decision {
    let Some(user) = identity.user() else {
        return Decision::RedirectLogin {
            next: request.path.clone(),
        };
    };

    match &request.target {
        Target::Administration if user.is_admin() => Decision::Allowed(Grant::Administer),
        Target::Administration => Decision::Forbidden,
        Target::Channel(_) => match capability {
            Capability::None => Decision::NotFound,
            Capability::Viewer => Decision::Allowed(Grant::ReadOnly),
            Capability::Editor => Decision::Allowed(Grant::ReadWrite),
        },
    }
}

/// Resolves channel capabilities and applies [`decide`].
#[derive(Clone)]
pub struct Authorizer {
    directory: Arc<dyn ChannelDirectory>,
}

impl Authorizer {
    /// Creates an authorizer backed by the given directory.
    pub fn new(directory: Arc<dyn ChannelDirectory>) -> Self {
        Self { directory }
    }

    /// Authorizes a request.
    ///
    /// Never fails: an unparseable channel reference, a missing channel and
    /// a directory error all resolve to no relationship.
    #[instrument(skip(self, identity), fields(target = %request.target, action = %request.action))]
    pub async fn authorize(&self, identity: &Identity, request: &AccessRequest) -> Decision {
        let capability = match (&request.target, identity.user()) {
            (Target::Channel(reference), Some(user)) => {
                self.capability(user.id(), reference).await
            }
            _ => Capability::None,
        };

        let decision = decide(identity, request, capability);
        match &decision {
            Decision::Allowed(grant) => {
                debug!(user_id = ?identity.user_id(), ?grant, "access allowed");
            }
            Decision::RedirectLogin { .. } => {
                info!("anonymous request redirected to login");
            }
            Decision::NotFound | Decision::Forbidden => {
                info!(
                    user_id = ?identity.user_id(),
                    status = decision.status(),
                    "access denied"
                );
            }
        }
        decision
    }

    async fn capability(&self, user_id: UserId, reference: &str) -> Capability {
        let channel_id = match reference.parse::<ChannelId>() {
            Ok(id) => id,
            Err(e) => {
                debug!(reference, error = %e, "malformed channel reference");
                return Capability::None;
            }
        };

        match self.directory.find_channel(channel_id).await {
            Ok(Some(channel)) => channel.capability_of(user_id),
            Ok(None) => {
                debug!(%channel_id, "channel does not exist");
                Capability::None
            }
            Err(report) => {
                warn!(%channel_id, error = %report, "channel lookup failed, denying access");
                Capability::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;
    use std::collections::HashMap;
    use studio_platform_access::User;

    struct MapDirectory(HashMap<ChannelId, Channel>);

    #[async_trait]
    impl ChannelDirectory for MapDirectory {
        async fn find_channel(
            &self,
            id: ChannelId,
        ) -> Result<Option<Channel>, AuthzError> {
            Ok(self.0.get(&id).cloned())
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl ChannelDirectory for BrokenDirectory {
        async fn find_channel(
            &self,
            _id: ChannelId,
        ) -> Result<Option<Channel>, AuthzError> {
            Err(AuthzError::DirectoryUnavailable {
                details: "connection refused".to_string(),
            }
            .into())
        }
    }

    fn authorizer_with(channel: &Channel) -> Authorizer {
        let mut channels = HashMap::new();
        channels.insert(channel.id(), channel.clone());
        Authorizer::new(Arc::new(MapDirectory(channels)))
    }

    fn channel_request(channel: &Channel) -> AccessRequest {
        let path = format!("/channels/{}", channel.id());
        AccessRequest::channel(path, channel.id().to_string(), Action::View)
    }

    fn user() -> User {
        User::new("user@example.com".to_string())
    }

    #[test]
    fn anonymous_is_redirected_with_original_path() {
        let request = AccessRequest::channel("/channels/whatever", "whatever", Action::View);
        let decision = decide(&Identity::Anonymous, &request, Capability::Editor);
        assert_eq!(
            decision,
            Decision::RedirectLogin {
                next: "/channels/whatever".to_string()
            }
        );
    }

    #[test]
    fn administration_requires_admin() {
        let request = AccessRequest::administration("/administration/");

        let anonymous = decide(&Identity::Anonymous, &request, Capability::None);
        assert_eq!(anonymous.status(), 302);

        let mut member = user();
        let regular = decide(&Identity::from(member.clone()), &request, Capability::None);
        assert_eq!(regular, Decision::Forbidden);

        member.set_admin(true);
        let admin = decide(&Identity::from(member), &request, Capability::None);
        assert_eq!(admin, Decision::Allowed(Grant::Administer));
    }

    #[test]
    fn channel_editor_status_does_not_grant_administration() {
        let request = AccessRequest::administration("/administration/");
        let decision = decide(&Identity::from(user()), &request, Capability::Editor);
        assert_eq!(decision, Decision::Forbidden);
    }

    #[test]
    fn admin_flag_does_not_grant_channel_access() {
        let mut admin = user();
        admin.set_admin(true);
        let request = AccessRequest::channel("/channels/x", "x", Action::View);
        let decision = decide(&Identity::from(admin), &request, Capability::None);
        assert_eq!(decision, Decision::NotFound);
    }

    #[test]
    fn no_relationship_is_not_found_never_forbidden() {
        let request = AccessRequest::channel("/channels/x", "x", Action::Edit);
        let decision = decide(&Identity::from(user()), &request, Capability::None);
        assert_eq!(decision, Decision::NotFound);
    }

    #[tokio::test]
    async fn editor_gets_read_write() {
        let member = user();
        let mut channel = Channel::new("Algebra");
        channel.add_editor(member.id());

        let decision = authorizer_with(&channel)
            .authorize(&Identity::from(member), &channel_request(&channel))
            .await;
        assert_eq!(decision, Decision::Allowed(Grant::ReadWrite));
    }

    #[tokio::test]
    async fn viewer_gets_read_only() {
        let member = user();
        let mut channel = Channel::new("Algebra");
        channel.add_viewer(member.id());

        let decision = authorizer_with(&channel)
            .authorize(&Identity::from(member), &channel_request(&channel))
            .await;
        assert_eq!(decision, Decision::Allowed(Grant::ReadOnly));
    }

    #[tokio::test]
    async fn removed_editor_without_viewer_is_not_found() {
        let member = user();
        let mut channel = Channel::new("Algebra");
        channel.add_editor(member.id());
        channel.remove_editor(member.id());

        let decision = authorizer_with(&channel)
            .authorize(&Identity::from(member), &channel_request(&channel))
            .await;
        assert_eq!(decision, Decision::NotFound);
    }

    #[tokio::test]
    async fn missing_channel_matches_inaccessible_channel() {
        let member = user();
        let authorizer = authorizer_with(&Channel::new("Algebra"));
        let absent = Channel::new("Geometry");

        let decision = authorizer
            .authorize(&Identity::from(member), &channel_request(&absent))
            .await;
        assert_eq!(decision, Decision::NotFound);
    }

    #[tokio::test]
    async fn malformed_reference_is_not_found() {
        let authorizer = authorizer_with(&Channel::new("Algebra"));
        let request = AccessRequest::channel("/channels/../etc", "../etc", Action::View);

        let decision = authorizer.authorize(&Identity::from(user()), &request).await;
        assert_eq!(decision, Decision::NotFound);
    }

    #[tokio::test]
    async fn malformed_reference_still_redirects_anonymous() {
        let authorizer = authorizer_with(&Channel::new("Algebra"));
        let request = AccessRequest::channel("/channels/nope", "nope", Action::View);

        let decision = authorizer.authorize(&Identity::Anonymous, &request).await;
        assert_eq!(
            decision,
            Decision::RedirectLogin {
                next: "/channels/nope".to_string()
            }
        );
    }

    #[tokio::test]
    async fn directory_failure_fails_closed() {
        let member = user();
        let mut channel = Channel::new("Algebra");
        channel.add_editor(member.id());

        let authorizer = Authorizer::new(Arc::new(BrokenDirectory));
        let decision = authorizer
            .authorize(&Identity::from(member), &channel_request(&channel))
            .await;
        assert_eq!(decision, Decision::NotFound);
    }
}
