//! Authorization types: channels, capabilities, requests and decisions.

use std::collections::BTreeSet;
use std::fmt;
use studio_core::{ChannelId, UserId};

/// A channel and its relationship sets.
///
/// Editors can change the channel, viewers can only open it. A user may be
/// in both sets; editor access implies view access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    id: ChannelId,
    name: String,
    editors: BTreeSet<UserId>,
    viewers: BTreeSet<UserId>,
}

impl Channel {
    /// Creates an empty channel with a generated ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(ChannelId::new(), name)
    }

    /// Creates an empty channel with the given ID.
    #[must_use]
    pub fn with_id(id: ChannelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            editors: BTreeSet::new(),
            viewers: BTreeSet::new(),
        }
    }

    /// Returns the channel ID.
    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Returns the channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the editor set.
    #[must_use]
    pub fn editors(&self) -> &BTreeSet<UserId> {
        &self.editors
    }

    /// Returns the viewer set.
    #[must_use]
    pub fn viewers(&self) -> &BTreeSet<UserId> {
        &self.viewers
    }

    /// Adds an editor. Returns false if the user already was one.
    pub fn add_editor(&mut self, user_id: UserId) -> bool {
        self.editors.insert(user_id)
    }

    /// Removes an editor. Returns false if the user was not one.
    pub fn remove_editor(&mut self, user_id: UserId) -> bool {
        self.editors.remove(&user_id)
    }

    /// Adds a viewer. Returns false if the user already was one.
    pub fn add_viewer(&mut self, user_id: UserId) -> bool {
        self.viewers.insert(user_id)
    }

    /// Removes a viewer. Returns false if the user was not one.
    pub fn remove_viewer(&mut self, user_id: UserId) -> bool {
        self.viewers.remove(&user_id)
    }

    /// Returns the highest relationship the user has with this channel.
    #[must_use]
    pub fn capability_of(&self, user_id: UserId) -> Capability {
        if self.editors.contains(&user_id) {
            Capability::Editor
        } else if self.viewers.contains(&user_id) {
            Capability::Viewer
        } else {
            Capability::None
        }
    }
}

/// The relationship between one identity and one channel.
///
/// Variants are ordered by privilege, so `max` picks the stronger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Capability {
    /// No relationship; the channel is invisible.
    #[default]
    None,
    /// Read-only access.
    Viewer,
    /// Read-write access.
    Editor,
}

impl Capability {
    /// Returns true if the channel may be opened at all.
    #[must_use]
    pub fn can_view(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns true if the channel may be changed.
    #[must_use]
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Editor)
    }
}

/// What a request is trying to reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The administration surface.
    Administration,
    /// A channel, by the raw reference taken from the request.
    ///
    /// The reference is not validated by the caller; malformed references
    /// decide the same way as channels the identity cannot see.
    Channel(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Administration => write!(f, "administration"),
            Self::Channel(reference) => write!(f, "channel:{reference}"),
        }
    }
}

/// The action requested on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open or read.
    View,
    /// Change.
    Edit,
}

impl Action {
    /// Returns the action name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to be admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    /// The original request path, used as the login continuation.
    pub path: String,
    /// The requested target.
    pub target: Target,
    /// The requested action.
    pub action: Action,
}

impl AccessRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(path: impl Into<String>, target: Target, action: Action) -> Self {
        Self {
            path: path.into(),
            target,
            action,
        }
    }

    /// Creates a request to view the administration surface.
    #[must_use]
    pub fn administration(path: impl Into<String>) -> Self {
        Self::new(path, Target::Administration, Action::View)
    }

    /// Creates a request against a channel reference.
    #[must_use]
    pub fn channel(path: impl Into<String>, reference: impl Into<String>, action: Action) -> Self {
        Self::new(path, Target::Channel(reference.into()), action)
    }
}

/// What an admitted request may do with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Render the channel read-only.
    ReadOnly,
    /// Render the channel with editing enabled.
    ReadWrite,
    /// Use the administration surface.
    Administer,
}

impl Grant {
    /// Returns true if the grant allows changes.
    #[must_use]
    pub fn can_write(&self) -> bool {
        matches!(self, Self::ReadWrite | Self::Administer)
    }
}

/// The outcome of authorizing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Unknown identity; send to login, then resume at `next`.
    RedirectLogin {
        /// The original request path.
        next: String,
    },
    /// The target does not exist or is invisible to this identity.
    NotFound,
    /// Known identity without the privilege the target requires.
    Forbidden,
    /// Proceed with the given grant.
    Allowed(Grant),
}

impl Decision {
    /// Returns the HTTP status the dispatcher must answer with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::RedirectLogin { .. } => 302,
            Self::NotFound => 404,
            Self::Forbidden => 403,
            Self::Allowed(_) => 200,
        }
    }

    /// Returns the redirect location, if the decision redirects.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::RedirectLogin { next } => Some(crate::admission::login_url(next)),
            _ => None,
        }
    }

    /// Returns true if the request may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }
}
