//! Access decisions for the Studio access gate.
//!
//! This crate decides what a request may see:
//! - [`decide`] maps an identity, a request and the identity's channel
//!   [`Capability`] to a [`Decision`]
//! - [`Authorizer`] resolves capabilities through a [`ChannelDirectory`] and
//!   fails closed when the directory cannot answer
//! - [`AccessControl`] runs the mandatory policy gate before the authorizer
//!   and reports the outcome as an [`Admission`] with its [`RedirectChain`]
//! - [`Invitation`] is how a user joins a channel's editor or viewer set
//!
//! Channel existence is never revealed to identities without a relationship
//! to the channel: a missing channel and a channel the user cannot see both
//! decide to [`Decision::NotFound`].

mod admission;
mod authorizer;
mod error;
mod invitation;
mod types;

pub use admission::{
    AccessControl, Admission, Hop, LOGIN_PATH, POLICY_UPDATE_PATH, RedirectChain, login_url,
};
pub use authorizer::{Authorizer, ChannelDirectory, decide};
pub use error::AuthzError;
pub use invitation::Invitation;
pub use types::{AccessRequest, Action, Capability, Channel, Decision, Grant, Target};
