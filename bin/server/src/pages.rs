//! Protected and public pages.
//!
//! Protected handlers build an [`AccessRequest`](studio_authz::AccessRequest)
//! and pass it through [`admit`](crate::auth::admit) before producing a body;
//! rendering itself is a plain-text placeholder.

pub mod admin;
pub mod channel;
pub mod home;

pub use admin::admin_page;
pub use channel::channel_page;
pub use home::home_page;
