//! Core domain types and utilities for the Studio access gate.
//!
//! This crate provides the identifier types shared by the authentication,
//! policy and authorization layers, plus the common `Result` alias.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ChannelId, InvitationId, ParseIdError, UserId};
