//! Studio access gate web server.
//!
//! Hosts the policy gate and the channel authorizer behind axum routes.
//! Users, channels and sessions live in an in-memory [`store::MemoryStore`];
//! page bodies are plain text.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod pages;
pub mod store;
