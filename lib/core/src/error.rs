//! Error handling foundation for the Studio access gate.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own error enums and lifts them into reports
//! with `?` as they cross crate boundaries.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
