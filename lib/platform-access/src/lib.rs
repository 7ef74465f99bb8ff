//! Platform access for the Studio access gate.
//!
//! This crate provides:
//! - User accounts (`User`) with the administrative flag and policy acknowledgments
//! - Request identities (`Identity`), either anonymous or an authenticated user
//! - Session records (`Session`, `SessionId`)
//! - The mandatory policy gate (`PolicyGate`, `PolicyConfig`, `Policy`)
//!
//! # Policy Gate
//!
//! Every authenticated request is checked against the configured set of
//! mandatory policies before any resource check runs. A user with anything
//! outstanding is sent to the policy update page instead of their destination.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use studio_platform_access::{Policy, PolicyConfig, PolicyGate, User};
//!
//! let terms = Policy::new(
//!     "terms_of_service",
//!     NaiveDate::from_ymd_opt(2019, 10, 1).expect("valid date"),
//! );
//! let gate = PolicyGate::new(PolicyConfig::new(vec![terms.clone()])).expect("valid config");
//!
//! let mut user = User::new("alice@example.com".to_string());
//! assert_eq!(gate.check_policies(&user).len(), 1);
//!
//! user.acknowledge_policy(&terms);
//! assert!(gate.check_policies(&user).is_empty());
//! ```

pub mod error;
pub mod identity;
pub mod policy;
pub mod session;
pub mod user;

// Re-export main types at crate root
pub use error::{AuthenticationError, PolicyError};
pub use identity::Identity;
pub use policy::{Policy, PolicyConfig, PolicyGate, PolicyId};
pub use session::{Session, SessionId};
pub use user::{PolicyAcknowledgment, User};
