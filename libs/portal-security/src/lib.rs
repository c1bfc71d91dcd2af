#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Security primitives shared by the DDS portal access-control layer.
//!
//! Everything here is presentation-side: these types decide what the portal
//! *shows*. The backend enforces authorization independently.

pub mod access;
pub mod names;
pub mod requirement;
pub mod session;
pub mod token;

pub use access::{AccessCheck, AccessState, Grants, evaluate};
pub use names::NameSet;
pub use requirement::{AccessRequirement, AccessRequirementBuilder};
pub use session::{Session, SessionStatus};
pub use token::AccessToken;
