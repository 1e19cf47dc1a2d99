//! Repository trait definitions for the domain layer.
//!
//! These traits are the narrow interface between the services and storage.
//! Implementations live in `crate::infrastructure::persistence`; mocks are
//! generated with `mockall` for unit tests.
//!
//! - [`LinkRepository`] - Link storage, lookup, and click recording
//! - [`IdentitySource`] - Unique identity issuance for new links

pub mod identity_source;
pub mod link_repository;

pub use identity_source::IdentitySource;
pub use link_repository::{LinkRepository, LinkTotals};

#[cfg(test)]
pub use identity_source::MockIdentitySource;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
