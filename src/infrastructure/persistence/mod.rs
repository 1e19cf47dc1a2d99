//! Storage implementations of the domain repository traits.
//!
//! - [`PgLinkRepository`] - Link storage and click recording in PostgreSQL
//! - [`PgIdentitySource`] - Identities from the `links_id_seq` sequence
//! - [`InMemoryLinkRepository`] - Single-instance storage and identity counter

pub mod memory_link_repository;
pub mod pg_identity_source;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_identity_source::PgIdentitySource;
pub use pg_link_repository::PgLinkRepository;
