//! Repository abstractions for data access.
//!
//! Repositories implement the `tally-core` collaborator traits, hiding the
//! `SeaORM` implementation details from the projection service.

pub mod error;
pub mod projected_journal;
pub mod reference;

pub use error::StoreError;
pub use projected_journal::SeaOrmJournalStore;
pub use reference::SeaOrmReferenceData;
