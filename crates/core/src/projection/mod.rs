//! Projected invoice and payment journals.
//!
//! This module implements income projection:
//! - Chart of accounts and tax rate reference data
//! - Projected journals and their lines
//! - Tax calculation with configurable rounding
//! - The journal projector and its balance checks
//! - Collaborator traits and in-memory implementations
//! - The projection service orchestrating lookup, projection and persistence

pub mod account;
pub mod error;
pub mod journal;
pub mod memory;
pub mod projector;
pub mod service;
pub mod store;
pub mod summary;
pub mod tax;
pub mod types;
pub mod validation;

#[cfg(test)]
mod projector_props;
#[cfg(test)]
mod service_props;

pub use account::{Account, AccountRole, AccountType, TaxRate, TaxType};
pub use error::{BalanceColumn, InvalidProjectionInput, ProjectionError};
pub use journal::{JournalLine, JournalTotals, ProjectedJournal, Projection, SourceType, date_format};
pub use memory::{InMemoryJournalStore, StaticReferenceData};
pub use projector::JournalProjector;
pub use service::ProjectionService;
pub use store::{JournalStore, ReferenceData};
pub use summary::{ProjectionSummary, summarize};
pub use tax::TaxBreakdown;
pub use types::{JournalFilter, ProjectInvoiceRequest, ProjectionInput};
pub use validation::validate_journal;
