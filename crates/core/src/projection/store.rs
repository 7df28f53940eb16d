//! Collaborator traits used by [`ProjectionService`](super::service::ProjectionService).

use async_trait::async_trait;
use tally_shared::types::ProjectedJournalId;

use super::account::{Account, AccountType, TaxRate};
use super::error::ProjectionError;
use super::journal::{ProjectedJournal, Projection};
use super::types::JournalFilter;

/// Read access to accounts and tax rates.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// backend failures.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    /// Finds an account by its external id.
    async fn find_account(&self, xero_id: &str) -> Result<Option<Account>, ProjectionError>;

    /// Finds the system account of the given type.
    async fn find_system_account(
        &self,
        account_type: AccountType,
    ) -> Result<Option<Account>, ProjectionError>;

    /// Finds a tax rate by display name.
    async fn find_tax_rate(&self, name: &str) -> Result<Option<TaxRate>, ProjectionError>;
}

/// Storage for projected journals.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Saves both journals of a projection and all their lines.
    ///
    /// Either everything is written or nothing is.
    async fn save_projection(&self, projection: &Projection) -> Result<(), ProjectionError>;

    /// Lists journals matching `filter`, ordered by date then id.
    async fn list_journals(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<ProjectedJournal>, ProjectionError>;

    /// Finds one journal with its lines.
    async fn find_journal(
        &self,
        id: ProjectedJournalId,
    ) -> Result<Option<ProjectedJournal>, ProjectionError>;
}
