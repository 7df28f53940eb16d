//! In-memory collaborators for tests and embedders.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tally_shared::types::ProjectedJournalId;

use super::account::{Account, AccountType, TaxRate};
use super::error::ProjectionError;
use super::journal::{ProjectedJournal, Projection};
use super::store::{JournalStore, ReferenceData};
use super::types::JournalFilter;

/// Fixed chart of accounts and tax rates.
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceData {
    accounts: Vec<Account>,
    tax_rates: HashMap<String, TaxRate>,
}

impl StaticReferenceData {
    /// Creates empty reference data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account.
    #[must_use]
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Adds a tax rate, replacing any rate with the same name.
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: TaxRate) -> Self {
        self.tax_rates.insert(tax_rate.name.clone(), tax_rate);
        self
    }
}

#[async_trait]
impl ReferenceData for StaticReferenceData {
    async fn find_account(&self, xero_id: &str) -> Result<Option<Account>, ProjectionError> {
        Ok(self
            .accounts
            .iter()
            .find(|account| account.xero_id == xero_id)
            .cloned())
    }

    async fn find_system_account(
        &self,
        account_type: AccountType,
    ) -> Result<Option<Account>, ProjectionError> {
        Ok(self
            .accounts
            .iter()
            .find(|account| account.is_system_account && account.account_type == account_type)
            .cloned())
    }

    async fn find_tax_rate(&self, name: &str) -> Result<Option<TaxRate>, ProjectionError> {
        Ok(self.tax_rates.get(name).cloned())
    }
}

/// Journal store backed by a vector.
///
/// A save works on a snapshot of the stored journals and only publishes it
/// once every journal has been accepted.
#[derive(Debug, Default)]
pub struct InMemoryJournalStore {
    journals: Mutex<Vec<ProjectedJournal>>,
}

impl InMemoryJournalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every stored journal in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the store lock is poisoned.
    pub fn all(&self) -> Result<Vec<ProjectedJournal>, ProjectionError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<ProjectedJournal>>, ProjectionError> {
        self.journals
            .lock()
            .map_err(|_| ProjectionError::Persistence("journal store lock poisoned".to_string()))
    }
}

#[async_trait]
impl JournalStore for InMemoryJournalStore {
    async fn save_projection(&self, projection: &Projection) -> Result<(), ProjectionError> {
        let mut journals = self.lock()?;
        let mut snapshot = journals.clone();
        tracing::debug!(invoice_id = %projection.invoice.id, "Transaction started");

        for journal in projection.journals() {
            if snapshot.iter().any(|existing| existing.id == journal.id) {
                tracing::debug!(journal_id = %journal.id, "Transaction rolled back");
                return Err(ProjectionError::Persistence(format!(
                    "journal {} already exists",
                    journal.id
                )));
            }
            snapshot.push(journal.clone());
        }

        *journals = snapshot;
        tracing::debug!(invoice_id = %projection.invoice.id, "Transaction committed");
        Ok(())
    }

    async fn list_journals(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<ProjectedJournal>, ProjectionError> {
        let mut matching: Vec<ProjectedJournal> = self
            .lock()?
            .iter()
            .filter(|journal| filter.matches(journal))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn find_journal(
        &self,
        id: ProjectedJournalId,
    ) -> Result<Option<ProjectedJournal>, ProjectionError> {
        Ok(self.lock()?.iter().find(|journal| journal.id == id).cloned())
    }
}
