//! Projection service: resolves reference data, projects and persists.
//!
//! The service owns no storage. Accounts and tax rates come from a
//! [`ReferenceData`] implementation and journals go to a [`JournalStore`],
//! so the same flow runs against the database or in memory.

use rust_decimal::Decimal;
use tally_shared::types::{ProjectedJournalId, RoundingMode, round_money};
use tracing::{info, warn};

use super::account::{Account, AccountRole, AccountType, TaxRate};
use super::error::{InvalidProjectionInput, ProjectionError};
use super::journal::{ProjectedJournal, Projection};
use super::projector::JournalProjector;
use super::store::{JournalStore, ReferenceData};
use super::summary::{ProjectionSummary, summarize};
use super::types::{JournalFilter, ProjectInvoiceRequest, ProjectionInput};

/// Orchestrates invoice projection.
pub struct ProjectionService<R, S> {
    reference: R,
    store: S,
    projector: JournalProjector,
}

impl<R, S> ProjectionService<R, S>
where
    R: ReferenceData,
    S: JournalStore,
{
    /// Creates a service rounding tax with `rounding`.
    #[must_use]
    pub fn new(reference: R, store: S, rounding: RoundingMode) -> Self {
        Self {
            reference,
            store,
            projector: JournalProjector::new(rounding),
        }
    }

    /// Returns the journal store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Projects and persists the invoice and payment journals for `request`.
    ///
    /// Steps:
    /// 1. Reject an amount that is not positive once rounded, before any lookup
    /// 2. Resolve the tax rate by name
    /// 3. Resolve the revenue and bank accounts by external id
    /// 4. Resolve the system receivable and tax liability accounts
    /// 5. Build and check both journals
    /// 6. Save both journals as one unit
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for bad amounts, unknown names or ids, missing system
    ///   accounts and mistyped or duplicate accounts. Nothing is saved.
    /// - `InvariantViolation` if a journal does not balance. Nothing is saved.
    /// - `Persistence` if the store fails. Nothing is visible.
    pub async fn project_invoice(
        &self,
        request: &ProjectInvoiceRequest,
    ) -> Result<Projection, ProjectionError> {
        if round_money(request.amount, self.projector.rounding()) <= Decimal::ZERO {
            warn!(amount = %request.amount, "Rejected projection with non-positive amount");
            return Err(InvalidProjectionInput::NonPositiveAmount(request.amount).into());
        }

        let input = self.resolve(request).await.inspect_err(|err| {
            warn!(
                revenue_account = %request.revenue_account_id,
                bank_account = %request.bank_account_id,
                tax_rate = %request.tax_rate,
                error = %err,
                "Could not resolve projection inputs"
            );
        })?;

        let projection = self.projector.project(&input)?;

        if let Err(err) = self.store.save_projection(&projection).await {
            warn!(
                invoice_id = %projection.invoice.id,
                error = %err,
                "Projected journals were not saved"
            );
            return Err(err);
        }

        info!(
            invoice_id = %projection.invoice.id,
            payment_id = %projection.payment.id,
            gross = %projection.breakdown.gross,
            tax = %projection.breakdown.tax,
            "Projected invoice and payment journals"
        );

        Ok(projection)
    }

    /// Lists persisted journals matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the store fails.
    pub async fn list_projections(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<ProjectedJournal>, ProjectionError> {
        self.store.list_journals(filter).await
    }

    /// Finds one persisted journal.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the store fails.
    pub async fn find_journal(
        &self,
        id: ProjectedJournalId,
    ) -> Result<Option<ProjectedJournal>, ProjectionError> {
        self.store.find_journal(id).await
    }

    /// Lists journals matching `filter` and summarizes them.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the store fails.
    pub async fn summarize(&self, filter: &JournalFilter) -> Result<ProjectionSummary, ProjectionError> {
        let journals = self.store.list_journals(filter).await?;
        Ok(summarize(&journals))
    }

    async fn resolve(&self, request: &ProjectInvoiceRequest) -> Result<ProjectionInput, ProjectionError> {
        let tax_rate: TaxRate = self
            .reference
            .find_tax_rate(&request.tax_rate)
            .await?
            .ok_or_else(|| InvalidProjectionInput::UnknownTaxRate(request.tax_rate.clone()))?;

        let revenue_account = self.account(&request.revenue_account_id).await?;
        let bank_account = self.account(&request.bank_account_id).await?;
        let receivable_account = self.system_account(AccountRole::Receivable).await?;
        let tax_account = self.system_account(AccountRole::Tax).await?;

        Ok(ProjectionInput {
            date: request.date,
            reference: request.reference.clone(),
            amount: request.amount,
            tax_rate,
            revenue_account,
            bank_account,
            receivable_account,
            tax_account,
        })
    }

    async fn account(&self, xero_id: &str) -> Result<Account, ProjectionError> {
        self.reference
            .find_account(xero_id)
            .await?
            .ok_or_else(|| InvalidProjectionInput::UnknownAccount(xero_id.to_string()).into())
    }

    async fn system_account(&self, role: AccountRole) -> Result<Account, ProjectionError> {
        let account_type: AccountType = role.expected_type();
        self.reference
            .find_system_account(account_type)
            .await?
            .ok_or_else(|| InvalidProjectionInput::MissingSystemAccount(account_type).into())
    }
}
