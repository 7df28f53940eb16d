//! Request and filter types for projections.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::{Account, TaxRate};
use super::journal::{ProjectedJournal, SourceType, date_format};

/// Request to project an invoice and its payment.
///
/// Accounts are referenced by external id; the tax rate by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInvoiceRequest {
    /// Date of the invoice and its payment.
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,
    /// External id of the revenue account.
    pub revenue_account_id: String,
    /// External id of the bank account receiving the payment.
    pub bank_account_id: String,
    /// Tax rate display name, e.g. "GST on Income".
    pub tax_rate: String,
    /// Tax-exclusive invoice amount, as a JSON number or decimal string.
    pub amount: Decimal,
    /// Optional reference copied onto both journals.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Fully resolved inputs for [`JournalProjector::project`].
///
/// [`JournalProjector::project`]: super::projector::JournalProjector::project
#[derive(Debug, Clone)]
pub struct ProjectionInput {
    /// Date of both journals.
    pub date: NaiveDateTime,
    /// Reference copied onto both journals.
    pub reference: Option<String>,
    /// Tax-exclusive amount.
    pub amount: Decimal,
    /// Tax rate applied to the amount.
    pub tax_rate: TaxRate,
    /// Account credited with the net amount.
    pub revenue_account: Account,
    /// Account debited by the payment.
    pub bank_account: Account,
    /// Accounts receivable.
    pub receivable_account: Account,
    /// Tax liability account.
    pub tax_account: Account,
}

/// Criteria for listing projected journals. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalFilter {
    /// Only journals of this source type.
    pub source_type: Option<SourceType>,
    /// Only journals dated on or after this instant.
    pub date_from: Option<NaiveDateTime>,
    /// Only journals dated on or before this instant.
    pub date_to: Option<NaiveDateTime>,
}

impl JournalFilter {
    /// Restricts to one source type.
    #[must_use]
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    /// Restricts to an inclusive date range.
    #[must_use]
    pub fn between(mut self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    /// Returns true if the journal satisfies every criterion.
    #[must_use]
    pub fn matches(&self, journal: &ProjectedJournal) -> bool {
        self.source_type.is_none_or(|source_type| journal.source_type == source_type)
            && self.date_from.is_none_or(|from| journal.date >= from)
            && self.date_to.is_none_or(|to| journal.date <= to)
    }
}
