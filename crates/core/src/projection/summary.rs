//! Aggregate figures over projected journals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountType;
use super::journal::{ProjectedJournal, SourceType};

/// Totals of projected income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// Gross amount invoiced (receivable debits on ACCREC journals).
    pub invoiced_gross: Decimal,
    /// Net amount invoiced (revenue credits, as a positive figure).
    pub invoiced_net: Decimal,
    /// Tax collected (tax liability credits, as a positive figure).
    pub tax_collected: Decimal,
    /// Payments received (bank debits on ACCRECPAYMENT journals).
    pub payments_received: Decimal,
    /// Number of journals summarized.
    pub journal_count: usize,
}

impl ProjectionSummary {
    /// Gross invoiced but not yet covered by a projected payment.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.invoiced_gross - self.payments_received
    }
}

/// Summarizes `journals`.
#[must_use]
pub fn summarize(journals: &[ProjectedJournal]) -> ProjectionSummary {
    journals
        .iter()
        .fold(ProjectionSummary::default(), |mut summary, journal| {
            summary.journal_count += 1;
            match journal.source_type {
                SourceType::Accrec => {
                    summary.invoiced_gross += sum_net(journal, AccountType::Current);
                    summary.invoiced_net -= sum_net(journal, AccountType::Revenue);
                    summary.tax_collected -= sum_net(journal, AccountType::CurrLiab);
                }
                SourceType::AccrecPayment => {
                    summary.payments_received += sum_net(journal, AccountType::Bank);
                }
            }
            summary
        })
}

fn sum_net(journal: &ProjectedJournal, account_type: AccountType) -> Decimal {
    journal
        .lines_of_type(account_type)
        .map(|line| line.net_amount)
        .sum()
}
