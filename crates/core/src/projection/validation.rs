//! Balance checks run on every journal before it leaves the projector.

use rust_decimal::Decimal;

use super::account::AccountType;
use super::error::{BalanceColumn, ProjectionError};
use super::journal::{JournalTotals, ProjectedJournal, SourceType};

fn violation(journal: &ProjectedJournal, column: BalanceColumn, difference: Decimal) -> ProjectionError {
    ProjectionError::InvariantViolation {
        source_type: journal.source_type,
        column,
        difference,
    }
}

/// Checks that every line's gross equals its net plus tax.
///
/// # Errors
///
/// Returns `InvariantViolation` with [`BalanceColumn::Line`] for the first
/// line that does not add up.
pub fn validate_lines(journal: &ProjectedJournal) -> Result<(), ProjectionError> {
    for line in &journal.lines {
        let difference = line.gross_amount - line.net_amount - line.tax_amount;
        if !difference.is_zero() {
            return Err(violation(journal, BalanceColumn::Line, difference));
        }
    }
    Ok(())
}

/// Checks an ACCREC journal.
///
/// The revenue line is credited with the full gross, so the gross column sums
/// to the tax credited on the lines rather than to zero. Gross less tax and
/// net must both sum to zero, and the tax carried on the lines must equal the
/// amount posted to the tax liability account.
///
/// # Errors
///
/// Returns `InvariantViolation` naming the first column that fails.
pub fn validate_invoice(journal: &ProjectedJournal) -> Result<(), ProjectionError> {
    validate_lines(journal)?;

    let totals = journal.totals();
    let gross_difference = totals.gross_excluding_tax();
    if !gross_difference.is_zero() {
        return Err(violation(journal, BalanceColumn::Gross, gross_difference));
    }
    if !totals.net.is_zero() {
        return Err(violation(journal, BalanceColumn::Net, totals.net));
    }

    let posted_tax: Decimal = journal
        .lines_of_type(AccountType::CurrLiab)
        .map(|line| line.net_amount)
        .sum();
    let difference = totals.tax - posted_tax;
    if !difference.is_zero() {
        return Err(violation(journal, BalanceColumn::Tax, difference));
    }

    Ok(())
}

/// Checks an ACCRECPAYMENT journal: gross must sum to zero.
///
/// # Errors
///
/// Returns `InvariantViolation` if a line or the gross column is off.
pub fn validate_payment(journal: &ProjectedJournal) -> Result<(), ProjectionError> {
    validate_lines(journal)?;

    let JournalTotals { gross, .. } = journal.totals();
    if !gross.is_zero() {
        return Err(violation(journal, BalanceColumn::Gross, gross));
    }
    Ok(())
}

/// Dispatches to the check for the journal's source type.
///
/// # Errors
///
/// See [`validate_invoice`] and [`validate_payment`].
pub fn validate_journal(journal: &ProjectedJournal) -> Result<(), ProjectionError> {
    match journal.source_type {
        SourceType::Accrec => validate_invoice(journal),
        SourceType::AccrecPayment => validate_payment(journal),
    }
}
