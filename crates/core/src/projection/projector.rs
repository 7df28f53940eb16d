//! Builds the ACCREC and ACCRECPAYMENT journals for an invoice.
//!
//! Sign convention: debits are positive, credits negative.
//!
//! Invoice (ACCREC):
//! - receivable: `+gross`, no tax
//! - revenue: `-net` / `-gross` / `-tax`, OUTPUT
//! - tax liability: `-tax`, OUTPUT
//!
//! Net sums to zero on the invoice; gross sums to the tax carried on the
//! revenue line.
//!
//! Payment (ACCRECPAYMENT):
//! - receivable: `-gross`
//! - bank: `+gross`

use std::collections::HashSet;

use rust_decimal::Decimal;
use tally_shared::types::{RoundingMode, round_money};

use super::account::{Account, AccountRole, TaxType};
use super::error::{InvalidProjectionInput, ProjectionError};
use super::journal::{JournalLine, ProjectedJournal, Projection, SourceType};
use super::tax::TaxBreakdown;
use super::types::ProjectionInput;
use super::validation::{validate_invoice, validate_payment};

/// Projects invoice and payment journals.
///
/// Holds no state besides the rounding mode, so one instance can be shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JournalProjector {
    rounding: RoundingMode,
}

impl JournalProjector {
    /// Creates a projector that rounds tax with `rounding`.
    #[must_use]
    pub const fn new(rounding: RoundingMode) -> Self {
        Self { rounding }
    }

    /// Returns the rounding mode.
    #[must_use]
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Builds both journals for `input`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the amount is not positive once rounded to cents,
    ///   the rate is negative, an account has the wrong type or an account is
    ///   used twice
    /// - `InvariantViolation` if a built journal does not balance
    pub fn project(&self, input: &ProjectionInput) -> Result<Projection, ProjectionError> {
        check_input(input, self.rounding)?;

        let breakdown = TaxBreakdown::from_net(input.amount, input.tax_rate.rate, self.rounding)?;

        let invoice = build_invoice(input, &breakdown);
        let payment = build_payment(input, &breakdown);

        for (journal, result) in [
            (&invoice, validate_invoice(&invoice)),
            (&payment, validate_payment(&payment)),
        ] {
            if let Err(err) = result {
                tracing::error!(
                    journal_id = %journal.id,
                    source_type = %journal.source_type,
                    amount = %input.amount,
                    tax_rate = %input.tax_rate.name,
                    tax_percent = %input.tax_rate.percentage(),
                    error = %err,
                    "Projected journal failed balance check"
                );
                return Err(err);
            }
        }

        Ok(Projection {
            invoice,
            payment,
            breakdown,
        })
    }
}

fn check_input(input: &ProjectionInput, rounding: RoundingMode) -> Result<(), InvalidProjectionInput> {
    if round_money(input.amount, rounding) <= Decimal::ZERO {
        return Err(InvalidProjectionInput::NonPositiveAmount(input.amount));
    }

    if input.tax_rate.rate < Decimal::ZERO {
        return Err(InvalidProjectionInput::NegativeTaxRate {
            name: input.tax_rate.name.clone(),
            rate: input.tax_rate.rate,
        });
    }

    let roles = [
        (AccountRole::Receivable, &input.receivable_account),
        (AccountRole::Revenue, &input.revenue_account),
        (AccountRole::Tax, &input.tax_account),
        (AccountRole::Bank, &input.bank_account),
    ];

    for (role, account) in roles {
        check_role(role, account)?;
    }

    let mut seen = HashSet::with_capacity(roles.len());
    for (_, account) in roles {
        if !seen.insert(account.xero_id.as_str()) {
            return Err(InvalidProjectionInput::DuplicateAccount(account.xero_id.clone()));
        }
    }

    Ok(())
}

/// Checks that `account` has the type `role` requires.
///
/// # Errors
///
/// Returns `AccountTypeMismatch` otherwise.
pub fn check_role(role: AccountRole, account: &Account) -> Result<(), InvalidProjectionInput> {
    let expected = role.expected_type();
    if account.account_type == expected {
        Ok(())
    } else {
        Err(InvalidProjectionInput::AccountTypeMismatch {
            role,
            xero_id: account.xero_id.clone(),
            expected,
            actual: account.account_type,
        })
    }
}

/// Negates a credit amount without producing a negative zero.
fn credit(amount: Decimal) -> Decimal {
    if amount.is_zero() { amount } else { -amount }
}

fn build_invoice(input: &ProjectionInput, breakdown: &TaxBreakdown) -> ProjectedJournal {
    let TaxBreakdown { net, tax, gross } = *breakdown;

    ProjectedJournal::new(input.date, SourceType::Accrec, input.reference.clone())
        .with_line(JournalLine::for_account(
            &input.receivable_account,
            gross,
            gross,
            Decimal::ZERO,
            None,
        ))
        .with_line(JournalLine::for_account(
            &input.revenue_account,
            credit(net),
            credit(gross),
            credit(tax),
            Some(TaxType::Output),
        ))
        .with_line(JournalLine::for_account(
            &input.tax_account,
            credit(tax),
            credit(tax),
            Decimal::ZERO,
            Some(TaxType::Output),
        ))
}

fn build_payment(input: &ProjectionInput, breakdown: &TaxBreakdown) -> ProjectedJournal {
    let gross = breakdown.gross;

    ProjectedJournal::new(input.date, SourceType::AccrecPayment, input.reference.clone())
        .with_line(JournalLine::for_account(
            &input.receivable_account,
            -gross,
            -gross,
            Decimal::ZERO,
            None,
        ))
        .with_line(JournalLine::for_account(
            &input.bank_account,
            gross,
            gross,
            Decimal::ZERO,
            None,
        ))
}
