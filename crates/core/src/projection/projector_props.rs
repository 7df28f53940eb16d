//! Property-based tests for journal projection.
//!
//! Every projected pair must balance for any positive amount and
//! non-negative rate, under either rounding mode.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::RoundingMode;

use super::account::AccountType;
use super::error::{InvalidProjectionInput, ProjectionError};
use super::projector::JournalProjector;
use super::projector::tests::input;

/// Amounts from 0.01 to 10,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Amounts with sub-cent precision, from 0.0100 to 1,000,000.0000.
fn precise_amount() -> impl Strategy<Value = Decimal> {
    (100i64..10_000_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

/// Amounts below one cent, from 0.0001 to 0.0049.
fn sub_cent_amount() -> impl Strategy<Value = Decimal> {
    (1i64..50i64).prop_map(|units| Decimal::new(units, 4))
}

/// Rates from 0 to 50% in basis points.
fn tax_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=5_000i64).prop_map(|bps| Decimal::new(bps, 4))
}

fn rounding_mode() -> impl Strategy<Value = RoundingMode> {
    prop_oneof![Just(RoundingMode::Bankers), Just(RoundingMode::HalfUp)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The invoice journal's net column sums to zero and its gross column sums
    /// to the tax carried on its lines.
    #[test]
    fn prop_invoice_balances(
        amount in positive_amount(),
        rate in tax_rate(),
        mode in rounding_mode(),
    ) {
        let projection = JournalProjector::new(mode).project(&input(amount, rate)).unwrap();
        let totals = projection.invoice.totals();

        prop_assert!(totals.net.is_zero(), "net off by {}", totals.net);
        prop_assert_eq!(totals.gross, totals.tax);
        prop_assert_eq!(totals.gross, -projection.breakdown.tax);
        prop_assert!(totals.gross_excluding_tax().is_zero());
    }

    /// The payment journal's gross column sums to zero.
    #[test]
    fn prop_payment_balances(
        amount in precise_amount(),
        rate in tax_rate(),
        mode in rounding_mode(),
    ) {
        let projection = JournalProjector::new(mode).project(&input(amount, rate)).unwrap();
        prop_assert!(projection.payment.totals().is_balanced());
    }

    /// Tax on the lines equals tax posted to the liability account, and every
    /// line adds up.
    #[test]
    fn prop_tax_reconciles(
        amount in precise_amount(),
        rate in tax_rate(),
        mode in rounding_mode(),
    ) {
        let projection = JournalProjector::new(mode).project(&input(amount, rate)).unwrap();
        let invoice = &projection.invoice;

        let posted: Decimal = invoice
            .lines_of_type(AccountType::CurrLiab)
            .map(|line| line.net_amount)
            .sum();
        prop_assert_eq!(invoice.totals().tax, posted);
        prop_assert_eq!(posted, -projection.breakdown.tax);

        for line in projection.journals().iter().flat_map(|journal| journal.lines.iter()) {
            prop_assert_eq!(line.gross_amount, line.net_amount + line.tax_amount);
        }
    }

    /// All amounts are carried to exactly two decimal places.
    #[test]
    fn prop_amounts_are_cents(
        amount in precise_amount(),
        rate in tax_rate(),
        mode in rounding_mode(),
    ) {
        let projection = JournalProjector::new(mode).project(&input(amount, rate)).unwrap();
        let breakdown = projection.breakdown;

        prop_assert_eq!(breakdown.net.scale(), 2);
        prop_assert_eq!(breakdown.tax.scale(), 2);
        prop_assert_eq!(breakdown.gross, breakdown.net + breakdown.tax);
        prop_assert!(breakdown.tax >= Decimal::ZERO);
    }

    /// The payment settles exactly what the invoice charged.
    #[test]
    fn prop_payment_settles_invoice(
        amount in positive_amount(),
        rate in tax_rate(),
    ) {
        let projection = JournalProjector::default().project(&input(amount, rate)).unwrap();

        let charged: Decimal = projection
            .invoice
            .lines_of_type(AccountType::Current)
            .map(|line| line.gross_amount)
            .sum();
        let settled: Decimal = projection
            .payment
            .lines_of_type(AccountType::Current)
            .map(|line| line.gross_amount)
            .sum();
        prop_assert_eq!(charged + settled, Decimal::ZERO);
    }

    /// Amounts that round to zero cents are rejected under either mode.
    #[test]
    fn prop_sub_cent_amount_rejected(
        amount in sub_cent_amount(),
        rate in tax_rate(),
        mode in rounding_mode(),
    ) {
        let result = JournalProjector::new(mode).project(&input(amount, rate));
        prop_assert!(matches!(
            result,
            Err(ProjectionError::InvalidInput(InvalidProjectionInput::NonPositiveAmount(_)))
        ));
    }

    /// No line of any projection carries a negative zero.
    #[test]
    fn prop_no_negative_zero(
        amount in precise_amount(),
        rate in tax_rate(),
        mode in rounding_mode(),
    ) {
        let projection = JournalProjector::new(mode).project(&input(amount, rate)).unwrap();
        for line in projection.journals().iter().flat_map(|journal| journal.lines.iter()) {
            for value in [line.net_amount, line.gross_amount, line.tax_amount] {
                prop_assert!(!(value.is_zero() && value.is_sign_negative()), "negative zero on {:?}", line);
            }
        }
    }

    /// Non-positive amounts are always rejected.
    #[test]
    fn prop_non_positive_amount_rejected(
        cents in 0i64..1_000_000i64,
        rate in tax_rate(),
    ) {
        let result = JournalProjector::default().project(&input(Decimal::new(-cents, 2), rate));
        prop_assert!(matches!(
            result,
            Err(ProjectionError::InvalidInput(InvalidProjectionInput::NonPositiveAmount(_)))
        ));
    }
}
