//! Tax calculation for tax-exclusive invoice amounts.
//!
//! Rounding strategy:
//! - The net amount and the tax are each rounded to cents with the same mode
//! - Gross is the exact sum of the rounded parts, so it never needs rounding

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{RoundingMode, round_money};

use super::error::InvalidProjectionInput;

/// Net, tax and gross amounts of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Amount excluding tax.
    pub net: Decimal,
    /// Tax on the net amount.
    pub tax: Decimal,
    /// Amount including tax.
    pub gross: Decimal,
}

impl TaxBreakdown {
    /// Splits a tax-exclusive amount into net, tax and gross.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if the multiplication or addition overflows.
    pub fn from_net(
        amount: Decimal,
        rate: Decimal,
        mode: RoundingMode,
    ) -> Result<Self, InvalidProjectionInput> {
        let net = round_money(amount, mode);
        let tax = net
            .checked_mul(rate)
            .map(|tax| round_money(tax, mode))
            .ok_or(InvalidProjectionInput::AmountOutOfRange(amount))?;
        let gross = net
            .checked_add(tax)
            .ok_or(InvalidProjectionInput::AmountOutOfRange(amount))?;

        Ok(Self { net, tax, gross })
    }
}
