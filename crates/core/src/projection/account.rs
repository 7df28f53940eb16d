//! Chart of accounts reference data used by projections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

/// Account type as classified by the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Bank account.
    Bank,
    /// Current asset (e.g. accounts receivable).
    Current,
    /// Current liability (e.g. GST collected).
    CurrLiab,
    /// Depreciation.
    Depreciatn,
    /// Direct costs.
    DirectCosts,
    /// Equity.
    Equity,
    /// Expense.
    Expense,
    /// Fixed asset.
    Fixed,
    /// Inventory asset.
    Inventory,
    /// Liability.
    Liability,
    /// Non-current asset.
    NonCurrent,
    /// Other income.
    OtherIncome,
    /// Overheads.
    Overheads,
    /// Prepayment.
    Prepayment,
    /// Revenue.
    Revenue,
    /// Sales.
    Sales,
    /// Non-current liability.
    TermLiab,
}

impl AccountType {
    /// Returns the stored representation of this account type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "BANK",
            Self::Current => "CURRENT",
            Self::CurrLiab => "CURRLIAB",
            Self::Depreciatn => "DEPRECIATN",
            Self::DirectCosts => "DIRECTCOSTS",
            Self::Equity => "EQUITY",
            Self::Expense => "EXPENSE",
            Self::Fixed => "FIXED",
            Self::Inventory => "INVENTORY",
            Self::Liability => "LIABILITY",
            Self::NonCurrent => "NONCURRENT",
            Self::OtherIncome => "OTHERINCOME",
            Self::Overheads => "OVERHEADS",
            Self::Prepayment => "PREPAYMENT",
            Self::Revenue => "REVENUE",
            Self::Sales => "SALES",
            Self::TermLiab => "TERMLIAB",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BANK" => Ok(Self::Bank),
            "CURRENT" => Ok(Self::Current),
            "CURRLIAB" => Ok(Self::CurrLiab),
            "DEPRECIATN" => Ok(Self::Depreciatn),
            "DIRECTCOSTS" => Ok(Self::DirectCosts),
            "EQUITY" => Ok(Self::Equity),
            "EXPENSE" => Ok(Self::Expense),
            "FIXED" => Ok(Self::Fixed),
            "INVENTORY" => Ok(Self::Inventory),
            "LIABILITY" => Ok(Self::Liability),
            "NONCURRENT" => Ok(Self::NonCurrent),
            "OTHERINCOME" => Ok(Self::OtherIncome),
            "OVERHEADS" => Ok(Self::Overheads),
            "PREPAYMENT" => Ok(Self::Prepayment),
            "REVENUE" => Ok(Self::Revenue),
            "SALES" => Ok(Self::Sales),
            "TERMLIAB" => Ok(Self::TermLiab),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// Tax treatment recorded against an account or journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxType {
    /// Tax collected on sales.
    Output,
    /// Tax paid on purchases.
    Input,
    /// Excluded from the business activity statement.
    BasExcluded,
    /// Exempt sales.
    ExemptOutput,
    /// Exempt purchases.
    ExemptInput,
    /// No tax.
    None,
}

impl TaxType {
    /// Returns the stored representation of this tax type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Output => "OUTPUT",
            Self::Input => "INPUT",
            Self::BasExcluded => "BASEXCLUDED",
            Self::ExemptOutput => "EXEMPTOUTPUT",
            Self::ExemptInput => "EXEMPTINPUT",
            Self::None => "NONE",
        }
    }
}

impl std::fmt::Display for TaxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OUTPUT" => Ok(Self::Output),
            "INPUT" => Ok(Self::Input),
            "BASEXCLUDED" => Ok(Self::BasExcluded),
            "EXEMPTOUTPUT" => Ok(Self::ExemptOutput),
            "EXEMPTINPUT" => Ok(Self::ExemptInput),
            "NONE" => Ok(Self::None),
            _ => Err(format!("Unknown tax type: {s}")),
        }
    }
}

/// The part an account plays in an invoice/payment projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Accounts receivable, debited by the invoice and cleared by the payment.
    Receivable,
    /// Revenue (sales) account credited by the invoice.
    Revenue,
    /// Tax liability account credited with the tax component.
    Tax,
    /// Bank account debited by the payment.
    Bank,
}

impl AccountRole {
    /// Returns the account type an account must have to play this role.
    #[must_use]
    pub const fn expected_type(self) -> AccountType {
        match self {
            Self::Receivable => AccountType::Current,
            Self::Revenue => AccountType::Revenue,
            Self::Tax => AccountType::CurrLiab,
            Self::Bank => AccountType::Bank,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Receivable => write!(f, "receivable"),
            Self::Revenue => write!(f, "revenue"),
            Self::Tax => write!(f, "tax"),
            Self::Bank => write!(f, "bank"),
        }
    }
}

/// An entry in the chart of accounts.
///
/// Accounts are immutable reference data synced from the accounting system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Internal identifier.
    pub id: AccountId,
    /// Identifier in the external accounting system; journal lines reference this.
    pub xero_id: String,
    /// Account code (e.g. "610").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Default tax treatment, if any.
    pub tax_type: Option<TaxType>,
    /// Whether this is a system account (accounts receivable, GST).
    pub is_system_account: bool,
}

impl Account {
    /// Creates a non-system account with no default tax type.
    #[must_use]
    pub fn new(
        xero_id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            id: AccountId::new(),
            xero_id: xero_id.into(),
            code: code.into(),
            name: name.into(),
            account_type,
            tax_type: None,
            is_system_account: false,
        }
    }

    /// Sets the default tax type.
    #[must_use]
    pub fn with_tax_type(mut self, tax_type: TaxType) -> Self {
        self.tax_type = Some(tax_type);
        self
    }

    /// Marks the account as a system account.
    #[must_use]
    pub fn system(mut self) -> Self {
        self.is_system_account = true;
        self
    }
}

/// A named tax rate, e.g. "GST on Income" at 10%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate {
    /// Display name used to select the rate.
    pub name: String,
    /// Rate as a fraction (0.10 is 10%).
    pub rate: Decimal,
}

impl TaxRate {
    /// Creates a tax rate.
    #[must_use]
    pub fn new(name: impl Into<String>, rate: Decimal) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }

    /// Returns the rate as a percentage (10 for 0.10).
    #[must_use]
    pub fn percentage(&self) -> Decimal {
        self.rate * Decimal::ONE_HUNDRED
    }
}
