//! Projected journals and their lines.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{JournalLineId, ProjectedJournalId};

use super::account::{Account, AccountType, TaxType};
use super::tax::TaxBreakdown;

/// Source document a projected journal stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceType {
    /// Accounts receivable invoice.
    Accrec,
    /// Payment received against an accounts receivable invoice.
    AccrecPayment,
}

impl SourceType {
    /// Returns the stored representation of this source type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accrec => "ACCREC",
            Self::AccrecPayment => "ACCRECPAYMENT",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACCREC" => Ok(Self::Accrec),
            "ACCRECPAYMENT" => Ok(Self::AccrecPayment),
            _ => Err(format!("Unknown source type: {s}")),
        }
    }
}

/// One line of a projected journal.
///
/// Amounts are signed: debits positive, credits negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier for this line.
    pub id: JournalLineId,
    /// External id of the account posted to.
    pub account_xero_id: String,
    /// Account type at the time the line was created.
    pub account_type: AccountType,
    /// Amount excluding tax.
    pub net_amount: Decimal,
    /// Amount including tax.
    pub gross_amount: Decimal,
    /// Tax component of the gross amount.
    pub tax_amount: Decimal,
    /// Tax treatment of the line.
    pub tax_type: Option<TaxType>,
}

impl JournalLine {
    /// Creates a line posting to `account`, copying its current type.
    #[must_use]
    pub fn for_account(
        account: &Account,
        net_amount: Decimal,
        gross_amount: Decimal,
        tax_amount: Decimal,
        tax_type: Option<TaxType>,
    ) -> Self {
        Self {
            id: JournalLineId::new(),
            account_xero_id: account.xero_id.clone(),
            account_type: account.account_type,
            net_amount,
            gross_amount,
            tax_amount,
            tax_type,
        }
    }
}

/// A projected (not yet real) journal with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedJournal {
    /// Unique identifier.
    pub id: ProjectedJournalId,
    /// Date the journal is expected to occur.
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,
    /// Kind of source document.
    pub source_type: SourceType,
    /// Free-text reference (e.g. invoice number).
    pub reference: Option<String>,
    /// Journal lines in posting order.
    pub lines: Vec<JournalLine>,
}

impl ProjectedJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new(date: NaiveDateTime, source_type: SourceType, reference: Option<String>) -> Self {
        Self {
            id: ProjectedJournalId::new(),
            date,
            source_type,
            reference,
            lines: Vec::new(),
        }
    }

    /// Appends a line.
    #[must_use]
    pub fn with_line(mut self, line: JournalLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Sums the line amounts.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        JournalTotals::from_lines(&self.lines)
    }

    /// Returns the lines posting to accounts of the given type.
    pub fn lines_of_type(&self, account_type: AccountType) -> impl Iterator<Item = &JournalLine> {
        self.lines
            .iter()
            .filter(move |line| line.account_type == account_type)
    }
}

/// Column sums over a journal's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of net amounts.
    pub net: Decimal,
    /// Sum of gross amounts.
    pub gross: Decimal,
    /// Sum of tax amounts.
    pub tax: Decimal,
}

impl JournalTotals {
    /// Sums the given lines.
    #[must_use]
    pub fn from_lines(lines: &[JournalLine]) -> Self {
        Self {
            net: lines.iter().map(|line| line.net_amount).sum(),
            gross: lines.iter().map(|line| line.gross_amount).sum(),
            tax: lines.iter().map(|line| line.tax_amount).sum(),
        }
    }

    /// Returns true if gross amounts net to zero.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.gross.is_zero()
    }

    /// Returns gross less tax.
    ///
    /// An invoice's revenue line carries its tax in both the gross and the tax
    /// column, so a balanced invoice nets to zero here rather than in gross.
    #[must_use]
    pub fn gross_excluding_tax(&self) -> Decimal {
        self.gross - self.tax
    }
}

/// The invoice and payment journals projected for one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// The ACCREC journal.
    pub invoice: ProjectedJournal,
    /// The ACCRECPAYMENT journal.
    pub payment: ProjectedJournal,
    /// Net, tax and gross amounts the journals were built from.
    pub breakdown: TaxBreakdown,
}

impl Projection {
    /// Returns both journals, invoice first.
    #[must_use]
    pub fn journals(&self) -> [&ProjectedJournal; 2] {
        [&self.invoice, &self.payment]
    }
}

/// Serde format for journal dates: `YYYY-MM-DD HH:MM:SS`.
///
/// Deserialization also accepts the ISO `T` separator and a bare date
/// (midnight).
pub mod date_format {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Canonical format.
    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Parses a journal date.
    ///
    /// # Errors
    ///
    /// Returns a chrono parse error if no accepted format matches.
    pub fn parse(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(value, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map(|date| date.and_time(chrono::NaiveTime::MIN))
            })
    }

    /// Serializes a date in the canonical format.
    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    /// Deserializes a date in any accepted format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse(&value).map_err(serde::de::Error::custom)
    }
}
