//! `SeaORM` entity definitions.
//!
//! Enum-like columns (account type, tax type, source type) are stored as
//! upper-case text and parsed with the `tally-core` `FromStr` impls.

pub mod accounts;
pub mod projected_journal_lines;
pub mod projected_journals;
pub mod tax_rates;
