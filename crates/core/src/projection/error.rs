//! Projection error types.
//!
//! Three kinds of failure exist:
//! - invalid input supplied by the caller (never retried),
//! - persistence failures (the store rolled back, nothing is visible),
//! - invariant violations (an unbalanced journal was built; a logic defect).

use rust_decimal::Decimal;
use tally_shared::AppError;
use thiserror::Error;

use super::account::{AccountRole, AccountType};
use super::journal::SourceType;

/// Caller errors detected before any journal is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidProjectionInput {
    /// Invoice amount is zero or negative.
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// Amount is too large to compute tax on.
    #[error("Amount {0} is out of range")]
    AmountOutOfRange(Decimal),

    /// Tax rate is negative.
    #[error("Tax rate '{name}' must not be negative, got {rate}")]
    NegativeTaxRate {
        /// Tax rate name.
        name: String,
        /// The offending rate.
        rate: Decimal,
    },

    /// No tax rate with the given name.
    #[error("Tax rate not found: {0}")]
    UnknownTaxRate(String),

    /// No account with the given external id.
    #[error("Account not found: {0}")]
    UnknownAccount(String),

    /// No system account of the given type is configured.
    #[error("No system account of type {0} is configured")]
    MissingSystemAccount(AccountType),

    /// An account has the wrong type for its role.
    #[error("The {role} account {xero_id} must be of type {expected}, found {actual}")]
    AccountTypeMismatch {
        /// Role the account was supplied for.
        role: AccountRole,
        /// External id of the account.
        xero_id: String,
        /// Type required by the role.
        expected: AccountType,
        /// Type the account actually has.
        actual: AccountType,
    },

    /// The same account was supplied for two roles.
    #[error("Account {0} is used for more than one role")]
    DuplicateAccount(String),
}

/// Column whose total failed a balance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceColumn {
    /// Sum of gross amounts.
    Gross,
    /// Sum of net amounts.
    Net,
    /// Tax on lines versus tax posted to the tax liability account.
    Tax,
    /// A single line whose gross differs from net plus tax.
    Line,
}

impl std::fmt::Display for BalanceColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gross => write!(f, "gross"),
            Self::Net => write!(f, "net"),
            Self::Tax => write!(f, "tax"),
            Self::Line => write!(f, "line"),
        }
    }
}

/// Errors that can occur while projecting and persisting journals.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The caller supplied invalid input.
    #[error("Invalid projection input: {0}")]
    InvalidInput(#[from] InvalidProjectionInput),

    /// The journals could not be persisted; nothing was written.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// A built journal does not balance.
    #[error("{source_type} journal is unbalanced: {column} off by {difference}")]
    InvariantViolation {
        /// Journal that failed the check.
        source_type: SourceType,
        /// Column that failed.
        column: BalanceColumn,
        /// Amount the column is off by.
        difference: Decimal,
    },
}

impl ProjectionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(input) => match input {
                InvalidProjectionInput::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
                InvalidProjectionInput::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
                InvalidProjectionInput::NegativeTaxRate { .. } => "NEGATIVE_TAX_RATE",
                InvalidProjectionInput::UnknownTaxRate(_) => "UNKNOWN_TAX_RATE",
                InvalidProjectionInput::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
                InvalidProjectionInput::MissingSystemAccount(_) => "MISSING_SYSTEM_ACCOUNT",
                InvalidProjectionInput::AccountTypeMismatch { .. } => "ACCOUNT_TYPE_MISMATCH",
                InvalidProjectionInput::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            },
            Self::Persistence(_) => "PERSISTENCE_FAILURE",
            Self::InvariantViolation { .. } => "INTERNAL_INVARIANT_VIOLATION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(
                InvalidProjectionInput::UnknownTaxRate(_)
                | InvalidProjectionInput::UnknownAccount(_),
            ) => 404,
            Self::InvalidInput(InvalidProjectionInput::MissingSystemAccount(_)) => 422,
            Self::InvalidInput(_) => 400,
            Self::Persistence(_) | Self::InvariantViolation { .. } => 500,
        }
    }

    /// Returns true if the error reveals a defect in journal construction.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

impl From<ProjectionError> for AppError {
    fn from(err: ProjectionError) -> Self {
        let message = err.to_string();
        match err {
            ProjectionError::InvalidInput(
                InvalidProjectionInput::UnknownTaxRate(_) | InvalidProjectionInput::UnknownAccount(_),
            ) => Self::NotFound(message),
            ProjectionError::InvalidInput(InvalidProjectionInput::MissingSystemAccount(_)) => {
                Self::BusinessRule(message)
            }
            ProjectionError::InvalidInput(_) => Self::Validation(message),
            ProjectionError::Persistence(_) => Self::Database(message),
            ProjectionError::InvariantViolation { .. } => Self::Internal(message),
        }
    }
}
