use thiserror::Error;

use crate::ledger::BudgetId;

/// Error type that captures ledger rejections and snapshot failures.
///
/// A rejected operation never leaves partial state behind, so every variant
/// is safe to report and continue past.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("budget {0} is already initialized")]
    AlreadyExists(BudgetId),
    #[error("budget {0} not found")]
    BudgetNotFound(BudgetId),
    #[error("threshold {0} is outside 0..=100")]
    InvalidThreshold(u64),
    #[error("invalid category name `{0}`")]
    InvalidCategoryName(String),
    #[error("amount overflow on budget {0}")]
    AmountOverflow(BudgetId),
    #[error("alert ids exhausted")]
    AlertIdExhausted,
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl LedgerError {
    /// Short stable code for the rejection, used in receipts and logs.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::AlreadyExists(_) => "already-exists",
            LedgerError::BudgetNotFound(_) => "budget-not-found",
            LedgerError::InvalidThreshold(_) => "invalid-threshold",
            LedgerError::InvalidCategoryName(_) => "invalid-category-name",
            LedgerError::AmountOverflow(_) => "amount-overflow",
            LedgerError::AlertIdExhausted => "alert-id-exhausted",
            LedgerError::InvalidSnapshot(_) => "invalid-snapshot",
            LedgerError::Io(_) => "io",
            LedgerError::Serde(_) => "serde",
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
