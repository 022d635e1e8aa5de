use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Longest category name accepted by a ledger unless configured otherwise.
pub const DEFAULT_CATEGORY_NAME_LIMIT: usize = 32;

/// Validated name of a spending category within a budget.
///
/// Names are compared verbatim: `Groceries` and `groceries` are distinct
/// categories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Accepts non-empty ASCII names no longer than `limit` bytes.
    pub fn parse(raw: impl Into<String>, limit: usize) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() || raw.len() > limit || !raw.is_ascii() {
            return Err(LedgerError::InvalidCategoryName(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CategoryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_names_up_to_the_limit() {
        let name = "a".repeat(DEFAULT_CATEGORY_NAME_LIMIT);
        assert!(CategoryName::parse(name, DEFAULT_CATEGORY_NAME_LIMIT).is_ok());
    }

    #[test]
    fn rejects_empty_long_and_non_ascii_names() {
        let too_long = "a".repeat(DEFAULT_CATEGORY_NAME_LIMIT + 1);
        for raw in ["", too_long.as_str(), "épicerie"] {
            let err = CategoryName::parse(raw, DEFAULT_CATEGORY_NAME_LIMIT).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidCategoryName(_)), "{raw}");
        }
    }

    #[test]
    fn keeps_names_verbatim() {
        let name = CategoryName::parse(" Rent ", DEFAULT_CATEGORY_NAME_LIMIT).unwrap();
        assert_eq!(name.as_str(), " Rent ");
    }
}
