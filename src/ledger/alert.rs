use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

use super::{budget::BudgetId, category::CategoryName};

/// Ledger-wide sequential alert identifier. The first alert receives `1`.
pub type AlertId = u64;

/// Percentage of a budget at which an alert is meant to trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ThresholdPercent(u8);

impl ThresholdPercent {
    pub const MAX: u64 = 100;

    pub fn new(percent: u64) -> Result<Self, LedgerError> {
        if percent > Self::MAX {
            return Err(LedgerError::InvalidThreshold(percent));
        }
        Ok(Self(percent as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u64> for ThresholdPercent {
    type Error = LedgerError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ThresholdPercent> for u64 {
    fn from(value: ThresholdPercent) -> Self {
        u64::from(value.0)
    }
}

/// A declarative spending threshold on one category of a budget.
///
/// Alerts are stored, never evaluated: nothing in the ledger fires them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub id: AlertId,
    pub budget_id: BudgetId,
    pub category: CategoryName,
    pub threshold: ThresholdPercent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_bounds_are_inclusive() {
        assert_eq!(ThresholdPercent::new(0).unwrap().get(), 0);
        assert_eq!(ThresholdPercent::new(100).unwrap().get(), 100);
        assert!(matches!(
            ThresholdPercent::new(101),
            Err(LedgerError::InvalidThreshold(101))
        ));
    }

    #[test]
    fn threshold_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<ThresholdPercent>("80").is_ok());
        assert!(serde_json::from_str::<ThresholdPercent>("250").is_err());
    }
}
