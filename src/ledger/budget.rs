use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

use super::{alert::BudgetAlert, category::CategoryName};

/// Caller-supplied budget identifier.
pub type BudgetId = u64;

/// Whole currency units; negative amounts are unrepresentable.
pub type Amount = u64;

/// A total spending ceiling plus the allocations, spending accumulators and
/// alerts recorded against it.
///
/// `spent_total` always equals the sum of the per-category accumulators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    id: BudgetId,
    total: Amount,
    spent_total: Amount,
    #[serde(default)]
    allocations: BTreeMap<CategoryName, Amount>,
    #[serde(default)]
    spending: BTreeMap<CategoryName, Amount>,
    #[serde(default)]
    alerts: BTreeMap<CategoryName, BudgetAlert>,
}

impl Budget {
    pub(crate) fn new(id: BudgetId, total: Amount) -> Self {
        Self {
            id,
            total,
            spent_total: 0,
            allocations: BTreeMap::new(),
            spending: BTreeMap::new(),
            alerts: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> BudgetId {
        self.id
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn spent_total(&self) -> Amount {
        self.spent_total
    }

    /// Spending strictly above the total; reaching it exactly is not over.
    pub fn is_over_budget(&self) -> bool {
        self.spent_total > self.total
    }

    pub fn remaining(&self) -> Amount {
        self.total.saturating_sub(self.spent_total)
    }

    pub fn allocation(&self, category: &str) -> Option<Amount> {
        self.allocations.get(category).copied()
    }

    pub fn allocations(&self) -> impl Iterator<Item = (&CategoryName, Amount)> {
        self.allocations.iter().map(|(name, amount)| (name, *amount))
    }

    /// Sum of all allocations. Informational only: allocations may exceed
    /// the total.
    pub fn allocated_total(&self) -> u128 {
        self.allocations
            .values()
            .map(|amount| u128::from(*amount))
            .sum()
    }

    pub fn spending_for(&self, category: &str) -> Amount {
        self.spending.get(category).copied().unwrap_or(0)
    }

    pub fn spending(&self) -> impl Iterator<Item = (&CategoryName, Amount)> {
        self.spending.iter().map(|(name, amount)| (name, *amount))
    }

    pub fn alerts(&self) -> impl Iterator<Item = &BudgetAlert> {
        self.alerts.values()
    }

    pub(crate) fn set_allocation(&mut self, category: CategoryName, amount: Amount) {
        self.allocations.insert(category, amount);
    }

    /// Adds `amount` to the category accumulator and to `spent_total`.
    /// Both sums are checked before either is written.
    pub(crate) fn record_spending(&mut self, category: CategoryName, amount: Amount) -> Result<()> {
        let current = self.spending_for(category.as_str());
        let (Some(category_total), Some(spent_total)) = (
            current.checked_add(amount),
            self.spent_total.checked_add(amount),
        ) else {
            return Err(LedgerError::AmountOverflow(self.id));
        };
        self.spending.insert(category, category_total);
        self.spent_total = spent_total;
        Ok(())
    }

    /// Checks a deserialized budget: every name valid under `limit`, alerts
    /// filed under their own category and budget, and `spent_total` equal
    /// to the sum of the accumulators.
    pub(crate) fn validate(&self, limit: usize) -> Result<()> {
        let names = self
            .allocations
            .keys()
            .chain(self.spending.keys())
            .chain(self.alerts.keys());
        for name in names {
            CategoryName::parse(name.as_str(), limit)?;
        }
        for (category, alert) in &self.alerts {
            if alert.budget_id != self.id || &alert.category != category {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "alert {} is filed under budget {} category `{category}`",
                    alert.id, self.id
                )));
            }
        }
        let spent: u128 = self.spending.values().map(|amount| u128::from(*amount)).sum();
        if spent != u128::from(self.spent_total) {
            return Err(LedgerError::InvalidSnapshot(format!(
                "budget {} spent_total {} does not match category spending {spent}",
                self.id, self.spent_total
            )));
        }
        Ok(())
    }

    /// Stores `alert`, replacing any alert already kept for its category.
    pub(crate) fn set_alert(&mut self, alert: BudgetAlert) -> Option<BudgetAlert> {
        self.alerts.insert(alert.category.clone(), alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::category::DEFAULT_CATEGORY_NAME_LIMIT;

    fn name(raw: &str) -> CategoryName {
        CategoryName::parse(raw, DEFAULT_CATEGORY_NAME_LIMIT).unwrap()
    }

    #[test]
    fn spending_accumulates_per_category_and_overall() {
        let mut budget = Budget::new(1, 1_000);
        budget.record_spending(name("rent"), 400).unwrap();
        budget.record_spending(name("food"), 50).unwrap();
        budget.record_spending(name("food"), 25).unwrap();
        assert_eq!(budget.spending_for("food"), 75);
        assert_eq!(budget.spending_for("rent"), 400);
        assert_eq!(budget.spent_total(), 475);
        assert_eq!(budget.remaining(), 525);
    }

    #[test]
    fn overflow_leaves_budget_untouched() {
        let mut budget = Budget::new(3, 10);
        budget.record_spending(name("big"), u64::MAX).unwrap();
        let before = budget.clone();
        let err = budget.record_spending(name("other"), 1).unwrap_err();
        assert!(matches!(err, LedgerError::AmountOverflow(3)));
        assert_eq!(budget, before);
    }

    #[test]
    fn validate_rejects_mismatched_spent_total() {
        let mut budget = Budget::new(4, 100);
        budget.record_spending(name("food"), 10).unwrap();
        assert!(budget.validate(DEFAULT_CATEGORY_NAME_LIMIT).is_ok());
        budget.spent_total = 5000;
        assert!(matches!(
            budget.validate(DEFAULT_CATEGORY_NAME_LIMIT),
            Err(LedgerError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn validate_applies_the_name_limit() {
        let mut budget = Budget::new(5, 100);
        budget.set_allocation(name("groceries"), 10);
        assert!(matches!(
            budget.validate(4),
            Err(LedgerError::InvalidCategoryName(_))
        ));
    }

    #[test]
    fn allocations_may_exceed_total() {
        let mut budget = Budget::new(2, 100);
        budget.set_allocation(name("a"), u64::MAX);
        budget.set_allocation(name("b"), 1);
        assert_eq!(budget.allocated_total(), u128::from(u64::MAX) + 1);
        assert!(!budget.is_over_budget());
    }
}
