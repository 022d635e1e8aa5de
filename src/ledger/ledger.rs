use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

use super::{
    alert::{AlertId, BudgetAlert, ThresholdPercent},
    budget::{Amount, Budget, BudgetId},
    category::{CategoryName, DEFAULT_CATEGORY_NAME_LIMIT},
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory store of every budget plus the ledger-wide alert counter.
///
/// Operations are applied one at a time. Each either applies fully or
/// returns an error with no state changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    #[serde(default = "Ledger::category_name_limit_default")]
    category_name_limit: usize,
    #[serde(default)]
    budgets: BTreeMap<BudgetId, Budget>,
    #[serde(default)]
    last_alert_id: AlertId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            category_name_limit: DEFAULT_CATEGORY_NAME_LIMIT,
            budgets: BTreeMap::new(),
            last_alert_id: 0,
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn with_category_name_limit(mut self, limit: usize) -> Self {
        self.category_name_limit = limit;
        self
    }

    pub fn category_name_limit(&self) -> usize {
        self.category_name_limit
    }

    pub fn initialize_budget(&mut self, budget_id: BudgetId, total: Amount) -> Result<()> {
        if self.budgets.contains_key(&budget_id) {
            return Err(LedgerError::AlreadyExists(budget_id));
        }
        self.budgets.insert(budget_id, Budget::new(budget_id, total));
        self.touch();
        debug!(budget_id, total, "budget initialized");
        Ok(())
    }

    /// Inserts or overwrites the allocation for `category`.
    pub fn add_category_allocation(
        &mut self,
        budget_id: BudgetId,
        category: &str,
        amount: Amount,
    ) -> Result<()> {
        let limit = self.category_name_limit;
        let budget = self.budget_mut(budget_id)?;
        let name = CategoryName::parse(category, limit)?;
        budget.set_allocation(name, amount);
        self.touch();
        debug!(budget_id, category, amount, "allocation set");
        Ok(())
    }

    /// Adds `amount` to the category accumulator and the budget's spent
    /// total. The category needs no allocation.
    pub fn record_spending(
        &mut self,
        budget_id: BudgetId,
        category: &str,
        amount: Amount,
    ) -> Result<()> {
        let limit = self.category_name_limit;
        let budget = self.budget_mut(budget_id)?;
        let name = CategoryName::parse(category, limit)?;
        budget.record_spending(name, amount)?;
        let spent_total = budget.spent_total();
        self.touch();
        debug!(budget_id, category, amount, spent_total, "spending recorded");
        Ok(())
    }

    /// Stores a threshold alert and returns its ledger-wide sequential id.
    pub fn add_budget_alert(
        &mut self,
        budget_id: BudgetId,
        category: &str,
        threshold_percent: u64,
    ) -> Result<AlertId> {
        let limit = self.category_name_limit;
        let next_id = self.last_alert_id.checked_add(1);
        let budget = self.budget_mut(budget_id)?;
        let threshold = ThresholdPercent::new(threshold_percent)?;
        let category = CategoryName::parse(category, limit)?;
        let alert_id = next_id.ok_or(LedgerError::AlertIdExhausted)?;
        let replaced = budget.set_alert(BudgetAlert {
            id: alert_id,
            budget_id,
            category,
            threshold,
        });
        self.last_alert_id = alert_id;
        self.touch();
        debug!(
            budget_id,
            alert_id,
            threshold_percent,
            replaced = ?replaced.map(|alert| alert.id),
            "alert stored"
        );
        Ok(alert_id)
    }

    /// Returns `true` only when spending strictly exceeds the total.
    pub fn check_budget(&self, budget_id: BudgetId) -> Result<bool> {
        self.budget(budget_id)
            .map(Budget::is_over_budget)
            .ok_or(LedgerError::BudgetNotFound(budget_id))
    }

    pub fn budget(&self, budget_id: BudgetId) -> Option<&Budget> {
        self.budgets.get(&budget_id)
    }

    pub fn budget_ids(&self) -> impl Iterator<Item = BudgetId> + '_ {
        self.budgets.keys().copied()
    }

    pub fn budget_count(&self) -> usize {
        self.budgets.len()
    }

    pub fn allocation(&self, budget_id: BudgetId, category: &str) -> Option<Amount> {
        self.budget(budget_id)?.allocation(category)
    }

    /// Zero when nothing has been spent against `category` yet.
    pub fn category_spending(&self, budget_id: BudgetId, category: &str) -> Amount {
        self.budget(budget_id)
            .map(|budget| budget.spending_for(category))
            .unwrap_or(0)
    }

    pub fn alert(&self, alert_id: AlertId) -> Option<&BudgetAlert> {
        self.budgets
            .values()
            .flat_map(|budget| budget.alerts())
            .find(|alert| alert.id == alert_id)
    }

    pub fn alerts_for(&self, budget_id: BudgetId) -> Vec<&BudgetAlert> {
        let mut alerts: Vec<&BudgetAlert> = self
            .budget(budget_id)
            .map(|budget| budget.alerts().collect())
            .unwrap_or_default();
        alerts.sort_by_key(|alert| alert.id);
        alerts
    }

    /// Id handed out by the most recent alert, `0` before any.
    pub fn last_alert_id(&self) -> AlertId {
        self.last_alert_id
    }

    /// Checks the invariants a deserialized ledger cannot guarantee by
    /// itself: budgets keyed by their own id, valid budget contents, and
    /// alert ids that are unique, non-zero and not ahead of the counter.
    pub fn validate(&self) -> Result<()> {
        let mut alert_ids = BTreeSet::new();
        for (budget_id, budget) in &self.budgets {
            if *budget_id != budget.id() {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "budget {} stored under id {budget_id}",
                    budget.id()
                )));
            }
            budget.validate(self.category_name_limit)?;
            for alert in budget.alerts() {
                if alert.id == 0 || alert.id > self.last_alert_id {
                    return Err(LedgerError::InvalidSnapshot(format!(
                        "alert {} is outside 1..={}",
                        alert.id, self.last_alert_id
                    )));
                }
                if !alert_ids.insert(alert.id) {
                    return Err(LedgerError::InvalidSnapshot(format!(
                        "alert {} appears more than once",
                        alert.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn category_name_limit_default() -> usize {
        DEFAULT_CATEGORY_NAME_LIMIT
    }

    fn budget_mut(&mut self, budget_id: BudgetId) -> Result<&mut Budget> {
        self.budgets
            .get_mut(&budget_id)
            .ok_or(LedgerError::BudgetNotFound(budget_id))
    }
}
