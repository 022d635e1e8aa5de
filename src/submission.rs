//! Ordered call submission: each [`Call`] names one ledger operation with
//! its positional arguments and yields exactly one [`Receipt`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    errors::LedgerError,
    ledger::{AlertId, Amount, BudgetId, Ledger},
};

/// One of the five ledger operations together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    InitializeBudget {
        budget_id: BudgetId,
        total: Amount,
    },
    AddCategoryAllocation {
        budget_id: BudgetId,
        category: String,
        amount: Amount,
    },
    RecordSpending {
        budget_id: BudgetId,
        category: String,
        amount: Amount,
    },
    AddBudgetAlert {
        budget_id: BudgetId,
        category: String,
        threshold_percent: u64,
    },
    CheckBudget {
        budget_id: BudgetId,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::InitializeBudget { .. } => "initialize-budget",
            Operation::AddCategoryAllocation { .. } => "add-category-allocation",
            Operation::RecordSpending { .. } => "record-spending",
            Operation::AddBudgetAlert { .. } => "add-budget-alert",
            Operation::CheckBudget { .. } => "check-budget",
        }
    }

    pub fn budget_id(&self) -> BudgetId {
        match self {
            Operation::InitializeBudget { budget_id, .. }
            | Operation::AddCategoryAllocation { budget_id, .. }
            | Operation::RecordSpending { budget_id, .. }
            | Operation::AddBudgetAlert { budget_id, .. }
            | Operation::CheckBudget { budget_id } => *budget_id,
        }
    }
}

/// An operation submitted on behalf of a caller.
///
/// The caller is only recorded in logs; the ledger performs no ownership
/// checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    #[serde(flatten)]
    pub op: Operation,
}

impl Call {
    pub fn new(op: Operation) -> Self {
        Self { caller: None, op }
    }

    pub fn from_caller(caller: impl Into<String>, op: Operation) -> Self {
        Self {
            caller: Some(caller.into()),
            op,
        }
    }
}

/// Value carried by an accepted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Flag(bool),
    AlertId(AlertId),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Flag(flag) => write!(f, "{flag}"),
            Outcome::AlertId(id) => write!(f, "{id}"),
        }
    }
}

/// Serializable description of a rejected call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: String,
    pub message: String,
}

impl From<&LedgerError> for Rejection {
    fn from(err: &LedgerError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Tagged result of a single call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Receipt {
    Ok(Outcome),
    Err(Rejection),
}

impl Receipt {
    pub fn is_ok(&self) -> bool {
        matches!(self, Receipt::Ok(_))
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Receipt::Ok(_) => None,
            Receipt::Err(rejection) => Some(rejection.code.as_str()),
        }
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receipt::Ok(outcome) => write!(f, "ok {outcome}"),
            Receipt::Err(rejection) => write!(f, "err {}: {}", rejection.code, rejection.message),
        }
    }
}

impl Ledger {
    /// Applies one call. A rejected call leaves the ledger unchanged.
    pub fn apply(&mut self, call: &Call) -> Receipt {
        let result = match &call.op {
            Operation::InitializeBudget { budget_id, total } => self
                .initialize_budget(*budget_id, *total)
                .map(|()| Outcome::Flag(true)),
            Operation::AddCategoryAllocation {
                budget_id,
                category,
                amount,
            } => self
                .add_category_allocation(*budget_id, category, *amount)
                .map(|()| Outcome::Flag(true)),
            Operation::RecordSpending {
                budget_id,
                category,
                amount,
            } => self
                .record_spending(*budget_id, category, *amount)
                .map(|()| Outcome::Flag(true)),
            Operation::AddBudgetAlert {
                budget_id,
                category,
                threshold_percent,
            } => self
                .add_budget_alert(*budget_id, category, *threshold_percent)
                .map(Outcome::AlertId),
            Operation::CheckBudget { budget_id } => {
                self.check_budget(*budget_id).map(Outcome::Flag)
            }
        };

        let caller = call.caller.as_deref().unwrap_or("anonymous");
        match result {
            Ok(outcome) => {
                debug!(caller, op = call.op.name(), %outcome, "call accepted");
                Receipt::Ok(outcome)
            }
            Err(err) => {
                warn!(
                    caller,
                    op = call.op.name(),
                    budget_id = call.op.budget_id(),
                    code = err.code(),
                    "call rejected: {err}"
                );
                Receipt::Err(Rejection::from(&err))
            }
        }
    }
}

/// Applies `calls` in order and returns one receipt per call. Failed calls
/// do not stop the rest of the batch.
pub fn submit_batch(ledger: &mut Ledger, calls: &[Call]) -> Vec<Receipt> {
    calls.iter().map(|call| ledger.apply(call)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipts_display_tagged_results() {
        let mut ledger = Ledger::new();
        let receipts = submit_batch(
            &mut ledger,
            &[
                Call::new(Operation::InitializeBudget {
                    budget_id: 1,
                    total: 10,
                }),
                Call::new(Operation::AddBudgetAlert {
                    budget_id: 1,
                    category: "fun".into(),
                    threshold_percent: 80,
                }),
                Call::new(Operation::CheckBudget { budget_id: 2 }),
            ],
        );
        assert_eq!(receipts[0].to_string(), "ok true");
        assert_eq!(receipts[1].to_string(), "ok 1");
        assert_eq!(
            receipts[2].to_string(),
            "err budget-not-found: budget 2 not found"
        );
    }

    #[test]
    fn calls_parse_from_tagged_json() {
        let json = r#"[
            {"caller": "alice", "op": "initialize-budget", "budget_id": 7, "total": 500},
            {"op": "record-spending", "budget_id": 7, "category": "food", "amount": 20}
        ]"#;
        let calls: Vec<Call> = serde_json::from_str(json).unwrap();
        assert_eq!(calls[0].caller.as_deref(), Some("alice"));
        assert_eq!(
            calls[1].op,
            Operation::RecordSpending {
                budget_id: 7,
                category: "food".into(),
                amount: 20,
            }
        );
    }

    #[test]
    fn receipts_serialize_as_ok_or_err() {
        let ok = serde_json::to_string(&Receipt::Ok(Outcome::AlertId(3))).unwrap();
        assert_eq!(ok, r#"{"ok":3}"#);
        let err = Receipt::Err(Rejection::from(&LedgerError::InvalidThreshold(120)));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["err"]["code"], "invalid-threshold");
    }
}
