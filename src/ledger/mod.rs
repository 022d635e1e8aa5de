//! Budget ledger state: budgets, category allocations, spending
//! accumulators and threshold alerts.

pub mod alert;
pub mod budget;
pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;

pub use alert::{AlertId, BudgetAlert, ThresholdPercent};
pub use budget::{Amount, Budget, BudgetId};
pub use category::{CategoryName, DEFAULT_CATEGORY_NAME_LIMIT};
pub use ledger::Ledger;
