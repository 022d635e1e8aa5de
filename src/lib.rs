#![doc(test(attr(deny(warnings))))]

//! Budget Planner keeps a per-owner budget ledger: a total per budget,
//! named category allocations, cumulative spending per category and
//! threshold alerts, with a query for whether spending exceeds the total.
//!
//! ```
//! use budget_planner::ledger::Ledger;
//!
//! let mut ledger = Ledger::new();
//! ledger.initialize_budget(1, 1000).unwrap();
//! ledger.record_spending(1, "general", 1000).unwrap();
//! assert!(!ledger.check_budget(1).unwrap());
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod submission;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and emits a startup log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(utils::DEFAULT_LOG_FILTER);
        tracing::info!("Budget Planner tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
