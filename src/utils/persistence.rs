use std::{fs, path::Path};

use tracing::info;

use crate::{errors::LedgerError, ledger::Ledger, submission::Call};

/// Writes the provided ledger to disk atomically by staging to a temporary file.
pub fn save_ledger_to_file(ledger: &Ledger, path: &Path) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(ledger)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    info!(path = %path.display(), budgets = ledger.budget_count(), "ledger saved");
    Ok(())
}

/// Loads a ledger snapshot from disk and checks its invariants before
/// handing it out.
pub fn load_ledger_from_file(path: &Path) -> Result<Ledger, LedgerError> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data)?;
    ledger.validate()?;
    info!(path = %path.display(), budgets = ledger.budget_count(), "ledger loaded");
    Ok(ledger)
}

/// Reads a JSON array of calls to be submitted as one batch.
pub fn load_batch_from_file(path: &Path) -> Result<Vec<Call>, LedgerError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
