use std::path::{Path, PathBuf};

use crate::{
    config::{Config, ConfigManager},
    ledger::Ledger,
    submission::submit_batch,
    utils::persistence::{load_batch_from_file, load_ledger_from_file, save_ledger_to_file},
};

use super::{output, CliError, CommandError};

/// Whether the shell reads from a terminal or from piped stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// State shared by every command of one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub ledger: Ledger,
    pub running: bool,
    config: Config,
    config_manager: ConfigManager,
    caller: String,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let ledger = Ledger::new().with_category_name_limit(config.category_name_limit);
        let caller = std::env::var("USER").unwrap_or_else(|_| "local".into());
        Ok(Self {
            mode,
            ledger,
            running: true,
            config,
            config_manager,
            caller,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    pub fn prompt(&self) -> String {
        format!("budget ({})> ", self.ledger.budget_count())
    }

    pub fn submit_batch_file(&mut self, path: &Path) -> Result<(), CommandError> {
        let calls = load_batch_from_file(path)?;
        let receipts = submit_batch(&mut self.ledger, &calls);
        for (index, receipt) in receipts.iter().enumerate() {
            output::info(format!("[{index}] {}", calls[index].op.name()));
            output::receipt(receipt);
        }
        Ok(())
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<PathBuf, CommandError> {
        let path = path.unwrap_or_else(|| self.config_manager.snapshot_path(&self.config));
        save_ledger_to_file(&self.ledger, &path)?;
        Ok(path)
    }

    /// Replaces the current ledger. The configured name limit is kept, and
    /// a snapshot with names longer than it is refused.
    pub fn load(&mut self, path: Option<PathBuf>) -> Result<PathBuf, CommandError> {
        let path = path.unwrap_or_else(|| self.config_manager.snapshot_path(&self.config));
        let ledger = load_ledger_from_file(&path)?
            .with_category_name_limit(self.config.category_name_limit);
        ledger.validate()?;
        self.ledger = ledger;
        Ok(path)
    }

    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::InvalidArguments(message) => {
                output::warning(message);
                if self.mode == CliMode::Interactive {
                    output::info("Use `help` for usage details.");
                }
            }
            CommandError::Ledger(err) => output::error(err),
        }
    }
}
