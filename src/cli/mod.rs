//! Line-oriented shell that submits ledger calls and prints their receipts.

pub mod commands;
pub mod output;
pub mod shell;
pub mod shell_context;

use thiserror::Error;

use crate::{config::ConfigError, errors::LedgerError};

pub use shell::run_cli;
pub use shell_context::{CliMode, ShellContext};

/// Fatal shell errors; these end the session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Per-command errors; reported and the shell keeps going.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}
