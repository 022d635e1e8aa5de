use std::io::{self, BufRead};

use rustyline::{error::ReadlineError, DefaultEditor};
use shell_words::split;

use super::{
    commands::{execute, parse_command},
    output, CliError, CliMode, CommandError, LoopControl, ShellContext,
};

/// Environment variable that switches the shell to line-by-line stdin mode.
pub const SCRIPT_ENV: &str = "BUDGET_PLANNER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    crate::utils::init_tracing(&context.config().log_filter);

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => {
            output::disable_colors();
            run_script(&mut context, io::stdin().lock())
        }
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = DefaultEditor::new()?;
    output::info("Type `help` for available commands.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                run_line(context, trimmed);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Executes each input line in order until `exit` or end of input.
pub fn run_script(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        if !context.running {
            break;
        }
        let line = line?;
        run_line(context, &line);
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) {
    match handle_line(context, line) {
        Ok(LoopControl::Continue) => {}
        Ok(LoopControl::Exit) => context.running = false,
        Err(err) => context.report_error(err),
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = split(trimmed)
        .map_err(|err| CommandError::InvalidArguments(format!("could not parse line: {err}")))?;
    let command = parse_command(&tokens)?;
    execute(context, command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use tempfile::TempDir;

    fn script_context(temp: &TempDir) -> ShellContext {
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        ShellContext::with_config_manager(CliMode::Script, manager).unwrap()
    }

    #[test]
    fn script_applies_lines_in_order() {
        let temp = TempDir::new().unwrap();
        let mut context = script_context(&temp);
        let input = "init 1 1000\n# comment\nspend 1 general 1100\nbogus\ncheck 1\n";
        run_script(&mut context, input.as_bytes()).unwrap();
        assert!(context.ledger.check_budget(1).unwrap());
        assert!(context.running);
    }

    #[test]
    fn exit_stops_reading() {
        let temp = TempDir::new().unwrap();
        let mut context = script_context(&temp);
        run_script(&mut context, "exit\ninit 1 5\n".as_bytes()).unwrap();
        assert!(!context.running);
        assert_eq!(context.ledger.budget_count(), 0);
    }

    #[test]
    fn save_and_load_use_the_snapshot_path() {
        let temp = TempDir::new().unwrap();
        let mut context = script_context(&temp);
        run_script(&mut context, "init 3 50\nalert 3 food 40\nsave\n".as_bytes()).unwrap();

        let mut fresh = script_context(&temp);
        run_script(&mut fresh, "load\n".as_bytes()).unwrap();
        assert_eq!(fresh.ledger.budget(3).unwrap().total(), 50);
        assert_eq!(fresh.ledger.last_alert_id(), 1);
    }
}
