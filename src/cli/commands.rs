use std::path::PathBuf;

use crate::{
    ledger::{Amount, BudgetId},
    submission::{Call, Operation},
};

use super::{CommandError, LoopControl, ShellContext};

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Call(Operation),
    Show(BudgetId),
    List,
    Batch(PathBuf),
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
    Help,
    Version,
    Exit,
}

const USAGE: &[(&str, &str)] = &[
    ("init <budget-id> <total>", "Initialize a budget"),
    ("allocate <budget-id> <category> <amount>", "Set a category allocation"),
    ("spend <budget-id> <category> <amount>", "Record spending against a category"),
    ("alert <budget-id> <category> <percent>", "Store a threshold alert"),
    ("check <budget-id>", "Report whether spending exceeds the total"),
    ("show <budget-id>", "Show a budget's allocations, spending and alerts"),
    ("list", "List initialized budgets"),
    ("batch <file.json>", "Submit a JSON array of calls in order"),
    ("save [path]", "Write the ledger snapshot"),
    ("load [path]", "Replace the ledger with a snapshot"),
    ("version", "Print the version"),
    ("exit", "Leave the shell"),
];

/// Parses a tokenized line. The first token is matched case-insensitively.
pub fn parse_command(tokens: &[String]) -> Result<Command, CommandError> {
    let Some((head, args)) = tokens.split_first() else {
        return Err(CommandError::InvalidArguments("empty command".into()));
    };
    let command = match head.to_lowercase().as_str() {
        "init" => {
            expect_args(head, args, 2)?;
            Command::Call(Operation::InitializeBudget {
                budget_id: parse_number(&args[0], "budget id")?,
                total: parse_number(&args[1], "total")?,
            })
        }
        "allocate" => {
            expect_args(head, args, 3)?;
            Command::Call(Operation::AddCategoryAllocation {
                budget_id: parse_number(&args[0], "budget id")?,
                category: args[1].clone(),
                amount: parse_number(&args[2], "amount")?,
            })
        }
        "spend" => {
            expect_args(head, args, 3)?;
            Command::Call(Operation::RecordSpending {
                budget_id: parse_number(&args[0], "budget id")?,
                category: args[1].clone(),
                amount: parse_number(&args[2], "amount")?,
            })
        }
        "alert" => {
            expect_args(head, args, 3)?;
            Command::Call(Operation::AddBudgetAlert {
                budget_id: parse_number(&args[0], "budget id")?,
                category: args[1].clone(),
                threshold_percent: parse_number(&args[2], "threshold percent")?,
            })
        }
        "check" => {
            expect_args(head, args, 1)?;
            Command::Call(Operation::CheckBudget {
                budget_id: parse_number(&args[0], "budget id")?,
            })
        }
        "show" => {
            expect_args(head, args, 1)?;
            Command::Show(parse_number(&args[0], "budget id")?)
        }
        "list" => {
            expect_args(head, args, 0)?;
            Command::List
        }
        "batch" => {
            expect_args(head, args, 1)?;
            Command::Batch(PathBuf::from(&args[0]))
        }
        "save" => Command::Save(optional_path(head, args)?),
        "load" => Command::Load(optional_path(head, args)?),
        "help" | "?" => Command::Help,
        "version" => Command::Version,
        "exit" | "quit" => Command::Exit,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown command `{other}`"
            )))
        }
    };
    Ok(command)
}

/// Runs a parsed command against the shell state.
pub fn execute(context: &mut ShellContext, command: Command) -> Result<LoopControl, CommandError> {
    match command {
        Command::Call(op) => {
            let call = Call::from_caller(context.caller(), op);
            let receipt = context.ledger.apply(&call);
            super::output::receipt(&receipt);
        }
        Command::Show(budget_id) => show_budget(context, budget_id)?,
        Command::List => list_budgets(context),
        Command::Batch(path) => context.submit_batch_file(&path)?,
        Command::Save(path) => {
            let path = context.save(path)?;
            super::output::success(format!("Ledger saved to {}", path.display()));
        }
        Command::Load(path) => {
            let path = context.load(path)?;
            super::output::success(format!("Ledger loaded from {}", path.display()));
        }
        Command::Help => print_help(),
        Command::Version => super::output::info(format!(
            "{} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )),
        Command::Exit => return Ok(LoopControl::Exit),
    }
    Ok(LoopControl::Continue)
}

fn show_budget(context: &ShellContext, budget_id: BudgetId) -> Result<(), CommandError> {
    let budget = context
        .ledger
        .budget(budget_id)
        .ok_or_else(|| CommandError::InvalidArguments(format!("budget {budget_id} not found")))?;
    super::output::section(format!("Budget {budget_id}"));
    super::output::info(format!(
        "total {}  spent {}  remaining {}  over budget: {}",
        budget.total(),
        budget.spent_total(),
        budget.remaining(),
        budget.is_over_budget()
    ));
    for (category, allocated) in budget.allocations() {
        let spent = budget.spending_for(category.as_str());
        super::output::info(format!("  {category:<32} allocated {allocated:>10}  spent {spent:>10}"));
    }
    for (category, spent) in budget.spending() {
        if budget.allocation(category.as_str()).is_none() {
            super::output::info(format!("  {category:<32} allocated {:>10}  spent {spent:>10}", "-"));
        }
    }
    for alert in context.ledger.alerts_for(budget_id) {
        super::output::info(format!(
            "  alert #{} on {} at {}%",
            alert.id,
            alert.category,
            alert.threshold.get()
        ));
    }
    Ok(())
}

fn list_budgets(context: &ShellContext) {
    if context.ledger.budget_count() == 0 {
        super::output::info("No budgets initialized.");
        return;
    }
    for budget_id in context.ledger.budget_ids() {
        if let Some(budget) = context.ledger.budget(budget_id) {
            super::output::info(format!(
                "{budget_id:>8}  total {:>10}  spent {:>10}",
                budget.total(),
                budget.spent_total()
            ));
        }
    }
}

fn print_help() {
    super::output::section("Commands");
    for (usage, description) in USAGE {
        super::output::info(format!("  {usage:<44} {description}"));
    }
}

fn expect_args(command: &str, args: &[String], count: usize) -> Result<(), CommandError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!(
            "`{command}` expects {count} argument(s), got {}",
            args.len()
        )))
    }
}

fn optional_path(command: &str, args: &[String]) -> Result<Option<PathBuf>, CommandError> {
    match args {
        [] => Ok(None),
        [path] => Ok(Some(PathBuf::from(path))),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{command}` takes at most one path"
        ))),
    }
}

fn parse_number(raw: &str, label: &str) -> Result<Amount, CommandError> {
    raw.parse::<u64>().map_err(|_| {
        CommandError::InvalidArguments(format!("{label} must be a non-negative integer, got `{raw}`"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        shell_words::split(line).unwrap()
    }

    #[test]
    fn parses_ledger_operations() {
        assert_eq!(
            parse_command(&tokens("spend 1 \"dining out\" 25")).unwrap(),
            Command::Call(Operation::RecordSpending {
                budget_id: 1,
                category: "dining out".into(),
                amount: 25,
            })
        );
        assert_eq!(
            parse_command(&tokens("CHECK 4")).unwrap(),
            Command::Call(Operation::CheckBudget { budget_id: 4 })
        );
    }

    #[test]
    fn rejects_negative_amounts_and_wrong_arity() {
        assert!(parse_command(&tokens("init 1 -5")).is_err());
        assert!(parse_command(&tokens("alert 1 food")).is_err());
        assert!(parse_command(&tokens("frobnicate")).is_err());
    }

    #[test]
    fn save_path_is_optional() {
        assert_eq!(parse_command(&tokens("save")).unwrap(), Command::Save(None));
        assert_eq!(
            parse_command(&tokens("load /tmp/l.json")).unwrap(),
            Command::Load(Some(PathBuf::from("/tmp/l.json")))
        );
    }
}
