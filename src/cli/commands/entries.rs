//! `income`, `essential`, `bill`, `expense` and `saving` commands.

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::{BillService, DEFAULT_UPCOMING_DAYS};
use crate::core::validation::{parse_amount, parse_date, parse_non_negative, require_text};
use crate::domain::{
    BillEntry, BillStatus, Displayable, EntryKind, EssentialEntry, IncomeEntry, LedgerRecord,
    NonEssentialEntry, SavingsEntry,
};

use super::subcommand;

const INCOME_USAGE: &str = "income <add <description> <amount> [date] | list | delete <n>>";
const ESSENTIAL_USAGE: &str = "essential <add <category> <expected> <actual> | list | delete <n>>";
const BILL_USAGE: &str = "bill <add <name> <amount> <due-date> [status] | list | delete <n> | toggle <n> | overdue | upcoming [days]>";
const EXPENSE_USAGE: &str = "expense <add <expense> <amount> [date] [notes] | list | delete <n>>";
const SAVING_USAGE: &str = "saving <add <amount> [date] | list | delete <n>>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("income", "Record and review income", INCOME_USAGE, cmd_income),
        CommandEntry::new(
            "essential",
            "Track essential categories (expected vs actual)",
            ESSENTIAL_USAGE,
            cmd_essential,
        ),
        CommandEntry::new("bill", "Manage bills and payment status", BILL_USAGE, cmd_bill),
        CommandEntry::new(
            "expense",
            "Record non-essential spending",
            EXPENSE_USAGE,
            cmd_expense,
        ),
        CommandEntry::new("saving", "Record savings deposits", SAVING_USAGE, cmd_saving),
    ]
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args, INCOME_USAGE)?.as_str() {
        "add" => {
            let fields = Fields::new(context, &args[1..], INCOME_USAGE);
            let description = require_text("description", &fields.required(0, "Description")?)?;
            let amount = parse_amount("amount", &fields.required(1, "Amount")?)?;
            let date = parse_date(&fields.date(2, "Date")?)?;
            context
                .store
                .add(IncomeEntry::new(description, amount, date))?;
            io::print_success(format!("Income of {} recorded.", context.money(amount)));
            Ok(())
        }
        "list" => list_entries::<IncomeEntry>(context),
        "delete" => delete_entry(context, EntryKind::Income, &args[1..], INCOME_USAGE),
        other => unknown_subcommand("income", other),
    }
}

fn cmd_essential(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args, ESSENTIAL_USAGE)?.as_str() {
        "add" => {
            let fields = Fields::new(context, &args[1..], ESSENTIAL_USAGE);
            if fields.is_wizard() {
                let suggestions = context.settings.category_suggestions(EntryKind::Essentials);
                io::print_info(format!("Suggestions: {}", suggestions.join(", ")));
            }
            let category = require_text("category", &fields.required(0, "Category")?)?;
            let expected = parse_non_negative("expected", &fields.required(1, "Expected")?)?;
            let actual = parse_non_negative("actual", &fields.required(2, "Actual")?)?;
            context
                .store
                .add(EssentialEntry::new(category.clone(), expected, actual))?;
            io::print_success(format!("Essential category `{}` recorded.", category));
            Ok(())
        }
        "list" => list_entries::<EssentialEntry>(context),
        "delete" => delete_entry(context, EntryKind::Essentials, &args[1..], ESSENTIAL_USAGE),
        other => unknown_subcommand("essential", other),
    }
}

fn cmd_bill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args, BILL_USAGE)?.as_str() {
        "add" => {
            let fields = Fields::new(context, &args[1..], BILL_USAGE);
            let name = require_text("bill name", &fields.required(0, "Bill name")?)?;
            let amount = parse_amount("amount due", &fields.required(1, "Amount due")?)?;
            let due = parse_date(&fields.required(2, "Due date (YYYY-MM-DD)")?)?;
            let status = fields
                .optional(3, "Status (Paid/Unpaid)", BillStatus::Unpaid.as_str())?
                .parse::<BillStatus>()
                .map_err(CommandError::InvalidArguments)?;
            context
                .store
                .add(BillEntry::new(name.clone(), amount, due).with_status(status))?;
            io::print_success(format!("Bill `{}` due {} recorded.", name, due));
            Ok(())
        }
        "list" => list_entries::<BillEntry>(context),
        "delete" => delete_entry(context, EntryKind::Bills, &args[1..], BILL_USAGE),
        "toggle" => {
            let position = parse_position(args.get(1).copied(), BILL_USAGE)?;
            match context.store.set_status(position)? {
                Some(bill) => io::print_success(format!("`{}` is now {}.", bill.name, bill.status)),
                None => io::print_warning(format!("No bill at position {}.", position + 1)),
            }
            Ok(())
        }
        "overdue" => {
            let overdue = BillService::overdue_bills(&context.snapshot(), context.today());
            print_bills(context, "Overdue bills", &overdue, "No overdue bills.");
            Ok(())
        }
        "upcoming" => {
            let horizon = match args.get(1) {
                Some(raw) => raw.parse::<i64>().map_err(|_| {
                    CommandError::InvalidArguments("days must be a whole number".into())
                })?,
                None => DEFAULT_UPCOMING_DAYS,
            };
            let upcoming = BillService::upcoming_bills(&context.snapshot(), context.today(), horizon)?;
            print_bills(
                context,
                &format!("Bills due in the next {} days", horizon),
                &upcoming,
                "No upcoming bills.",
            );
            Ok(())
        }
        other => unknown_subcommand("bill", other),
    }
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args, EXPENSE_USAGE)?.as_str() {
        "add" => {
            let fields = Fields::new(context, &args[1..], EXPENSE_USAGE);
            let expense = require_text("expense", &fields.required(0, "Expense")?)?;
            let amount = parse_amount("amount", &fields.required(1, "Amount")?)?;
            let date = parse_date(&fields.date(2, "Date")?)?;
            let notes = fields.optional(3, "Notes", "")?;
            context
                .store
                .add(NonEssentialEntry::new(expense.clone(), amount, date).with_notes(notes))?;
            io::print_success(format!("Expense `{}` recorded.", expense));
            Ok(())
        }
        "list" => list_entries::<NonEssentialEntry>(context),
        "delete" => delete_entry(context, EntryKind::NonEssentials, &args[1..], EXPENSE_USAGE),
        other => unknown_subcommand("expense", other),
    }
}

fn cmd_saving(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args, SAVING_USAGE)?.as_str() {
        "add" => {
            let fields = Fields::new(context, &args[1..], SAVING_USAGE);
            let deposit = parse_amount("deposit", &fields.required(0, "Deposit")?)?;
            let date = parse_date(&fields.date(1, "Date")?)?;
            context.store.add(SavingsEntry::new(deposit, date))?;
            io::print_success(format!("Deposit of {} recorded.", context.money(deposit)));
            Ok(())
        }
        "list" => list_entries::<SavingsEntry>(context),
        "delete" => delete_entry(context, EntryKind::Savings, &args[1..], SAVING_USAGE),
        other => unknown_subcommand("saving", other),
    }
}

/// Positional arguments for an `add` subcommand.
///
/// In interactive mode a bare `add` turns into a prompt per field.
struct Fields<'a> {
    context: &'a ShellContext,
    args: &'a [&'a str],
    usage: &'static str,
}

impl<'a> Fields<'a> {
    fn new(context: &'a ShellContext, args: &'a [&'a str], usage: &'static str) -> Self {
        Self {
            context,
            args,
            usage,
        }
    }

    fn is_wizard(&self) -> bool {
        self.args.is_empty() && self.context.mode() == CliMode::Interactive
    }

    fn required(&self, index: usize, prompt: &str) -> Result<String, CommandError> {
        if let Some(value) = self.args.get(index) {
            return Ok((*value).to_string());
        }
        if self.is_wizard() {
            return io::prompt_text(&self.context.theme, prompt);
        }
        Err(CommandError::usage(self.usage))
    }

    fn optional(&self, index: usize, prompt: &str, default: &str) -> Result<String, CommandError> {
        if let Some(value) = self.args.get(index) {
            return Ok((*value).to_string());
        }
        if self.is_wizard() {
            return io::prompt_text_or(&self.context.theme, prompt, default);
        }
        Ok(default.to_string())
    }

    /// Optional date defaulting to today.
    fn date(&self, index: usize, prompt: &str) -> Result<String, CommandError> {
        let today = self.context.today().to_string();
        self.optional(index, prompt, &today)
    }
}

fn list_entries<R: LedgerRecord>(context: &ShellContext) -> CommandResult {
    let rows = context.store.list::<R>();
    output_section(R::KIND.sheet_name());
    if rows.is_empty() {
        io::print_info(format!("No {} entries recorded.", R::KIND));
        return Ok(());
    }
    for (index, row) in rows.iter().enumerate() {
        io::print_line(format!("{:>3}. {}", index + 1, row.display_label()));
    }
    Ok(())
}

fn delete_entry(
    context: &mut ShellContext,
    kind: EntryKind,
    args: &[&str],
    usage: &str,
) -> CommandResult {
    let position = parse_position(args.first().copied(), usage)?;
    match context.store.delete(kind, position)? {
        Some(entry) => io::print_success(format!("Deleted {}.", entry.display_label())),
        None => io::print_warning(format!("No {} entry at position {}.", kind, position + 1)),
    }
    Ok(())
}

fn print_bills(context: &ShellContext, title: &str, bills: &[BillEntry], empty: &str) {
    output_section(title);
    if bills.is_empty() {
        io::print_info(empty);
        return;
    }
    for bill in bills {
        io::print_line(format!(
            "  {}  {:<20} {}",
            bill.due_date,
            bill.name,
            context.money(bill.amount_due)
        ));
    }
}

/// Parses a 1-based list position into a 0-based index.
fn parse_position(raw: Option<&str>, usage: &str) -> Result<usize, CommandError> {
    let raw = raw.ok_or_else(|| CommandError::usage(usage))?;
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(CommandError::InvalidArguments(format!(
            "position must be a number from 1 upward, got `{}`",
            raw
        ))),
        Ok(position) => Ok(position - 1),
    }
}

fn unknown_subcommand(command: &str, other: &str) -> CommandResult {
    Err(CommandError::InvalidArguments(format!(
        "unknown {} subcommand `{}`",
        command, other
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::{run_lines, test_context};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn add_and_delete_by_listed_position() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = test_context(temp.path().to_path_buf(), today());
        run_lines(
            &mut context,
            &[
                "income add Salary 1000 2024-01-01",
                "income add Bonus 200 2024-01-04",
                "income delete 1",
            ],
        );
        let remaining = context.store.list::<IncomeEntry>();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].description, "Salary");
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = test_context(temp.path().to_path_buf(), today());
        run_lines(&mut context, &["saving add 50", "expense add Coffee 4.5"]);
        assert_eq!(context.store.list::<SavingsEntry>()[0].date, today());
        let expense = &context.store.list::<NonEssentialEntry>()[0];
        assert_eq!(expense.date, today());
        assert_eq!(expense.notes, None);
    }

    #[test]
    fn invalid_amount_never_reaches_store() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = test_context(temp.path().to_path_buf(), today());
        run_lines(
            &mut context,
            &["income add Salary -5", "bill add Rent abc 2024-01-10", "saving add 0"],
        );
        assert!(context.snapshot().is_empty());
    }

    #[test]
    fn toggle_uses_due_date_order() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = test_context(temp.path().to_path_buf(), today());
        run_lines(
            &mut context,
            &[
                "bill add Water 40 2024-01-20",
                "bill add Rent 900 2024-01-01",
                "bill toggle 1",
                "bill toggle 9",
            ],
        );
        let bills = context.store.list::<BillEntry>();
        assert_eq!(bills[0].name, "Rent");
        assert_eq!(bills[0].status, BillStatus::Paid);
        assert_eq!(bills[1].status, BillStatus::Unpaid);
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_position(Some("1"), "x").unwrap(), 0);
        assert!(parse_position(Some("0"), "x").is_err());
        assert!(parse_position(Some("first"), "x").is_err());
        assert!(parse_position(None, "x").is_err());
    }
}
