//! Command dispatch, error types, and shell context construction.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::config::SettingsManager;
use crate::core::errors::BudgetError;
use crate::core::ledger_store::LedgerStore;
use crate::core::time::{Clock, SystemClock};
pub use crate::core::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use crate::cli::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {}", usage))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    /// Opens the ledger and settings under the default application directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_root(mode, None, Box::new(SystemClock))
    }

    pub fn with_root(
        mode: CliMode,
        root: Option<PathBuf>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let store = LedgerStore::open(root.clone())?;
        let settings_manager = SettingsManager::new(root)?;
        let settings = settings_manager.load();
        if let Err(err) = settings_manager.migrate() {
            tracing::warn!(error = %err, "settings migration skipped");
        }

        Ok(ShellContext {
            mode,
            registry,
            store,
            settings_manager,
            settings,
            clock,
            theme: ColorfulTheme::default(),
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn prompt(&self) -> String {
        "budget> ".to_string()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(BudgetError::InvalidInput(message)) => {
                self.print_error(&message);
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

#[cfg(test)]
pub(crate) fn test_context(root: PathBuf, today: chrono::NaiveDate) -> ShellContext {
    ShellContext::with_root(
        CliMode::Script,
        Some(root),
        Box::new(crate::core::time::FixedClock(today)),
    )
    .expect("shell context")
}

#[cfg(test)]
pub(crate) fn run_lines(context: &mut ShellContext, lines: &[&str]) {
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err).expect("report error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn exit_command_stops_dispatch() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = test_context(
            temp.path().to_path_buf(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
        assert_eq!(context.process_line("   ").unwrap(), LoopControl::Continue);
        assert_eq!(context.process_line("sumary").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn unbalanced_quotes_are_reported_not_fatal() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = test_context(
            temp.path().to_path_buf(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        assert_eq!(
            context.process_line("income add \"Salary 100").unwrap(),
            LoopControl::Continue
        );
        assert!(context.store.list::<crate::domain::IncomeEntry>().is_empty());
    }
}
