use std::{
    collections::HashMap,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::Completer, error::ReadlineError, history::DefaultHistory, Cmd,
    Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, KeyEvent, Validator,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;

const SCRIPT_ENV: &str = "BUDGET_TRACKER_CLI_SCRIPT";

/// Runs the shell: commands from stdin when `BUDGET_TRACKER_CLI_SCRIPT` is set, otherwise an
/// interactive line editor with completion.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<ShellCompleter, DefaultHistory>::new()?;
    editor.set_helper(Some(ShellCompleter::from_registry(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output_info("Budget Tracker shell. Type `help` to list commands.");

    drive(context, |context| match editor.readline(&context.prompt()) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.trim()).ok();
            }
            Ok(Some(line))
        }
        // Ctrl-C only leaves the shell once confirmed.
        Err(ReadlineError::Interrupted) => Ok((!context.confirm_exit()?).then(String::new)),
        Err(ReadlineError::Eof) => {
            output_info("Exiting shell.");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    })
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let mut lines = io::stdin().lock().lines();
    drive(context, |_| lines.next().transpose().map_err(CliError::from))
}

/// Feeds lines to the context until the source runs dry or a command asks to exit.
fn drive<F>(context: &mut ShellContext, mut next_line: F) -> Result<(), CliError>
where
    F: FnMut(&ShellContext) -> Result<Option<String>, CliError>,
{
    while context.running {
        let Some(line) = next_line(context)? else {
            break;
        };
        match context.process_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => context.running = false,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Completes command names, then the first argument each command's usage line offers
/// (`bill up` → `upcoming`, `trend s` → `saving`). `help` completes command names.
#[derive(Helper, Hinter, Highlighter, Validator)]
struct ShellCompleter {
    commands: Vec<&'static str>,
    arguments: HashMap<&'static str, Vec<&'static str>>,
}

impl ShellCompleter {
    fn from_registry(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<&'static str> = registry.names().collect();
        commands.sort_unstable();
        let mut arguments: HashMap<_, _> = registry
            .list()
            .iter()
            .map(|entry| (entry.name, entry.first_arguments()))
            .filter(|(_, words)| !words.is_empty())
            .collect();
        arguments.insert("help", commands.clone());
        Self {
            commands,
            arguments,
        }
    }

    /// Byte offset of the word being typed and the words that can replace it.
    fn candidates(&self, prefix: &str) -> (usize, Vec<&'static str>) {
        let start = prefix
            .trim_end_matches(|ch: char| !ch.is_whitespace())
            .len();
        let needle = prefix[start..].to_ascii_lowercase();
        let typed: Vec<&str> = prefix[..start].split_whitespace().collect();
        let pool: &[&'static str] = match typed.as_slice() {
            [] => &self.commands,
            [command] => self
                .arguments
                .get(command.to_ascii_lowercase().as_str())
                .map_or(&[][..], Vec::as_slice),
            _ => &[],
        };
        let words = pool
            .iter()
            .copied()
            .filter(|word| word.starts_with(&needle))
            .collect();
        (start, words)
    }
}

impl Completer for ShellCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let (start, words) = self.candidates(&line[..pos]);
        Ok((start, words.into_iter().map(str::to_string).collect()))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
