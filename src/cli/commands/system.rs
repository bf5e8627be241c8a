use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "reset",
            "Erase every ledger entry and restore default settings",
            "reset [--yes]",
            cmd_reset,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let forced = args.iter().any(|arg| *arg == "--yes" || *arg == "-y");
    if !forced {
        if context.mode == CliMode::Script {
            io::print_warning("Reset needs `--yes` when running from a script.");
            return Ok(());
        }
        let prompt = "Delete all income, expenses, bills and savings?";
        if !io::confirm_action(&context.theme, prompt, false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    context.store.reset()?;
    context.settings = context.settings_manager.reset()?;
    io::print_success("All data has been reset.");
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section(format!("Budget Tracker {}", build_info::CLI_VERSION));
    for (label, value) in build_info::details() {
        io::print_info(format!("  {:<11}: {}", label, value));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
