use std::path::Path;

use crate::cli::commands::subcommand;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::{model::value_to_cell, Settings};
use crate::domain::EntryKind;

const SETTINGS_USAGE: &str = "settings <show | get <key> | set <key> <value> | reset | category <kind> <name> | export <path> | import <path>>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "settings",
        "View and change preferences",
        SETTINGS_USAGE,
        cmd_settings,
    )]
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return show_settings(context);
    }
    match subcommand(args, SETTINGS_USAGE)?.as_str() {
        "show" => show_settings(context),
        "get" => {
            let key = args.get(1).ok_or_else(|| CommandError::usage("settings get <key>"))?;
            match context.settings.get(key) {
                Some(value) => io::print_line(format!("{} = {}", key, value_to_cell(value))),
                None => io::print_warning(format!("No setting named `{}`.", key)),
            }
            Ok(())
        }
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::usage("settings set <key> <value>"));
            }
            set_value(context, args[1], &args[2..].join(" "))
        }
        "reset" => {
            context.settings = context.settings_manager.reset()?;
            io::print_success("Settings restored to defaults.");
            Ok(())
        }
        "category" => {
            let usage = "settings category <income|essential|expense> <name>";
            if args.len() < 3 {
                return Err(CommandError::usage(usage));
            }
            let kind = args[1]
                .parse::<EntryKind>()
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
            let name = args[2..].join(" ");
            if context.settings_manager.add_custom_category(kind, &name)? {
                io::print_success(format!("Added `{}` to {} categories.", name.trim(), kind));
            } else {
                io::print_info(format!("`{}` is already a {} category.", name.trim(), kind));
            }
            context.settings = context.settings_manager.load();
            Ok(())
        }
        "export" => {
            let path = args.get(1).ok_or_else(|| CommandError::usage("settings export <path>"))?;
            context.settings_manager.export_to(Path::new(path))?;
            io::print_success(format!("Settings exported to {}.", path));
            Ok(())
        }
        "import" => {
            let path = args.get(1).ok_or_else(|| CommandError::usage("settings import <path>"))?;
            context.settings = context.settings_manager.import_from(Path::new(path))?;
            io::print_success(format!("Settings imported from {}.", path));
            report_problems(&context.settings);
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown settings subcommand `{}`",
            other
        ))),
    }
}

fn show_settings(context: &ShellContext) -> CommandResult {
    output_section("Settings");
    for (key, value) in context.settings.values() {
        io::print_line(format!("  {:<30} {}", key, value_to_cell(value)));
    }
    io::print_info(format!("Stored in {}", context.settings_manager.path().display()));
    Ok(())
}

fn set_value(context: &mut ShellContext, key: &str, raw: &str) -> CommandResult {
    if Settings::default_value(key).is_none() && context.settings.get(key).is_none() {
        return Err(CommandError::InvalidArguments(format!(
            "unknown setting `{}`",
            key
        )));
    }

    let mut candidate = context.settings.clone();
    candidate.set_from_str(key, raw);
    if let Some(messages) = candidate.validate().get(key) {
        return Err(CommandError::InvalidArguments(format!(
            "{}: {}",
            key,
            messages.join("; ")
        )));
    }

    context.settings_manager.save(&candidate)?;
    let shown = candidate.get(key).map(value_to_cell).unwrap_or_default();
    context.settings = candidate;
    io::print_success(format!("{} set to {}.", key, shown));
    report_problems(&context.settings);
    Ok(())
}

fn report_problems(settings: &Settings) {
    for (key, messages) in settings.validate() {
        for message in messages {
            io::print_warning(format!("setting `{}`: {}", key, message));
        }
    }
}
