use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::services::ReportService;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "report",
            "Print the text report, or write it to a file",
            "report [path]",
            cmd_report,
        ),
        CommandEntry::new(
            "export",
            "Export every collection and a summary sheet as CSV files",
            "export <directory>",
            cmd_export,
        ),
    ]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let snapshot = context.snapshot();
    let rule = context.allocation_rule();
    match args.first() {
        Some(path) => {
            let path = PathBuf::from(path);
            ReportService::write_text_report(&path, &snapshot, &rule, &context.settings)?;
            io::print_success(format!("Report written to {}.", path.display()));
        }
        None => {
            let report = ReportService::text_report(&snapshot, &rule, &context.settings);
            for line in report.lines() {
                io::print_line(line);
            }
        }
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = args
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| CommandError::usage("export <directory>"))?;
    let sheets = ReportService::export_workbook(&context.snapshot(), &context.allocation_rule(), &dir)?;
    io::print_success(format!(
        "Exported {} sheets to {}.",
        sheets.len(),
        dir.display()
    ));
    Ok(())
}
