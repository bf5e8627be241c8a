use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Settings;
use crate::core::errors::{BudgetError, Result};
use crate::core::utils::{ensure_dir, write_atomic};
use crate::domain::{EntryKind, LedgerRecord, LedgerSnapshot};
use crate::storage::codec;

use super::budget_service::{AllocationRule, BudgetService, SummaryLine};

pub const REPORT_TITLE: &str = "Budget Tracker Report";
pub const SUMMARY_SHEET: &str = "Summary";

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Target")]
    target: f64,
    #[serde(rename = "Actual")]
    actual: f64,
    #[serde(rename = "Difference")]
    difference: f64,
    #[serde(rename = "Percentage")]
    percentage: f64,
}

impl<'a> SummaryRow<'a> {
    fn from_line(category: &'a str, line: &SummaryLine) -> Self {
        Self {
            category,
            target: line.target,
            actual: line.actual,
            difference: line.difference,
            percentage: line.percentage_of_income,
        }
    }
}

pub struct ReportService;

impl ReportService {
    /// Plain-text summary of totals and targets, formatted with the configured currency.
    pub fn text_report(
        snapshot: &LedgerSnapshot,
        rule: &AllocationRule,
        settings: &Settings,
    ) -> String {
        let summary = BudgetService::summary_with(snapshot, rule);
        let money = |amount: f64| settings.format_currency(amount);
        let pct = |ratio: f64| ratio * 100.0;

        let mut out = String::new();
        let _ = writeln!(out, "{}", REPORT_TITLE);
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out);
        let _ = writeln!(out, "Total Income: {}", money(summary.total_income));
        let _ = writeln!(
            out,
            "Essentials ({:.0}%): {}",
            pct(rule.essentials()),
            money(summary.essentials.actual)
        );
        let _ = writeln!(
            out,
            "Non-Essentials ({:.0}%): {}",
            pct(rule.non_essentials()),
            money(summary.non_essentials.actual)
        );
        let _ = writeln!(
            out,
            "Savings ({:.0}%): {}",
            pct(rule.savings()),
            money(summary.savings.actual)
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Budget Allocation vs Actual:");
        for (label, line) in [
            ("Essentials", &summary.essentials),
            ("Non-Essentials", &summary.non_essentials),
            ("Savings", &summary.savings),
        ] {
            let _ = writeln!(
                out,
                "{} Target: {} | Actual: {}",
                label,
                money(line.target),
                money(line.actual)
            );
        }
        out
    }

    pub fn write_text_report(
        path: &Path,
        snapshot: &LedgerSnapshot,
        rule: &AllocationRule,
        settings: &Settings,
    ) -> Result<()> {
        write_atomic(path, &Self::text_report(snapshot, rule, settings))?;
        tracing::info!(path = %path.display(), "text report written");
        Ok(())
    }

    /// Writes one CSV sheet per collection plus a summary sheet into `dir`.
    ///
    /// Returns the sheet paths in write order.
    pub fn export_workbook(
        snapshot: &LedgerSnapshot,
        rule: &AllocationRule,
        dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        if dir.exists() && !dir.is_dir() {
            return Err(BudgetError::invalid(format!(
                "export target {} is not a directory",
                dir.display()
            )));
        }
        ensure_dir(dir)?;

        let mut written = vec![
            write_sheet(dir, &snapshot.income)?,
            write_sheet(dir, &snapshot.essentials)?,
            write_sheet(dir, &snapshot.bills)?,
            write_sheet(dir, &snapshot.non_essentials)?,
            write_sheet(dir, &snapshot.savings)?,
        ];

        let summary = BudgetService::summary_with(snapshot, rule);
        let income_line = SummaryLine {
            target: summary.total_income,
            actual: summary.total_income,
            difference: 0.0,
            percentage_of_income: if summary.total_income == 0.0 { 0.0 } else { 100.0 },
        };
        let rows = [
            SummaryRow::from_line("Total Income", &income_line),
            SummaryRow::from_line(EntryKind::Essentials.sheet_name(), &summary.essentials),
            SummaryRow::from_line(EntryKind::NonEssentials.sheet_name(), &summary.non_essentials),
            SummaryRow::from_line(EntryKind::Savings.sheet_name(), &summary.savings),
        ];
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &rows {
            writer.serialize(row)?;
        }
        let contents = String::from_utf8(writer.into_inner()?)
            .map_err(|err| BudgetError::SerializationError(err.to_string()))?;
        let summary_path = dir.join(format!("{}.csv", SUMMARY_SHEET));
        write_atomic(&summary_path, &contents)?;
        written.push(summary_path);

        tracing::info!(dir = %dir.display(), sheets = written.len(), "workbook exported");
        Ok(written)
    }
}

fn write_sheet<R: LedgerRecord>(dir: &Path, rows: &[R]) -> Result<PathBuf> {
    let path = dir.join(format!("{}.csv", R::KIND.sheet_name()));
    write_atomic(&path, &codec::encode(rows)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EssentialEntry, IncomeEntry};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn snapshot() -> LedgerSnapshot {
        LedgerSnapshot {
            income: vec![IncomeEntry::new(
                "Salary",
                1000.0,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )],
            essentials: vec![EssentialEntry::new("Housing", 500.0, 600.0)],
            ..LedgerSnapshot::default()
        }
    }

    #[test]
    fn text_report_lists_targets_against_actuals() {
        let report = ReportService::text_report(
            &snapshot(),
            &AllocationRule::default(),
            &Settings::defaults(),
        );
        assert!(report.starts_with("Budget Tracker Report\n=================================================="));
        assert!(report.contains("Essentials (50%): ₱600.00"));
        assert!(report.contains("Essentials Target: ₱500.00 | Actual: ₱600.00"));
        assert!(report.contains("Savings Target: ₱200.00 | Actual: ₱0.00"));
    }

    #[test]
    fn workbook_has_one_sheet_per_kind_plus_summary() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("workbook");
        let sheets =
            ReportService::export_workbook(&snapshot(), &AllocationRule::default(), &dir).unwrap();
        let names: Vec<String> = sheets
            .iter()
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        assert_eq!(
            names,
            vec![
                "Income.csv",
                "Essentials.csv",
                "Bills.csv",
                "Non-Essentials.csv",
                "Savings.csv",
                "Summary.csv"
            ]
        );

        let summary = std::fs::read_to_string(dir.join("Summary.csv")).unwrap();
        let mut lines = summary.lines();
        assert_eq!(lines.next(), Some("Category,Target,Actual,Difference,Percentage"));
        assert_eq!(lines.next(), Some("Total Income,1000.0,1000.0,0.0,100.0"));
        assert_eq!(lines.next(), Some("Essentials,500.0,600.0,100.0,60.0"));
    }

    #[test]
    fn export_rejects_file_target() {
        let temp = TempDir::new().expect("temp dir");
        let file = temp.path().join("taken");
        std::fs::write(&file, "x").unwrap();
        let err = ReportService::export_workbook(&snapshot(), &AllocationRule::default(), &file)
            .unwrap_err();
        assert!(err.is_validation());
    }
}
