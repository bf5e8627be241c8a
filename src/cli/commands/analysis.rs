use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::{
    BillService, BudgetService, HealthService, InsightService, SummaryLine, TrendPoint,
    TrendService, VarianceSeverity,
};
use crate::core::validation::parse_date;
use crate::domain::{EntryKind, LedgerSnapshot};

const TREND_USAGE: &str = "trend <income|expense|saving|bill> [days]";
const DEFAULT_TREND_DAYS: u32 = 30;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show 50/30/20 targets against actual spending",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new("health", "Show the financial health score", "health", cmd_health),
        CommandEntry::new(
            "recommend",
            "List budgeting recommendations",
            "recommend",
            cmd_recommend,
        ),
        CommandEntry::new("trend", "Show daily and cumulative totals", TREND_USAGE, cmd_trend),
        CommandEntry::new(
            "calendar",
            "Show income, bills, savings and expenses on a date",
            "calendar [date]",
            cmd_calendar,
        ),
        CommandEntry::new("check", "Check stored data for problems", "check", cmd_check),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.snapshot();
    let rule = context.allocation_rule();
    let summary = BudgetService::summary_with(&snapshot, &rule);
    let threshold = context.settings.overspending_threshold();

    output_section("Budget summary");
    io::print_line(format!("  Total income: {}", context.money(summary.total_income)));
    for (label, line) in [
        ("Essentials", &summary.essentials),
        ("Non-Essentials", &summary.non_essentials),
        ("Savings", &summary.savings),
    ] {
        print_summary_line(context, label, line);
        let variance = line.variance();
        if context.settings.budget_alerts() && label != "Savings" && variance.percent > threshold {
            io::print_warning(format!("{} spending is {}", label, variance));
        }
    }

    let indicators = BudgetService::key_indicators(&snapshot);
    let monthly = InsightService::monthly_totals(&snapshot, context.today());
    output_section("Key indicators");
    io::print_line(format!("  Savings rate : {:.1}%", indicators.savings_rate));
    io::print_line(format!("  Expense ratio: {:.1}%", indicators.expense_ratio));
    io::print_line(format!("  Unallocated  : {}", context.money(indicators.unallocated)));
    io::print_line(format!(
        "  This month   : income {}, spent {}, saved {}",
        context.money(monthly.income),
        context.money(monthly.essentials + monthly.non_essentials),
        context.money(monthly.savings)
    ));

    let breakdown = InsightService::essential_breakdown(&snapshot);
    if !breakdown.is_empty() {
        output_section("Essentials by category");
        for row in breakdown {
            io::print_line(format!(
                "  {:<16} expected {} actual {} ({})",
                row.category,
                context.money(row.expected),
                context.money(row.actual),
                row.variance
            ));
        }
    }

    let bills = BillService::bill_status_breakdown(&snapshot);
    output_section("Bills");
    io::print_line(format!(
        "  Paid  : {} ({})",
        bills.paid.count,
        context.money(bills.paid.total)
    ));
    io::print_line(format!(
        "  Unpaid: {} ({})",
        bills.unpaid.count,
        context.money(bills.unpaid.total)
    ));
    Ok(())
}

fn print_summary_line(context: &ShellContext, label: &str, line: &SummaryLine) {
    let variance = line.variance();
    let marker = match variance.severity() {
        VarianceSeverity::OnTrack => "",
        VarianceSeverity::Warning => " [warning]",
        VarianceSeverity::Critical => " [critical]",
    };
    io::print_line(format!(
        "  {:<15} target {} | actual {} | diff {} | {:.1}% of income | {}{}",
        label,
        context.money(line.target),
        context.money(line.actual),
        context.money(line.difference),
        line.percentage_of_income,
        variance,
        marker
    ));
}

fn cmd_health(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rule = context.allocation_rule();
    let score = HealthService::health_score_with(&context.snapshot(), &rule);
    output_section("Financial health");
    io::print_line(format!("  Score: {:.0}/100 ({})", score.total, score.band));
    io::print_line(format!("  {}", score.band.message()));
    io::print_line(format!("  Savings rate     {:>5.1}/25", score.savings_rate));
    io::print_line(format!("  Budget adherence {:>5.1}/25", score.budget_adherence));
    io::print_line(format!("  Emergency fund   {:>5.1}/25", score.emergency_fund));
    io::print_line(format!("  Expense control  {:>5.1}/25", score.expense_control));
    Ok(())
}

fn cmd_recommend(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rule = context.allocation_rule();
    output_section("Recommendations");
    for advice in HealthService::recommendations_with(&context.snapshot(), &rule) {
        io::print_line(format!("  - {}", advice));
    }
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = args
        .first()
        .ok_or_else(|| CommandError::usage(TREND_USAGE))?
        .parse::<EntryKind>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let days = match args.get(1) {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments("days must be a whole number".into())
        })?,
        None => DEFAULT_TREND_DAYS,
    };
    let points = trend_for(&context.snapshot(), kind, days, context)?;

    output_section(format!("{} trend, last {} days", kind, days));
    for point in points.iter().filter(|point| point.daily != 0.0) {
        io::print_line(format!(
            "  {}  {:>14}  total {}",
            point.date,
            context.money(point.daily),
            context.money(point.cumulative)
        ));
    }
    let total = points.last().map(|point| point.cumulative).unwrap_or(0.0);
    io::print_info(format!("Window total: {}", context.money(total)));
    Ok(())
}

fn trend_for(
    snapshot: &LedgerSnapshot,
    kind: EntryKind,
    days: u32,
    context: &ShellContext,
) -> Result<Vec<TrendPoint>, CommandError> {
    let today = context.today();
    Ok(match kind {
        EntryKind::Income => TrendService::trend(&snapshot.income, days, today)?,
        EntryKind::NonEssentials => TrendService::trend(&snapshot.non_essentials, days, today)?,
        EntryKind::Savings => TrendService::trend(&snapshot.savings, days, today)?,
        EntryKind::Bills => TrendService::trend(&snapshot.bills, days, today)?,
        EntryKind::Essentials => {
            return Err(CommandError::InvalidArguments(
                "essentials carry no dates and have no trend".into(),
            ))
        }
    })
}

fn cmd_calendar(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let date = match args.first() {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };
    let snapshot = context.snapshot();
    let events = InsightService::events_on(&snapshot, date);

    output_section(format!("Events on {}", date));
    if events.is_empty() {
        io::print_info("Nothing scheduled.");
    }
    for event in events {
        io::print_line(format!(
            "  {:<9} {:<20} {}",
            event.kind.to_string(),
            event.label,
            context.money(event.amount)
        ));
    }

    let upcoming: Vec<String> = InsightService::event_dates(&snapshot)
        .into_iter()
        .filter(|day| *day > date)
        .take(5)
        .map(|day| day.to_string())
        .collect();
    if !upcoming.is_empty() {
        io::print_info(format!("Next dates with events: {}", upcoming.join(", ")));
    }
    Ok(())
}

fn cmd_check(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let issues = InsightService::integrity_issues(&context.snapshot());
    let settings_issues = context.settings.validate();
    output_section("Data check");
    if issues.is_empty() && settings_issues.is_empty() {
        io::print_success("No problems found.");
        return Ok(());
    }
    for issue in issues {
        io::print_warning(format!("{}: {}", issue.kind, issue.message));
    }
    for (key, messages) in settings_issues {
        for message in messages {
            io::print_warning(format!("setting `{}`: {}", key, message));
        }
    }
    Ok(())
}
