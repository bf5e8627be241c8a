//! Dashboard-style breakdowns: per-category essentials, month-to-date totals, calendar
//! events and data integrity checks.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{BillStatus, EntryKind, LedgerSnapshot};

use super::budget_service::Variance;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssentialBreakdown {
    pub category: String,
    pub expected: f64,
    pub actual: f64,
    pub difference: f64,
    pub variance: Variance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub income: f64,
    pub essentials: f64,
    pub non_essentials: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Income,
    BillDue,
    Savings,
    Expense,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventKind::Income => "Income",
            EventKind::BillDue => "Bill due",
            EventKind::Savings => "Savings",
            EventKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub kind: EntryKind,
    pub message: String,
}

impl IntegrityIssue {
    fn new(kind: EntryKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

pub struct InsightService;

impl InsightService {
    pub fn essential_breakdown(snapshot: &LedgerSnapshot) -> Vec<EssentialBreakdown> {
        snapshot
            .essentials
            .iter()
            .map(|entry| EssentialBreakdown {
                category: entry.category.clone(),
                expected: entry.expected,
                actual: entry.actual,
                difference: entry.difference(),
                variance: Variance::between(entry.actual, entry.expected),
            })
            .collect()
    }

    /// Income, non-essentials and savings dated from the first of `today`'s month onward.
    /// Essentials carry no date and count in full.
    pub fn monthly_totals(snapshot: &LedgerSnapshot, today: NaiveDate) -> MonthlyTotals {
        let month_start = today.with_day(1).unwrap_or(today);
        let in_month = |date: NaiveDate| date >= month_start;
        MonthlyTotals {
            income: snapshot
                .income
                .iter()
                .filter(|entry| in_month(entry.date))
                .map(|entry| entry.amount)
                .sum(),
            essentials: snapshot.total_essentials(),
            non_essentials: snapshot
                .non_essentials
                .iter()
                .filter(|entry| in_month(entry.date))
                .map(|entry| entry.amount)
                .sum(),
            savings: snapshot
                .savings
                .iter()
                .filter(|entry| in_month(entry.date))
                .map(|entry| entry.deposit)
                .sum(),
        }
    }

    pub fn events_on(snapshot: &LedgerSnapshot, date: NaiveDate) -> Vec<CalendarEvent> {
        Self::all_events(snapshot)
            .into_iter()
            .filter(|event| event.date == date)
            .collect()
    }

    pub fn event_dates(snapshot: &LedgerSnapshot) -> BTreeSet<NaiveDate> {
        Self::all_events(snapshot)
            .into_iter()
            .map(|event| event.date)
            .collect()
    }

    pub fn integrity_issues(snapshot: &LedgerSnapshot) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        if snapshot.income.iter().any(|entry| entry.amount <= 0.0) {
            issues.push(IntegrityIssue::new(
                EntryKind::Income,
                "Negative or zero income amounts found",
            ));
        }
        if snapshot
            .essentials
            .iter()
            .any(|entry| entry.expected < 0.0 || entry.actual < 0.0)
        {
            issues.push(IntegrityIssue::new(EntryKind::Essentials, "Negative amounts found"));
        }
        if snapshot.bills.iter().any(|bill| bill.amount_due <= 0.0) {
            issues.push(IntegrityIssue::new(
                EntryKind::Bills,
                "Non-positive bill amounts found",
            ));
        }
        if snapshot.non_essentials.iter().any(|entry| entry.amount <= 0.0) {
            issues.push(IntegrityIssue::new(
                EntryKind::NonEssentials,
                "Non-positive expense amounts found",
            ));
        }
        if snapshot.savings.iter().any(|entry| entry.deposit <= 0.0) {
            issues.push(IntegrityIssue::new(
                EntryKind::Savings,
                "Non-positive savings amounts found",
            ));
        }
        issues
    }

    fn all_events(snapshot: &LedgerSnapshot) -> Vec<CalendarEvent> {
        let income = snapshot.income.iter().map(|entry| CalendarEvent {
            date: entry.date,
            kind: EventKind::Income,
            label: entry.description.clone(),
            amount: entry.amount,
        });
        let bills = snapshot.bills.iter().map(|bill| CalendarEvent {
            date: bill.due_date,
            kind: EventKind::BillDue,
            label: match bill.status {
                BillStatus::Paid => format!("{} (Paid)", bill.name),
                BillStatus::Unpaid => bill.name.clone(),
            },
            amount: bill.amount_due,
        });
        let savings = snapshot.savings.iter().map(|entry| CalendarEvent {
            date: entry.date,
            kind: EventKind::Savings,
            label: "Deposit".to_string(),
            amount: entry.deposit,
        });
        let expenses = snapshot.non_essentials.iter().map(|entry| CalendarEvent {
            date: entry.date,
            kind: EventKind::Expense,
            label: entry.expense.clone(),
            amount: entry.amount,
        });
        income.chain(bills).chain(savings).chain(expenses).collect()
    }
}
