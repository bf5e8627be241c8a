use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, LedgerRecord, TrendSource};
use crate::domain::kind::EntryKind;

/// A discretionary expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NonEssentialEntry {
    #[serde(rename = "Id", default = "Uuid::nil")]
    pub id: Uuid,
    #[serde(rename = "Expense")]
    pub expense: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
}

impl NonEssentialEntry {
    pub fn new(expense: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            expense: expense.into(),
            amount,
            date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }
}

impl Identifiable for NonEssentialEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for NonEssentialEntry {
    fn display_label(&self) -> String {
        match &self.notes {
            Some(notes) => format!(
                "{} {} ({:.2}) - {}",
                self.date, self.expense, self.amount, notes
            ),
            None => format!("{} {} ({:.2})", self.date, self.expense, self.amount),
        }
    }
}

impl TrendSource for NonEssentialEntry {
    fn trend_date(&self) -> NaiveDate {
        self.date
    }

    fn trend_amount(&self) -> f64 {
        self.amount
    }
}

impl LedgerRecord for NonEssentialEntry {
    const KIND: EntryKind = EntryKind::NonEssentials;

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date)
    }
}
