use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, LedgerRecord, TrendSource};
use crate::domain::kind::EntryKind;

/// A single income deposit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeEntry {
    #[serde(rename = "Id", default = "Uuid::nil")]
    pub id: Uuid,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

impl IncomeEntry {
    pub fn new(description: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            date,
        }
    }
}

impl Identifiable for IncomeEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for IncomeEntry {
    fn display_label(&self) -> String {
        format!("{} {} ({:.2})", self.date, self.description, self.amount)
    }
}

impl TrendSource for IncomeEntry {
    fn trend_date(&self) -> NaiveDate {
        self.date
    }

    fn trend_amount(&self) -> f64 {
        self.amount
    }
}

impl LedgerRecord for IncomeEntry {
    const KIND: EntryKind = EntryKind::Income;

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date)
    }
}
