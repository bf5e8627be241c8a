use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, LedgerRecord, TrendSource};
use crate::domain::kind::EntryKind;

/// A deposit into savings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsEntry {
    #[serde(rename = "Id", default = "Uuid::nil")]
    pub id: Uuid,
    #[serde(rename = "Deposit")]
    pub deposit: f64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

impl SavingsEntry {
    pub fn new(deposit: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            deposit,
            date,
        }
    }
}

impl Identifiable for SavingsEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for SavingsEntry {
    fn display_label(&self) -> String {
        format!("{} deposit ({:.2})", self.date, self.deposit)
    }
}

impl TrendSource for SavingsEntry {
    fn trend_date(&self) -> NaiveDate {
        self.date
    }

    fn trend_amount(&self) -> f64 {
        self.deposit
    }
}

impl LedgerRecord for SavingsEntry {
    const KIND: EntryKind = EntryKind::Savings;

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date)
    }
}
