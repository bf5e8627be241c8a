use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, LedgerRecord, TrendSource};
use crate::domain::kind::EntryKind;

/// Payment state of a bill.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BillStatus {
    #[default]
    Unpaid,
    Paid,
}

impl BillStatus {
    pub fn toggled(self) -> Self {
        match self {
            BillStatus::Unpaid => BillStatus::Paid,
            BillStatus::Paid => BillStatus::Unpaid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BillStatus::Unpaid => "Unpaid",
            BillStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(BillStatus::Paid),
            "unpaid" => Ok(BillStatus::Unpaid),
            other => Err(format!("invalid bill status `{}` (use Paid or Unpaid)", other)),
        }
    }
}

/// A bill with a due date and payment status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillEntry {
    #[serde(rename = "Id", default = "Uuid::nil")]
    pub id: Uuid,
    #[serde(rename = "Bill Name")]
    pub name: String,
    #[serde(rename = "Amount Due")]
    pub amount_due: f64,
    #[serde(rename = "Due Date")]
    pub due_date: NaiveDate,
    #[serde(rename = "Status")]
    pub status: BillStatus,
}

impl BillEntry {
    pub fn new(name: impl Into<String>, amount_due: f64, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount_due,
            due_date,
            status: BillStatus::Unpaid,
        }
    }

    pub fn with_status(mut self, status: BillStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_unpaid(&self) -> bool {
        self.status == BillStatus::Unpaid
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_unpaid() && self.due_date < today
    }
}

impl Identifiable for BillEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for BillEntry {
    fn display_label(&self) -> String {
        format!(
            "{} due {} ({:.2}, {})",
            self.name, self.due_date, self.amount_due, self.status
        )
    }
}

impl TrendSource for BillEntry {
    fn trend_date(&self) -> NaiveDate {
        self.due_date
    }

    fn trend_amount(&self) -> f64 {
        self.amount_due
    }
}

impl LedgerRecord for BillEntry {
    const KIND: EntryKind = EntryKind::Bills;

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        a.due_date.cmp(&b.due_date)
    }
}
