use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::bill::{BillEntry, BillStatus};
use crate::domain::common::{Displayable, Identifiable};
use crate::domain::essential::EssentialEntry;
use crate::domain::income::IncomeEntry;
use crate::domain::kind::EntryKind;
use crate::domain::non_essential::NonEssentialEntry;
use crate::domain::savings::SavingsEntry;

/// Every collection of the ledger, read at one point in time and in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub income: Vec<IncomeEntry>,
    pub essentials: Vec<EssentialEntry>,
    pub bills: Vec<BillEntry>,
    pub non_essentials: Vec<NonEssentialEntry>,
    pub savings: Vec<SavingsEntry>,
}

impl LedgerSnapshot {
    pub fn total_income(&self) -> f64 {
        self.income.iter().map(|entry| entry.amount).sum()
    }

    pub fn total_essentials(&self) -> f64 {
        self.essentials.iter().map(|entry| entry.actual).sum()
    }

    pub fn total_non_essentials(&self) -> f64 {
        self.non_essentials.iter().map(|entry| entry.amount).sum()
    }

    pub fn total_savings(&self) -> f64 {
        self.savings.iter().map(|entry| entry.deposit).sum()
    }

    /// Essentials plus non-essentials actual spend.
    pub fn total_expenses(&self) -> f64 {
        self.total_essentials() + self.total_non_essentials()
    }

    pub fn has_unpaid_bills(&self) -> bool {
        self.bills
            .iter()
            .any(|bill| bill.status == BillStatus::Unpaid)
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
            && self.essentials.is_empty()
            && self.bills.is_empty()
            && self.non_essentials.is_empty()
            && self.savings.is_empty()
    }
}

/// A row from any of the five collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry", rename_all = "snake_case")]
pub enum LedgerEntry {
    Income(IncomeEntry),
    Essential(EssentialEntry),
    Bill(BillEntry),
    NonEssential(NonEssentialEntry),
    Savings(SavingsEntry),
}

impl LedgerEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            LedgerEntry::Income(_) => EntryKind::Income,
            LedgerEntry::Essential(_) => EntryKind::Essentials,
            LedgerEntry::Bill(_) => EntryKind::Bills,
            LedgerEntry::NonEssential(_) => EntryKind::NonEssentials,
            LedgerEntry::Savings(_) => EntryKind::Savings,
        }
    }
}

impl Identifiable for LedgerEntry {
    fn id(&self) -> Uuid {
        match self {
            LedgerEntry::Income(entry) => entry.id(),
            LedgerEntry::Essential(entry) => entry.id(),
            LedgerEntry::Bill(entry) => entry.id(),
            LedgerEntry::NonEssential(entry) => entry.id(),
            LedgerEntry::Savings(entry) => entry.id(),
        }
    }
}

impl Displayable for LedgerEntry {
    fn display_label(&self) -> String {
        match self {
            LedgerEntry::Income(entry) => entry.display_label(),
            LedgerEntry::Essential(entry) => entry.display_label(),
            LedgerEntry::Bill(entry) => entry.display_label(),
            LedgerEntry::NonEssential(entry) => entry.display_label(),
            LedgerEntry::Savings(entry) => entry.display_label(),
        }
    }
}

impl From<IncomeEntry> for LedgerEntry {
    fn from(entry: IncomeEntry) -> Self {
        LedgerEntry::Income(entry)
    }
}

impl From<EssentialEntry> for LedgerEntry {
    fn from(entry: EssentialEntry) -> Self {
        LedgerEntry::Essential(entry)
    }
}

impl From<BillEntry> for LedgerEntry {
    fn from(entry: BillEntry) -> Self {
        LedgerEntry::Bill(entry)
    }
}

impl From<NonEssentialEntry> for LedgerEntry {
    fn from(entry: NonEssentialEntry) -> Self {
        LedgerEntry::NonEssential(entry)
    }
}

impl From<SavingsEntry> for LedgerEntry {
    fn from(entry: SavingsEntry) -> Self {
        LedgerEntry::Savings(entry)
    }
}
