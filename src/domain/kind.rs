use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The five flat collections that make up a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Essentials,
    Bills,
    NonEssentials,
    Savings,
}

impl EntryKind {
    pub const ALL: [EntryKind; 5] = [
        EntryKind::Income,
        EntryKind::Essentials,
        EntryKind::Bills,
        EntryKind::NonEssentials,
        EntryKind::Savings,
    ];

    /// Table name used by the storage backend (file stem for CSV storage).
    pub fn table(self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Essentials => "essentials",
            EntryKind::Bills => "bills",
            EntryKind::NonEssentials => "non_essentials",
            EntryKind::Savings => "savings",
        }
    }

    /// Fixed column headers, in file order.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            EntryKind::Income => &["Id", "Description", "Amount", "Date"],
            EntryKind::Essentials => &["Id", "Category", "Expected", "Actual"],
            EntryKind::Bills => &["Id", "Bill Name", "Amount Due", "Due Date", "Status"],
            EntryKind::NonEssentials => &["Id", "Expense", "Amount", "Date", "Notes"],
            EntryKind::Savings => &["Id", "Deposit", "Date"],
        }
    }

    /// Sheet title used for exports.
    pub fn sheet_name(self) -> &'static str {
        match self {
            EntryKind::Income => "Income",
            EntryKind::Essentials => "Essentials",
            EntryKind::Bills => "Bills",
            EntryKind::NonEssentials => "Non-Essentials",
            EntryKind::Savings => "Savings",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry kind `{0}`")]
pub struct UnknownEntryKind(pub String);

impl FromStr for EntryKind {
    type Err = UnknownEntryKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "income" => Ok(EntryKind::Income),
            "essential" | "essentials" => Ok(EntryKind::Essentials),
            "bill" | "bills" => Ok(EntryKind::Bills),
            "expense" | "expenses" | "non_essential" | "non_essentials" => {
                Ok(EntryKind::NonEssentials)
            }
            "saving" | "savings" => Ok(EntryKind::Savings),
            other => Err(UnknownEntryKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_singular_and_plural_aliases() {
        assert_eq!("expense".parse::<EntryKind>(), Ok(EntryKind::NonEssentials));
        assert_eq!("Non-Essentials".parse::<EntryKind>(), Ok(EntryKind::NonEssentials));
        assert_eq!("bill".parse::<EntryKind>(), Ok(EntryKind::Bills));
        assert!("wallet".parse::<EntryKind>().is_err());
    }

    #[test]
    fn every_table_leads_with_id_column() {
        for kind in EntryKind::ALL {
            assert_eq!(kind.headers()[0], "Id");
        }
    }
}
