use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, LedgerRecord};
use crate::domain::kind::EntryKind;

/// A budgeted essential category with its expected and actual spend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EssentialEntry {
    #[serde(rename = "Id", default = "Uuid::nil")]
    pub id: Uuid,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Expected")]
    pub expected: f64,
    #[serde(rename = "Actual")]
    pub actual: f64,
}

impl EssentialEntry {
    pub fn new(category: impl Into<String>, expected: f64, actual: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            expected,
            actual,
        }
    }

    /// Actual minus expected; positive means the category ran over.
    pub fn difference(&self) -> f64 {
        self.actual - self.expected
    }
}

impl Identifiable for EssentialEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for EssentialEntry {
    fn display_label(&self) -> String {
        format!(
            "{} (expected {:.2}, actual {:.2})",
            self.category, self.expected, self.actual
        )
    }
}

// Essentials keep insertion order when listed.
impl LedgerRecord for EssentialEntry {
    const KIND: EntryKind = EntryKind::Essentials;

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}
