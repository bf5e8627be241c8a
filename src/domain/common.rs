use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::kind::EntryKind;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// A dated amount that can be bucketed into a daily trend series.
pub trait TrendSource {
    fn trend_date(&self) -> NaiveDate;
    fn trend_amount(&self) -> f64;
}

/// A row type persisted in one of the ledger's flat tables.
///
/// Rows written before identifiers existed deserialize with a nil id; the store
/// assigns a fresh one through [`LedgerRecord::set_id`] on first read.
pub trait LedgerRecord:
    Identifiable + Displayable + Clone + Serialize + DeserializeOwned + Send + 'static
{
    const KIND: EntryKind;

    fn set_id(&mut self, id: Uuid);

    /// Ordering used when the collection is listed. Defaults to insertion order.
    fn display_order(_a: &Self, _b: &Self) -> Ordering {
        Ordering::Equal
    }
}
