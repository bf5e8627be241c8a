//! Ledger entities, the snapshot handed to calculations, and shared traits.

pub mod bill;
pub mod common;
pub mod essential;
pub mod income;
pub mod kind;
pub mod non_essential;
pub mod savings;
pub mod snapshot;

pub use bill::{BillEntry, BillStatus};
pub use common::{Displayable, Identifiable, LedgerRecord, TrendSource};
pub use essential::EssentialEntry;
pub use income::IncomeEntry;
pub use kind::{EntryKind, UnknownEntryKind};
pub use non_essential::NonEssentialEntry;
pub use savings::SavingsEntry;
pub use snapshot::{LedgerEntry, LedgerSnapshot};
