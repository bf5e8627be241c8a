use std::path::PathBuf;

use uuid::Uuid;

use crate::core::errors::{BudgetError, Result};
use crate::domain::{
    BillEntry, BillStatus, EntryKind, EssentialEntry, Identifiable, IncomeEntry, LedgerEntry,
    LedgerRecord, LedgerSnapshot, NonEssentialEntry, SavingsEntry,
};
use crate::storage::{codec, CsvStorage, StorageBackend};

/// Facade over the five ledger tables.
///
/// Every read reloads the backing table and every write rewrites it in full; nothing is
/// cached between calls. Rows keep insertion order on disk and are only sorted when listed.
pub struct LedgerStore {
    storage: Box<dyn StorageBackend>,
}

impl LedgerStore {
    /// Wraps a backend and writes header-only tables for any collection that is missing.
    pub fn new(storage: Box<dyn StorageBackend>) -> Result<Self> {
        let store = Self { storage };
        store.initialize_tables()?;
        Ok(store)
    }

    /// Opens CSV storage under `root`, or the default application directory.
    pub fn open(root: Option<PathBuf>) -> Result<Self> {
        Self::new(Box::new(CsvStorage::new(root)?))
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Lists a collection in display order (see [`LedgerRecord::display_order`]).
    pub fn list<R: LedgerRecord>(&self) -> Vec<R> {
        let mut rows = self.load_rows::<R>();
        rows.sort_by(R::display_order);
        rows
    }

    /// Lists any collection as [`LedgerEntry`] values, in display order.
    pub fn list_kind(&self, kind: EntryKind) -> Vec<LedgerEntry> {
        match kind {
            EntryKind::Income => wrap(self.list::<IncomeEntry>()),
            EntryKind::Essentials => wrap(self.list::<EssentialEntry>()),
            EntryKind::Bills => wrap(self.list::<BillEntry>()),
            EntryKind::NonEssentials => wrap(self.list::<NonEssentialEntry>()),
            EntryKind::Savings => wrap(self.list::<SavingsEntry>()),
        }
    }

    /// Reads every collection at once.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            income: self.list(),
            essentials: self.list(),
            bills: self.list(),
            non_essentials: self.list(),
            savings: self.list(),
        }
    }

    /// Appends an entry and returns its identifier. A nil id is replaced with a fresh one.
    pub fn add<R: LedgerRecord>(&self, mut entry: R) -> Result<Uuid> {
        if entry.id().is_nil() {
            entry.set_id(Uuid::new_v4());
        }
        let id = entry.id();
        let mut rows = self.load_rows::<R>();
        rows.push(entry);
        self.write_rows(&rows)?;
        tracing::debug!(kind = %R::KIND, %id, "entry added");
        Ok(id)
    }

    pub fn add_entry(&self, entry: LedgerEntry) -> Result<Uuid> {
        match entry {
            LedgerEntry::Income(entry) => self.add(entry),
            LedgerEntry::Essential(entry) => self.add(entry),
            LedgerEntry::Bill(entry) => self.add(entry),
            LedgerEntry::NonEssential(entry) => self.add(entry),
            LedgerEntry::Savings(entry) => self.add(entry),
        }
    }

    pub fn get<R: LedgerRecord>(&self, id: Uuid) -> Option<R> {
        self.load_rows::<R>().into_iter().find(|row| row.id() == id)
    }

    /// Identifier of the row currently shown at `position`.
    pub fn id_at<R: LedgerRecord>(&self, position: usize) -> Option<Uuid> {
        self.list::<R>().get(position).map(Identifiable::id)
    }

    /// Removes the row at `position` in display order.
    ///
    /// An out-of-range position is a no-op: nothing is written and `Ok(None)` is returned.
    pub fn delete_at<R: LedgerRecord>(&self, position: usize) -> Result<Option<R>> {
        match self.id_at::<R>(position) {
            Some(id) => self.remove::<R>(id).map(Some),
            None => {
                tracing::warn!(kind = %R::KIND, position, "delete ignored: position out of range");
                Ok(None)
            }
        }
    }

    /// Position-based delete for any collection.
    pub fn delete(&self, kind: EntryKind, position: usize) -> Result<Option<LedgerEntry>> {
        Ok(match kind {
            EntryKind::Income => self.delete_at::<IncomeEntry>(position)?.map(Into::into),
            EntryKind::Essentials => self.delete_at::<EssentialEntry>(position)?.map(Into::into),
            EntryKind::Bills => self.delete_at::<BillEntry>(position)?.map(Into::into),
            EntryKind::NonEssentials => {
                self.delete_at::<NonEssentialEntry>(position)?.map(Into::into)
            }
            EntryKind::Savings => self.delete_at::<SavingsEntry>(position)?.map(Into::into),
        })
    }

    /// Removes the row with the given identifier.
    pub fn remove<R: LedgerRecord>(&self, id: Uuid) -> Result<R> {
        let mut rows = self.load_rows::<R>();
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| not_found(R::KIND, id))?;
        let removed = rows.remove(index);
        self.write_rows(&rows)?;
        tracing::debug!(kind = %R::KIND, %id, "entry removed");
        Ok(removed)
    }

    /// Toggles Paid/Unpaid on the bill at `position` in display order (ascending due date).
    ///
    /// Out-of-range positions are a no-op returning `Ok(None)`.
    pub fn set_status(&self, position: usize) -> Result<Option<BillEntry>> {
        match self.id_at::<BillEntry>(position) {
            Some(id) => self.toggle_bill_status(id).map(Some),
            None => {
                tracing::warn!(position, "status toggle ignored: position out of range");
                Ok(None)
            }
        }
    }

    pub fn toggle_bill_status(&self, id: Uuid) -> Result<BillEntry> {
        self.update_bill(id, |bill| bill.status = bill.status.toggled())
    }

    pub fn set_bill_status(&self, id: Uuid, status: BillStatus) -> Result<BillEntry> {
        self.update_bill(id, |bill| bill.status = status)
    }

    /// Empties every collection, keeping the header rows.
    pub fn reset(&self) -> Result<()> {
        self.write_rows::<IncomeEntry>(&[])?;
        self.write_rows::<EssentialEntry>(&[])?;
        self.write_rows::<BillEntry>(&[])?;
        self.write_rows::<NonEssentialEntry>(&[])?;
        self.write_rows::<SavingsEntry>(&[])?;
        tracing::info!("all ledger collections reset");
        Ok(())
    }

    fn update_bill<F>(&self, id: Uuid, mutator: F) -> Result<BillEntry>
    where
        F: FnOnce(&mut BillEntry),
    {
        let mut rows = self.load_rows::<BillEntry>();
        let bill = rows
            .iter_mut()
            .find(|bill| bill.id == id)
            .ok_or_else(|| not_found(EntryKind::Bills, id))?;
        mutator(bill);
        let updated = bill.clone();
        self.write_rows(&rows)?;
        Ok(updated)
    }

    fn initialize_tables(&self) -> Result<()> {
        self.ensure_table::<IncomeEntry>()?;
        self.ensure_table::<EssentialEntry>()?;
        self.ensure_table::<BillEntry>()?;
        self.ensure_table::<NonEssentialEntry>()?;
        self.ensure_table::<SavingsEntry>()?;
        Ok(())
    }

    fn ensure_table<R: LedgerRecord>(&self) -> Result<()> {
        let table = R::KIND.table();
        if !self.storage.table_exists(table)? {
            self.storage
                .write_table(table, &codec::empty_table::<R>()?)?;
        }
        Ok(())
    }

    /// Loads a table in file order. Read or parse failures yield an empty collection.
    fn load_rows<R: LedgerRecord>(&self) -> Vec<R> {
        let table = R::KIND.table();
        let contents = match self.storage.read_table(table) {
            Ok(Some(contents)) => contents,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::error!(table, error = %err, "failed to read table, using empty collection");
                return Vec::new();
            }
        };
        let mut rows = match codec::decode::<R>(&contents) {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!(table, error = %err, "failed to parse table, using empty collection");
                return Vec::new();
            }
        };

        let mut assigned = 0usize;
        for row in rows.iter_mut().filter(|row| row.id().is_nil()) {
            row.set_id(Uuid::new_v4());
            assigned += 1;
        }
        if assigned > 0 {
            match self.write_rows(&rows) {
                Ok(()) => tracing::info!(table, assigned, "assigned identifiers to legacy rows"),
                Err(err) => {
                    tracing::warn!(table, error = %err, "could not persist identifiers for legacy rows")
                }
            }
        }
        rows
    }

    fn write_rows<R: LedgerRecord>(&self, rows: &[R]) -> Result<()> {
        let contents = codec::encode(rows)?;
        self.storage.write_table(R::KIND.table(), &contents)
    }
}

fn wrap<R: Into<LedgerEntry>>(rows: Vec<R>) -> Vec<LedgerEntry> {
    rows.into_iter().map(Into::into).collect()
}

fn not_found(kind: EntryKind, id: Uuid) -> BudgetError {
    BudgetError::EntryNotFound(format!("{} entry {}", kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn memory_store() -> LedgerStore {
        LedgerStore::new(Box::new(MemoryStorage::new())).expect("memory store")
    }

    #[test]
    fn new_store_writes_header_only_tables() {
        let store = memory_store();
        for kind in EntryKind::ALL {
            let table = store.storage().read_table(kind.table()).unwrap().unwrap();
            assert_eq!(table.lines().count(), 1, "{kind} should only hold headers");
        }
    }

    #[test]
    fn income_lists_newest_first() {
        let store = memory_store();
        store.add(IncomeEntry::new("Early", 100.0, date(1))).unwrap();
        store.add(IncomeEntry::new("Late", 200.0, date(20))).unwrap();
        store.add(IncomeEntry::new("Middle", 150.0, date(10))).unwrap();

        let names: Vec<_> = store
            .list::<IncomeEntry>()
            .into_iter()
            .map(|entry| entry.description)
            .collect();
        assert_eq!(names, vec!["Late", "Middle", "Early"]);
    }

    #[test]
    fn bills_list_by_ascending_due_date() {
        let store = memory_store();
        store.add(BillEntry::new("Water", 40.0, date(15))).unwrap();
        store.add(BillEntry::new("Rent", 900.0, date(1))).unwrap();
        let bills = store.list::<BillEntry>();
        assert_eq!(bills[0].name, "Rent");
        assert_eq!(bills[1].name, "Water");
    }

    #[test]
    fn essentials_keep_insertion_order() {
        let store = memory_store();
        store.add(EssentialEntry::new("Utilities", 100.0, 90.0)).unwrap();
        store.add(EssentialEntry::new("Housing", 800.0, 800.0)).unwrap();
        let categories: Vec<_> = store
            .list::<EssentialEntry>()
            .into_iter()
            .map(|entry| entry.category)
            .collect();
        assert_eq!(categories, vec!["Utilities", "Housing"]);
    }

    #[test]
    fn delete_uses_display_position() {
        let store = memory_store();
        store.add(IncomeEntry::new("Older", 100.0, date(1))).unwrap();
        store.add(IncomeEntry::new("Newer", 200.0, date(5))).unwrap();

        let removed = store.delete(EntryKind::Income, 0).unwrap();
        match removed {
            Some(LedgerEntry::Income(entry)) => assert_eq!(entry.description, "Newer"),
            other => panic!("unexpected delete result: {other:?}"),
        }
        let remaining = store.list::<IncomeEntry>();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].description, "Older");
    }

    #[test]
    fn out_of_range_delete_is_a_no_op() {
        let storage = MemoryStorage::new();
        let store = LedgerStore::new(Box::new(storage)).unwrap();
        store.add(SavingsEntry::new(50.0, date(3))).unwrap();
        let before = store.storage().read_table("savings").unwrap();

        assert!(store.delete(EntryKind::Savings, 7).unwrap().is_none());
        assert_eq!(store.storage().read_table("savings").unwrap(), before);
    }

    #[test]
    fn remove_by_unknown_id_fails() {
        let store = memory_store();
        let err = store.remove::<SavingsEntry>(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, BudgetError::EntryNotFound(_)), "unexpected: {err:?}");
    }

    #[test]
    fn set_status_toggles_bill_at_position() {
        let store = memory_store();
        store.add(BillEntry::new("Internet", 60.0, date(12))).unwrap();
        let toggled = store.set_status(0).unwrap().expect("bill toggled");
        assert_eq!(toggled.status, BillStatus::Paid);
        let again = store.set_status(0).unwrap().expect("bill toggled back");
        assert_eq!(again.status, BillStatus::Unpaid);
        assert!(store.set_status(3).unwrap().is_none());
    }

    #[test]
    fn set_bill_status_by_id_is_idempotent() {
        let store = memory_store();
        let id = store.add(BillEntry::new("Phone", 30.0, date(9))).unwrap();
        store.set_bill_status(id, BillStatus::Paid).unwrap();
        let bill = store.set_bill_status(id, BillStatus::Paid).unwrap();
        assert_eq!(bill.status, BillStatus::Paid);
        assert_eq!(store.get::<BillEntry>(id).unwrap().status, BillStatus::Paid);
    }

    #[test]
    fn corrupt_table_reads_as_empty() {
        let storage =
            MemoryStorage::new().with_table("income", "Id,Description,Amount,Date\n,Pay,oops,x\n");
        let store = LedgerStore::new(Box::new(storage)).unwrap();
        assert!(store.list::<IncomeEntry>().is_empty());
    }

    #[test]
    fn failed_write_leaves_table_unchanged() {
        let storage = MemoryStorage::new();
        let store = LedgerStore::new(Box::new(storage)).unwrap();
        store.add(IncomeEntry::new("Salary", 1000.0, date(1))).unwrap();
        let before = store.storage().read_table("income").unwrap();

        // Re-open over a read-only copy of the same contents.
        let frozen = MemoryStorage::new().with_table("income", before.as_deref().unwrap());
        frozen.fail_writes_to("income");
        let frozen_store = LedgerStore::new(Box::new(frozen)).unwrap();
        let err = frozen_store
            .add(IncomeEntry::new("Bonus", 50.0, date(2)))
            .unwrap_err();
        assert!(matches!(err, BudgetError::StorageError(_)));
        assert_eq!(frozen_store.list::<IncomeEntry>().len(), 1);
    }

    #[test]
    fn legacy_rows_receive_stable_ids() {
        let storage = MemoryStorage::new().with_table(
            "savings",
            "Deposit,Date\n100.0,2024-01-02\n250.0,2024-01-09\n",
        );
        let store = LedgerStore::new(Box::new(storage)).unwrap();
        let first: Vec<Uuid> = store.list::<SavingsEntry>().iter().map(|s| s.id).collect();
        let second: Vec<Uuid> = store.list::<SavingsEntry>().iter().map(|s| s.id).collect();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|id| !id.is_nil()));
        assert_eq!(first, second);
    }

    #[test]
    fn reset_clears_every_collection() {
        let store = memory_store();
        store.add(IncomeEntry::new("Salary", 1000.0, date(1))).unwrap();
        store.add(BillEntry::new("Rent", 900.0, date(1))).unwrap();
        store.reset().unwrap();
        assert!(store.snapshot().is_empty());
    }
}
