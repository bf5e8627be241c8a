mod common;

use std::fs;

use budget_tracker::core::{BudgetError, LedgerStore};
use budget_tracker::domain::{
    BillEntry, BillStatus, EntryKind, EssentialEntry, Identifiable, IncomeEntry, LedgerEntry,
    SavingsEntry,
};
use budget_tracker::storage::{CsvStorage, StorageBackend};
use common::{data_dir, date, setup_test_env, temp_root};
use uuid::Uuid;

#[test]
fn new_store_writes_header_only_tables() {
    let (_store, _settings, base) = setup_test_env();
    let dir = data_dir(&base);
    let bills = fs::read_to_string(dir.join("bills.csv")).unwrap();
    assert_eq!(bills.trim_end(), "Id,Bill Name,Amount Due,Due Date,Status");
    let expenses = fs::read_to_string(dir.join("non_essentials.csv")).unwrap();
    assert_eq!(expenses.trim_end(), "Id,Expense,Amount,Date,Notes");
    assert!(dir.join("income.csv").is_file());
    assert!(dir.join("essentials.csv").is_file());
    assert!(dir.join("savings.csv").is_file());
}

#[test]
fn entries_survive_reopening_the_store() {
    let base = temp_root();
    {
        let store = LedgerStore::open(Some(base.clone())).unwrap();
        store
            .add(IncomeEntry::new("Salary", 1000.0, date(2024, 1, 1)))
            .unwrap();
        store
            .add(EssentialEntry::new("Housing", 500.0, 450.0))
            .unwrap();
    }
    let store = LedgerStore::open(Some(base)).unwrap();
    let snapshot = store.snapshot();
    assert_eq!(snapshot.income.len(), 1);
    assert_eq!(snapshot.income[0].description, "Salary");
    assert_eq!(snapshot.essentials[0].actual, 450.0);
}

#[test]
fn listing_sorts_for_display_without_reordering_the_file() {
    let (store, _settings, base) = setup_test_env();
    store.add(SavingsEntry::new(10.0, date(2024, 1, 1))).unwrap();
    store.add(SavingsEntry::new(30.0, date(2024, 1, 3))).unwrap();
    store.add(SavingsEntry::new(20.0, date(2024, 1, 2))).unwrap();

    let deposits: Vec<f64> = store
        .list::<SavingsEntry>()
        .iter()
        .map(|row| row.deposit)
        .collect();
    assert_eq!(deposits, vec![30.0, 20.0, 10.0]);

    let raw = fs::read_to_string(data_dir(&base).join("savings.csv")).unwrap();
    let order: Vec<&str> = raw
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').nth(1))
        .collect();
    assert_eq!(order, vec!["10.0", "30.0", "20.0"]);
}

#[test]
fn position_delete_removes_display_row_and_ids_survive_resorting() {
    let (store, _settings, _base) = setup_test_env();
    let early = store
        .add(BillEntry::new("Water", 40.0, date(2024, 1, 20)))
        .unwrap();
    let late = store
        .add(BillEntry::new("Rent", 900.0, date(2024, 1, 1)))
        .unwrap();

    // Display order is ascending due date, so Rent is first.
    let removed = store.delete(EntryKind::Bills, 0).unwrap();
    assert!(matches!(removed, Some(LedgerEntry::Bill(ref bill)) if bill.id == late));

    store
        .add(BillEntry::new("Internet", 60.0, date(2023, 12, 1)))
        .unwrap();
    let toggled = store.toggle_bill_status(early).unwrap();
    assert_eq!(toggled.status, BillStatus::Paid);
    assert_eq!(store.get::<BillEntry>(early).unwrap().name, "Water");
}

#[test]
fn out_of_range_position_is_a_no_op() {
    let (store, _settings, base) = setup_test_env();
    store
        .add(IncomeEntry::new("Salary", 1000.0, date(2024, 1, 1)))
        .unwrap();
    let path = data_dir(&base).join("income.csv");
    let before = fs::read_to_string(&path).unwrap();

    assert!(store.delete(EntryKind::Income, 5).unwrap().is_none());
    assert!(store.set_status(0).unwrap().is_none());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn unknown_identifier_is_not_found() {
    let (store, _settings, _base) = setup_test_env();
    let err = store.remove::<IncomeEntry>(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, BudgetError::EntryNotFound(_)));
    let err = store
        .set_bill_status(Uuid::new_v4(), BillStatus::Paid)
        .unwrap_err();
    assert!(matches!(err, BudgetError::EntryNotFound(_)));
}

#[test]
fn failed_write_leaves_previous_file_intact() {
    let (store, _settings, base) = setup_test_env();
    store
        .add(IncomeEntry::new("Salary", 1000.0, date(2024, 1, 1)))
        .unwrap();
    let path = data_dir(&base).join("income.csv");
    let original = fs::read_to_string(&path).unwrap();

    // A directory in the staging file's place makes File::create fail.
    fs::create_dir_all(data_dir(&base).join("income.csv.tmp")).unwrap();

    let err = store
        .add(IncomeEntry::new("Bonus", 200.0, date(2024, 1, 2)))
        .unwrap_err();
    assert!(matches!(err, BudgetError::StorageError(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(store.list::<IncomeEntry>().len(), 1);
}

#[test]
fn legacy_table_without_ids_loads_and_gains_ids() {
    let base = temp_root();
    let dir = data_dir(&base);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("income.csv"),
        "Description,Amount,Date\nSalary,1000,2024-01-01\nBonus,250.5,2024-01-15\n",
    )
    .unwrap();

    let store = LedgerStore::open(Some(base)).unwrap();
    let rows = store.list::<IncomeEntry>();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| !row.id.is_nil()));

    let rewritten = fs::read_to_string(dir.join("income.csv")).unwrap();
    assert!(rewritten.starts_with("Id,Description,Amount,Date"));
    let again = store.list::<IncomeEntry>();
    assert_eq!(
        rows.iter().map(|row| row.id).collect::<Vec<_>>(),
        again.iter().map(|row| row.id).collect::<Vec<_>>()
    );
}

#[test]
fn corrupt_table_reads_as_empty() {
    let base = temp_root();
    let storage = CsvStorage::new(Some(base.clone())).unwrap();
    storage
        .write_table("savings", "Id,Deposit,Date\nnot-a-uuid,abc,yesterday\n")
        .unwrap();

    let store = LedgerStore::open(Some(base)).unwrap();
    assert!(store.list::<SavingsEntry>().is_empty());
    assert!(store.snapshot().savings.is_empty());
}

#[test]
fn reset_empties_every_collection() {
    let (store, _settings, _base) = setup_test_env();
    store
        .add(IncomeEntry::new("Salary", 1000.0, date(2024, 1, 1)))
        .unwrap();
    store
        .add(BillEntry::new("Rent", 900.0, date(2024, 1, 1)))
        .unwrap();
    store.reset().unwrap();
    assert!(store.snapshot().is_empty());
}

#[test]
fn kind_dispatched_add_and_list() {
    let (store, _settings, _base) = setup_test_env();
    let early = store
        .add_entry(BillEntry::new("Water", 30.0, date(2024, 2, 1)).into())
        .unwrap();
    let late = store
        .add_entry(LedgerEntry::Bill(BillEntry::new("Rent", 900.0, date(2024, 3, 1))))
        .unwrap();
    let salary = store
        .add_entry(IncomeEntry::new("Salary", 1000.0, date(2024, 1, 1)).into())
        .unwrap();

    let bills = store.list_kind(EntryKind::Bills);
    let ids: Vec<Uuid> = bills.iter().map(Identifiable::id).collect();
    assert_eq!(ids, vec![early, late]);
    assert!(bills.iter().all(|entry| entry.kind() == EntryKind::Bills));

    let income = store.list_kind(EntryKind::Income);
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].id(), salary);
    assert!(store.list_kind(EntryKind::Savings).is_empty());
    assert_eq!(store.list::<BillEntry>().len(), 2);
}
