#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use budget_tracker::{config::SettingsManager, core::LedgerStore};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh application root that is removed when the test binary exits.
pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated store and settings manager sharing one temp root.
pub fn setup_test_env() -> (LedgerStore, SettingsManager, PathBuf) {
    let base = temp_root();
    let store = LedgerStore::open(Some(base.clone())).expect("open ledger store");
    let settings =
        SettingsManager::new(Some(base.clone())).expect("create settings manager for temp dir");
    (store, settings, base)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn data_dir(base: &std::path::Path) -> PathBuf {
    base.join("data")
}
