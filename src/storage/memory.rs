use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use crate::core::errors::BudgetError;

use super::{Result, StorageBackend};

/// Volatile backend for tests and dry runs. Tables can be marked read-only to simulate
/// write failures.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: Mutex<HashMap<String, String>>,
    read_only: Mutex<HashSet<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, table: &str, contents: &str) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.insert(table.to_string(), contents.to_string());
        }
        self
    }

    /// Makes every later write to `table` fail.
    pub fn fail_writes_to(&self, table: &str) {
        if let Ok(mut read_only) = self.read_only.lock() {
            read_only.insert(table.to_string());
        }
    }

    fn poisoned() -> BudgetError {
        BudgetError::StorageError("memory storage lock poisoned".into())
    }
}

impl StorageBackend for MemoryStorage {
    fn read_table(&self, table: &str) -> Result<Option<String>> {
        let tables = self.tables.lock().map_err(|_| Self::poisoned())?;
        Ok(tables.get(table).cloned())
    }

    fn write_table(&self, table: &str, contents: &str) -> Result<()> {
        let read_only = self.read_only.lock().map_err(|_| Self::poisoned())?;
        if read_only.contains(table) {
            return Err(BudgetError::StorageError(format!(
                "table `{}` is read-only",
                table
            )));
        }
        drop(read_only);
        let mut tables = self.tables.lock().map_err(|_| Self::poisoned())?;
        tables.insert(table.to_string(), contents.to_string());
        Ok(())
    }
}
