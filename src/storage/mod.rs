pub mod codec;
pub mod csv_backend;
pub mod memory;

use crate::core::errors::BudgetError;

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Abstraction over where the ledger's flat tables live.
///
/// Backends move whole tables as text; encoding rows is the codec's job.
pub trait StorageBackend: Send + Sync {
    /// Returns the table contents, or `None` when the table has never been written.
    fn read_table(&self, table: &str) -> Result<Option<String>>;

    /// Replaces the whole table. Implementations must leave the previous contents intact
    /// when the write fails.
    fn write_table(&self, table: &str, contents: &str) -> Result<()>;

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.read_table(table)?.is_some())
    }
}

pub use csv_backend::CsvStorage;
pub use memory::MemoryStorage;
