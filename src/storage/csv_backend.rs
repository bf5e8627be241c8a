use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::core::utils::{ensure_dir, write_atomic, PathResolver};

use super::{Result, StorageBackend};

const TABLE_EXTENSION: &str = "csv";

/// Stores each table as `<dir>/<table>.csv`.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    data_dir: PathBuf,
}

impl CsvStorage {
    /// Opens (and creates if needed) the data directory under `root`, or under the default
    /// application directory when `root` is `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        Self::in_dir(PathResolver::data_dir_in(&base))
    }

    /// Uses `data_dir` directly as the table directory.
    pub fn in_dir(data_dir: PathBuf) -> Result<Self> {
        ensure_dir(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", table, TABLE_EXTENSION))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl StorageBackend for CsvStorage {
    fn read_table(&self, table: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.table_path(table)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_table(&self, table: &str, contents: &str) -> Result<()> {
        write_atomic(&self.table_path(table), contents)
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.table_path(table).exists())
    }
}
