use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::core::{
    errors::{BudgetError, Result},
    utils::{ensure_dir, write_atomic, PathResolver},
};
use crate::domain::EntryKind;

use super::model::{coerce_value, value_to_cell, Settings, SettingsMap};

const LEGACY_HEADERS: [&str; 2] = ["Key", "Value"];

/// Loads and stores [`Settings`].
///
/// `settings.json` is authoritative. A legacy `settings.csv` is imported once when the
/// JSON file is missing, and mirrored on every save unless disabled.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    path: PathBuf,
    legacy_path: PathBuf,
    mirror_legacy: bool,
}

impl SettingsManager {
    /// Manager rooted at `root` (or the default application directory).
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        Self::in_dir(PathResolver::data_dir_in(&base))
    }

    pub fn in_dir(data_dir: PathBuf) -> Result<Self> {
        ensure_dir(&data_dir)?;
        Ok(Self {
            path: PathResolver::settings_file_in(&data_dir),
            legacy_path: PathResolver::legacy_settings_file_in(&data_dir),
            mirror_legacy: true,
        })
    }

    /// Enables or disables the `settings.csv` mirror written on save.
    pub fn legacy_mirror(mut self, enabled: bool) -> Self {
        self.mirror_legacy = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn legacy_path(&self) -> &Path {
        &self.legacy_path
    }

    /// Current settings merged over defaults. Never fails: unreadable files fall back to
    /// defaults after logging.
    pub fn load(&self) -> Settings {
        if self.path.exists() {
            return match self.read_stored() {
                Ok(stored) => Settings::from_map(stored),
                Err(err) => {
                    tracing::error!(path = %self.path.display(), error = %err, "failed to load settings, using defaults");
                    Settings::defaults()
                }
            };
        }

        if self.legacy_path.exists() {
            match read_legacy_csv(&self.legacy_path) {
                Ok(settings) => {
                    match self.save(&settings) {
                        Ok(()) => tracing::info!("imported legacy settings.csv"),
                        Err(err) => {
                            tracing::warn!(error = %err, "could not persist imported legacy settings")
                        }
                    }
                    return settings;
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to import legacy settings, using defaults");
                }
            }
        }
        Settings::defaults()
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings.values())?;
        write_atomic(&self.path, &json)
            .map_err(|err| BudgetError::SettingsError(format!("failed to save settings: {}", err)))?;

        if self.mirror_legacy {
            if let Err(err) = write_legacy_csv(&self.legacy_path, settings.values()) {
                tracing::warn!(error = %err, "failed to mirror settings to settings.csv");
            }
        }
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.load().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: Value) -> Result<Settings> {
        let mut settings = self.load();
        settings.set(key, value);
        self.save(&settings)?;
        Ok(settings)
    }

    pub fn reset(&self) -> Result<Settings> {
        let settings = Settings::defaults();
        self.save(&settings)?;
        tracing::info!("settings reset to defaults");
        Ok(settings)
    }

    /// Appends `name` to the suggestion list for `kind`. Returns false when it was already
    /// present.
    pub fn add_custom_category(&self, kind: EntryKind, name: &str) -> Result<bool> {
        let key = Settings::category_key(kind).ok_or_else(|| {
            BudgetError::invalid(format!("{} entries have no category suggestions", kind))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(BudgetError::invalid("category name is required"));
        }
        let mut settings = self.load();
        let mut categories = settings.category_suggestions(kind);
        if categories.iter().any(|existing| existing == name) {
            return Ok(false);
        }
        categories.push(name.to_string());
        settings.set(key, Value::from(categories));
        self.save(&settings)?;
        Ok(true)
    }

    /// Writes the current settings to a `.json` or `.csv` file.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let settings = self.load();
        match SettingsFormat::from_path(path)? {
            SettingsFormat::Json => {
                write_atomic(path, &serde_json::to_string_pretty(settings.values())?)
            }
            SettingsFormat::Csv => write_legacy_csv(path, settings.values()),
        }
    }

    /// Merges a `.json` or `.csv` settings file over the current settings and saves.
    pub fn import_from(&self, path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Err(BudgetError::SettingsError(format!(
                "settings file not found: {}",
                path.display()
            )));
        }
        let imported = match SettingsFormat::from_path(path)? {
            SettingsFormat::Json => parse_json_map(&fs::read_to_string(path)?)?,
            SettingsFormat::Csv => read_key_values(path)?
                .into_iter()
                .map(|(key, raw)| {
                    let value = if Settings::default_value(&key).is_some() {
                        coerce_value(&key, &raw)
                    } else {
                        serde_json::from_str(&raw).unwrap_or(Value::String(raw))
                    };
                    (key, value)
                })
                .collect(),
        };
        let mut settings = self.load();
        for (key, value) in imported {
            settings.set(key, value);
        }
        self.save(&settings)?;
        Ok(settings)
    }

    /// Writes any default keys missing from the stored file. Returns whether it changed.
    pub fn migrate(&self) -> Result<bool> {
        let stored = if self.path.exists() {
            self.read_stored()?
        } else {
            SettingsMap::new()
        };
        let missing = Settings::default_map()
            .keys()
            .any(|key| !stored.contains_key(key));
        if missing {
            self.save(&Settings::from_map(stored))?;
            tracing::info!("settings migrated with new defaults");
        }
        Ok(missing)
    }

    fn read_stored(&self) -> Result<SettingsMap> {
        parse_json_map(&fs::read_to_string(&self.path)?)
    }
}

enum SettingsFormat {
    Json,
    Csv,
}

impl SettingsFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(SettingsFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(SettingsFormat::Csv),
            _ => Err(BudgetError::invalid(
                "unsupported settings format, use .json or .csv",
            )),
        }
    }
}

fn parse_json_map(contents: &str) -> Result<SettingsMap> {
    match serde_json::from_str::<Value>(contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(BudgetError::SettingsError(
            "settings file must hold a JSON object".into(),
        )),
    }
}

fn read_key_values(path: &Path) -> Result<Vec<(String, String)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(key) = record.get(0).map(str::trim).filter(|key| !key.is_empty()) {
            pairs.push((key.to_string(), record.get(1).unwrap_or("").to_string()));
        }
    }
    Ok(pairs)
}

fn read_legacy_csv(path: &Path) -> Result<Settings> {
    let mut settings = Settings::defaults();
    for (key, raw) in read_key_values(path)? {
        let value = coerce_value(&key, &raw);
        settings.set(key, value);
    }
    Ok(settings)
}

fn write_legacy_csv(path: &Path, values: &SettingsMap) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(LEGACY_HEADERS)?;
    for (key, value) in values {
        writer.write_record([key.as_str(), value_to_cell(value).as_str()])?;
    }
    let bytes = writer.into_inner()?;
    let contents = String::from_utf8(bytes)
        .map_err(|err| BudgetError::SerializationError(err.to_string()))?;
    write_atomic(path, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn manager(temp: &TempDir) -> SettingsManager {
        SettingsManager::in_dir(temp.path().join("data")).expect("settings manager")
    }

    #[test]
    fn missing_files_load_defaults() {
        let temp = TempDir::new().expect("temp dir");
        assert_eq!(manager(&temp).load(), Settings::defaults());
    }

    #[test]
    fn save_then_load_round_trips_with_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = manager(&temp);
        let mut written = SettingsMap::new();
        written.insert("theme".into(), json!("light"));
        written.insert("decimal_places".into(), json!(3));
        fs::write(manager.path(), serde_json::to_string(&written).unwrap()).unwrap();

        let loaded = manager.load();
        assert_eq!(loaded, Settings::from_map(written.clone()));
        manager.save(&loaded).unwrap();
        assert_eq!(manager.load(), loaded);
    }

    #[test]
    fn corrupt_json_falls_back_to_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = manager(&temp);
        fs::write(manager.path(), "{ not json").unwrap();
        assert_eq!(manager.load(), Settings::defaults());
    }

    #[test]
    fn legacy_csv_is_imported_once() {
        let temp = TempDir::new().expect("temp dir");
        let manager = manager(&temp);
        fs::write(
            manager.legacy_path(),
            "Key,Value\ntheme,light\nauto_save,false\nbackup_frequency,30\nincome_categories,\"[\"\"Salary\"\",\"\"Tips\"\"]\"\n",
        )
        .unwrap();

        let settings = manager.load();
        assert_eq!(settings.theme(), "light");
        assert_eq!(settings.get("auto_save"), Some(&json!(false)));
        assert_eq!(settings.get("backup_frequency"), Some(&json!(30)));
        assert_eq!(
            settings.category_suggestions(EntryKind::Income),
            vec!["Salary".to_string(), "Tips".to_string()]
        );
        assert!(manager.path().exists(), "import should write settings.json");

        fs::write(manager.legacy_path(), "Key,Value\ntheme,dark\n").unwrap();
        assert_eq!(manager.load().theme(), "light");
    }

    #[test]
    fn mirror_can_be_disabled() {
        let temp = TempDir::new().expect("temp dir");
        let mirrored = manager(&temp);
        mirrored.save(&Settings::defaults()).unwrap();
        let legacy = fs::read_to_string(mirrored.legacy_path()).unwrap();
        assert!(legacy.starts_with("Key,Value"));
        assert!(legacy.contains("auto_save,true"));

        let other = TempDir::new().expect("temp dir");
        let quiet = manager(&other).legacy_mirror(false);
        quiet.save(&Settings::defaults()).unwrap();
        assert!(!quiet.legacy_path().exists());
    }

    #[test]
    fn add_custom_category_skips_duplicates() {
        let temp = TempDir::new().expect("temp dir");
        let manager = manager(&temp);
        assert!(manager.add_custom_category(EntryKind::NonEssentials, "Gaming").unwrap());
        assert!(!manager.add_custom_category(EntryKind::NonEssentials, "Gaming").unwrap());
        assert!(manager.add_custom_category(EntryKind::Bills, "Rent").is_err());
        assert!(manager
            .load()
            .category_suggestions(EntryKind::NonEssentials)
            .contains(&"Gaming".to_string()));
    }

    #[test]
    fn export_and_import_csv() {
        let temp = TempDir::new().expect("temp dir");
        let source = manager(&temp);
        source.set("currency_symbol", json!("$")).unwrap();
        let exported = temp.path().join("exported.csv");
        source.export_to(&exported).unwrap();

        let other = TempDir::new().expect("temp dir");
        let target = manager(&other);
        let imported = target.import_from(&exported).unwrap();
        assert_eq!(imported.currency_symbol(), "$");
        assert_eq!(imported.decimal_places(), 2);
        assert!(target.import_from(&temp.path().join("missing.json")).is_err());
        assert!(target.export_to(&temp.path().join("settings.yaml")).is_err());
    }

    #[test]
    fn migrate_fills_missing_defaults_once() {
        let temp = TempDir::new().expect("temp dir");
        let manager = manager(&temp);
        fs::write(manager.path(), r#"{"theme":"light"}"#).unwrap();
        assert!(manager.migrate().unwrap());
        assert!(!manager.migrate().unwrap());
        assert_eq!(manager.load().theme(), "light");
    }
}
