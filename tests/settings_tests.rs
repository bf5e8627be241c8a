mod common;

use std::fs;

use assert_fs::prelude::*;
use budget_tracker::config::{Settings, SettingsManager};
use budget_tracker::domain::EntryKind;
use common::temp_root;
use predicates::prelude::*;
use serde_json::{json, Value};

#[test]
fn legacy_settings_csv_is_imported_once() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("data/settings.csv")
        .write_str("Key,Value\ntheme,light\nauto_save,false\nbackup_frequency,14\ncurrency_symbol,$\n")
        .unwrap();

    let manager = SettingsManager::new(Some(temp.path().to_path_buf())).unwrap();
    let settings = manager.load();
    assert_eq!(settings.theme(), "light");
    assert!(!settings.auto_save());
    assert_eq!(settings.get("backup_frequency"), Some(&json!(14)));
    assert_eq!(settings.currency_symbol(), "$");
    temp.child("data/settings.json")
        .assert(predicate::path::is_file());

    // The JSON file is authoritative from now on.
    fs::write(manager.legacy_path(), "Key,Value\ntheme,dark\n").unwrap();
    assert_eq!(manager.load().theme(), "light");
}

#[test]
fn saved_map_round_trips_with_missing_defaults_filled() {
    let base = temp_root();
    let manager = SettingsManager::new(Some(base)).unwrap();
    let mut settings = Settings::defaults();
    settings.set("theme", json!("light"));
    settings.set("custom_flag", json!(true));
    manager.save(&settings).unwrap();

    // Drop a default key from the stored file to simulate an older version.
    let mut stored: serde_json::Map<String, Value> =
        serde_json::from_str(&fs::read_to_string(manager.path()).unwrap()).unwrap();
    stored.remove("chart_style");
    fs::write(manager.path(), serde_json::to_string(&stored).unwrap()).unwrap();

    let loaded = manager.load();
    assert_eq!(loaded.get("custom_flag"), Some(&json!(true)));
    assert_eq!(loaded.get("chart_style"), Some(&json!("default")));
    assert_eq!(loaded, settings);

    assert!(manager.migrate().unwrap());
    assert!(!manager.migrate().unwrap());
}

#[test]
fn mirror_can_be_disabled() {
    let base = temp_root();
    let manager = SettingsManager::new(Some(base)).unwrap().legacy_mirror(false);
    manager.save(&Settings::defaults()).unwrap();
    assert!(manager.path().is_file());
    assert!(!manager.legacy_path().exists());
}

#[test]
fn export_and_import_through_csv() {
    let source = SettingsManager::new(Some(temp_root())).unwrap();
    source.set("decimal_places", json!(3)).unwrap();
    source
        .add_custom_category(EntryKind::Income, "Tutoring")
        .unwrap();
    let exported = temp_root().join("exported.csv");
    source.export_to(&exported).unwrap();

    let target = SettingsManager::new(Some(temp_root())).unwrap();
    let imported = target.import_from(&exported).unwrap();
    assert_eq!(imported.decimal_places(), 3);
    assert!(imported
        .category_suggestions(EntryKind::Income)
        .contains(&"Tutoring".to_string()));
    assert_eq!(target.load(), imported);
}

#[test]
fn csv_export_keeps_each_key_typed() {
    let source = SettingsManager::new(Some(temp_root())).unwrap();
    source.set("currency_symbol", json!("100")).unwrap();
    source.set("allocation_savings", json!(0.25)).unwrap();
    let exported = temp_root().join("typed.csv");
    source.export_to(&exported).unwrap();

    let target = SettingsManager::new(Some(temp_root())).unwrap();
    let imported = target.import_from(&exported).unwrap();
    assert_eq!(imported.get("last_backup"), Some(&Value::Null));
    assert_eq!(imported.get("currency_symbol"), Some(&json!("100")));
    assert_eq!(imported.values(), source.load().values());
}

#[test]
fn unsupported_export_extension_is_rejected() {
    let manager = SettingsManager::new(Some(temp_root())).unwrap();
    let err = manager
        .export_to(&temp_root().join("settings.yaml"))
        .unwrap_err();
    assert!(err.is_validation());
}
