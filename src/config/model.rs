use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::core::errors::Result;
use crate::core::services::AllocationRule;
use crate::domain::EntryKind;

pub type SettingsMap = Map<String, Value>;

const BOOL_KEYS: &[&str] = &[
    "auto_save",
    "notifications_enabled",
    "budget_alerts",
    "first_time_setup",
    "sidebar_expanded",
];
const INT_KEYS: &[&str] = &["backup_frequency", "overspending_alert_threshold", "decimal_places"];
const LIST_KEYS: &[&str] = &[
    "income_categories",
    "essential_categories",
    "non_essential_categories",
];
const RATIO_KEYS: &[&str] = &[
    "allocation_essentials",
    "allocation_non_essentials",
    "allocation_savings",
];

/// Inclusive bounds checked by [`Settings::validate`].
const NUMERIC_BOUNDS: &[(&str, f64, f64)] = &[
    ("backup_frequency", 1.0, 365.0),
    ("overspending_alert_threshold", 0.0, 100.0),
    ("decimal_places", 0.0, 4.0),
];

static DEFAULTS: Lazy<SettingsMap> = Lazy::new(|| {
    let defaults = json!({
        "theme": "dark",
        "currency": "PHP",
        "currency_symbol": "₱",
        "decimal_places": 2,
        "date_format": "%Y-%m-%d",
        "window_geometry": "1400x800",
        "auto_save": true,
        "backup_frequency": 7,
        "last_backup": null,
        "notifications_enabled": true,
        "budget_alerts": true,
        "overspending_alert_threshold": 10,
        "first_time_setup": true,
        "language": "en",
        "export_format": "xlsx",
        "chart_style": "default",
        "sidebar_expanded": true,
        "default_page": "dashboard",
        "income_categories": ["Salary", "Freelance", "Investments", "Business", "Other"],
        "essential_categories": [
            "Housing",
            "Utilities",
            "Groceries",
            "Transportation",
            "Insurance",
            "Healthcare",
            "Debt Payments"
        ],
        "non_essential_categories": [
            "Entertainment",
            "Dining Out",
            "Shopping",
            "Hobbies",
            "Travel",
            "Subscriptions",
            "Personal Care"
        ],
        "allocation_essentials": 0.5,
        "allocation_non_essentials": 0.3,
        "allocation_savings": 0.2
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
});

/// User preferences as an open key/value map, always layered over the built-in defaults.
///
/// Unknown keys are preserved so settings written by newer versions survive a round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: SettingsMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            values: DEFAULTS.clone(),
        }
    }
}

impl Settings {
    pub fn defaults() -> Self {
        Self::default()
    }

    pub fn default_map() -> &'static SettingsMap {
        &DEFAULTS
    }

    pub fn default_value(key: &str) -> Option<&'static Value> {
        DEFAULTS.get(key)
    }

    /// Merges `stored` over the defaults; stored keys win.
    pub fn from_map(stored: SettingsMap) -> Self {
        let mut settings = Self::default();
        settings.values.extend(stored);
        settings
    }

    pub fn values(&self) -> &SettingsMap {
        &self.values
    }

    pub fn into_map(self) -> SettingsMap {
        self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Sets a key from user-typed text, coercing it to the type the key expects.
    pub fn set_from_str(&mut self, key: &str, raw: &str) {
        self.set(key, coerce_value(key, raw));
    }

    pub fn theme(&self) -> &str {
        self.str_or("theme", "dark")
    }

    pub fn currency_code(&self) -> &str {
        self.str_or("currency", "PHP")
    }

    pub fn currency_symbol(&self) -> &str {
        self.str_or("currency_symbol", "₱")
    }

    pub fn date_format(&self) -> &str {
        self.str_or("date_format", "%Y-%m-%d")
    }

    pub fn decimal_places(&self) -> usize {
        self.number("decimal_places")
            .filter(|places| *places >= 0.0)
            .map(|places| places.min(10.0) as usize)
            .unwrap_or(2)
    }

    pub fn overspending_threshold(&self) -> f64 {
        self.number("overspending_alert_threshold").unwrap_or(10.0)
    }

    pub fn budget_alerts(&self) -> bool {
        self.flag("budget_alerts", true)
    }

    pub fn auto_save(&self) -> bool {
        self.flag("auto_save", true)
    }

    /// Allocation ratios as a validated rule.
    pub fn allocation_rule(&self) -> Result<AllocationRule> {
        let defaults = AllocationRule::default();
        AllocationRule::new(
            self.number("allocation_essentials")
                .unwrap_or(defaults.essentials()),
            self.number("allocation_non_essentials")
                .unwrap_or(defaults.non_essentials()),
            self.number("allocation_savings").unwrap_or(defaults.savings()),
        )
    }

    /// Settings key holding the suggestion list for `kind`, if it has one.
    pub fn category_key(kind: EntryKind) -> Option<&'static str> {
        match kind {
            EntryKind::Income => Some("income_categories"),
            EntryKind::Essentials => Some("essential_categories"),
            EntryKind::NonEssentials => Some("non_essential_categories"),
            EntryKind::Bills | EntryKind::Savings => None,
        }
    }

    pub fn category_suggestions(&self, kind: EntryKind) -> Vec<String> {
        Self::category_key(kind)
            .and_then(|key| self.values.get(key))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Symbol followed by the amount with thousands separators, e.g. `₱1,234.50`.
    pub fn format_currency(&self, amount: f64) -> String {
        let places = self.decimal_places();
        let formatted = format!("{:.*}", places, amount.abs());
        let (whole, fraction) = match formatted.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (formatted.as_str(), None),
        };
        let sign = if amount < 0.0 { "-" } else { "" };
        let mut out = format!("{}{}{}", self.currency_symbol(), sign, group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }

    /// Returns every key with problems, mapped to its messages. Empty when valid.
    pub fn validate(&self) -> BTreeMap<String, Vec<String>> {
        let mut issues: BTreeMap<String, Vec<String>> = BTreeMap::new();

        if !matches!(self.get("theme").and_then(Value::as_str), Some("light" | "dark")) {
            issues
                .entry("theme".into())
                .or_default()
                .push("Invalid theme value".into());
        }

        for (key, min, max) in NUMERIC_BOUNDS {
            let Some(value) = self.get(key).filter(|value| !value.is_null()) else {
                continue;
            };
            match numeric(value) {
                Some(number) if (*min..=*max).contains(&number) => {}
                Some(_) => issues
                    .entry((*key).into())
                    .or_default()
                    .push(format!("Value must be between {} and {}", min, max)),
                None => issues
                    .entry((*key).into())
                    .or_default()
                    .push("Must be a valid number".into()),
            }
        }

        if let Err(err) = self.allocation_rule() {
            issues.entry("allocation".into()).or_default().push(err.to_string());
        }
        issues
    }

    fn str_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(fallback)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(numeric)
    }

    fn flag(&self, key: &str, fallback: bool) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(raw)) => raw.eq_ignore_ascii_case("true"),
            _ => fallback,
        }
    }
}

/// Converts the text form of a setting (legacy CSV cell or typed input) to a JSON value.
///
/// Empty or unparseable text for a typed key falls back to that key's default.
pub fn coerce_value(key: &str, raw: &str) -> Value {
    let raw = raw.trim();
    let fallback = || Settings::default_value(key).cloned().unwrap_or(Value::Null);

    if BOOL_KEYS.contains(&key) {
        return Value::Bool(raw.eq_ignore_ascii_case("true"));
    }
    if raw.is_empty() {
        return fallback();
    }
    if INT_KEYS.contains(&key) {
        return raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| fallback());
    }
    if RATIO_KEYS.contains(&key) {
        return raw
            .parse::<f64>()
            .ok()
            .filter(|ratio| ratio.is_finite())
            .map(Value::from)
            .unwrap_or_else(fallback);
    }
    if LIST_KEYS.contains(&key) {
        return serde_json::from_str::<Vec<String>>(raw)
            .map(Value::from)
            .unwrap_or_else(|_| fallback());
    }
    Value::String(raw.to_string())
}

/// Text form used for the legacy `Key,Value` table.
pub fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_known_keys() {
        let settings = Settings::defaults();
        assert_eq!(settings.theme(), "dark");
        assert_eq!(settings.currency_code(), "PHP");
        assert_eq!(settings.decimal_places(), 2);
        assert_eq!(settings.get("last_backup"), Some(&Value::Null));
        assert_eq!(settings.allocation_rule().unwrap(), AllocationRule::default());
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn format_currency_groups_thousands() {
        let mut settings = Settings::defaults();
        assert_eq!(settings.format_currency(1234567.891), "₱1,234,567.89");
        assert_eq!(settings.format_currency(0.0), "₱0.00");
        assert_eq!(settings.format_currency(-950.5), "₱-950.50");

        settings.set("currency_symbol", json!("$"));
        settings.set("decimal_places", json!(0));
        assert_eq!(settings.format_currency(1000.4), "$1,000");
    }

    #[test]
    fn validate_reports_each_bad_key() {
        let mut settings = Settings::defaults();
        settings.set("theme", json!("neon"));
        settings.set("backup_frequency", json!(0));
        settings.set("decimal_places", json!("many"));
        settings.set("allocation_savings", json!(0.5));

        let issues = settings.validate();
        assert_eq!(issues["theme"], vec!["Invalid theme value"]);
        assert_eq!(issues["backup_frequency"], vec!["Value must be between 1 and 365"]);
        assert_eq!(issues["decimal_places"], vec!["Must be a valid number"]);
        assert!(issues.contains_key("allocation"));
        assert!(!issues.contains_key("overspending_alert_threshold"));
    }

    #[test]
    fn stored_keys_override_defaults() {
        let mut stored = SettingsMap::new();
        stored.insert("theme".into(), json!("light"));
        stored.insert("custom_key".into(), json!(42));
        let settings = Settings::from_map(stored);
        assert_eq!(settings.theme(), "light");
        assert_eq!(settings.get("custom_key"), Some(&json!(42)));
        assert_eq!(settings.currency_symbol(), "₱");
    }

    #[test]
    fn coerce_value_uses_key_types() {
        assert_eq!(coerce_value("auto_save", "False"), json!(false));
        assert_eq!(coerce_value("backup_frequency", "14"), json!(14));
        assert_eq!(coerce_value("backup_frequency", "soon"), json!(7));
        assert_eq!(
            coerce_value("income_categories", r#"["Salary","Tips"]"#),
            json!(["Salary", "Tips"])
        );
        assert_eq!(coerce_value("allocation_savings", "0.25"), json!(0.25));
        assert_eq!(coerce_value("theme", "light"), json!("light"));
        assert_eq!(coerce_value("last_backup", ""), Value::Null);
    }

    #[test]
    fn category_suggestions_by_kind() {
        let settings = Settings::defaults();
        assert!(settings
            .category_suggestions(EntryKind::Essentials)
            .contains(&"Insurance".to_string()));
        assert!(settings.category_suggestions(EntryKind::Bills).is_empty());
    }
}
