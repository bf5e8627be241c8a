//! User preferences: the [`Settings`] model and its on-disk persistence.

pub mod manager;
pub mod model;

pub use manager::SettingsManager;
pub use model::{coerce_value, Settings, SettingsMap};
