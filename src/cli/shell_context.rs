use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;

use crate::config::{Settings, SettingsManager};
use crate::core::ledger_store::LedgerStore;
use crate::core::services::AllocationRule;
use crate::core::time::Clock;
use crate::domain::LedgerSnapshot;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// State shared by every command handler for the lifetime of the shell.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: LedgerStore,
    pub settings_manager: SettingsManager,
    pub settings: Settings,
    pub clock: Box<dyn Clock>,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Fresh read of every collection.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.store.snapshot()
    }

    /// Allocation rule from settings, or 50/30/20 when the stored ratios are invalid.
    pub fn allocation_rule(&self) -> AllocationRule {
        self.settings.allocation_rule().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid allocation settings, using 50/30/20");
            AllocationRule::default()
        })
    }

    pub fn money(&self, amount: f64) -> String {
        self.settings.format_currency(amount)
    }
}
