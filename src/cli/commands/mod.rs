pub mod analysis;
pub mod entries;
pub mod reports;
pub mod settings;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in entries::definitions()
        .into_iter()
        .chain(analysis::definitions())
        .chain(reports::definitions())
        .chain(settings::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

/// First argument lower-cased, or a usage error when missing.
pub(crate) fn subcommand(args: &[&str], usage: &str) -> Result<String, CommandError> {
    args.first()
        .map(|value| value.to_lowercase())
        .ok_or_else(|| CommandError::usage(usage))
}
