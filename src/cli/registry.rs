use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A shell command. `usage` starts with the command name and lists the accepted arguments,
/// e.g. `bill <add ... | list | toggle <n>>`; literal choices in it drive completion.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }

    /// Literal words the usage line accepts as the first argument.
    ///
    /// `<add ... | list>` yields `add` and `list`; a single placeholder such as `<path>` or
    /// `[days]` yields nothing, while a lone flag such as `[--yes]` is kept.
    pub fn first_arguments(&self) -> Vec<&'static str> {
        let rest = self
            .usage
            .strip_prefix(self.name)
            .unwrap_or_default()
            .trim_start();
        let Some(group) = leading_group(rest) else {
            return Vec::new();
        };
        let choices = split_choices(group);
        let several = choices.len() > 1;
        choices
            .into_iter()
            .filter_map(|choice| choice.split_whitespace().next())
            .filter(|word| !word.starts_with(['<', '[']))
            .filter(|word| several || word.starts_with('-'))
            .collect()
    }
}

/// Contents of the bracketed group at the start of `text`, without its outer brackets.
fn leading_group(text: &str) -> Option<&str> {
    if !text.starts_with(['<', '[']) {
        return None;
    }
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '<' | '[' => depth += 1,
            '>' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[1..idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on `|` outside nested brackets.
fn split_choices(group: &str) -> Vec<&str> {
    let mut choices = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in group.char_indices() {
        match ch {
            '<' | '[' => depth += 1,
            '>' | ']' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                choices.push(group[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    choices.push(group[start..].trim());
    choices.retain(|choice| !choice.is_empty());
    choices
}

/// Commands in registration order. Re-registering a name replaces the entry in place.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|known| known.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    fn entry(name: &'static str, usage: &'static str) -> CommandEntry {
        CommandEntry::new(name, "", usage, noop)
    }

    #[test]
    fn keeps_registration_order_and_replaces_duplicates() {
        let mut registry = CommandRegistry::new();
        registry.register(entry("summary", "summary"));
        registry.register(entry("health", "health"));
        registry.register(CommandEntry::new("summary", "again", "summary", noop));

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["summary", "health"]);
        assert_eq!(registry.get("summary").map(|entry| entry.description), Some("again"));
        assert!(registry.handler("missing").is_none());
    }

    #[test]
    fn first_arguments_come_from_usage_choices() {
        let bill = entry(
            "bill",
            "bill <add <name> <amount> <due-date> [status] | list | toggle <n> | upcoming [days]>",
        );
        assert_eq!(bill.first_arguments(), vec!["add", "list", "toggle", "upcoming"]);

        let trend = entry("trend", "trend <income|expense|saving|bill> [days]");
        assert_eq!(trend.first_arguments(), vec!["income", "expense", "saving", "bill"]);

        assert_eq!(entry("reset", "reset [--yes]").first_arguments(), vec!["--yes"]);
        assert!(entry("export", "export <directory>").first_arguments().is_empty());
        assert!(entry("calendar", "calendar [date]").first_arguments().is_empty());
        assert!(entry("summary", "summary").first_arguments().is_empty());
    }
}
