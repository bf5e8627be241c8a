//! Build metadata embedded by `build.rs`, printed by the `version` command.

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Labelled rows in the order `version` prints them.
pub fn details() -> [(&'static str, String); 5] {
    let hash = option_env!("BUDGET_TRACKER_BUILD_HASH").unwrap_or(UNKNOWN);
    let tree = option_env!("BUDGET_TRACKER_BUILD_STATUS").unwrap_or(UNKNOWN);
    [
        ("Build hash", format!("{} ({})", hash, tree)),
        (
            "Built at",
            option_env!("BUDGET_TRACKER_BUILD_TIMESTAMP").unwrap_or(UNKNOWN).to_string(),
        ),
        (
            "Target",
            option_env!("BUDGET_TRACKER_BUILD_TARGET").unwrap_or(UNKNOWN).to_string(),
        ),
        (
            "Profile",
            option_env!("BUDGET_TRACKER_BUILD_PROFILE").unwrap_or(UNKNOWN).to_string(),
        ),
        (
            "Rustc",
            option_env!("BUDGET_TRACKER_BUILD_RUSTC").unwrap_or(UNKNOWN).to_string(),
        ),
    ]
}
