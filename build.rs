use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let tree = match stdout_of("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean".to_string(),
        Some(_) => "dirty".to_string(),
        None => UNKNOWN.to_string(),
    };
    let fields = [
        ("HASH", known(stdout_of("git", &["rev-parse", "--short", "HEAD"]))),
        ("STATUS", tree),
        (
            "TIMESTAMP",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        ),
        ("TARGET", known(env::var("TARGET").ok())),
        ("PROFILE", known(env::var("PROFILE").ok())),
        ("RUSTC", known(stdout_of("rustc", &["--version"]))),
    ];
    for (name, value) in fields {
        println!("cargo:rustc-env=BUDGET_TRACKER_BUILD_{name}={value}");
    }
}

/// Trimmed stdout of a successful command.
fn stdout_of(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}

fn known(value: Option<String>) -> String {
    value
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
