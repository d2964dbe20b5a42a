//! Build script for roomba - embeds a human-readable version string.
//!
//! The string is `<pkg version> (<git version>) <rustc version>`, where the
//! git version is `git describe --tags --always --dirty` when a tag exists,
//! and otherwise a pseudo-version `v{CARGO_PKG_VERSION}-{timestamp}-{commit}`.
//! Clean trees use the commit timestamp so the same commit yields the same
//! version; dirty trees use the build time and carry a `+dirty` suffix.

use std::process::Command;

use chrono::Utc;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn main() {
    ["src", "build.rs", "Cargo.toml", "Cargo.lock"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", version_string());
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `None` when git is unavailable or this is not a checkout.
fn is_dirty() -> Option<bool> {
    run("git", &["status", "--porcelain"]).map(|output| {
        output
            .lines()
            .filter_map(|line| line.get(3..))
            .any(|path| path != ".cargo-ok")
    })
    .or_else(|| run("git", &["rev-parse", "HEAD"]).map(|_| false))
}

fn pseudo_version() -> String {
    let commit = run("git", &["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".into());
    let dirty = is_dirty();

    let timestamp = match dirty {
        Some(false) => run("git", &["log", "-1", "--format=%ct"])
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string()),
        _ => None,
    }
    .unwrap_or_else(|| Utc::now().format(TIMESTAMP_FORMAT).to_string());

    let suffix = if dirty == Some(true) { "+dirty" } else { "" };
    format!("v{}-{timestamp}-{commit}{suffix}", env!("CARGO_PKG_VERSION"))
}

fn version_string() -> String {
    let git_version = run("git", &["describe", "--tags", "--always", "--dirty"])
        .filter(|desc| desc.contains('v') || desc.contains("-g"))
        .unwrap_or_else(pseudo_version);

    [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        Some(format!("({git_version})")),
        run("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}
