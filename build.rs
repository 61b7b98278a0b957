//! Embeds git/build metadata for the CLI version surfaces.
//!
//! Release pipelines override via env vars; local builds fall back to `git`
//! or stable "unknown" markers so the build never fails on metadata.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=NEBULA_BUILD_GIT_HASH");
    println!("cargo:rerun-if-env-changed=NEBULA_BUILD_TIMESTAMP");

    let git_hash = std::env::var("NEBULA_BUILD_GIT_HASH").unwrap_or_else(|_| git_short_hash());
    let timestamp = std::env::var("NEBULA_BUILD_TIMESTAMP").unwrap_or_else(|_| {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|delta| delta.as_secs())
            .unwrap_or(0);
        format!("unix:{secs}")
    });

    println!("cargo:rustc-env=NEBULA_BUILD_GIT_HASH={git_hash}");
    println!("cargo:rustc-env=NEBULA_BUILD_TIMESTAMP={timestamp}");
}

fn git_short_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short=12", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
