//! Compile-time build metadata exposed to CLI surfaces.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("NEBULA_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("NEBULA_BUILD_TIMESTAMP");

/// Help trailer block that surfaces build metadata in `nebula --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("NEBULA_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("NEBULA_BUILD_TIMESTAMP")
);

/// True for builds without release provenance. Dev builds never count
/// downloads against the hub and never self-update.
pub fn is_dev_build() -> bool {
    GIT_COMMIT == "unknown" || VERSION.ends_with("-dev")
}

/// Render CLI version block used by `nebula --version`.
pub fn cli_version_text() -> String {
    format!("nebula {VERSION}\ncommit: {GIT_COMMIT}\nbuilt: {BUILD_TIMESTAMP}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_version_text_includes_expected_lines() {
        let text = cli_version_text();
        assert!(text.starts_with("nebula "));
        assert!(text.contains("commit:"));
        assert!(text.contains("built:"));
    }

    #[test]
    fn help_metadata_mentions_commit_and_build_time() {
        assert!(HELP_BUILD_METADATA.contains("commit:"));
        assert!(HELP_BUILD_METADATA.contains("built:"));
    }
}
