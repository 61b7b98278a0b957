//! `nebula update` — replace the running binary with the latest release.
//!
//! Releases publish one binary per platform plus a `checksums.txt` manifest.
//! The downloaded binary is verified against its SHA-256 entry before it is
//! renamed over the current executable, so a corrupt or tampered download
//! never replaces a working install.

use std::fs;
use std::time::Duration;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::build_info;
use crate::error::CliError;

use super::App;

const RELEASE_API_URL: &str = "https://api.github.com/repos/nebula-sh/nebula/releases/latest";
const RELEASE_DOWNLOAD_URL: &str = "https://github.com/nebula-sh/nebula/releases/latest/download";
const RELEASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Latest-release lookup payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub html_url: String,
}

pub async fn run(app: &App) -> Result<(), CliError> {
    if build_info::is_dev_build() {
        app.renderer
            .warn("This is a development build; self-update is disabled.");
        return Ok(());
    }

    let http = release_client();

    app.renderer.status("Checking for updates...");
    let release = latest_release(&http).await?;
    if !update_available(build_info::VERSION, &release.tag_name) {
        app.renderer.success(&format!(
            "You're already on the latest version ({})",
            release.tag_name
        ));
        return Ok(());
    }

    app.renderer
        .status(&format!("Updating to {}...", release.tag_name));
    let asset = release_asset_name()?;

    app.renderer.status("Fetching checksums...");
    let manifest = fetch_text(&http, &format!("{RELEASE_DOWNLOAD_URL}/checksums.txt")).await?;
    let expected = parse_checksum(&manifest, &asset)
        .ok_or_else(|| CliError::Update(format!("no checksum published for {asset}")))?;

    app.renderer.status(&format!("Downloading {asset}..."));
    let binary = fetch_bytes(&http, &format!("{RELEASE_DOWNLOAD_URL}/{asset}")).await?;

    let actual = sha256_hex(&binary);
    if !expected.eq_ignore_ascii_case(&actual) {
        return Err(CliError::Update(format!(
            "checksum mismatch for {asset}: expected {expected}, got {actual}. \
             The download may be corrupted or tampered with; try again."
        )));
    }
    app.renderer.success("Checksum verified");

    replace_current_exe(&binary)?;
    app.renderer
        .success(&format!("Updated to {}", release.tag_name));
    Ok(())
}

fn release_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(RELEASE_TIMEOUT)
        // GitHub rejects requests without a user agent.
        .user_agent(concat!("nebula/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

async fn latest_release(http: &reqwest::Client) -> Result<ReleaseInfo, CliError> {
    let response = http
        .get(RELEASE_API_URL)
        .send()
        .await
        .map_err(|e| CliError::Update(format!("failed to check for updates: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Update(format!(
            "release lookup returned {}",
            status.as_u16()
        )));
    }
    response
        .json()
        .await
        .map_err(|e| CliError::Update(format!("failed to parse release info: {e}")))
}

async fn fetch_text(http: &reqwest::Client, url: &str) -> Result<String, CliError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| CliError::Update(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Update(format!(
            "{url} returned {}",
            status.as_u16()
        )));
    }
    response
        .text()
        .await
        .map_err(|e| CliError::Update(e.to_string()))
}

async fn fetch_bytes(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, CliError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| CliError::Update(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Update(format!(
            "{url} returned {}",
            status.as_u16()
        )));
    }
    Ok(response
        .bytes()
        .await
        .map_err(|e| CliError::Update(e.to_string()))?
        .to_vec())
}

/// A newer release exists when the tags differ (releases never roll back).
fn update_available(current: &str, latest_tag: &str) -> bool {
    let current = current.trim_start_matches('v');
    let latest = latest_tag.trim_start_matches('v');
    !latest.is_empty() && current != latest
}

/// Release asset name for this platform.
fn release_asset_name() -> Result<String, CliError> {
    if std::env::consts::OS == "windows" {
        return Err(CliError::Update(
            "windows is not supported yet".to_string(),
        ));
    }
    Ok(format!(
        "nebula-{}-{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    ))
}

/// Extract the SHA-256 entry for `asset` from a `hash  filename` manifest.
fn parse_checksum(manifest: &str, asset: &str) -> Option<String> {
    for line in manifest.lines() {
        let mut fields = line.split_whitespace();
        let Some(hash) = fields.next() else {
            continue;
        };
        let Some(file_name) = fields.last() else {
            continue;
        };
        if file_name == asset {
            // Anything that is not 64 hex chars is not a SHA-256 manifest line.
            if hash.len() == 64 && hash.chars().all(|ch| ch.is_ascii_hexdigit()) {
                return Some(hash.to_string());
            }
            return None;
        }
    }
    None
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Write the verified binary next to the current executable, then rename it
/// into place. The sibling location keeps the rename on one filesystem.
fn replace_current_exe(binary: &[u8]) -> Result<(), CliError> {
    let exe = std::env::current_exe()
        .map_err(|e| CliError::Update(format!("failed to locate current executable: {e}")))?;
    let file_name = exe
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "nebula".to_string());
    let tmp_path = exe.with_file_name(format!(".{file_name}.update"));

    fs::write(&tmp_path, binary)
        .map_err(|e| CliError::Update(format!("failed to stage update: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o755)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CliError::Update(format!(
                "failed to mark update executable: {e}"
            )));
        }
    }

    if let Err(e) = fs::rename(&tmp_path, &exe) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CliError::Update(format!(
            "failed to install update over {}: {e}",
            exe.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "\
0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef  nebula-linux-x86_64
fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210  nebula-macos-aarch64
";

    #[test]
    fn parse_checksum_finds_matching_asset() {
        let hash = parse_checksum(MANIFEST, "nebula-macos-aarch64").expect("should match");
        assert!(hash.starts_with("fedcba"));
    }

    #[test]
    fn parse_checksum_misses_unknown_asset() {
        assert!(parse_checksum(MANIFEST, "nebula-freebsd-x86_64").is_none());
    }

    #[test]
    fn parse_checksum_rejects_short_hashes() {
        assert!(parse_checksum("abc123  nebula-linux-x86_64", "nebula-linux-x86_64").is_none());
    }

    #[test]
    fn update_available_ignores_v_prefix() {
        assert!(!update_available("0.3.1", "v0.3.1"));
        assert!(update_available("0.3.1", "v0.4.0"));
        assert!(!update_available("0.3.1", ""));
    }

    #[test]
    fn sha256_hex_matches_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn release_payload_deserializes() {
        let raw = r#"{ "tag_name": "v0.4.0", "html_url": "https://example.test/r" }"#;
        let release: ReleaseInfo = serde_json::from_str(raw).expect("should deserialize");
        assert_eq!(release.tag_name, "v0.4.0");
    }
}
