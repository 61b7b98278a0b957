//! HTTP client for the theme hub.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ApiError;

/// Production hub endpoint.
pub const DEFAULT_HUB_URL: &str = "https://nebula-hub.dev";

/// Request timeout for hub calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Author details nested in a theme response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorInfo {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
}

/// One published version of a theme.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub version_notes: String,
    #[serde(default)]
    pub dependencies: Vec<serde_json::Value>,
    #[serde(default)]
    pub installation_notes: String,
    pub created_at: String,
}

/// Theme metadata as served by the hub.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInfo {
    pub id: String,
    pub author: AuthorInfo,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub downloads: u64,
    pub color_scheme: Option<String>,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub versions: Vec<VersionInfo>,
    pub created_at: String,
    pub updated_at: String,
}

/// Source of theme content, abstracted so command flows can run against an
/// in-memory hub in tests.
#[async_trait]
pub trait ThemeSource: Send + Sync {
    /// Download raw theme content for one version.
    async fn fetch_theme(&self, author: &str, name: &str, version: &str)
        -> Result<String, ApiError>;

    /// Report one download to the hub. Best effort; callers log failures and
    /// never surface them.
    async fn record_download(&self, author: &str, name: &str) -> Result<(), ApiError>;
}

/// Client for the theme hub HTTP API.
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    base_url: String,
}

impl HubClient {
    /// Build a client against a hub base URL.
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch structured metadata for a theme.
    pub async fn theme_info(&self, author: &str, name: &str) -> Result<ThemeInfo, ApiError> {
        let url = format!("{}/api/theme/{author}/{name}", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16(), "theme not found".into()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ThemeSource for HubClient {
    async fn fetch_theme(
        &self,
        author: &str,
        name: &str,
        version: &str,
    ) -> Result<String, ApiError> {
        let url = format!(
            "{}/api/theme/{author}/{name}/{version}/download",
            self.base_url
        );
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::Status(status.as_u16(), detail));
        }
        Ok(response.text().await?)
    }

    async fn record_download(&self, author: &str, name: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/theme/download-count", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "author": author, "slug": name }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16(), String::new()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let client = HubClient::new("https://nebula-hub.dev///");
        assert_eq!(client.base_url, "https://nebula-hub.dev");
    }

    #[test]
    fn theme_info_payload_deserializes() {
        let raw = r#"{
            "id": "t_1",
            "author": { "id": "a_1", "name": "alice", "image": null, "bio": "prompt tinkerer" },
            "name": "Rainbow",
            "slug": "rainbow",
            "description": "A colorful prompt",
            "downloads": 1234,
            "colorScheme": "dark",
            "group": "community",
            "versions": [
                { "version": "1.2", "versionNotes": "fixes", "createdAt": "2025-11-02" }
            ],
            "createdAt": "2025-01-01",
            "updatedAt": "2025-11-02"
        }"#;
        let info: ThemeInfo = serde_json::from_str(raw).expect("should deserialize");
        assert_eq!(info.author.name, "alice");
        assert_eq!(info.downloads, 1234);
        assert_eq!(info.versions.len(), 1);
        assert_eq!(info.versions[0].version, "1.2");
        assert!(info.versions[0].installation_notes.is_empty());
    }
}
