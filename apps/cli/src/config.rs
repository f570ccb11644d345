//! CLI configuration.
//!
//! Reads `appsettings.json` from the working directory. The file format is
//! camelCase JSON with two sections:
//!
//! ```json
//! {
//!   "apiSettings": { "baseUrl": "https://fs.example", "apiKey": "..." },
//!   "uploadSettings": { "concurrentUploads": 4, "expiry": "1d" }
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

fn default_concurrent_uploads() -> usize {
    4
}

fn default_expiry() -> String {
    "1d".into()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadSettings {
    #[serde(default = "default_concurrent_uploads")]
    concurrent_uploads: usize,
    #[serde(default = "default_expiry")]
    expiry: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            concurrent_uploads: default_concurrent_uploads(),
            expiry: default_expiry(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    api_settings: ApiSettings,
    #[serde(default)]
    upload_settings: UploadSettings,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub concurrent_uploads: usize,
    pub expiry: String,
}

impl Config {
    /// Loads and validates configuration from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let file: SettingsFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        // Fix the common trailing-slash input error.
        let base_url = file.api_settings.base_url.trim_end_matches('/').to_string();
        anyhow::ensure!(!base_url.is_empty(), "apiSettings.baseUrl is missing");
        anyhow::ensure!(
            !file.api_settings.api_key.is_empty(),
            "apiSettings.apiKey is missing"
        );

        Ok(Self {
            base_url,
            api_key: file.api_settings.api_key,
            concurrent_uploads: file.upload_settings.concurrent_uploads.max(1),
            expiry: file.upload_settings.expiry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, json: &str) -> std::path::PathBuf {
        let path = dir.path().join("appsettings.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn loads_complete_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "apiSettings": { "baseUrl": "https://fs.example", "apiKey": "k-123" },
                "uploadSettings": { "concurrentUploads": 8, "expiry": "7d" }
            }"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "https://fs.example");
        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.concurrent_uploads, 8);
        assert_eq!(config.expiry, "7d");
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"apiSettings": { "baseUrl": "https://fs.example/", "apiKey": "k" }}"#,
        );
        assert_eq!(Config::load(&path).unwrap().base_url, "https://fs.example");
    }

    #[test]
    fn upload_settings_default_when_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"apiSettings": { "baseUrl": "https://fs.example", "apiKey": "k" }}"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.concurrent_uploads, 4);
        assert_eq!(config.expiry, "1d");
    }

    #[test]
    fn zero_concurrency_is_clamped_to_one() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "apiSettings": { "baseUrl": "https://fs.example", "apiKey": "k" },
                "uploadSettings": { "concurrentUploads": 0 }
            }"#,
        );
        assert_eq!(Config::load(&path).unwrap().concurrent_uploads, 1);
    }

    #[test]
    fn missing_api_key_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"apiSettings": { "baseUrl": "https://fs.example", "apiKey": "" }}"#,
        );
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(&dir.path().join("nope.json")).is_err());
    }
}
