//! Configuration and credential storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::{StoredToken, TokenStore};

pub const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com";

/// Application configuration
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Official account AppID
    pub app_id: Option<String>,
    /// Official account AppSecret
    pub secret: Option<String>,
    /// API base URL (defaults to api.weixin.qq.com)
    pub base_url: Option<String>,
    /// Cached access token
    pub access_token: Option<StoredToken>,
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "wechat-kf", "wechat-kf")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        // Set restrictive permissions on config file (contains the app secret)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    /// AppID and secret, if both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.app_id.as_deref(), self.secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }

    /// Parsed API base URL, falling back to the public endpoint.
    ///
    /// Always ends in `/` so relative API paths resolve under any prefix.
    pub fn base_url(&self) -> Result<url::Url> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let mut url =
            url::Url::parse(raw).with_context(|| format!("Invalid base_url in config: {}", raw))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

impl TokenStore for Config {
    fn get_access_token(&self) -> Option<StoredToken> {
        self.access_token.clone()
    }

    fn set_access_token(&mut self, token: String, expires_in: Option<u64>) {
        self.access_token = Some(StoredToken::new(token, expires_in));
    }

    fn clear_tokens(&mut self) {
        self.access_token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("wechat-kf-test-{}-{}", name, std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_missing_file_is_default() {
        let cfg = Config::load_from(&temp_config_path("missing")).unwrap();
        assert!(cfg.app_id.is_none());
        assert!(cfg.credentials().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_config_path("roundtrip");
        let mut cfg = Config {
            app_id: Some("wx123".into()),
            secret: Some("s3cret".into()),
            ..Default::default()
        };
        cfg.set_access_token("tok".into(), Some(7200));
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.credentials(), Some(("wx123", "s3cret")));
        assert_eq!(loaded.get_access_token().unwrap().token, "tok");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_base_url() {
        let mut cfg = Config::default();
        assert_eq!(cfg.base_url().unwrap().as_str(), "https://api.weixin.qq.com/");

        cfg.base_url = Some("not a url".into());
        assert!(cfg.base_url().is_err());
    }

    #[test]
    fn test_base_url_with_prefix() {
        let mut cfg = Config {
            base_url: Some("https://proxy.example.com/wechat".into()),
            ..Default::default()
        };
        let base = cfg.base_url().unwrap();
        assert_eq!(base.as_str(), "https://proxy.example.com/wechat/");
        assert_eq!(
            base.join("cgi-bin/token").unwrap().as_str(),
            "https://proxy.example.com/wechat/cgi-bin/token"
        );

        cfg.base_url = Some("https://proxy.example.com/wechat/".into());
        assert_eq!(cfg.base_url().unwrap().as_str(), "https://proxy.example.com/wechat/");
    }

    #[test]
    fn test_clear_tokens_keeps_credentials() {
        let mut cfg = Config {
            app_id: Some("wx123".into()),
            secret: Some("s3cret".into()),
            ..Default::default()
        };
        cfg.set_access_token("tok".into(), None);
        cfg.clear_tokens();
        assert!(cfg.get_access_token().is_none());
        assert!(cfg.credentials().is_some());
    }
}
