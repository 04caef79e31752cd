//! Authentication module for Official Account APIs
//!
//! Exchanges the AppID/AppSecret pair for a short-lived access token
//! (`client_credential` grant) and manages status/logout of the cache.

pub mod tokens;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::config::Config;
pub use tokens::{StoredToken, TokenStore};

/// Response from `/cgi-bin/token`
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    errcode: Option<i64>,
    errmsg: Option<String>,
}

/// Fetch a fresh access token.
/// Returns (access_token, expires_in_secs).
pub async fn fetch_access_token(
    http: &reqwest::Client,
    base_url: &url::Url,
    app_id: &str,
    secret: &str,
) -> Result<(String, Option<u64>)> {
    let url = base_url
        .join("cgi-bin/token")
        .context("Invalid token endpoint URL")?;

    tracing::debug!("Requesting access token for app {}", app_id);

    let resp = http
        .get(url)
        .query(&[
            ("grant_type", "client_credential"),
            ("appid", app_id),
            ("secret", secret),
        ])
        .send()
        .await
        .context("Failed to call token endpoint")?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!(
            "Access token request failed (HTTP {}): {}",
            status.as_u16(),
            body
        );
    }

    let body: AccessTokenResponse = resp
        .json()
        .await
        .context("Failed to parse token response")?;

    parse_token_response(body)
}

fn parse_token_response(body: AccessTokenResponse) -> Result<(String, Option<u64>)> {
    if let Some(code) = body.errcode.filter(|c| *c != 0) {
        bail!(
            "Access token request rejected ({}): {}",
            code,
            body.errmsg.unwrap_or_default()
        );
    }
    let token = body
        .access_token
        .filter(|t| !t.is_empty())
        .context("Token response has no access_token")?;
    Ok((token, body.expires_in))
}

/// Store app credentials, dropping any token cached for previous ones
pub async fn configure(app_id: &str, secret: &str, base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    config.app_id = Some(app_id.to_string());
    config.secret = Some(secret.to_string());
    if base_url.is_some() {
        config.base_url = base_url;
    }
    config.base_url()?;
    config.clear_tokens();
    config.save()?;

    println!("Saved credentials for {}.", app_id);
    Ok(())
}

/// Show current configuration and token state
pub async fn status() -> Result<()> {
    let config = Config::load()?;

    println!("Config: {}", Config::config_path()?.display());
    match config.app_id.as_deref() {
        Some(id) => println!("  AppID: {}", id),
        None => println!("  AppID: (not configured)"),
    }
    println!(
        "  Secret: {}",
        if config.secret.is_some() { "set" } else { "(not configured)" }
    );
    println!("  Base URL: {}", config.base_url()?);

    match config.get_access_token() {
        Some(t) if t.is_expired() => println!("  Access token: expired"),
        Some(_) => println!("  Access token: valid"),
        None => println!("  Access token: none"),
    }

    Ok(())
}

/// Clear the cached access token
pub async fn logout() -> Result<()> {
    let mut config = Config::load()?;
    config.clear_tokens();
    config.save()?;
    println!("Cached access token cleared.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> AccessTokenResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_token_ok() {
        let (token, expires) =
            parse_token_response(response(r#"{"access_token":"ACCESS","expires_in":7200}"#))
                .unwrap();
        assert_eq!(token, "ACCESS");
        assert_eq!(expires, Some(7200));
    }

    #[test]
    fn test_parse_token_errcode() {
        let err = parse_token_response(response(r#"{"errcode":40013,"errmsg":"invalid appid"}"#))
            .unwrap_err();
        assert!(err.to_string().contains("40013"));
        assert!(err.to_string().contains("invalid appid"));
    }

    #[test]
    fn test_parse_token_missing() {
        assert!(parse_token_response(response(r#"{"expires_in":7200}"#)).is_err());
    }
}
