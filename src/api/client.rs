//! Authenticated HTTP client for the Official Account API
//!
//! Wraps reqwest::Client with automatic access token injection and refresh.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{self, TokenStore};
use crate::config::Config;

/// Client bound to one official account's credentials.
pub struct OfficialAccountClient {
    http: reqwest::Client,
    config: Config,
}

impl OfficialAccountClient {
    /// Load config and build client. Fetches a new access token if the cached one is expired.
    pub async fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config).await
    }

    pub async fn from_config(mut config: Config) -> Result<Self> {
        let http = reqwest::Client::new();

        let needs_refresh = config.get_access_token().map_or(true, |t| t.is_expired());
        if needs_refresh {
            let (app_id, secret) = config
                .credentials()
                .context("No app credentials. Run 'wechat-kf configure' first.")?;
            tracing::info!("Access token missing or expired, refreshing...");
            let (token, expires_in) =
                auth::fetch_access_token(&http, &config.base_url()?, app_id, secret).await?;
            config.set_access_token(token, expires_in);
            config.save()?;
            tracing::info!("Access token refreshed");
        }

        Ok(Self { http, config })
    }

    fn access_token(&self) -> Result<String> {
        let token = self
            .config
            .get_access_token()
            .context("No access token. Run 'wechat-kf configure' first.")?;
        if token.is_expired() {
            bail!("Access token expired. Run the command again to refresh it.");
        }
        Ok(token.token)
    }

    fn url(&self, path: &str) -> Result<url::Url> {
        let mut url = self
            .config
            .base_url()?
            .join(path)
            .with_context(|| format!("Invalid API path {}", path))?;
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token()?);
        Ok(url)
    }

    /// GET an API path and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!("GET {}", path);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;

        decode(check_response(resp, path).await?, path).await
    }

    /// POST a JSON body to an API path and decode the JSON reply.
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!("POST {}", path);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;

        decode(check_response(resp, path).await?, path).await
    }
}

/// Check HTTP response status code and return a clear error on failure.
async fn check_response(resp: reqwest::Response, path: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("HTTP {} for {}: {}", status.as_u16(), path, body);
    }
    Ok(resp)
}

/// Decode a JSON reply, turning a non-zero `errcode` into an error.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response, path: &str) -> Result<T> {
    let body: Value = resp
        .json()
        .await
        .with_context(|| format!("Failed to parse response from {}", path))?;
    check_errcode(&body, path)?;
    serde_json::from_value(body).with_context(|| format!("Unexpected response shape from {}", path))
}

/// The API reports failures in-band as `{"errcode": N, "errmsg": "..."}` with HTTP 200.
pub(crate) fn check_errcode(body: &Value, path: &str) -> Result<()> {
    let code = body.get("errcode").and_then(Value::as_i64).unwrap_or(0);
    if code != 0 {
        let msg = body.get("errmsg").and_then(Value::as_str).unwrap_or("");
        if code == 40001 || code == 42001 {
            bail!(
                "API error {} for {}: {}. Access token rejected -- run 'wechat-kf logout' and retry.",
                code,
                path,
                msg
            );
        }
        bail!("API error {} for {}: {}", code, path, msg);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_with_base(base_url: &str) -> OfficialAccountClient {
        let mut config = Config {
            base_url: Some(base_url.to_string()),
            ..Default::default()
        };
        config.set_access_token("tok".into(), Some(7200));
        OfficialAccountClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let client = client_with_base("https://proxy.example.com/wechat/");
        assert_eq!(
            client.url("cgi-bin/message/custom/send").unwrap().as_str(),
            "https://proxy.example.com/wechat/cgi-bin/message/custom/send?access_token=tok"
        );

        let client = client_with_base("https://api.weixin.qq.com");
        assert_eq!(
            client.url("cgi-bin/customservice/getkflist").unwrap().as_str(),
            "https://api.weixin.qq.com/cgi-bin/customservice/getkflist?access_token=tok"
        );
    }

    #[test]
    fn test_errcode_zero_is_ok() {
        assert!(check_errcode(&json!({"errcode": 0, "errmsg": "ok"}), "/x").is_ok());
        assert!(check_errcode(&json!({"kf_list": []}), "/x").is_ok());
    }

    #[test]
    fn test_errcode_nonzero_fails() {
        let err = check_errcode(
            &json!({"errcode": 45015, "errmsg": "response out of time limit"}),
            "/cgi-bin/message/custom/send",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("45015"));
        assert!(msg.contains("out of time limit"));
    }

    #[test]
    fn test_errcode_token_hint() {
        let err = check_errcode(&json!({"errcode": 42001, "errmsg": "expired"}), "/x").unwrap_err();
        assert!(err.to_string().contains("logout"));
    }
}
