//! HTTP client shared by the sweep phases; one handle per account.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::platform_types::{ChannelPage, ChannelSummary, ProxySession};
use crate::PlatformError;

const ERROR_BODY_LIMIT: usize = 600;

#[derive(Debug, Deserialize)]
struct SessionListResponse {
    sessions: Vec<ProxySession>,
}

#[derive(Debug, Deserialize)]
struct ChannelPageResponse {
    channels: Vec<ChannelSummary>,
    #[serde(default)]
    meta: PageMeta,
}

#[derive(Debug, Default, Deserialize)]
struct PageMeta {
    #[serde(default)]
    next_page_url: Option<String>,
}

/// Connection settings for one platform account.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub api_base: String,
    pub account_sid: String,
    pub auth_token: String,
    pub proxy_service_sid: String,
    pub chat_service_sid: String,
    pub request_timeout_ms: u64,
}

/// Handle for all remote calls; cheap to clone, no interior state beyond the
/// connection pool.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    config: PlatformConfig,
}

impl PlatformClient {
    pub fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        if config.account_sid.trim().is_empty() || config.auth_token.trim().is_empty() {
            return Err(PlatformError::MissingCredentials);
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("sweep-cli"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;

        Ok(Self {
            http,
            config: PlatformConfig {
                api_base: config.api_base.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }

    fn sessions_url(&self) -> String {
        format!(
            "{}/v1/Services/{}/Sessions",
            self.config.api_base, self.config.proxy_service_sid
        )
    }

    fn channels_url(&self) -> String {
        format!(
            "{}/v2/Services/{}/Channels",
            self.config.api_base, self.config.chat_service_sid
        )
    }

    /// Lists every session on the proxy service, whatever its status.
    pub async fn list_sessions(&self) -> Result<Vec<ProxySession>, PlatformError> {
        let response: SessionListResponse = self.get_json("session list", &self.sessions_url()).await?;
        Ok(response.sessions)
    }

    /// Point lookup for a single session; a 404 from the platform maps to
    /// `Ok(None)` so callers can tell "gone" from "request failed".
    pub async fn fetch_session(
        &self,
        session_sid: &str,
    ) -> Result<Option<ProxySession>, PlatformError> {
        let url = format!("{}/{session_sid}", self.sessions_url());
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status("session fetch", response).await?;
        Ok(Some(response.json::<ProxySession>().await?))
    }

    /// Transitions a session to `closed`.
    pub async fn close_session(&self, session_sid: &str) -> Result<ProxySession, PlatformError> {
        let url = format!("{}/{session_sid}", self.sessions_url());
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .json(&json!({ "status": "closed" }))
            .send()
            .await?;
        let response = check_status("session close", response).await?;
        Ok(response.json::<ProxySession>().await?)
    }

    /// Fetches the first channel page at the given page size.
    pub async fn channel_page(&self, page_size: usize) -> Result<ChannelPage, PlatformError> {
        let request = self
            .http
            .get(self.channels_url())
            .query(&[("PageSize", page_size.to_string())]);
        self.fetch_page(request).await
    }

    /// Fetches a later page via the absolute URL from page metadata.
    pub async fn channel_page_at(&self, page_url: &str) -> Result<ChannelPage, PlatformError> {
        self.fetch_page(self.http.get(page_url)).await
    }

    async fn fetch_page(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ChannelPage, PlatformError> {
        let response = request
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;
        let response = check_status("channel page", response).await?;
        let page: ChannelPageResponse = response.json().await?;
        Ok(ChannelPage {
            channels: page.channels,
            next_page_url: page.meta.next_page_url,
        })
    }

    /// Fetches one channel's current state, attributes included.
    pub async fn fetch_channel(&self, channel_sid: &str) -> Result<ChannelSummary, PlatformError> {
        let url = format!("{}/{channel_sid}", self.channels_url());
        self.get_json("channel fetch", &url).await
    }

    /// Replaces a channel's attribute blob with the given serialized JSON.
    pub async fn update_channel_attributes(
        &self,
        channel_sid: &str,
        attributes: &str,
    ) -> Result<(), PlatformError> {
        let url = format!("{}/{channel_sid}", self.channels_url());
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .json(&json!({ "attributes": attributes }))
            .send()
            .await?;
        check_status("channel update", response).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &str,
    ) -> Result<T, PlatformError> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;
        let response = check_status(operation, response).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn check_status(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, PlatformError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PlatformError::HttpStatus {
        operation,
        status: status.as_u16(),
        body: truncate_for_error(&body, ERROR_BODY_LIMIT),
    })
}

fn truncate_for_error(body: &str, limit: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    let prefix: String = trimmed.chars().take(limit).collect();
    format!("{} [truncated]", prefix.trim_end())
}
