use crate::config::ApiSettings;
use crate::domain::ports::{ListApi, Params};
use crate::utils::error::{RefileError, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

pub const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
pub const RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";

/// Remaining-call count below which every response logs a warning.
pub const LOW_QUOTA_THRESHOLD: i64 = 10;

/// Authenticated session against the Foursquare v2 API.
pub struct FoursquareSession {
    client: Client,
    base_url: String,
    oauth_token: String,
    version: String,
}

impl FoursquareSession {
    pub fn new(oauth_token: impl Into<String>, settings: &ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            oauth_token: oauth_token.into(),
            version: settings.version.clone(),
        })
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn check_rate_limits(headers: &HeaderMap) {
        if let Some(calls) = low_quota(headers) {
            tracing::warn!("⚠️ {} calls remaining to Foursquare API", calls);
            return;
        }
        match remaining_calls(headers) {
            Some(calls) => tracing::debug!("{} calls remaining to Foursquare API", calls),
            None => tracing::debug!("Response carried no {} header", RATE_LIMIT_REMAINING),
        }
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str, params: Params) -> Result<Value> {
        let response = request
            .query(&[("oauth_token", &self.oauth_token), ("v", &self.version)])
            .query(&params)
            .send()
            .await?;

        tracing::debug!("📡 {} -> {}", endpoint, response.status());
        Self::check_rate_limits(response.headers());

        let status = response.status();
        if !status.is_success() {
            let rate_limit_reset = response
                .headers()
                .get(RATE_LIMIT_RESET)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<i64>().ok());

            return Err(RefileError::HttpStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                rate_limit_reset,
            });
        }

        Ok(response.json().await?)
    }
}

fn remaining_calls(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
}

/// The remaining-call count when it is below [`LOW_QUOTA_THRESHOLD`].
pub fn low_quota(headers: &HeaderMap) -> Option<i64> {
    remaining_calls(headers).filter(|&calls| calls < LOW_QUOTA_THRESHOLD)
}

#[async_trait]
impl ListApi for FoursquareSession {
    async fn get_endpoint(&self, endpoint: &str, params: Params) -> Result<Value> {
        let request = self.client.get(self.url_for(endpoint));
        self.send(request, endpoint, params).await
    }

    async fn post_endpoint(&self, endpoint: &str, params: Params) -> Result<Value> {
        let request = self.client.post(self.url_for(endpoint));
        self.send(request, endpoint, params).await
    }
}
