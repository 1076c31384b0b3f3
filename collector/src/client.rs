use model::{FetchFailure, Platform, RepoConfig};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid json body: {0}")]
    Body(#[from] serde_json::Error),
}

/// OpenDigger 静态指标接口客户端
#[derive(Clone, Debug)]
pub struct OpenDiggerClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenDiggerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// `{BASE}/{platform}/{org}/{repo}/{metric}.json`
    pub fn metric_url(&self, platform: Platform, org: &str, repo: &str, metric: &str) -> String {
        format!("{}/{}/{}/{}/{}.json", self.base_url, platform, org, repo, metric)
    }

    /// 单次 GET, 不重试. 2xx/3xx 以外的状态码、解析失败、超时都视为失败
    pub async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch_metric(
        &self,
        target: &RepoConfig,
        metric: &str,
    ) -> Result<Value, FetchFailure> {
        let url = self.metric_url(target.platform, &target.org, &target.repo, metric);
        self.get_json(&url).await.map_err(|e| FetchFailure {
            platform: target.platform,
            org: target.org.clone(),
            repo: target.repo.clone(),
            metric: metric.to_owned(),
            url,
            reason: e.to_string(),
        })
    }
}
