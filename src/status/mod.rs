//! Deploy status lookup.
//!
//! Each distribution server reports the build it currently serves per
//! platform at `GET {server}/update/{platform}`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::http::HttpClient;
use crate::platform::Platform;

/// What a distribution server currently serves for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeployStatus {
    #[serde(default)]
    pub version_name: String,
    #[serde(default)]
    pub version_code: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Current status for `platform`; `None` when nothing was ever published.
    async fn current_status(&self, platform: Platform) -> Result<Option<DeployStatus>>;
}

/// Reads the status from a distribution server over HTTP.
pub struct HttpStatusSource {
    http_client: HttpClient,
    server_url: String,
}

impl HttpStatusSource {
    pub fn new(http_client: HttpClient, server_url: &str) -> Self {
        Self {
            http_client,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    #[tracing::instrument(skip(self))]
    async fn current_status(&self, platform: Platform) -> Result<Option<DeployStatus>> {
        let url = format!("{}/update/{}", self.server_url, platform);
        debug!("Fetching deploy status from {}...", url);

        self.http_client
            .get_optional_json(&url)
            .await
            .with_context(|| format!("Failed to fetch deploy status from {}", url))
    }
}
