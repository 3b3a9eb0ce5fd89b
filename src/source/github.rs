//! GitHub release source.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
#[cfg(test)]
use reqwest::Client;

use crate::error::SyncError;
use crate::http::HttpClient;

use super::{Asset, ReleaseInfo, ReleaseSource, RepoId};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub tag_name: String,
        pub body: Option<String>,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub name: String,
        /// API URL of the asset; works for private repositories
        pub url: String,
    }
}

/// GitHub source implementation.
pub struct GitHubSource {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubSource {
    /// Create a new GitHub source with custom API URL.
    /// Used primarily for testing.
    #[cfg(test)]
    pub fn with_api_url(client: Client, api_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(client),
            api_url: api_url.to_string(),
        }
    }

    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ReleaseSource for GitHubSource {
    #[tracing::instrument(skip(self))]
    async fn latest_release(&self, repo: &RepoId) -> Result<ReleaseInfo> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, repo.owner, repo.repo
        );
        debug!("Fetching latest release from {}...", url);

        let release: Option<api::Release> = self.http_client.get_optional_json(&url).await?;
        match release {
            Some(release) => Ok(release.into()),
            None => Err(SyncError::ReleaseNotFound(repo.to_string()).into()),
        }
    }
}

impl From<api::Release> for ReleaseInfo {
    fn from(r: api::Release) -> Self {
        ReleaseInfo {
            tag_name: r.tag_name,
            body: r.body.unwrap_or_default(),
            assets: r.assets.into_iter().map(|a| a.into()).collect(),
        }
    }
}

impl From<api::Asset> for Asset {
    fn from(a: api::Asset) -> Self {
        Asset {
            name: a.name,
            download_url: a.url,
        }
    }
}
