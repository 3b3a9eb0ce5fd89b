//! Service factory for building the collaborators of a sync run.
//!
//! The GitHub token is only ever attached to requests sent to the source
//! host; distribution servers get a client without it.

use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    config::Config,
    http::HttpClient,
    source::GitHubSource,
    status::HttpStatusSource,
    transfer::HttpPublisher,
};

const USER_AGENT: &str = "relsync-cli";

/// Build an HTTP client with optional bearer token authentication
pub fn build_http_client(token: Option<&str>) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    if let Some(token) = token {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("HTTP client configured with authentication");
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?;

    Ok(HttpClient::new(client))
}

/// Everything [`VersionSync`](crate::sync::VersionSync) talks to.
pub struct Services {
    pub source: GitHubSource,
    pub status: HttpStatusSource,
    pub publisher: HttpPublisher,
    /// Authenticated against the source host, used for asset downloads
    pub downloader: HttpClient,
}

impl Services {
    pub fn build(config: &Config) -> Result<Self> {
        let github_client = build_http_client(Some(&config.github_token))?;
        let server_client = build_http_client(None)?;

        Ok(Self {
            source: GitHubSource::from_http_client(github_client.clone(), &config.api_url),
            status: HttpStatusSource::new(server_client.clone(), &config.status_endpoint),
            publisher: HttpPublisher::new(server_client, config.admin_secret.clone()),
            downloader: github_client,
        })
    }
}
