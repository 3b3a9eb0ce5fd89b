//! Release source abstraction.
//!
//! A source answers one question: what is the latest published release of a
//! repository. GitHub is the only implementation.

mod github;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use github::{DEFAULT_API_URL, GitHubSource};

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            anyhow::bail!("Invalid repository format. Expected 'owner/repo'.")
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Asset {
    pub name: String,
    /// URL serving the raw binary when requested as `application/octet-stream`
    pub download_url: String,
}

/// The latest release of a repository.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseInfo {
    /// Version tag (e.g., "v1.0.0")
    pub tag_name: String,
    /// Release notes; empty when the release has none
    pub body: String,
    /// Downloadable assets, in the order the host lists them
    pub assets: Vec<Asset>,
}

/// Trait for release sources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the latest release. A missing release is an error
    /// ([`SyncError::ReleaseNotFound`](crate::error::SyncError::ReleaseNotFound)).
    async fn latest_release(&self, repo: &RepoId) -> Result<ReleaseInfo>;
}
