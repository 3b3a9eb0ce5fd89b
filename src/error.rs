//! Domain errors raised while resolving and publishing a release.

use std::fmt;

/// Failures with a meaning of their own, as opposed to plain I/O errors.
///
/// These travel inside `anyhow::Error`; use `downcast_ref::<SyncError>()`
/// to tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Platform argument outside the supported set
    UnsupportedPlatform(String),
    /// A required secret is absent from the environment
    MissingSecret(&'static str),
    /// The source host has no release for the repository
    ReleaseNotFound(String),
    /// No release asset matches the platform rules
    AssetNotFound {
        platform: String,
        available: Vec<String>,
    },
    /// The downloaded payload is too small to be the real binary
    DownloadIntegrity { size: u64, preview: String },
    /// Uploading to a single endpoint failed
    Upload { endpoint: String, reason: String },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::UnsupportedPlatform(platform) => {
                write!(
                    f,
                    "Unsupported platform '{}'. Supported: android, windows, ios",
                    platform
                )
            }
            SyncError::MissingSecret(name) => write!(f, "{} is missing.", name),
            SyncError::ReleaseNotFound(repo) => {
                write!(
                    f,
                    "Could not fetch release info for {}. Check token/permissions.",
                    repo
                )
            }
            SyncError::AssetNotFound {
                platform,
                available,
            } => {
                write!(
                    f,
                    "Target asset for platform '{}' not found in release. Available assets: [{}]",
                    platform,
                    available.join(", ")
                )
            }
            SyncError::DownloadIntegrity { size, preview } => {
                write!(
                    f,
                    "Downloaded file is too small ({} bytes), likely an auth error. Content preview: {}",
                    size, preview
                )
            }
            SyncError::Upload { endpoint, reason } => {
                write!(f, "Upload to {} failed: {}", endpoint, reason)
            }
        }
    }
}

impl std::error::Error for SyncError {}
