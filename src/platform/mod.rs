//! Target platforms and release asset selection
//!
//! Each distribution server tracks one published build per platform. This
//! module names the supported platforms and picks the release asset that
//! belongs to each of them.

mod picker;

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;

pub use picker::select_asset;

/// Platforms a build can be published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    #[default]
    Android,
    Windows,
    Ios,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Windows, Platform::Ios];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Windows => "windows",
            Platform::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    /// Exact, lowercase match only. The value ends up in server URLs and
    /// upload forms, so `Android` is rejected rather than normalized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SyncError::UnsupportedPlatform(s.to_string()).into())
    }
}
