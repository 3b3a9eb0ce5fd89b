//! Run configuration: command line values, defaults and secrets.

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::error::SyncError;
use crate::platform::Platform;
use crate::runtime::Runtime;
use crate::source::{DEFAULT_API_URL, RepoId};
use crate::version::DecisionOptions;

pub const ADMIN_SECRET_VAR: &str = "ADMIN_SECRET";
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

pub const DEFAULT_REPO: &str = "Invis1ble-2/Grenade_Helper";

/// Distribution servers, primary first. The second one keeps older app
/// builds that still poll it supplied with updates.
pub const DEFAULT_SERVERS: [&str; 2] = [
    "https://cdn.grenade-helper.top:8443",
    "https://app-grenade-helper.zeabur.app",
];

/// Values supplied on the command line. `None` means "use the default".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub platform: Option<String>,
    pub repo: Option<String>,
    pub api_url: Option<String>,
    pub servers: Vec<String>,
    pub status_server: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub no_force_flag: bool,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub platform: Platform,
    pub repo: RepoId,
    pub api_url: String,
    /// Upload targets, in upload order
    pub endpoints: Vec<String>,
    /// Server asked for the currently deployed version
    pub status_endpoint: String,
    pub work_dir: PathBuf,
    pub decision: DecisionOptions,
    pub admin_secret: String,
    pub github_token: String,
}

impl Config {
    /// Resolve the configuration.
    ///
    /// The platform is validated first, then the secrets are read; nothing
    /// here touches the network.
    pub fn load<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let platform: Platform = overrides
            .platform
            .as_deref()
            .unwrap_or(Platform::default().as_str())
            .parse()?;

        let admin_secret = required_secret(runtime, ADMIN_SECRET_VAR)?;
        let github_token = required_secret(runtime, GITHUB_TOKEN_VAR)?;
        debug!("Using GITHUB_TOKEN for authentication: {}", mask_token(&github_token));

        let repo: RepoId = overrides.repo.as_deref().unwrap_or(DEFAULT_REPO).parse()?;

        let endpoints: Vec<String> = if overrides.servers.is_empty() {
            DEFAULT_SERVERS.iter().map(|s| s.to_string()).collect()
        } else {
            overrides
                .servers
                .iter()
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };
        if endpoints.is_empty() {
            anyhow::bail!("At least one distribution server is required.");
        }

        let status_endpoint = match overrides.status_server {
            Some(server) => {
                let server = server.trim().trim_end_matches('/');
                if server.is_empty() {
                    anyhow::bail!("The status server URL must not be empty.");
                }
                server.to_string()
            }
            None => endpoints[0].clone(),
        };

        let work_dir = match overrides.work_dir {
            Some(dir) => dir,
            None => runtime.current_dir()?,
        };

        Ok(Self {
            platform,
            repo,
            api_url: overrides
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            endpoints,
            status_endpoint,
            work_dir,
            decision: DecisionOptions {
                force_flag: !overrides.no_force_flag,
            },
            admin_secret,
            github_token,
        })
    }
}

fn required_secret<R: Runtime>(runtime: &R, name: &'static str) -> Result<String> {
    match runtime.env_var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(SyncError::MissingSecret(name).into()),
    }
}

/// First and last few characters of a secret, for logs.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
