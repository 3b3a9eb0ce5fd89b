pub mod config;
pub mod error;
pub mod http;
pub mod platform;
pub mod runtime;
pub mod services;
pub mod source;
pub mod status;
pub mod sync;
pub mod transfer;
pub mod version;

use anyhow::Result;

use crate::config::{Config, ConfigOverrides};
use crate::runtime::Runtime;
use crate::services::Services;
use crate::sync::{SyncReport, SyncTarget, VersionSync};

/// Load the configuration, build the HTTP services and publish the latest
/// release for the configured platform.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn run<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<SyncReport> {
    let config = Config::load(runtime, overrides)?;
    log::info!("=== Running for platform: {} ===", config.platform);

    let services = Services::build(&config)?;
    let target = SyncTarget {
        repo: config.repo.clone(),
        endpoints: config.endpoints.clone(),
        work_dir: config.work_dir.clone(),
        options: config.decision,
    };

    VersionSync::new(
        runtime,
        &services.source,
        &services.status,
        &services.publisher,
        &services.downloader,
        target,
    )
    .run(config.platform)
    .await
}
