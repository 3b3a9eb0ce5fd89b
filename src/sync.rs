//! Sync action - orchestrates one release publish.
//!
//! This action coordinates:
//! - Fetching the latest release from the source host
//! - Fetching the deployed status from the primary server
//! - Deciding whether (and as what) to publish
//! - Downloading the asset and uploading it to every endpoint

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::http::HttpClient;
use crate::platform::Platform;
use crate::runtime::Runtime;
use crate::source::{ReleaseSource, RepoId};
use crate::status::StatusSource;
use crate::transfer::{
    DownloadedPayload, EndpointOutcome, Publisher, Upload, discard_payload, download_asset,
    publish_all,
};
use crate::version::{DecisionOptions, UpdateDecision, decide};

/// What one run did.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncReport {
    /// The servers already serve this version
    Skipped(UpdateDecision),
    /// The asset was pushed; see per-endpoint outcomes
    Published {
        decision: UpdateDecision,
        outcomes: Vec<EndpointOutcome>,
    },
}

impl SyncReport {
    pub fn decision(&self) -> &UpdateDecision {
        match self {
            SyncReport::Skipped(decision) => decision,
            SyncReport::Published { decision, .. } => decision,
        }
    }
}

/// Where to read from and publish to.
#[derive(Debug, Clone)]
pub struct SyncTarget {
    pub repo: RepoId,
    pub endpoints: Vec<String>,
    pub work_dir: PathBuf,
    pub options: DecisionOptions,
}

/// Sync action - publishes the latest release for one platform
pub struct VersionSync<'a, R: Runtime> {
    runtime: &'a R,
    source: &'a dyn ReleaseSource,
    status: &'a dyn StatusSource,
    publisher: &'a dyn Publisher,
    downloader: &'a HttpClient,
    target: SyncTarget,
}

impl<'a, R: Runtime> VersionSync<'a, R> {
    pub fn new(
        runtime: &'a R,
        source: &'a dyn ReleaseSource,
        status: &'a dyn StatusSource,
        publisher: &'a dyn Publisher,
        downloader: &'a HttpClient,
        target: SyncTarget,
    ) -> Self {
        Self {
            runtime,
            source,
            status,
            publisher,
            downloader,
            target,
        }
    }

    /// Run the full fetch, decide, transfer sequence for `platform`.
    ///
    /// Endpoint failures do not fail the run; they are reported in
    /// [`SyncReport::Published`].
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, platform: Platform) -> Result<SyncReport> {
        info!("Fetching release info for {}...", self.target.repo);
        let release = self.source.latest_release(&self.target.repo).await?;

        let current = self.status.current_status(platform).await?;
        match &current {
            Some(status) => info!(
                "Currently deployed for {}: {} ({})",
                platform, status.version_name, status.version_code
            ),
            None => info!("Nothing deployed for {} yet", platform),
        }

        let decision = decide(platform, &release, current.as_ref(), self.target.options)?;
        info!(
            "Resolved version {} ({}), force update: {}",
            decision.version_name, decision.version_code, decision.force_update
        );

        if !decision.should_publish {
            info!("Version matches. Skipping.");
            return Ok(SyncReport::Skipped(decision));
        }

        let payload = download_asset(
            self.runtime,
            self.downloader,
            &decision.selected_asset,
            &self.target.work_dir,
        )
        .await?;

        let upload = match self.prepare_upload(platform, &decision, &payload) {
            Ok(upload) => upload,
            Err(e) => {
                discard_payload(self.runtime, &payload.path);
                return Err(e);
            }
        };

        let outcomes = publish_all(self.publisher, &self.target.endpoints, &upload).await;
        discard_payload(self.runtime, &payload.path);

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        if succeeded == outcomes.len() {
            info!("All servers sync completed!");
        } else {
            warn!(
                "Sync finished with {} of {} servers updated",
                succeeded,
                outcomes.len()
            );
        }

        Ok(SyncReport::Published { decision, outcomes })
    }

    fn prepare_upload(
        &self,
        platform: Platform,
        decision: &UpdateDecision,
        payload: &DownloadedPayload,
    ) -> Result<Upload> {
        let bytes = self
            .runtime
            .read(&payload.path)
            .with_context(|| format!("Failed to read downloaded file {:?}", payload.path))?;

        Ok(Upload {
            file_name: decision.selected_asset.name.clone(),
            payload: bytes,
            version_code: decision.version_code,
            version_name: decision.version_name.clone(),
            changelog: decision.changelog.clone(),
            platform,
            force_update: self
                .target
                .options
                .force_flag
                .then_some(decision.force_update),
        })
    }
}
