use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::error::SyncError;
use crate::http::HttpClient;
use crate::runtime::Runtime;
use crate::source::Asset;

/// Payloads below this size are error pages, not builds.
pub const MIN_PAYLOAD_BYTES: u64 = 1000;

/// A verified asset sitting in a temporary file.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedPayload {
    pub path: PathBuf,
    pub size: u64,
}

/// Path of the temporary file holding `asset` while it is published.
pub fn temp_path(work_dir: &Path, asset: &Asset) -> PathBuf {
    work_dir.join(format!("temp_{}", asset.name))
}

/// Downloads `asset` into `work_dir` and checks it looks like a real build.
///
/// On any failure the temporary file is removed before returning.
#[tracing::instrument(skip(runtime, http_client, asset), fields(asset = %asset.name))]
pub async fn download_asset<R: Runtime>(
    runtime: &R,
    http_client: &HttpClient,
    asset: &Asset,
    work_dir: &Path,
) -> Result<DownloadedPayload> {
    let path = temp_path(work_dir, asset);
    info!("Downloading {}...", asset.name);

    let downloaded = http_client
        .download_file(&asset.download_url, || {
            runtime
                .create_file(&path)
                .with_context(|| format!("Failed to create temporary file at {:?}", path))
        })
        .await
        .and_then(|size| verify_payload(runtime, &path, size).map(|()| size));

    match downloaded {
        Ok(size) => {
            info!("Download complete ({} bytes).", size);
            Ok(DownloadedPayload { path, size })
        }
        Err(e) => {
            discard_payload(runtime, &path);
            Err(e)
        }
    }
}

/// Removes the temporary payload file if it exists. Failures are only logged.
pub fn discard_payload<R: Runtime>(runtime: &R, path: &Path) {
    if !runtime.exists(path) {
        return;
    }
    if let Err(e) = runtime.remove_file(path) {
        warn!("Failed to remove temporary file {:?}: {:#}", path, e);
    }
}

fn verify_payload<R: Runtime>(runtime: &R, path: &Path, size: u64) -> Result<()> {
    if size >= MIN_PAYLOAD_BYTES {
        return Ok(());
    }

    let preview = runtime
        .read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();
    error!("Download content preview: {}", preview);

    Err(SyncError::DownloadIntegrity { size, preview }.into())
}
