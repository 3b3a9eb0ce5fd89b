use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use reqwest::multipart::{Form, Part};

use crate::error::SyncError;
use crate::http::HttpClient;
use crate::platform::Platform;

/// Everything a distribution server receives for one publish.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub payload: Vec<u8>,
    pub version_code: u64,
    pub version_name: String,
    pub changelog: String,
    pub platform: Platform,
    /// `None` when the servers do not support the force flag
    pub force_update: Option<bool>,
}

impl Upload {
    /// The multipart form posted to `/upload`.
    pub fn form(&self) -> Result<Form> {
        let file = Part::bytes(self.payload.clone())
            .file_name(self.file_name.clone())
            .mime_str("application/octet-stream")
            .context("Invalid payload content type")?;

        let mut form = Form::new()
            .part("file", file)
            .text("versionCode", self.version_code.to_string())
            .text("versionName", self.version_name.clone())
            .text("content", self.changelog.clone())
            .text("platform", self.platform.to_string());

        if let Some(force) = self.force_update {
            form = form.text("forceUpdate", force.to_string());
        }

        Ok(form)
    }
}

/// Result of uploading to one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointOutcome {
    pub endpoint: String,
    pub result: Result<(), SyncError>,
}

impl EndpointOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Push `upload` to the distribution server at `endpoint`.
    async fn upload(&self, endpoint: &str, upload: &Upload) -> Result<()>;
}

/// Posts uploads to `{endpoint}/upload`, authenticated by the admin secret.
pub struct HttpPublisher {
    http_client: HttpClient,
    admin_secret: String,
}

impl HttpPublisher {
    pub fn new(http_client: HttpClient, admin_secret: String) -> Self {
        Self {
            http_client,
            admin_secret,
        }
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    #[tracing::instrument(skip(self, upload))]
    async fn upload(&self, endpoint: &str, upload: &Upload) -> Result<()> {
        let url = format!("{}/upload", endpoint.trim_end_matches('/'));
        self.http_client
            .post_multipart(&url, Some(&self.admin_secret), upload.form()?)
            .await
    }
}

/// Uploads to every endpoint in order. A failing endpoint is logged and
/// recorded; the remaining endpoints are still attempted.
pub async fn publish_all<P: Publisher + ?Sized>(
    publisher: &P,
    endpoints: &[String],
    upload: &Upload,
) -> Vec<EndpointOutcome> {
    let mut outcomes = Vec::with_capacity(endpoints.len());

    for endpoint in endpoints {
        info!(
            "Uploading to {} (Platform: {})...",
            endpoint, upload.platform
        );

        let result = match publisher.upload(endpoint, upload).await {
            Ok(()) => {
                info!("Upload to {} successful!", endpoint);
                Ok(())
            }
            Err(e) => {
                let err = SyncError::Upload {
                    endpoint: endpoint.clone(),
                    reason: format!("{:#}", e),
                };
                warn!("{}", err);
                Err(err)
            }
        };

        outcomes.push(EndpointOutcome {
            endpoint: endpoint.clone(),
            result,
        });
    }

    outcomes
}
