//! Moving a release asset from the source host to the distribution servers.

mod download;
mod upload;

pub use download::{
    DownloadedPayload, MIN_PAYLOAD_BYTES, discard_payload, download_asset, temp_path,
};
#[cfg(test)]
pub use upload::MockPublisher;
pub use upload::{EndpointOutcome, HttpPublisher, Publisher, Upload, publish_all};
