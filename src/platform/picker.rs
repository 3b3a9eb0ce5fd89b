use anyhow::Result;

use super::Platform;
use crate::error::SyncError;
use crate::source::Asset;

/// Pick the release asset to publish for `platform`.
///
/// Rules, in release order:
/// - android: first `*.apk` whose name contains `arm64-v8a`
/// - windows: first `*.exe`, falling back to the first `*.msix`
/// - ios: first `*.ipa`
///
/// Fails with [`SyncError::AssetNotFound`] listing every asset name.
pub fn select_asset(platform: Platform, assets: &[Asset]) -> Result<&Asset> {
    let found = match platform {
        Platform::Android => assets
            .iter()
            .find(|a| a.name.contains("arm64-v8a") && a.name.ends_with(".apk")),
        Platform::Windows => assets
            .iter()
            .find(|a| a.name.ends_with(".exe"))
            .or_else(|| assets.iter().find(|a| a.name.ends_with(".msix"))),
        Platform::Ios => assets.iter().find(|a| a.name.ends_with(".ipa")),
    };

    found.ok_or_else(|| {
        SyncError::AssetNotFound {
            platform: platform.to_string(),
            available: assets.iter().map(|a| a.name.clone()).collect(),
        }
        .into()
    })
}
