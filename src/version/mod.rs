//! Version resolution: decides whether a release should be published and
//! under which version code.

mod notes;

use anyhow::Result;
use log::debug;

use crate::platform::{Platform, select_asset};
use crate::source::{Asset, ReleaseInfo};
use crate::status::DeployStatus;

pub use notes::{
    FALLBACK_CHANGELOG, force_update_requested, sanitize_changelog, version_code_override,
};

/// Feature switches for [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOptions {
    /// Honour `force: true` tokens in the release notes
    pub force_flag: bool,
}

impl Default for DecisionOptions {
    fn default() -> Self {
        Self { force_flag: true }
    }
}

/// Outcome of resolving one release against the deployed state.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDecision {
    pub version_name: String,
    pub version_code: u64,
    pub should_publish: bool,
    pub force_update: bool,
    pub selected_asset: Asset,
    /// Release notes with version code tokens removed
    pub changelog: String,
}

/// Tag without its leading `v`. Only one `v` is removed.
pub fn version_name(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Version code for `name`: pinned in the notes, or derived from the
/// currently deployed status.
///
/// Re-running for the version already deployed keeps its code, a new
/// version name bumps the code by one, and a first deploy starts at 1.
pub fn version_code(body: &str, name: &str, current: Option<&DeployStatus>) -> u64 {
    if let Some(code) = version_code_override(body) {
        debug!("Using version code {} pinned in release notes", code);
        return code;
    }

    match current {
        Some(status) if status.version_name == name => status.version_code,
        Some(status) => status.version_code.saturating_add(1),
        None => 1,
    }
}

/// Resolve `release` for `platform` against the currently deployed status.
///
/// Pure: performs no I/O. Fails only when the release carries no asset for
/// the platform.
pub fn decide(
    platform: Platform,
    release: &ReleaseInfo,
    current: Option<&DeployStatus>,
    options: DecisionOptions,
) -> Result<UpdateDecision> {
    let name = version_name(&release.tag_name);
    let code = version_code(&release.body, name, current);

    let should_publish = !matches!(
        current,
        Some(status) if status.version_name == name && status.version_code == code
    );

    let force_update = options.force_flag && force_update_requested(&release.body);
    let selected_asset = select_asset(platform, &release.assets)?.clone();

    Ok(UpdateDecision {
        version_name: name.to_string(),
        version_code: code,
        should_publish,
        force_update,
        selected_asset,
        changelog: sanitize_changelog(&release.body),
    })
}
