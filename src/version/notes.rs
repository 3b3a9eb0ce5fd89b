//! Tokens embedded in release notes.
//!
//! Release authors steer a publish from the notes themselves: `vc: 12` or
//! `versionCode=12` pins the version code, `force: true` marks the update
//! as mandatory. Both patterns are anchored on ASCII word boundaries so
//! words like `abc: 3` or `enforce=yes` do not trigger them, while tokens
//! written directly against CJK text still do.

use regex::Regex;
use std::sync::LazyLock;

static VERSION_CODE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)(?:vc|versionCode)\s*[:=]?\s*([0-9]+)(?-u:\b)")
        .expect("version code pattern")
});

static FORCE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)(?:forceUpdate|force)\s*[:=]\s*(?:true|1|yes)(?-u:\b)")
        .expect("force pattern")
});

/// Changelog text used when nothing is left after sanitizing.
pub const FALLBACK_CHANGELOG: &str = "Update";

/// Manually pinned version code, if the notes carry one.
pub fn version_code_override(body: &str) -> Option<u64> {
    VERSION_CODE_TOKEN
        .captures_iter(body)
        .find_map(|caps| caps.get(1)?.as_str().parse().ok())
}

/// Whether the notes ask for a forced update.
pub fn force_update_requested(body: &str) -> bool {
    FORCE_TOKEN.is_match(body)
}

/// Release notes with version code tokens stripped, for display to users.
pub fn sanitize_changelog(body: &str) -> String {
    let cleaned = VERSION_CODE_TOKEN.replace_all(body, "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        FALLBACK_CHANGELOG.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_code_variants() {
        assert_eq!(version_code_override("vc: 7"), Some(7));
        assert_eq!(version_code_override("versionCode=7"), Some(7));
        assert_eq!(version_code_override("VC 12"), Some(12));
        assert_eq!(version_code_override("VersionCode:3"), Some(3));
        assert_eq!(version_code_override("vc=0"), Some(0));
    }

    #[test]
    fn test_version_code_first_match_wins() {
        assert_eq!(version_code_override("vc: 4\nversionCode: 9"), Some(4));
    }

    #[test]
    fn test_version_code_requires_word_boundary() {
        assert_eq!(version_code_override("see abc: 5 for details"), None);
        assert_eq!(version_code_override("vcs: 5"), None);
        assert_eq!(version_code_override("vc: 5a"), None);
    }

    #[test]
    fn test_version_code_next_to_cjk_text() {
        assert_eq!(version_code_override("版本vc: 12"), Some(12));
        assert_eq!(version_code_override("vc:12更新"), Some(12));
        assert_eq!(version_code_override("修复崩溃 vc: 12"), Some(12));
        assert_eq!(version_code_override("版本vc: ١٢"), None);
    }

    #[test]
    fn test_version_code_absent() {
        assert_eq!(version_code_override(""), None);
        assert_eq!(version_code_override("Fixed crash on startup"), None);
    }

    #[test]
    fn test_force_update_tokens() {
        assert!(force_update_requested("force: true"));
        assert!(force_update_requested("forceUpdate=1"));
        assert!(force_update_requested("FORCE = YES"));
        assert!(force_update_requested("notes\nforceupdate: True\n"));
    }

    #[test]
    fn test_force_update_next_to_cjk_text() {
        assert!(force_update_requested("强制force: true"));
        assert!(force_update_requested("forceUpdate=yes更新"));
    }

    #[test]
    fn test_force_update_rejects_other_values() {
        assert!(!force_update_requested("force: false"));
        assert!(!force_update_requested("force true"));
        assert!(!force_update_requested("enforce: true"));
        assert!(!force_update_requested("force: yesterday"));
        assert!(!force_update_requested(""));
    }

    #[test]
    fn test_sanitize_strips_token_and_trims() {
        assert_eq!(sanitize_changelog("Fixed bug. vc: 9"), "Fixed bug.");
        assert_eq!(
            sanitize_changelog("versionCode=3\n- New maps\n- Faster search\n"),
            "- New maps\n- Faster search"
        );
    }

    #[test]
    fn test_sanitize_removes_every_token() {
        assert_eq!(sanitize_changelog("vc: 1 Hello VC=2"), "Hello");
    }

    #[test]
    fn test_sanitize_strips_token_next_to_cjk_text() {
        assert_eq!(sanitize_changelog("修复崩溃。vc:12更新"), "修复崩溃。更新");
        assert_eq!(sanitize_changelog("版本vc: 12"), "版本");
    }

    #[test]
    fn test_sanitize_falls_back_when_empty() {
        assert_eq!(sanitize_changelog(""), "Update");
        assert_eq!(sanitize_changelog("  vc: 10  "), "Update");
    }
}
