/// Strips a single leading `^` or `~` from a version spec.
pub fn strip_range_prefix(spec: &str) -> &str {
    spec.strip_prefix(['^', '~']).unwrap_or(spec)
}

/// Returns true if a version spec names the same version as `affected`.
///
/// One leading `^` or `~` is ignored on either side. Other range syntax is
/// compared as plain text, so `>=1.0.0` never matches `1.0.0`.
pub fn versions_match(spec: &str, affected: &str) -> bool {
    let spec = strip_range_prefix(spec.trim());
    let affected = strip_range_prefix(affected.trim());

    // Try semver comparison first
    if let (Ok(spec_ver), Ok(affected_ver)) =
        (semver::Version::parse(spec), semver::Version::parse(affected))
    {
        return spec_ver == affected_ver;
    }

    spec == affected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_range_prefix() {
        assert_eq!(strip_range_prefix("^1.2.3"), "1.2.3");
        assert_eq!(strip_range_prefix("~1.2.3"), "1.2.3");
        assert_eq!(strip_range_prefix("1.2.3"), "1.2.3");
        assert_eq!(strip_range_prefix("^^1.2.3"), "^1.2.3");
    }

    #[test]
    fn test_versions_match_exact_and_prefixed() {
        assert!(versions_match("1.3.0", "1.3.0"));
        assert!(versions_match("^1.3.0", "1.3.0"));
        assert!(versions_match("~1.3.0", "1.3.0"));
        assert!(!versions_match("^1.3.0", "1.3.1"));
    }

    #[test]
    fn test_versions_match_prerelease() {
        assert!(versions_match("2.0.0-beta.1", "2.0.0-beta.1"));
        assert!(!versions_match("2.0.0-beta.1", "2.0.0"));
    }

    #[test]
    fn test_versions_match_non_semver_falls_back_to_text() {
        assert!(versions_match("latest", "latest"));
        assert!(versions_match("^8", "8"));
        assert!(!versions_match(">=1.0.0", "1.0.0"));
        assert!(!versions_match("1.x", "1.0.0"));
    }
}
