// --- FILE: vaultsite-lib/src/utils.rs ---

/// Normalizes a user-supplied exclude pattern: trims whitespace, converts
/// backslashes to forward slashes and drops a leading `./`.
///
/// Returns an empty string for patterns that are blank after trimming, which
/// callers treat as "no pattern".
pub fn normalize_glob(pattern: &str) -> String {
    let mut normalized = pattern.trim().replace('\\', "/");
    while let Some(stripped) = normalized.strip_prefix("./") {
        normalized = stripped.to_string();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_prefix() {
        assert_eq!(normalize_glob("  drafts\\ "), "drafts/");
        assert_eq!(normalize_glob("./././private/*.md"), "private/*.md");
        assert_eq!(normalize_glob("*.tmp.md"), "*.tmp.md");
        assert_eq!(normalize_glob("   "), "");
    }
}
