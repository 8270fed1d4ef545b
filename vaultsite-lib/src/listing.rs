// --- FILE: vaultsite-lib/src/listing.rs ---

use std::path::{Path, PathBuf};

use ignore::gitignore::GitignoreBuilder;
use ignore::Match;
use log::{debug, error, warn};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::errors::{SiteError, SiteResult};

/// Directories that never hold publishable documents.
const DEFAULT_EXCLUDES: &[&str] = &[".git/", ".obsidian/"];

/// Lists every document below `vault_root` carrying the configured
/// extension, in a stable order (sorted by file name at each level).
///
/// `vault_root` should already be canonical. `skip_dir` (typically the
/// canonical output root when it lives inside the vault) is pruned from the
/// walk along with the default and user exclusions. Entries that cannot be
/// read during the walk are logged and skipped.
pub(crate) fn list_documents(
    vault_root: &Path,
    config: &SiteConfig,
    skip_dir: Option<&Path>,
) -> SiteResult<Vec<PathBuf>> {
    debug!("Listing documents using walkdir starting at: {:?}", vault_root);
    let mut files = Vec::new();

    let mut exclude_builder = GitignoreBuilder::new(vault_root);
    for pattern in DEFAULT_EXCLUDES {
        if let Err(e) = exclude_builder.add_line(None, pattern) {
            warn!(
                "Failed to add default exclusion pattern '{}': {}. It might not apply.",
                pattern, e
            );
        }
    }
    for pattern in &config.exclude_patterns {
        if let Err(e) = exclude_builder.add_line(None, pattern) {
            error!(
                "Failed to add exclude pattern '{}': {}. This pattern will be ignored.",
                pattern, e
            );
        }
    }
    let exclude_matcher = exclude_builder
        .build()
        .map_err(SiteError::GlobMatcherBuildError)?;

    let walker = WalkDir::new(vault_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match skip_dir {
            Some(skip) if entry.depth() > 0 => entry.path() != skip,
            _ => true,
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                let path_display = e.path().map_or_else(
                    || vault_root.display().to_string(),
                    |p| p.display().to_string(),
                );
                warn!(
                    "Skipping path due to error during walk near {}: {}",
                    path_display, e
                );
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == config.extension);
        if !has_extension {
            continue;
        }

        // matched_path_or_any_parents handles directory patterns like "drafts/"
        match exclude_matcher.matched_path_or_any_parents(path, false) {
            Match::None | Match::Whitelist(_) => files.push(path.to_path_buf()),
            Match::Ignore(_) => {
                debug!("Excluding document due to pattern match: {:?}", path);
            }
        }
    }

    Ok(files)
}
