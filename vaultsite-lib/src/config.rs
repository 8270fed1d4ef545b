// --- FILE: vaultsite-lib/src/config.rs ---

use std::path::PathBuf;

/// Landing-page text used when no description is configured.
pub const DEFAULT_DESCRIPTION: &str =
    "Welcome to my site! Here you'll find links to various pages.";

/// Extension (without the dot) of the documents that get published.
pub const DEFAULT_EXTENSION: &str = "md";

/// Configuration for one site build.
///
/// The three paths are the core of the configuration surface; the remaining
/// fields tune which documents are picked up and how failures are handled.
/// It is typically constructed by the calling application (e.g., the CLI)
/// from defaults, config files and command line flags.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Root of the document tree to publish. Canonicalized internally.
    pub vault_path: PathBuf,

    /// Directory the generated `.html` files and `index.html` are written to.
    /// Created if missing. If it lives inside the vault it is skipped while
    /// listing documents.
    pub output_path: PathBuf,

    /// Directory holding `index.html` and, optionally, `page.html`.
    pub template_path: PathBuf,

    /// Plain text handed to the index template as `description`.
    pub description: String,

    /// Source extension without the leading dot, matched case-sensitively.
    pub extension: String,

    /// Glob patterns (using .gitignore syntax) excluding files or directories
    /// from the vault, in addition to the built-in `.git/` and `.obsidian/`.
    pub exclude_patterns: Vec<String>,

    /// If true, the first document that fails to read, convert or write
    /// aborts the build. Otherwise failures are collected in the report and
    /// the remaining documents are still processed.
    pub fail_fast: bool,
}

impl SiteConfig {
    /// Creates a configuration for the given paths with default settings
    /// for everything else.
    pub fn new(
        vault_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        template_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            vault_path: vault_path.into(),
            output_path: output_path.into(),
            template_path: template_path.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            exclude_patterns: Vec::new(),
            fail_fast: false,
        }
    }
}
