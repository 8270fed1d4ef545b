// --- FILE: vaultsite-lib/src/errors.rs ---

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a site with `vaultsite`.
///
/// Per-document variants (read, conversion, write, path) are collected into
/// the [`BuildReport`](crate::BuildReport) by default; template and
/// vault-level variants abort the build.
#[derive(Error, Debug)]
pub enum SiteError {
    /// The vault root provided in the `SiteConfig` was not found
    /// on the filesystem or was inaccessible due to permissions.
    #[error("Vault root not found or not accessible: {0}")]
    VaultNotFound(PathBuf),

    /// An I/O error occurred while inspecting a path (e.g. canonicalizing
    /// the vault or output root).
    #[error("IO error accessing path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source document could not be read.
    #[error("Failed to read document '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source document is not valid UTF-8.
    #[error("Document is not valid UTF-8: {0}")]
    NonUtf8Document(PathBuf),

    /// The content converter rejected a document.
    #[error("Failed to convert document '{path}': {message}")]
    ConversionError { path: PathBuf, message: String },

    /// An output file or one of its parent directories could not be written.
    #[error("Failed to write output '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template was missing, malformed, or referenced a binding that
    /// was not supplied.
    #[error("Template '{name}' failed: {source}")]
    TemplateError {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// A document path did not satisfy the segmenter's input constraints
    /// (relative, inside the vault, carrying the source extension).
    #[error("Invalid document path '{path}': {reason}")]
    InvalidDocumentPath { path: PathBuf, reason: String },

    /// Failed to build the glob pattern matcher from the patterns provided
    /// in `SiteConfig::exclude_patterns`.
    #[error("Failed to build glob pattern matcher: {0}")]
    GlobMatcherBuildError(#[source] ignore::Error),
}

/// A convenience type alias for `Result<T, SiteError>`.
pub type SiteResult<T> = Result<T, SiteError>;
