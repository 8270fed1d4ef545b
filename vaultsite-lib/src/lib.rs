// --- FILE: vaultsite-lib/src/lib.rs ---

#![doc = include_str!("../README.md")]

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use log::{debug, info, warn};

mod config;
mod convert;
mod errors;
mod listing;
mod processing;
mod segment;
mod template;
mod tree;
mod utils;
mod writer;

pub use config::{SiteConfig, DEFAULT_DESCRIPTION, DEFAULT_EXTENSION};
pub use convert::{ContentConverter, MarkdownConverter};
pub use errors::{SiteError, SiteResult};
pub use segment::DocumentPath;
pub use template::{SiteTemplates, INDEX_TEMPLATE, PAGE_TEMPLATE};
pub use tree::{render_navigation, LinkTree, LinkTreeNode, LINK_KEY};
pub use utils::normalize_glob;
pub use writer::SiteWriter;

/// A document that could not be published.
#[derive(Debug)]
pub struct DocumentFailure {
    /// Absolute path of the source document.
    pub path: PathBuf,
    pub error: SiteError,
}

/// Two documents that mapped to the same link; the later one in traversal
/// order replaced the earlier one both in the index and on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCollision {
    pub link: String,
    /// Vault-relative path of the document that was replaced.
    pub replaced: PathBuf,
    /// Vault-relative path of the document that won.
    pub winner: PathBuf,
}

/// Outcome of [`build_site`].
#[derive(Debug)]
pub struct BuildReport {
    /// Number of documents converted and written.
    pub documents_written: usize,
    /// Number of documents linked from the index.
    pub documents_linked: usize,
    pub failures: Vec<DocumentFailure>,
    pub collisions: Vec<LinkCollision>,
    /// Documents whose written page was replaced by the generated index
    /// (a root `index` document). They stay linked from the index.
    pub shadowed: Vec<PathBuf>,
    /// Location of the generated `index.html`.
    pub index_path: PathBuf,
}

impl BuildReport {
    /// True when every listed document was written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds the site described by `config` using the default Markdown converter.
///
/// See [`build_site_with`].
pub fn build_site(config: &SiteConfig) -> SiteResult<BuildReport> {
    build_site_with(config, &MarkdownConverter::new())
}

/// Builds the site described by `config`, converting documents with
/// `converter`.
///
/// Every document below the vault root carrying the configured extension is
/// read, converted, written to the mirrored location below the output root
/// and recorded in a [`LinkTree`]. Once all documents are processed the tree
/// is rendered through the `index.html` template into the output root.
///
/// # Errors
///
/// * [`SiteError::VaultNotFound`] / [`SiteError::IoError`] if the vault root
///   cannot be resolved.
/// * [`SiteError::TemplateError`] if `index.html` is missing or fails to
///   render. Templates are loaded before anything is written.
/// * [`SiteError::GlobMatcherBuildError`] for unusable exclude patterns.
/// * [`SiteError::WriteError`] if the index cannot be written.
/// * With `fail_fast` set, the first per-document error.
///
/// Without `fail_fast`, per-document read, conversion and write errors are
/// logged, collected in [`BuildReport::failures`] and the build carries on;
/// failed documents do not appear in the index.
pub fn build_site_with(
    config: &SiteConfig,
    converter: &dyn ContentConverter,
) -> SiteResult<BuildReport> {
    info!("Starting site build with config: {:?}", config);

    let vault_root = config.vault_path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            SiteError::VaultNotFound(config.vault_path.clone())
        } else {
            SiteError::IoError {
                path: config.vault_path.clone(),
                source: e,
            }
        }
    })?;
    debug!("Canonical vault root: {:?}", vault_root);

    let templates = SiteTemplates::load(&config.template_path)?;

    // An output root from an earlier run may sit inside the vault.
    let skip_dir = config
        .output_path
        .canonicalize()
        .ok()
        .filter(|out| out.starts_with(&vault_root) && *out != vault_root);
    if let Some(dir) = &skip_dir {
        debug!("Output root {:?} is inside the vault; skipping it", dir);
    }

    let files = listing::list_documents(&vault_root, config, skip_dir.as_deref())?;
    info!("Found {} documents to publish.", files.len());
    if files.is_empty() {
        warn!("No documents found; the index will be empty.");
    }

    let writer = SiteWriter::new(&config.output_path);
    let mut tree = LinkTree::new();
    let mut sources: HashMap<String, PathBuf> = HashMap::new();
    let mut report = BuildReport {
        documents_written: 0,
        documents_linked: 0,
        failures: Vec::new(),
        collisions: Vec::new(),
        shadowed: Vec::new(),
        index_path: writer.output_root().join(INDEX_TEMPLATE),
    };

    for file in &files {
        let outcome = file
            .strip_prefix(&vault_root)
            .map_err(|_| SiteError::InvalidDocumentPath {
                path: file.clone(),
                reason: "document is not below the vault root".to_string(),
            })
            .and_then(|relative| DocumentPath::new(relative, &config.extension))
            .and_then(|document| {
                processing::process_document(file, &document, converter, &templates, &writer)?;
                Ok(document)
            });

        let document = match outcome {
            Ok(document) => document,
            Err(e) if config.fail_fast => return Err(e),
            Err(e) => {
                warn!("Failed to publish {:?}: {}", file, e);
                report.failures.push(DocumentFailure {
                    path: file.clone(),
                    error: e,
                });
                continue;
            }
        };

        report.documents_written += 1;
        if document.output_link() == INDEX_TEMPLATE {
            warn!("{:?} will be replaced on disk by the generated index", file);
            report.shadowed.push(file.clone());
        }
        let replaced = tree.insert(&document);
        let previous = sources.insert(
            document.output_link().to_string(),
            document.relative().to_path_buf(),
        );
        if let (Some(link), Some(previous)) = (replaced, previous) {
            if previous != document.relative() {
                warn!(
                    "{:?} and {:?} both map to '{}'; keeping {:?}",
                    previous,
                    document.relative(),
                    link,
                    document.relative()
                );
                report.collisions.push(LinkCollision {
                    link,
                    replaced: previous,
                    winner: document.relative().to_path_buf(),
                });
            }
        }
    }

    debug!("Generated link structure: {:?}", tree);
    report.documents_linked = tree.document_count();

    let index_html = templates.render_index(&tree, &config.description)?;
    report.index_path = writer.write_index(&index_html)?;

    info!(
        "Wrote {} documents and {:?} ({} failed, {} collisions).",
        report.documents_written,
        report.index_path,
        report.failures.len(),
        report.collisions.len()
    );
    Ok(report)
}
