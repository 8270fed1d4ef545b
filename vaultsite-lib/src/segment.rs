// --- FILE: vaultsite-lib/src/segment.rs ---

use std::path::{Component, Path, PathBuf};

use crate::errors::{SiteError, SiteResult};
use crate::tree::LINK_KEY;

/// A document's location split into link-tree segments, plus the output link
/// derived from it.
///
/// Only [`DocumentPath::new`] builds one, so `segments` is never empty and
/// the link always uses `/` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    relative: PathBuf,
    segments: Vec<String>,
    link: String,
}

impl DocumentPath {
    /// Splits `relative` (a path below the vault root) into directory names
    /// followed by the file's base name, and derives its `.html` link.
    ///
    /// Both `/` and `\` count as separators so the result does not depend on
    /// the host convention. `.` components are dropped.
    ///
    /// # Errors
    /// [`SiteError::InvalidDocumentPath`] if the path is absolute, climbs out
    /// with `..`, is not UTF-8, does not end in `.<extension>`, or has a
    /// segment named [`LINK_KEY`].
    pub fn new(relative: &Path, extension: &str) -> SiteResult<Self> {
        let invalid = |reason: &str| SiteError::InvalidDocumentPath {
            path: relative.to_path_buf(),
            reason: reason.to_string(),
        };

        let mut parts: Vec<String> = Vec::new();
        for component in relative.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    return Err(invalid("path must be relative to the vault root"));
                }
                Component::ParentDir => {
                    return Err(invalid("path must not leave the vault root"));
                }
                Component::CurDir => {}
                Component::Normal(os) => {
                    let text = os
                        .to_str()
                        .ok_or_else(|| invalid("path is not valid UTF-8"))?;
                    parts.extend(
                        text.split(['/', '\\'])
                            .filter(|p| !p.is_empty() && *p != ".")
                            .map(str::to_string),
                    );
                }
            }
        }

        // Backslash-separated input is opaque to `components()` on unix.
        if parts.iter().any(|p| p == "..") {
            return Err(invalid("path must not leave the vault root"));
        }

        let file_name = parts.pop().ok_or_else(|| invalid("path is empty"))?;
        let suffix = format!(".{}", extension);
        let stem = file_name
            .strip_suffix(&suffix)
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| invalid(&format!("expected a '{}' document", suffix)))?
            .to_string();

        let mut link = String::new();
        for dir in &parts {
            link.push_str(dir);
            link.push('/');
        }
        link.push_str(&stem);
        link.push_str(".html");

        parts.push(stem);
        if parts.iter().any(|p| p == LINK_KEY) {
            return Err(invalid(&format!("'{}' is a reserved name", LINK_KEY)));
        }
        Ok(Self {
            relative: relative.to_path_buf(),
            segments: parts,
            link,
        })
    }

    /// The path this was built from, relative to the vault root.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Directory names followed by the document's base name.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Forward-slash link relative to the output root, e.g. `a/b/note.html`.
    pub fn output_link(&self) -> &str {
        &self.link
    }

    /// Base name of the document without extension.
    pub fn title(&self) -> &str {
        // segments is non-empty by construction
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Number of directories between the output root and this document.
    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }

    /// Relative prefix leading from this document back to the output root
    /// (`""` at the top level, `"../"` one level down, ...).
    pub fn root_prefix(&self) -> String {
        "../".repeat(self.depth())
    }

    /// Host path of the generated file below `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        let mut path = output_root.to_path_buf();
        for dir in &self.segments[..self.depth()] {
            path.push(dir);
        }
        path.push(format!("{}.html", self.title()));
        path
    }
}
