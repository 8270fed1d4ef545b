// --- FILE: vaultsite-lib/src/writer.rs ---

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{SiteError, SiteResult};

/// Persists generated pages below an output root.
#[derive(Debug, Clone)]
pub struct SiteWriter {
    output_root: PathBuf,
}

impl SiteWriter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Writes `html` to `path`, creating parent directories as needed.
    /// An existing file is replaced, never appended to.
    pub fn write(&self, path: &Path, html: &str) -> SiteResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SiteError::WriteError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        fs::write(path, html).map_err(|e| SiteError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("Wrote {} bytes to {:?}", html.len(), path);
        Ok(())
    }

    /// Writes `html` to `index.html` at the output root and returns its path.
    pub fn write_index(&self, html: &str) -> SiteResult<PathBuf> {
        let path = self.output_root.join("index.html");
        self.write(&path, html)?;
        Ok(path)
    }
}
