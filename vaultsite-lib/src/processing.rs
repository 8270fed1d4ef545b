// --- FILE: vaultsite-lib/src/processing.rs ---

use std::fs;
use std::path::Path;

use log::debug;

use crate::convert::ContentConverter;
use crate::errors::{SiteError, SiteResult};
use crate::segment::DocumentPath;
use crate::template::SiteTemplates;
use crate::writer::SiteWriter;

/// Reads one document, converts it, wraps it in the page template (if any)
/// and writes it below the output root.
///
/// `source` is the absolute path of the file; `document` its segmented form
/// relative to the vault. Nothing is written unless every earlier step
/// succeeded.
pub(crate) fn process_document(
    source: &Path,
    document: &DocumentPath,
    converter: &dyn ContentConverter,
    templates: &SiteTemplates,
    writer: &SiteWriter,
) -> SiteResult<()> {
    debug!("Processing document: {:?}", source);

    let bytes = fs::read(source).map_err(|e| SiteError::ReadError {
        path: source.to_path_buf(),
        source: e,
    })?;
    let text =
        String::from_utf8(bytes).map_err(|_| SiteError::NonUtf8Document(source.to_path_buf()))?;

    let body = converter.convert(&text).map_err(|e| match e {
        // Converters do not know the path; attach it here.
        SiteError::ConversionError { message, .. } => SiteError::ConversionError {
            path: source.to_path_buf(),
            message,
        },
        other => other,
    })?;

    let html = templates.render_page(document, body)?;
    writer.write(&document.output_path(writer.output_root()), &html)
}
