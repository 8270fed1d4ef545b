// --- FILE: vaultsite-lib/src/convert.rs ---

use pulldown_cmark::{html, Options, Parser};

use crate::errors::SiteResult;

/// Turns one document's raw text into an HTML fragment.
///
/// Implementations that can reject input should return
/// [`SiteError::ConversionError`](crate::SiteError::ConversionError); the
/// driver fills in the document path when it logs the failure.
pub trait ContentConverter {
    fn convert(&self, source: &str) -> SiteResult<String>;
}

/// CommonMark converter with the common GitHub-style extensions switched on.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownConverter {
    options: Options,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }

    /// Plain CommonMark, no extensions.
    pub fn commonmark() -> Self {
        Self {
            options: Options::empty(),
        }
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentConverter for MarkdownConverter {
    fn convert(&self, source: &str) -> SiteResult<String> {
        let parser = Parser::new_ext(source, self.options);
        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}
