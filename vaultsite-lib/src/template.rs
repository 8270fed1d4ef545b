// --- FILE: vaultsite-lib/src/template.rs ---

use std::path::Path;

use log::{debug, info};
use minijinja::{context, path_loader, Environment, ErrorKind, UndefinedBehavior, Value};

use crate::errors::{SiteError, SiteResult};
use crate::segment::DocumentPath;
use crate::tree::{render_navigation, LinkTree};

/// Name of the required landing page template.
pub const INDEX_TEMPLATE: &str = "index.html";

/// Name of the optional per-document wrapper template.
pub const PAGE_TEMPLATE: &str = "page.html";

/// Templates loaded from the configured template directory.
///
/// Printing or iterating an undefined value is an error, so a template that
/// expects a binding the build does not provide fails loudly. Undefined
/// values are still falsy in tests, which is how a template tells directory
/// nodes (no `__link__`) from documents.
pub struct SiteTemplates {
    env: Environment<'static>,
    has_page_template: bool,
}

impl SiteTemplates {
    /// Loads templates from `template_dir`.
    ///
    /// `index.html` is compiled eagerly so a missing or malformed index
    /// template stops the build before any page is written.
    pub fn load(template_dir: &Path) -> SiteResult<Self> {
        debug!("Loading templates from {:?}", template_dir);
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::SemiStrict);
        env.set_loader(path_loader(template_dir));

        env.get_template(INDEX_TEMPLATE)
            .map_err(|e| template_error(INDEX_TEMPLATE, e))?;

        let has_page_template = match env.get_template(PAGE_TEMPLATE) {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::TemplateNotFound => false,
            Err(e) => return Err(template_error(PAGE_TEMPLATE, e)),
        };
        if has_page_template {
            info!("Wrapping documents in {:?}", template_dir.join(PAGE_TEMPLATE));
        }

        Ok(Self {
            env,
            has_page_template,
        })
    }

    pub fn has_page_template(&self) -> bool {
        self.has_page_template
    }

    /// Renders the landing page.
    ///
    /// Bindings: `links` (the tree as a nested mapping), `navigation` (the
    /// pre-rendered nested list) and `description`.
    pub fn render_index(&self, tree: &LinkTree, description: &str) -> SiteResult<String> {
        let template = self
            .env
            .get_template(INDEX_TEMPLATE)
            .map_err(|e| template_error(INDEX_TEMPLATE, e))?;
        template
            .render(context! {
                links => Value::from_serialize(tree.root()),
                navigation => Value::from_safe_string(render_navigation(tree)),
                description => description,
            })
            .map_err(|e| template_error(INDEX_TEMPLATE, e))
    }

    /// Wraps converted document HTML in `page.html`, or returns it unchanged
    /// when no page template exists.
    pub fn render_page(&self, document: &DocumentPath, content: String) -> SiteResult<String> {
        if !self.has_page_template {
            return Ok(content);
        }
        let template = self
            .env
            .get_template(PAGE_TEMPLATE)
            .map_err(|e| template_error(PAGE_TEMPLATE, e))?;
        template
            .render(context! {
                content => Value::from_safe_string(content),
                title => document.title(),
                path => document.output_link(),
                root => Value::from_safe_string(document.root_prefix()),
            })
            .map_err(|e| template_error(PAGE_TEMPLATE, e))
    }
}

fn template_error(name: &str, source: minijinja::Error) -> SiteError {
    SiteError::TemplateError {
        name: name.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn doc(path: &str) -> DocumentPath {
        DocumentPath::new(Path::new(path), "md").expect("valid test path")
    }

    #[test]
    fn index_receives_all_bindings() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(INDEX_TEMPLATE),
            "<p>{{ description }}</p>{{ navigation }}<i>{{ links|length }}</i>",
        )?;
        let templates = SiteTemplates::load(dir.path())?;
        assert!(!templates.has_page_template());

        let mut tree = LinkTree::new();
        tree.insert(&doc("x.md"));
        tree.insert(&doc("a/y.md"));

        let html = templates.render_index(&tree, "Fish & chips")?;
        assert_eq!(
            html,
            "<p>Fish &amp; chips</p>\
             <ul class=\"nav\"><li><span>a</span><ul><li><a href=\"a/y.html\">y</a></li></ul></li>\
             <li><a href=\"x.html\">x</a></li></ul>\
             <i>2</i>"
        );
        Ok(())
    }

    #[test]
    fn missing_index_template_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        match SiteTemplates::load(dir.path()) {
            Err(SiteError::TemplateError { name, source }) => {
                assert_eq!(name, INDEX_TEMPLATE);
                assert_eq!(source.kind(), ErrorKind::TemplateNotFound);
            }
            Err(other) => panic!("expected TemplateError, got {:?}", other),
            Ok(_) => panic!("expected TemplateError, got templates"),
        }
        Ok(())
    }

    #[test]
    fn unknown_binding_fails_rendering() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(INDEX_TEMPLATE), "{{ site_title }}")?;
        let templates = SiteTemplates::load(dir.path())?;

        let result = templates.render_index(&LinkTree::new(), "desc");
        assert!(matches!(result, Err(SiteError::TemplateError { .. })));
        Ok(())
    }

    #[test]
    fn links_mapping_distinguishes_directories_from_documents() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(INDEX_TEMPLATE),
            "{% for name, node in links|items %}\
             {% if node.__link__ %}<a href=\"{{ node.__link__ }}\">{{ name }}</a>\
             {% else %}[{{ name }}]{% endif %}\
             {% endfor %}",
        )?;
        let templates = SiteTemplates::load(dir.path())?;

        let mut tree = LinkTree::new();
        tree.insert(&doc("notes/todo.md"));
        tree.insert(&doc("x.md"));

        let html = templates.render_index(&tree, "desc")?;
        assert_eq!(html, "[notes]<a href=\"x.html\">x</a>");
        Ok(())
    }

    #[test]
    fn page_template_wraps_documents() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(INDEX_TEMPLATE), "{{ navigation }}")?;
        fs::write(
            dir.path().join(PAGE_TEMPLATE),
            "<title>{{ title }}</title><a href=\"{{ root }}index.html\">home</a>{{ content }}",
        )?;
        let templates = SiteTemplates::load(dir.path())?;
        assert!(templates.has_page_template());

        let html = templates.render_page(&doc("notes/ideas/plan.md"), "<p>x</p>".to_string())?;
        assert_eq!(
            html,
            "<title>plan</title><a href=\"../../index.html\">home</a><p>x</p>"
        );
        Ok(())
    }

    #[test]
    fn without_page_template_content_passes_through() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(INDEX_TEMPLATE), "")?;
        let templates = SiteTemplates::load(dir.path())?;

        let html = templates.render_page(&doc("a.md"), "<p>x</p>".to_string())?;
        assert_eq!(html, "<p>x</p>");
        Ok(())
    }
}
