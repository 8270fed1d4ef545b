// --- FILE: vaultsite-lib/src/tree.rs ---

use std::collections::BTreeMap;
use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::segment::DocumentPath;

/// Key under which a node's resolved link appears in the serialized
/// nested-mapping view.
pub const LINK_KEY: &str = "__link__";

/// Bytes that would change how a browser splits an href segment.
const HREF_SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'%').add(b'?');

/// One level of the link tree.
///
/// Children live in a `BTreeMap`, so their enumeration order depends only
/// on the set of keys, never on the order documents were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTreeNode {
    children: BTreeMap<String, LinkTreeNode>,
    link: Option<String>,
}

impl LinkTreeNode {
    /// The resolved output link, if a document terminates at this node.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Whether a document terminates here.
    pub fn is_terminal(&self) -> bool {
        self.link.is_some()
    }

    pub fn child(&self, name: &str) -> Option<&LinkTreeNode> {
        self.children.get(name)
    }

    /// Children in lexicographic key order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &LinkTreeNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn terminal_count(&self) -> usize {
        usize::from(self.is_terminal())
            + self
                .children
                .values()
                .map(LinkTreeNode::terminal_count)
                .sum::<usize>()
    }

    fn height(&self) -> usize {
        self.children
            .values()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Serializes as `{"<child>": {...}, "__link__": "<link>"}`, the shape
/// templates walk when they render the tree themselves.
impl Serialize for LinkTreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.children.len() + usize::from(self.link.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(link) = &self.link {
            map.serialize_entry(LINK_KEY, link)?;
        }
        for (name, child) in &self.children {
            map.serialize_entry(name, child)?;
        }
        map.end()
    }
}

/// Hierarchical navigation structure mirroring the vault's directories.
///
/// Owned by a single build: documents are inserted while they are written,
/// then the tree is rendered once into the index page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTree {
    root: LinkTreeNode,
}

impl LinkTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `document` in the tree, creating any missing intermediate
    /// nodes, and sets the link on the node its last segment names.
    ///
    /// Returns the link previously stored at that node. `Some` means a
    /// document with the same segments was already recorded; the newer
    /// insertion wins.
    pub fn insert(&mut self, document: &DocumentPath) -> Option<String> {
        let mut node = &mut self.root;
        for segment in document.segments() {
            node = node.children.entry(segment.clone()).or_default();
        }
        debug!(
            "Link tree: {:?} -> {}",
            document.segments(),
            document.output_link()
        );
        node.link.replace(document.output_link().to_string())
    }

    pub fn root(&self) -> &LinkTreeNode {
        &self.root
    }

    /// Follows `segments` from the root.
    pub fn get<S: AsRef<str>>(&self, segments: &[S]) -> Option<&LinkTreeNode> {
        segments
            .iter()
            .try_fold(&self.root, |node, segment| node.child(segment.as_ref()))
    }

    /// Number of nodes carrying a resolved link.
    pub fn document_count(&self) -> usize {
        self.root.terminal_count()
    }

    /// Length of the longest segment path below the root.
    pub fn depth(&self) -> usize {
        self.root.height()
    }

    pub fn is_empty(&self) -> bool {
        !self.root.has_children()
    }
}

/// Renders the tree as nested `<ul>` lists, children sorted by key.
///
/// Entries with a link become anchors labelled with their key; pure
/// directories become `<span>` labels. Anything with children gets a nested
/// list inside the same `<li>`.
pub fn render_navigation(tree: &LinkTree) -> String {
    let mut html = String::new();
    html.push_str("<ul class=\"nav\">");
    render_children(tree.root(), &mut html);
    html.push_str("</ul>");
    html
}

fn render_children(node: &LinkTreeNode, html: &mut String) {
    for (name, child) in node.children() {
        html.push_str("<li>");
        let label = encode_text(name);
        match child.link() {
            Some(link) => {
                // Writing to a String cannot fail.
                let _ = write!(
                    html,
                    "<a href=\"{}\">{}</a>",
                    encode_double_quoted_attribute(&href(link)),
                    label
                );
            }
            None => {
                let _ = write!(html, "<span>{}</span>", label);
            }
        }
        if child.has_children() {
            html.push_str("<ul>");
            render_children(child, html);
            html.push_str("</ul>");
        }
        html.push_str("</li>");
    }
}

/// Percent-encodes each `/`-separated segment of a stored link.
fn href(link: &str) -> String {
    link.split('/')
        .map(|segment| utf8_percent_encode(segment, HREF_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
