//! Post-processing of the written `index.html`.
//!
//! Optional stage 4. The document is parsed with html5ever into an `RcDom`
//! tree and rewritten in place:
//!
//! 1. **Styles**: every `<link rel="stylesheet" href>` is replaced by a
//!    `<style>` carrying the minified file content; the file is deleted and
//!    its folder removed if that left it empty. Existing `<style>` elements
//!    have their text minified.
//! 2. **Scripts**: the same for `<script src>` and inline `<script>`.
//! 3. **Comments**: every HTML comment node is removed.
//!
//! Reference discovery is a depth-first walk over document and element nodes
//! that stops descending at a match. An inline reference must have exactly
//! one child and it must be text; anything else is an invalid tag.
//!
//! Referenced paths are resolved against the output directory; a leading `/`
//! is treated as the output root.

use crate::minify::{minify_css, minify_js};
use html5ever::serialize::{SerializeOpts, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_document};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Which of the two reference kinds a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Style,
    Script,
}

impl ReferenceKind {
    /// Element that carries the inlined content.
    fn tag(self) -> &'static str {
        match self {
            ReferenceKind::Style => "style",
            ReferenceKind::Script => "script",
        }
    }

    fn resource(self) -> &'static str {
        match self {
            ReferenceKind::Style => "stylesheet",
            ReferenceKind::Script => "script",
        }
    }

    fn minify(self, text: &str) -> String {
        match self {
            ReferenceKind::Style => minify_css(text),
            ReferenceKind::Script => minify_js(text),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("Could not read \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse \"{}\": {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid {0} tag in main template document")]
    InvalidTag(ReferenceKind),
    #[error("Could not read {} \"{}\": {source}", .kind.resource(), .path.display())]
    ReadResource {
        kind: ReferenceKind,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not remove {} \"{}\": {source}", .kind.resource(), .path.display())]
    RemoveResource {
        kind: ReferenceKind,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write \"{}\": {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl OptimizeError {
    pub fn exit_code(&self) -> i32 {
        use ReferenceKind::{Script, Style};
        match self {
            OptimizeError::Read { .. } => 28,
            OptimizeError::Parse { .. } => 29,
            OptimizeError::InvalidTag(Style) => 30,
            OptimizeError::ReadResource { kind: Style, .. } => 31,
            OptimizeError::RemoveResource { kind: Style, .. } => 32,
            OptimizeError::InvalidTag(Script) => 33,
            OptimizeError::ReadResource { kind: Script, .. } => 34,
            OptimizeError::RemoveResource { kind: Script, .. } => 35,
            OptimizeError::Write { .. } => 40,
        }
    }
}

/// A style or script node found in the document.
///
/// `path` is the external file it points to; `None` means the content is
/// already inline.
#[derive(Debug, Clone)]
pub struct NodeReference {
    pub kind: ReferenceKind,
    pub node: Handle,
    pub path: Option<String>,
}

/// What happened to one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceAction {
    /// External file inlined (and deleted); `bytes` is the minified size.
    Inlined {
        kind: ReferenceKind,
        path: String,
        bytes: usize,
    },
    /// Inline content minified in place.
    Minified { kind: ReferenceKind, bytes: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizeReport {
    pub actions: Vec<ReferenceAction>,
    pub comments_removed: usize,
    pub bytes_before: usize,
    pub bytes_after: usize,
}

// ============================================================================
// Tree helpers
// ============================================================================

fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn attribute(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn is_stylesheet_link(handle: &Handle) -> bool {
    attribute(handle, "rel").as_deref() == Some("stylesheet")
}

/// Only document and element nodes are searched.
fn is_container(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Document | NodeData::Element { .. })
}

/// New `<tag>` element in the HTML namespace with `text` as its only child.
fn new_text_element(tag: &str, text: String) -> Handle {
    let element = Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
        attrs: RefCell::new(Vec::new()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    });
    let content = Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    });
    content.parent.set(Some(Rc::downgrade(&element)));
    element.children.borrow_mut().push(content);
    element
}

/// Put `replacement` where `node` is in its parent and detach `node`.
fn replace_node(node: &Handle, replacement: Handle) {
    let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) else {
        return;
    };
    let mut children = parent.children.borrow_mut();
    if let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, node)) {
        replacement.parent.set(Some(Rc::downgrade(&parent)));
        children[index] = replacement;
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Stylesheet links and `<style>` elements, in document order.
pub fn find_style_references(handle: &Handle) -> Vec<NodeReference> {
    let mut found = Vec::new();
    collect_styles(handle, &mut found);
    found
}

fn collect_styles(handle: &Handle, found: &mut Vec<NodeReference>) {
    if !is_container(handle) {
        return;
    }
    match element_name(handle) {
        Some("style") => {
            found.push(NodeReference {
                kind: ReferenceKind::Style,
                node: handle.clone(),
                path: None,
            });
            return;
        }
        Some("link") if is_stylesheet_link(handle) => {
            found.push(NodeReference {
                kind: ReferenceKind::Style,
                node: handle.clone(),
                path: attribute(handle, "href"),
            });
            return;
        }
        _ => {}
    }
    for child in handle.children.borrow().iter() {
        collect_styles(child, found);
    }
}

/// `<script>` elements, in document order.
pub fn find_script_references(handle: &Handle) -> Vec<NodeReference> {
    let mut found = Vec::new();
    collect_scripts(handle, &mut found);
    found
}

fn collect_scripts(handle: &Handle, found: &mut Vec<NodeReference>) {
    if !is_container(handle) {
        return;
    }
    if element_name(handle) == Some("script") {
        found.push(NodeReference {
            kind: ReferenceKind::Script,
            node: handle.clone(),
            path: attribute(handle, "src").filter(|src| !src.is_empty()),
        });
        return;
    }
    for child in handle.children.borrow().iter() {
        collect_scripts(child, found);
    }
}

// ============================================================================
// Rewriting
// ============================================================================

/// Inline or minify one reference.
fn apply_reference(
    reference: &NodeReference,
    output_dir: &Path,
) -> Result<ReferenceAction, OptimizeError> {
    let kind = reference.kind;
    match &reference.path {
        Some(path) => {
            let file = output_dir.join(path.trim_start_matches('/'));
            let content = fs::read(&file).map_err(|source| OptimizeError::ReadResource {
                kind,
                path: file.clone(),
                source,
            })?;
            let minified = kind.minify(&String::from_utf8_lossy(&content));
            let bytes = minified.len();
            replace_node(&reference.node, new_text_element(kind.tag(), minified));

            fs::remove_file(&file).map_err(|source| OptimizeError::RemoveResource {
                kind,
                path: file.clone(),
                source,
            })?;
            if let Some(parent) = file.parent() {
                // Fails when other files remain, which is fine
                let _ = fs::remove_dir(parent);
            }

            Ok(ReferenceAction::Inlined {
                kind,
                path: path.clone(),
                bytes,
            })
        }
        None => {
            let children = reference.node.children.borrow();
            let [only] = children.as_slice() else {
                return Err(OptimizeError::InvalidTag(kind));
            };
            let NodeData::Text { contents } = &only.data else {
                return Err(OptimizeError::InvalidTag(kind));
            };
            let minified = kind.minify(&contents.borrow());
            let bytes = minified.len();
            *contents.borrow_mut() = StrTendril::from(minified);
            Ok(ReferenceAction::Minified { kind, bytes })
        }
    }
}

/// Remove every comment node below `handle`. Returns how many were removed.
pub fn remove_comments(handle: &Handle) -> usize {
    let mut removed = 0;
    handle.children.borrow_mut().retain(|child| {
        if matches!(child.data, NodeData::Comment { .. }) {
            child.parent.set(None);
            removed += 1;
            false
        } else {
            true
        }
    });
    for child in handle.children.borrow().iter() {
        removed += remove_comments(child);
    }
    removed
}

/// Parse HTML bytes into a document tree.
///
/// `<template>` content is moved under its element so discovery, comment
/// removal and serialization all see it as ordinary children.
pub fn parse_html(mut html: &[u8]) -> std::io::Result<RcDom> {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html)?;
    hoist_template_contents(&dom.document);
    Ok(dom)
}

fn hoist_template_contents(handle: &Handle) {
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(fragment) = template_contents.borrow_mut().take() {
            let moved: Vec<Handle> = fragment.children.borrow_mut().drain(..).collect();
            for child in &moved {
                child.parent.set(Some(Rc::downgrade(handle)));
            }
            handle.children.borrow_mut().extend(moved);
        }
    }
    for child in handle.children.borrow().iter() {
        hoist_template_contents(child);
    }
}

/// Serialize a whole document back to HTML.
pub fn serialize_document(dom: &RcDom) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let document: SerializableHandle = dom.document.clone().into();
    serialize(&mut out, &document, SerializeOpts::default())?;
    Ok(out)
}

/// Run every rewrite over a parsed document.
///
/// Styles are handled before scripts, and comments last.
pub fn optimize_dom(dom: &RcDom, output_dir: &Path) -> Result<OptimizeReport, OptimizeError> {
    let mut report = OptimizeReport::default();

    for reference in find_style_references(&dom.document) {
        report.actions.push(apply_reference(&reference, output_dir)?);
    }
    for reference in find_script_references(&dom.document) {
        report.actions.push(apply_reference(&reference, output_dir)?);
    }
    report.comments_removed = remove_comments(&dom.document);

    Ok(report)
}

/// Optimize `index_path` in place, resolving references against `output_dir`.
pub fn optimize(index_path: &Path, output_dir: &Path) -> Result<OptimizeReport, OptimizeError> {
    let html = fs::read(index_path).map_err(|source| OptimizeError::Read {
        path: index_path.to_path_buf(),
        source,
    })?;
    let dom = parse_html(&html).map_err(|source| OptimizeError::Parse {
        path: index_path.to_path_buf(),
        source,
    })?;

    let mut report = optimize_dom(&dom, output_dir)?;

    let write_error = |source| OptimizeError::Write {
        path: index_path.to_path_buf(),
        source,
    };
    let rendered = serialize_document(&dom).map_err(write_error)?;
    fs::write(index_path, &rendered).map_err(write_error)?;

    report.bytes_before = html.len();
    report.bytes_after = rendered.len();
    Ok(report)
}
