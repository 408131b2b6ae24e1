use anyhow::{Context, Result};
use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::html::{write_children, write_node, write_start_tag};
use crate::utils::encoding::read_to_string_with;

/// Attributes on inline facts that point back into `ix:header`.
pub const REFERENCE_ATTRIBUTES: &[&str] = &["contextref", "unitref", "footnoteref"];

pub const HEADER_TAG: &str = "ix:header";

const HIDE_HEADER_CSS: &str = r"
/* Hide only the header block */
ix\:header, ix\:header * { display:none !important; }
/* Leave facts visible */
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("No <body> tag found.")]
    NoBody,
    #[error("Page {page} out of range (1..{page_count}).")]
    PageOutOfRange { page: usize, page_count: usize },
}

/// One page cut out of a filing, ready to be written.
#[derive(Debug, Clone)]
pub struct SplitPage {
    pub html: String,
    pub page: usize,
    pub page_count: usize,
    pub retained_ids: BTreeSet<String>,
    pub removed_ids: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct PruneOutcome {
    retained: BTreeSet<String>,
    removed: BTreeSet<String>,
    skip: HashSet<NodeId>,
}

pub struct PagedDocument {
    document: Html,
}

impl PagedDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            document: Html::parse_document(source),
        }
    }

    fn child_element<'a>(node: NodeRef<'a, Node>, name: &str) -> Option<NodeRef<'a, Node>> {
        node.children()
            .find(|child| child.value().as_element().map(|el| el.name()) == Some(name))
    }

    fn root(&self) -> NodeRef<'_, Node> {
        *self.document.root_element()
    }

    fn body(&self) -> Result<NodeRef<'_, Node>, SplitError> {
        Self::child_element(self.root(), "body").ok_or(SplitError::NoBody)
    }

    fn head(&self) -> Option<NodeRef<'_, Node>> {
        Self::child_element(self.root(), "head")
    }

    fn header(&self) -> Option<NodeRef<'_, Node>> {
        self.root()
            .descendants()
            .find(|node| node.value().as_element().map(|el| el.name()) == Some(HEADER_TAG))
    }

    /// Body children grouped into pages; page-break markers belong to no page.
    pub fn pages(&self) -> Result<Vec<Vec<NodeRef<'_, Node>>>, SplitError> {
        Ok(split_pages(self.body()?))
    }

    pub fn page_count(&self) -> Result<usize, SplitError> {
        Ok(self.pages()?.len())
    }

    pub fn render_page(&self, page: usize) -> Result<SplitPage, SplitError> {
        let mut pages = self.pages()?;
        let page_count = pages.len();
        if page == 0 || page > page_count {
            return Err(SplitError::PageOutOfRange { page, page_count });
        }
        let page_nodes = pages.swap_remove(page - 1);

        // Hidden facts inside the header reference contexts too
        let header = self.header();
        let mut scanned = page_nodes.clone();
        scanned.extend(header);
        let used = collect_used_refs(&scanned);
        let outcome = header.map(|h| prune_header(h, &used)).unwrap_or_default();
        log::debug!(
            "Page {}: {} references, kept {} header ids, dropped {}",
            page,
            used.len(),
            outcome.retained.len(),
            outcome.removed.len()
        );

        let mut out = String::new();
        let root_attrs = self.root().value().as_element().into_iter().flat_map(|el| el.attrs());
        write_start_tag("html", root_attrs, &mut out);
        out.push_str("<head>");
        if let Some(head) = self.head() {
            write_children(head, &HashSet::new(), &mut out);
        }
        out.push_str("<style>");
        out.push_str(HIDE_HEADER_CSS);
        out.push_str("</style></head><body>");

        if let Some(header) = header {
            out.push_str(r#"<div style="display:none">"#);
            write_node(header, &outcome.skip, &mut out);
            out.push_str("</div>");
        }

        // The header has been moved into the wrapper above
        let moved: HashSet<NodeId> = header.map(|h| h.id()).into_iter().collect();
        for node in &page_nodes {
            write_node(*node, &moved, &mut out);
        }
        out.push_str("</body></html>");

        Ok(SplitPage {
            html: out,
            page,
            page_count,
            retained_ids: outcome.retained,
            removed_ids: outcome.removed,
        })
    }
}

pub fn is_page_break(node: NodeRef<'_, Node>) -> bool {
    let Some(element) = node.value().as_element() else {
        return false;
    };
    if element.name() != "hr" {
        return false;
    }
    element
        .attr("style")
        .map(|style| {
            let compact: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            compact.contains("page-break-after:always")
        })
        .unwrap_or(false)
}

pub fn split_pages(body: NodeRef<'_, Node>) -> Vec<Vec<NodeRef<'_, Node>>> {
    let mut pages = Vec::new();
    let mut current = Vec::new();
    for node in body.children() {
        if is_page_break(node) {
            pages.push(std::mem::take(&mut current));
        } else {
            current.push(node);
        }
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

/// Reference attribute values found under `nodes`.
pub fn collect_used_refs(nodes: &[NodeRef<'_, Node>]) -> HashSet<String> {
    let mut used = HashSet::new();
    for node in nodes {
        for descendant in node.descendants() {
            if let Some(element) = descendant.value().as_element() {
                for attr in REFERENCE_ATTRIBUTES {
                    if let Some(value) = element.attr(attr) {
                        if !value.is_empty() {
                            used.insert(value.to_string());
                        }
                    }
                }
            }
        }
    }
    used
}

fn prune_header(header: NodeRef<'_, Node>, used: &HashSet<String>) -> PruneOutcome {
    let mut outcome = PruneOutcome::default();
    for child in header.children() {
        prune_node(child, used, &mut outcome);
    }
    outcome
}

// Returns true when the subtree still holds a referenced id.
fn prune_node(node: NodeRef<'_, Node>, used: &HashSet<String>, outcome: &mut PruneOutcome) -> bool {
    let mut keeps_reference = false;
    for child in node.children() {
        keeps_reference |= prune_node(child, used, outcome);
    }

    let Some(id) = node.value().as_element().and_then(|el| el.id()) else {
        return keeps_reference;
    };

    if used.contains(id) {
        outcome.retained.insert(id.to_string());
        true
    } else if keeps_reference {
        log::warn!("Keeping unreferenced header element {} for a referenced descendant", id);
        outcome.retained.insert(id.to_string());
        true
    } else {
        outcome.removed.insert(id.to_string());
        outcome.skip.insert(node.id());
        false
    }
}

/// Reads `input`, renders `page` and writes it to `output`.
/// Nothing is written when the page cannot be rendered.
pub fn split_file(input: &Path, output: &Path, page: usize, encoding: &str) -> Result<SplitPage> {
    let source = read_to_string_with(input, encoding)?;
    let document = PagedDocument::parse(&source);
    let split = document.render_page(page)?;
    fs::write(output, &split.html).with_context(|| format!("Failed to write {:?}", output))?;
    log::info!("Wrote page {}/{} to {:?}", split.page, split.page_count, output);
    Ok(split)
}
