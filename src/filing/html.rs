use ego_tree::{NodeId, NodeRef};
use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::Node;
use std::collections::HashSet;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

// Children of these are serialized verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// Serializes `node` and its subtree, leaving out any subtree rooted at an id in `skip`.
pub fn write_node(node: NodeRef<'_, Node>, skip: &HashSet<NodeId>, out: &mut String) {
    if skip.contains(&node.id()) {
        return;
    }

    match node.value() {
        Node::Document | Node::Fragment => write_children(node, skip, out),
        Node::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype.name());
            out.push('>');
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&**comment);
            out.push_str("-->");
        }
        Node::Text(text) => {
            let raw = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .map(|el| RAW_TEXT_ELEMENTS.contains(&el.name()))
                .unwrap_or(false);
            if raw {
                out.push_str(&**text);
            } else {
                out.push_str(&encode_text(&**text).replace('\u{a0}', "&nbsp;"));
            }
        }
        Node::Element(element) => {
            write_start_tag(element.name(), element.attrs(), out);
            if !VOID_ELEMENTS.contains(&element.name()) {
                write_children(node, skip, out);
                out.push_str("</");
                out.push_str(element.name());
                out.push('>');
            }
        }
        Node::ProcessingInstruction(pi) => {
            out.push_str("<?");
            out.push_str(&pi.target);
            out.push(' ');
            out.push_str(&pi.data);
            out.push('>');
        }
    }
}

pub fn write_children(node: NodeRef<'_, Node>, skip: &HashSet<NodeId>, out: &mut String) {
    for child in node.children() {
        write_node(child, skip, out);
    }
}

pub fn write_start_tag<'a, I>(name: &str, attrs: I, out: &mut String)
where
    I: Iterator<Item = (&'a str, &'a str)>,
{
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');
}

pub fn serialize_nodes(nodes: &[NodeRef<'_, Node>]) -> String {
    let skip = HashSet::new();
    let mut out = String::new();
    for node in nodes {
        write_node(*node, &skip, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn body_html(source: &str) -> String {
        let document = Html::parse_document(source);
        let body = document
            .root_element()
            .children()
            .find(|n| n.value().as_element().map(|e| e.name()) == Some("body"))
            .unwrap();
        let mut out = String::new();
        write_children(body, &HashSet::new(), &mut out);
        out
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let html = body_html(r#"<p title="a &quot;b&quot;">1 &lt; 2 &amp; 3</p>"#);
        assert_eq!(html, r#"<p title="a &quot;b&quot;">1 &lt; 2 &amp; 3</p>"#);
    }

    #[test]
    fn test_void_and_raw_text_elements() {
        let html = body_html("<hr><br><script>if (a < b) {}</script>");
        assert_eq!(html, "<hr><br><script>if (a < b) {}</script>");
    }

    #[test]
    fn test_skip_subtree() {
        let document = Html::parse_document("<div id='keep'><span id='drop'>x</span>y</div>");
        let span = document
            .root_element()
            .descendants()
            .find(|n| n.value().as_element().and_then(|e| e.id()) == Some("drop"))
            .unwrap();
        let div = span.parent().unwrap();
        let mut out = String::new();
        write_node(div, &HashSet::from([span.id()]), &mut out);
        assert_eq!(out, r#"<div id="keep">y</div>"#);
    }

    #[test]
    fn test_prefixed_inline_xbrl_names_survive() {
        let html = body_html(
            r#"<ix:nonfraction name="us-gaap:NetIncomeLoss" contextref="c-1">99,803</ix:nonfraction>"#,
        );
        assert_eq!(
            html,
            r#"<ix:nonfraction name="us-gaap:NetIncomeLoss" contextref="c-1">99,803</ix:nonfraction>"#
        );
    }
}
