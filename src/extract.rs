//! The extract module turns raw HTML into the visible-text string that is
//! fed to the narrative prompt.

use ego_tree::NodeRef;
use scraper::{Html, node::Node};

/// Elements whose subtrees never contribute visible text.
const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "head", "title", "meta"];

/// Extracts the visible text from an HTML document.
///
/// The document is parsed into a node tree; script, style, head, title and
/// meta subtrees are skipped along with comment and document-level nodes,
/// and the remaining text nodes' trimmed content is joined with single
/// spaces in document order. An empty result is not an error.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut chunks: Vec<String> = Vec::new();
    collect_visible(document.tree.root(), &mut chunks);

    chunks.join(" ")
}

fn collect_visible(node: NodeRef<'_, Node>, chunks: &mut Vec<String>) {
    match node.value() {
        Node::Element(element) if SKIPPED_ELEMENTS.contains(&element.name()) => return,
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
        }
        // Comments, doctypes and document nodes carry no visible text.
        _ => {}
    }

    for child in node.children() {
        collect_visible(child, chunks);
    }
}
