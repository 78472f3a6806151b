//! DOM utilities for navigating the registry document.

use std::path::Path;

use roxmltree::Node;

use crate::config::require_file;
use crate::error::{Result, WranglerError};

/// Read a file that must be UTF-8 encoded.
///
/// # Returns
/// * `Err(WranglerError::FileNotFound)` if the file does not exist
/// * `Err(WranglerError::Encoding)` if the content is not valid UTF-8
pub fn read_utf8(path: &Path) -> Result<String> {
    require_file(path)?;
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| {
        WranglerError::encoding(format!(
            "{} at byte {}",
            path.display(),
            e.utf8_error().valid_up_to()
        ))
    })
}

/// Get all element children of a node.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use mapdata_wrangler::xml::element_children;
///
/// let xml = r#"<root>text<child1/>more<child2/></root>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(element_children(doc.root_element()).count(), 2);
/// ```
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Find the child element whose `name` attribute equals `label`.
///
/// When the label repeats, the last such child wins.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use mapdata_wrangler::xml::find_labeled_child;
///
/// let xml = r#"<row><col name="SYM">0918123</col></row>"#;
/// let doc = Document::parse(xml).unwrap();
/// let col = find_labeled_child(doc.root_element(), "SYM").unwrap();
/// assert_eq!(col.text(), Some("0918123"));
/// ```
pub fn find_labeled_child<'a, 'input>(
    node: Node<'a, 'input>,
    label: &str,
) -> Option<Node<'a, 'input>> {
    element_children(node)
        .filter(|child| child.attribute("name") == Some(label))
        .last()
}

/// Get the text content of a node, trimmed.
///
/// Empty elements yield an empty string.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Line number (1-based) where a node starts.
pub fn line_of(node: Node<'_, '_>) -> u32 {
    node.document().text_pos_at(node.range().start).row
}
