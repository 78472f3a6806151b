//! XML helpers: DOM navigation for the registry and attribute decoding for
//! the streaming OSM passes.

mod dom;
mod stream;

pub use dom::{element_children, find_labeled_child, get_text, line_of, read_utf8};
pub use stream::{attribute_value, decode_attribute};
