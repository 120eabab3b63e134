//! Virtual element tree.
//!
//! A page is described as a tree of [`Node`]s and serialized with
//! [`Node::to_html`]. Every render is a full, fresh string build; there is
//! no diffing and nothing is sent to the client except the resulting HTML.

pub mod node;
pub mod props;
pub mod tags;

pub use node::{is_self_closing, Element, Node, SELF_CLOSING_TAGS};
pub use props::{conditional_class, merge_classes, merge_styles, PropValue, Props, Style, StyleMap};
pub use tags::*;
