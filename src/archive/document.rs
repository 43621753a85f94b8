//! Mutable in-memory HTML document
//!
//! Pages are parsed once into an `RcDom` tree. Element handles stay valid for the
//! lifetime of the document, which lets a resource reference point at the exact
//! node it was read from and rewrite that node later.

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::io;

/// A parsed HTML page
pub struct PageDocument {
    dom: RcDom,
}

impl PageDocument {
    /// Parses an HTML document
    ///
    /// The HTML5 parser recovers from any malformed input, so parsing never fails.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        Self { dom }
    }

    /// Returns every element of the document in document order
    pub fn elements(&self) -> Vec<Handle> {
        let mut elements = Vec::new();
        let mut stack = vec![self.dom.document.clone()];

        while let Some(node) = stack.pop() {
            if matches!(node.data, NodeData::Element { .. }) {
                elements.push(node.clone());
            }
            for child in node.children.borrow().iter().rev() {
                stack.push(child.clone());
            }
        }

        elements
    }

    /// Serializes the document back to HTML
    pub fn serialize(&self) -> io::Result<String> {
        let handle: SerializableHandle = self.dom.document.clone().into();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };

        let mut out = Vec::new();
        serialize(&mut out, &handle, opts)?;

        String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Local name of an element node, lowercase as produced by the parser
pub fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Reads an attribute of an element node
pub fn get_attribute(node: &Handle, attribute: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == attribute)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Replaces the value of an existing attribute
///
/// Returns false if the node is not an element or has no such attribute.
pub fn set_attribute(node: &Handle, attribute: &str, value: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            let mut attrs = attrs.borrow_mut();
            match attrs
                .iter_mut()
                .find(|attr| attr.name.local.as_ref() == attribute)
            {
                Some(attr) => {
                    attr.value = StrTendril::from_slice(value);
                    true
                }
                None => false,
            }
        }
        _ => false,
    }
}
