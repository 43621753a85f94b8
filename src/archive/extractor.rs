//! Resource reference extraction
//!
//! Enumerates the embeddable assets a page depends on:
//!
//! | Element | Attribute | Kind |
//! |---------|-----------|------|
//! | `<img>` | `src` | `Image` |
//! | `<link rel="stylesheet">` | `href` | `Stylesheet` |
//! | `<script>` | `src` | `Script` |
//! | any other `<link>` | `href` | `LinkedAsset` |
//!
//! Elements without the attribute, or with a blank value, are skipped.

use crate::archive::document::{element_name, get_attribute, set_attribute, PageDocument};
use markup5ever_rcdom::Handle;
use std::fmt;

/// Kind of element a resource reference was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Stylesheet,
    Script,
    LinkedAsset,
}

impl ResourceKind {
    /// The attribute holding the resource URL
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Image | Self::Script => "src",
            Self::Stylesheet | Self::LinkedAsset => "href",
        }
    }

    /// Classifies an element, returning None for elements that carry no resource
    fn classify(node: &Handle) -> Option<Self> {
        match element_name(node)?.as_str() {
            "img" => Some(Self::Image),
            "script" => Some(Self::Script),
            "link" => {
                let is_stylesheet = get_attribute(node, "rel").is_some_and(|rel| {
                    rel.split_ascii_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("stylesheet"))
                });
                if is_stylesheet {
                    Some(Self::Stylesheet)
                } else {
                    Some(Self::LinkedAsset)
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Image => "image",
            Self::Stylesheet => "stylesheet",
            Self::Script => "script",
            Self::LinkedAsset => "linked asset",
        };
        f.write_str(s)
    }
}

/// One resource reference found on a page
///
/// Holds the element it was read from, so rewriting targets that exact node even
/// when other elements carry the same value.
#[derive(Clone)]
pub struct ResourceRef {
    node: Handle,
    kind: ResourceKind,
    value: String,
}

impl ResourceRef {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn attribute(&self) -> &'static str {
        self.kind.attribute()
    }

    /// The attribute value as written in the page
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Sets the attribute on the element this reference came from
    pub fn rewrite(&self, new_value: &str) -> bool {
        set_attribute(&self.node, self.attribute(), new_value)
    }
}

impl fmt::Debug for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRef")
            .field("kind", &self.kind)
            .field("attribute", &self.attribute())
            .field("value", &self.value)
            .finish()
    }
}

/// Extracts all resource references of a document in document order
pub fn extract_resources(document: &PageDocument) -> Vec<ResourceRef> {
    document
        .elements()
        .into_iter()
        .filter_map(|node| {
            let kind = ResourceKind::classify(&node)?;
            let value = get_attribute(&node, kind.attribute())?;
            if value.trim().is_empty() {
                return None;
            }
            Some(ResourceRef { node, kind, value })
        })
        .collect()
}
