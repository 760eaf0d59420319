//! Node types for the retained document tree

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key};
use smallvec::SmallVec;

use crate::shadow::ShadowRoot;

new_key_type! {
    pub struct NodeId;
}

impl NodeId {
    /// Convert to a raw u64 representation
    ///
    /// This is useful for storing node ids in type-erased contexts.
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create from a raw u64 representation
    ///
    /// # Safety
    /// The raw value must have been created by `to_raw()` from a valid NodeId.
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Where a node hangs in the tree: under an element's light children, or
/// inside the shadow boundary of a host element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentLink {
    /// Light child of an element
    Light(NodeId),
    /// Child of the shadow boundary hosted by an element
    Shadow(NodeId),
}

impl ParentLink {
    /// The element the link resolves connectedness through
    pub fn anchor(self) -> NodeId {
        match self {
            ParentLink::Light(id) | ParentLink::Shadow(id) => id,
        }
    }
}

/// Payload of a node: element or text
#[derive(Debug)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

/// A node in the document arena
#[derive(Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<ParentLink>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element(ElementData::new(tag)),
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text(content.into()),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Element payload, if this node is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub(crate) fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    /// Text payload, if this node is a text node
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(content) => Some(content),
            NodeKind::Element(_) => None,
        }
    }
}

/// Element state: tag, attributes, class list, optional shadow boundary
#[derive(Debug)]
pub struct ElementData {
    tag: String,
    attributes: FxHashMap<String, String>,
    classes: SmallVec<[String; 4]>,
    pub(crate) shadow: Option<ShadowRoot>,
}

impl ElementData {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: FxHashMap::default(),
            classes: SmallVec::new(),
            shadow: None,
        }
    }

    /// The element's tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Attribute names in sorted order, for stable serialization
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Add a class; the list stays ordered and de-duplicated
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.classes.iter().any(|existing| *existing == class) {
            self.classes.push(class);
        }
    }

    /// The ordered class list
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the class list contains the given class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    /// The id attribute, if set
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// The shadow boundary, if one was attached
    pub fn shadow(&self) -> Option<&ShadowRoot> {
        self.shadow.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_deduplicates() {
        let mut data = ElementData::new("div");
        data.add_class("card");
        data.add_class("active");
        data.add_class("card");
        assert_eq!(data.classes(), ["card", "active"]);
    }

    #[test]
    fn test_class_list_preserves_insertion_order() {
        let mut data = ElementData::new("div");
        data.add_class("b");
        data.add_class("a");
        assert_eq!(data.classes(), ["b", "a"]);
        assert!(data.has_class("a"));
        assert!(!data.has_class("c"));
    }

    #[test]
    fn test_attributes_replace_previous_value() {
        let mut data = ElementData::new("div");
        data.set_attribute("id", "first");
        data.set_attribute("id", "second");
        assert_eq!(data.id(), Some("second"));
    }

    #[test]
    fn test_node_id_raw_roundtrip() {
        let mut arena = slotmap::SlotMap::<NodeId, ()>::with_key();
        let id = arena.insert(());
        assert_eq!(NodeId::from_raw(id.to_raw()), id);
    }
}
