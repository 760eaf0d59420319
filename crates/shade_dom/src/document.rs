//! Document tree management
//!
//! The [`Document`] owns the node arena and every structural operation on
//! it: appending and detaching nodes, attaching shadow boundaries, moving
//! light content into a boundary, and adopting stylesheets. It also carries
//! the host-environment services the scope core is driven by: the custom
//! tag registry, the script host hook, and the lifecycle notification queue.
//!
//! Connectedness is positional: a node is connected iff its ancestor chain
//! (crossing shadow boundaries through their host elements) reaches the
//! document root. When a structural operation changes the connectedness of
//! an element whose tag is registered, the document records a
//! [`LifecycleNotification`]; the host drains the queue and drives the
//! controllers that care.

use std::mem;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::error::{DomError, Result};
use crate::node::{ElementData, Node, NodeId, ParentLink};
use crate::registry::TagRegistry;
use crate::script::{ScriptHost, ScriptSource};
use crate::shadow::{ShadowMode, ShadowRoot};
use crate::stylesheet::Stylesheet;

/// A connect/disconnect transition of a registered element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleNotification {
    pub node: NodeId,
    pub kind: NotificationKind,
}

/// Which way the transition went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Connected,
    Disconnected,
}

/// The retained document tree
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    tags: TagRegistry,
    script_host: Option<Arc<dyn ScriptHost>>,
    notifications: Vec<LifecycleNotification>,
    executed_scripts: FxHashSet<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::element("document"));
        Self {
            nodes,
            root,
            tags: TagRegistry::new(),
            script_host: None,
            notifications: Vec::new(),
            executed_scripts: FxHashSet::default(),
        }
    }

    /// The document root element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, the root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Node creation and access
    // ========================================================================

    /// Create a detached element node
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::text(content))
    }

    /// Create a detached `script` element carrying inline code
    pub fn create_script(&mut self, code: impl Into<String>) -> NodeId {
        let script = self.nodes.insert(Node::element("script"));
        let text = self.nodes.insert(Node::text(code));
        self.nodes[text].parent = Some(ParentLink::Light(script));
        self.nodes[script].children.push(text);
        script
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// An element's tag name
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id)?.as_element().map(ElementData::tag)
    }

    /// Light children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the node's ancestor chain reaches the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes.get(current).and_then(|node| node.parent) {
                Some(link) => current = link.anchor(),
                None => return false,
            }
        }
    }

    /// Concatenated text content of a subtree, light children only
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if let Some(text) = node.as_text() {
                out.push_str(text);
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    // ========================================================================
    // Attributes and classes
    // ========================================================================

    /// Look up an attribute on an element; None for text nodes
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id)?.as_element()?.attribute(name)
    }

    /// Set an attribute; silently ignored for missing or text nodes
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        if let Some(data) = self.nodes.get_mut(id).and_then(Node::as_element_mut) {
            data.set_attribute(name, value);
        }
    }

    /// Add a class; silently ignored for missing or text nodes
    pub fn add_class(&mut self, id: NodeId, class: impl Into<String>) {
        if let Some(data) = self.nodes.get_mut(id).and_then(Node::as_element_mut) {
            data.add_class(class);
        }
    }

    /// Ordered class list of an element
    pub fn classes(&self, id: NodeId) -> &[String] {
        self.nodes
            .get(id)
            .and_then(Node::as_element)
            .map(ElementData::classes)
            .unwrap_or(&[])
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes
            .get(id)
            .and_then(Node::as_element)
            .map(|data| data.has_class(class))
            .unwrap_or(false)
    }

    // ========================================================================
    // Tree structure
    // ========================================================================

    /// Append a child to a parent's light children
    ///
    /// A child that already hangs somewhere else is moved, DOM-style.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(DomError::MissingNode);
        }
        let parent_node = self.nodes.get(parent).ok_or(DomError::MissingNode)?;
        if parent_node.as_element().is_none() {
            return Err(DomError::NotAnElement);
        }

        let was_connected = self.is_connected(child);
        self.unlink(child);
        self.nodes[child].parent = Some(ParentLink::Light(parent));
        self.nodes[parent].children.push(child);

        let now_connected = self.is_connected(child);
        if was_connected != now_connected {
            self.notify_subtree(child, now_connected);
        }
        Ok(())
    }

    /// Detach a node from its parent, keeping it alive for reinsertion
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(DomError::MissingNode);
        }
        let was_connected = self.is_connected(id);
        self.unlink(id);
        if was_connected {
            self.notify_subtree(id, false);
        }
        Ok(())
    }

    /// Remove a node and all its descendants from the arena
    pub fn remove_subtree(&mut self, id: NodeId) {
        if self.detach(id).is_err() {
            return;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            if let Some(shadow) = node.as_element().and_then(ElementData::shadow) {
                stack.extend_from_slice(shadow.children());
            }
            stack.extend(node.children);
            self.executed_scripts.remove(&current);
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(link) = self.nodes.get(id).and_then(|node| node.parent) else {
            return;
        };
        match link {
            ParentLink::Light(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.children.retain(|&child| child != id);
                }
            }
            ParentLink::Shadow(host) => {
                if let Some(shadow) = self.shadow_mut(host) {
                    shadow.children.retain(|&child| child != id);
                }
            }
        }
        self.nodes[id].parent = None;
    }

    // ========================================================================
    // Shadow boundaries
    // ========================================================================

    /// Attach a shadow boundary to an element
    ///
    /// A boundary is created exactly once; a second attempt is an error.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowMode) -> Result<()> {
        let data = self
            .nodes
            .get_mut(host)
            .ok_or(DomError::MissingNode)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?;
        if data.shadow.is_some() {
            return Err(DomError::ShadowAlreadyAttached);
        }
        data.shadow = Some(ShadowRoot::new(mode));
        Ok(())
    }

    /// The boundary hosted by an element, if any
    pub fn boundary(&self, host: NodeId) -> Option<&ShadowRoot> {
        self.nodes.get(host)?.as_element()?.shadow()
    }

    /// Children of an element's boundary
    pub fn boundary_children(&self, host: NodeId) -> &[NodeId] {
        self.boundary(host)
            .map(ShadowRoot::children)
            .unwrap_or(&[])
    }

    /// First element child of an element's boundary
    pub fn boundary_first_element(&self, host: NodeId) -> Option<NodeId> {
        self.boundary(host)?
            .children()
            .iter()
            .copied()
            .find(|&child| {
                self.nodes
                    .get(child)
                    .map(|node| node.as_element().is_some())
                    .unwrap_or(false)
            })
    }

    fn shadow_mut(&mut self, host: NodeId) -> Option<&mut ShadowRoot> {
        self.nodes
            .get_mut(host)?
            .as_element_mut()?
            .shadow
            .as_mut()
    }

    /// Adopt a stylesheet into an element's boundary, additively
    pub fn adopt_stylesheet(&mut self, host: NodeId, sheet: Arc<Stylesheet>) -> Result<()> {
        self.shadow_mut(host)
            .ok_or(DomError::NoShadowRoot)?
            .adopt(sheet);
        Ok(())
    }

    /// Append a node directly into an element's boundary
    ///
    /// Direct injection of a `script` element executes it immediately via
    /// the installed script host, once per node, in injection order.
    pub fn append_to_boundary(&mut self, host: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(DomError::MissingNode);
        }
        if self.boundary(host).is_none() {
            // Distinguish a missing host from a host without a boundary.
            self.nodes.get(host).ok_or(DomError::MissingNode)?;
            return Err(DomError::NoShadowRoot);
        }

        let was_connected = self.is_connected(child);
        self.unlink(child);
        self.nodes[child].parent = Some(ParentLink::Shadow(host));
        if let Some(shadow) = self.shadow_mut(host) {
            shadow.children.push(child);
        }

        let now_connected = self.is_connected(child);
        if was_connected != now_connected {
            self.notify_subtree(child, now_connected);
        }

        self.execute_if_script(child);
        Ok(())
    }

    /// Move every light child of the host into its boundary
    ///
    /// The move leaves the host's light tree empty; exactly one live copy of
    /// the content exists afterwards, inside the boundary. Scripts inside the
    /// moved subtree do not execute (moves are not direct injection).
    /// Returns the moved children, in order.
    pub fn migrate_children_to_boundary(&mut self, host: NodeId) -> Result<Vec<NodeId>> {
        if self.boundary(host).is_none() {
            self.nodes.get(host).ok_or(DomError::MissingNode)?;
            return Err(DomError::NoShadowRoot);
        }

        let children = mem::take(&mut self.nodes[host].children);
        for &child in &children {
            self.nodes[child].parent = Some(ParentLink::Shadow(host));
        }
        if let Some(shadow) = self.shadow_mut(host) {
            shadow.children.extend_from_slice(&children);
        }
        Ok(children)
    }

    // ========================================================================
    // Host-environment services
    // ========================================================================

    /// Register a custom tag for lifecycle notification delivery
    pub fn register_tag(&mut self, tag: &str) -> Result<()> {
        self.tags.define(tag)
    }

    pub fn is_tag_defined(&self, tag: &str) -> bool {
        self.tags.is_defined(tag)
    }

    /// Install the script execution hook
    pub fn set_script_host(&mut self, host: Arc<dyn ScriptHost>) {
        self.script_host = Some(host);
    }

    /// Drain pending lifecycle notifications, in the order they occurred
    pub fn take_notifications(&mut self) -> Vec<LifecycleNotification> {
        mem::take(&mut self.notifications)
    }

    fn notify_subtree(&mut self, id: NodeId, connected: bool) {
        let kind = if connected {
            NotificationKind::Connected
        } else {
            NotificationKind::Disconnected
        };
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if let Some(data) = node.as_element() {
                if self.tags.is_defined(data.tag()) {
                    self.notifications
                        .push(LifecycleNotification { node: current, kind });
                }
                if let Some(shadow) = data.shadow() {
                    for &child in shadow.children().iter().rev() {
                        stack.push(child);
                    }
                }
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
    }

    fn execute_if_script(&mut self, id: NodeId) {
        let is_script = self
            .nodes
            .get(id)
            .and_then(Node::as_element)
            .map(|data| data.tag() == "script")
            .unwrap_or(false);
        if !is_script || !self.executed_scripts.insert(id) {
            return;
        }
        let source = match self.attribute(id, "src") {
            Some(src) => ScriptSource::Remote(src.to_string()),
            None => ScriptSource::Inline(self.text_content(id)),
        };
        if let Some(host) = self.script_host.clone() {
            host.execute(id, source);
        }
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Indented tree dump, for demos and diagnostics
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        match &node.kind {
            crate::node::NodeKind::Text(content) => {
                out.push_str(&format!("{indent}{content:?}\n"));
            }
            crate::node::NodeKind::Element(data) => {
                out.push_str(&format!("{indent}<{}", data.tag()));
                if !data.classes().is_empty() {
                    out.push_str(&format!(" class=\"{}\"", data.classes().join(" ")));
                }
                for name in data.attribute_names() {
                    let value = data.attribute(name).unwrap_or_default();
                    out.push_str(&format!(" {name}={value:?}"));
                }
                out.push_str(">\n");
                if let Some(shadow) = data.shadow() {
                    out.push_str(&format!(
                        "{indent}  #shadow-root (open) [{} adopted sheets]\n",
                        shadow.adopted_stylesheets().len()
                    ));
                    for &child in shadow.children() {
                        self.dump_into(child, depth + 2, out);
                    }
                }
                for &child in &node.children {
                    self.dump_into(child, depth + 1, out);
                }
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
