//! Reactive-binding adapter seam
//!
//! The binding engine itself is an external collaborator; the scope core
//! consumes it through exactly two hooks. Both are fire-and-forget: no
//! return value is consumed and no error is expected to surface.

use shade_dom::{Document, NodeId};

/// Hooks bridging a boundary's root content node to a binding engine
pub trait BindingAdapter: Send + Sync {
    /// Wire declarative behavior onto the tree rooted at `root`
    fn initialize_tree(&self, doc: &mut Document, root: NodeId);

    /// Tear down whatever `initialize_tree` wired up
    fn destroy_tree(&self, doc: &mut Document, root: NodeId);
}

/// Adapter for hosts without a binding engine
#[derive(Debug, Default)]
pub struct NoopBinding;

impl BindingAdapter for NoopBinding {
    fn initialize_tree(&self, _doc: &mut Document, _root: NodeId) {}
    fn destroy_tree(&self, _doc: &mut Document, _root: NodeId) {}
}
