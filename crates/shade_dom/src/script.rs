//! Script host hook
//!
//! Appending a `script` element directly into a boundary executes it
//! immediately in the boundary's context. What execution means is the
//! host's business: the document only dispatches the source to the
//! installed [`ScriptHost`], synchronously, once per node. Subtree moves
//! do not trigger execution; only direct boundary injection does.

use crate::node::NodeId;

/// Source of a script about to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// Literal script text carried by the node
    Inline(String),
    /// Remote reference carried in the node's `src` attribute
    Remote(String),
}

/// Host-side script execution hook
///
/// Execution is fire-and-forget: the document consumes no return value and
/// imposes no timeout or cancellation semantics.
pub trait ScriptHost: Send + Sync {
    fn execute(&self, node: NodeId, source: ScriptSource);
}

/// A host that ignores every script
#[derive(Debug, Default)]
pub struct NullScriptHost;

impl ScriptHost for NullScriptHost {
    fn execute(&self, _node: NodeId, _source: ScriptSource) {}
}
