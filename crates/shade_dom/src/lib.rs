//! Shade Host-Document Model
//!
//! A retained element tree with the host-environment services the scope
//! core is driven by:
//!
//! - **Node arena**: slotmap-keyed elements and text nodes
//! - **Shadow boundaries**: per-element isolated subtrees with additive
//!   adopted stylesheets
//! - **Tag registry**: custom tags whose connect/disconnect transitions are
//!   reported through the lifecycle notification queue
//! - **Script host**: synchronous execution hook for scripts injected
//!   directly into a boundary
//!
//! # Example
//!
//! ```rust
//! use shade_dom::{Document, ShadowMode};
//!
//! let mut doc = Document::new();
//! let host = doc.create_element("shade-scope");
//! let content = doc.create_element("div");
//! doc.append_child(host, content).unwrap();
//!
//! // Stand up the boundary and move the light content inside it.
//! doc.attach_shadow(host, ShadowMode::Open).unwrap();
//! doc.migrate_children_to_boundary(host).unwrap();
//!
//! assert!(doc.children(host).is_empty());
//! assert_eq!(doc.boundary_children(host), [content]);
//! ```

pub mod document;
pub mod error;
pub mod node;
pub mod registry;
pub mod script;
pub mod shadow;
pub mod stylesheet;

// Core types
pub use document::{Document, LifecycleNotification, NotificationKind};
pub use error::{DomError, Result};
pub use node::{ElementData, Node, NodeId, NodeKind, ParentLink};

// Boundary types
pub use shadow::{ShadowMode, ShadowRoot};
pub use stylesheet::Stylesheet;

// Host-environment services
pub use registry::TagRegistry;
pub use script::{NullScriptHost, ScriptHost, ScriptSource};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::document::{Document, LifecycleNotification, NotificationKind};
    pub use crate::error::DomError;
    pub use crate::node::NodeId;
    pub use crate::script::{ScriptHost, ScriptSource};
    pub use crate::shadow::ShadowMode;
    pub use crate::stylesheet::Stylesheet;
}
