//! Shade Scope Element
//!
//! A style-isolated embedding primitive for retained UI trees: the scope
//! element moves its light content into an isolated boundary, injects a
//! configured set of styles and scripts, derives a class/id identity from a
//! per-instance JSON descriptor, and bridges the boundary's root content
//! node to a reactive-binding engine through two lifecycle hooks.
//!
//! - **Registry**: style/script sources classified once at startup, frozen
//!   and shared by every instance
//! - **Scope element**: boundary creation, injection, content migration,
//!   identity attachment, attach/detach lifecycle
//! - **Adapter seams**: [`BindingAdapter`] and [`StylingGenerator`] are the
//!   only contact points with the external engines
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use shade_dom::Document;
//! use shade_scope::{
//!     NoopBinding, ScopeConfig, ScopeFactory, StaticGenerator, PROPS_ATTRIBUTE, SCOPE_TAG,
//! };
//!
//! let config = ScopeConfig {
//!     style: vec![".btn{color:red}".to_string()],
//!     ..ScopeConfig::default()
//! };
//! let factory = ScopeFactory::new(&config, &StaticGenerator::new(""), Arc::new(NoopBinding));
//!
//! let mut doc = Document::new();
//! factory.register(&mut doc).unwrap();
//!
//! let host = doc.create_element(SCOPE_TAG);
//! doc.set_attribute(host, PROPS_ATTRIBUTE, r#"{"type":"card","id":7}"#);
//! let content = doc.create_element("div");
//! doc.append_child(host, content).unwrap();
//!
//! let mut scope = factory.upgrade(&mut doc, host);
//! doc.append_child(doc.root(), host).unwrap();
//! scope.connected(&mut doc);
//!
//! assert!(doc.has_class(content, "card"));
//! assert_eq!(doc.attribute(content, "id"), Some("card-7"));
//! ```

pub mod binding;
pub mod config;
pub mod descriptor;
pub mod element;
pub mod registry;
pub mod styling;

// Core types
pub use config::ScopeConfig;
pub use descriptor::{DescriptorId, InstanceDescriptor, PROPS_ATTRIBUTE};
pub use element::{LifecycleState, ScopeElement, ScopeFactory, SCOPE_TAG};
pub use registry::{classify, EntryKind, RegistryEntry, ScopeRegistry};

// Adapter seams
pub use binding::{BindingAdapter, NoopBinding};
pub use styling::{StaticGenerator, StylingConfig, StylingGenerator};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::binding::{BindingAdapter, NoopBinding};
    pub use crate::config::ScopeConfig;
    pub use crate::descriptor::{InstanceDescriptor, PROPS_ATTRIBUTE};
    pub use crate::element::{LifecycleState, ScopeElement, ScopeFactory, SCOPE_TAG};
    pub use crate::registry::{EntryKind, RegistryEntry, ScopeRegistry};
    pub use crate::styling::{StaticGenerator, StylingConfig, StylingGenerator};
}
