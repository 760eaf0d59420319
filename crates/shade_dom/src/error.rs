//! Error types for shade_dom

use thiserror::Error;

/// Errors surfaced by the host-document model
///
/// These are host-environment errors. The scope core never propagates them
/// to its own callers; it degrades to no-ops instead.
#[derive(Error, Debug)]
pub enum DomError {
    /// A node id does not resolve to a live node
    #[error("node is not present in the document")]
    MissingNode,

    /// An element operation was applied to a text node
    #[error("node is not an element")]
    NotAnElement,

    /// A second boundary was requested for the same element
    #[error("element already has a shadow boundary")]
    ShadowAlreadyAttached,

    /// A boundary operation was applied to an element without one
    #[error("element has no shadow boundary")]
    NoShadowRoot,

    /// A custom tag name failed validation
    #[error("invalid custom tag name: {0}")]
    InvalidTagName(String),

    /// A custom tag was registered twice
    #[error("tag already defined: {0}")]
    TagAlreadyDefined(String),
}

/// Result type for shade_dom operations
pub type Result<T> = std::result::Result<T, DomError>;
