//! Custom tag registry
//!
//! Elements registered here take part in lifecycle notification delivery:
//! the document reports connect/disconnect transitions only for registered
//! tags. A tag is registered once per document; re-registration is a host
//! error the caller decides how to surface.

use rustc_hash::FxHashSet;

use crate::error::{DomError, Result};

/// Registry of custom tag names known to a document
#[derive(Debug, Default)]
pub struct TagRegistry {
    defined: FxHashSet<String>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom tag
    ///
    /// Names must contain a hyphen and start with a lowercase ASCII letter.
    pub fn define(&mut self, tag: &str) -> Result<()> {
        if !Self::is_valid_name(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }
        if self.defined.contains(tag) {
            return Err(DomError::TagAlreadyDefined(tag.to_string()));
        }
        self.defined.insert(tag.to_string());
        Ok(())
    }

    /// Whether a tag has been defined
    pub fn is_defined(&self, tag: &str) -> bool {
        self.defined.contains(tag)
    }

    fn is_valid_name(name: &str) -> bool {
        if !name.contains('-') {
            return false;
        }
        if !name
            .chars()
            .next()
            .map(|c| c.is_ascii_lowercase())
            .unwrap_or(false)
        {
            return false;
        }
        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}
