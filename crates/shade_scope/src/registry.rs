//! Style/script source registry
//!
//! The registry is built once at startup from [`ScopeConfig`] and shared by
//! every scope element instance. Each configured source string is classified
//! as a remote reference or inline payload; classification is pure and total
//! and performs no network access. The resulting sequences are frozen: no
//! operation adds, removes, or reorders entries afterwards.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::ScopeConfig;

/// Classification of a registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// An absolute http(s) URL, referenced rather than embedded
    RemoteReference,
    /// A literal payload injected verbatim
    InlineContent,
}

/// One configured style or script source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub content: String,
    pub kind: EntryKind,
}

impl RegistryEntry {
    /// Classify a single source string
    pub fn classify(content: impl Into<String>) -> Self {
        let content = content.into();
        let kind = if remote_pattern().is_match(&content) {
            EntryKind::RemoteReference
        } else {
            EntryKind::InlineContent
        };
        Self { content, kind }
    }
}

fn remote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^https?://").expect("pattern is valid"))
}

/// Classify an ordered sequence of source strings
pub fn classify(entries: &[String]) -> Vec<RegistryEntry> {
    entries
        .iter()
        .map(|entry| RegistryEntry::classify(entry.clone()))
        .collect()
}

/// The process-wide, frozen style/script registry
///
/// Shared by reference between all instances; there is deliberately no
/// mutation API after construction.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScopeRegistry {
    styles: Vec<RegistryEntry>,
    scripts: Vec<RegistryEntry>,
}

impl ScopeRegistry {
    /// Classify the configured style and script source lists
    pub fn from_config(config: &ScopeConfig) -> Self {
        Self {
            styles: classify(&config.style),
            scripts: classify(&config.script),
        }
    }

    /// Style entries, in registration order
    pub fn styles(&self) -> &[RegistryEntry] {
        &self.styles
    }

    /// Script entries, in registration order
    pub fn scripts(&self) -> &[RegistryEntry] {
        &self.scripts
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.scripts.is_empty()
    }
}
