//! Scope configuration
//!
//! An explicit value built once at startup and passed into the factory by
//! the host, rather than read from ambient global state. The style and
//! script lists feed the registry (classified per entry); the styling
//! section is handed to the styling generator.

use serde::{Deserialize, Serialize};

use crate::styling::StylingConfig;

/// Startup configuration for scope elements
///
/// Each `style`/`script` entry is either an absolute http(s) URL or a
/// literal inline payload; classification happens when the registry is
/// built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScopeConfig {
    #[serde(default)]
    pub style: Vec<String>,
    #[serde(default)]
    pub script: Vec<String>,
    /// Opaque styling-engine options, merged into the generator's defaults
    #[serde(default)]
    pub styling: StylingConfig,
}
