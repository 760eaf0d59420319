//! Styling generator seam
//!
//! The utility-class styling engine is an external collaborator consumed
//! exactly once, when the factory is built: it turns the configured styling
//! options into a base enhancement stylesheet that every boundary adopts
//! before any registry style. It is never re-invoked per instance.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shade_dom::Stylesheet;

/// Opaque styling-engine options
///
/// The scope core does not interpret these beyond handing them to the
/// generator; the generator merges them into its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StylingConfig {
    #[serde(flatten)]
    options: serde_json::Map<String, Value>,
}

impl StylingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Look up an option
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Overlay these options onto a set of defaults
    ///
    /// Keys present here win; defaults fill the gaps.
    pub fn merged_into(self, mut defaults: StylingConfig) -> StylingConfig {
        for (key, value) in self.options {
            defaults.options.insert(key, value);
        }
        defaults
    }
}

/// Produces the uniform per-boundary enhancement
pub trait StylingGenerator: Send + Sync {
    /// Generate the base stylesheet for the given options, or None when the
    /// configuration yields no enhancement
    fn enhancement(&self, config: &StylingConfig) -> Option<Stylesheet>;
}

/// A generator that serves one fixed stylesheet
///
/// Stands in for a real utility-class engine: the base CSS (typically a
/// preflight/reset) is compiled once and shared by every boundary. The
/// `preflight` option, when set to `false`, suppresses the enhancement
/// entirely.
#[derive(Debug, Default)]
pub struct StaticGenerator {
    css: String,
    defaults: StylingConfig,
}

impl StaticGenerator {
    pub fn new(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            defaults: StylingConfig::default(),
        }
    }

    /// Set the generator's default options (builder pattern)
    pub fn with_defaults(mut self, defaults: StylingConfig) -> Self {
        self.defaults = defaults;
        self
    }
}

impl StylingGenerator for StaticGenerator {
    fn enhancement(&self, config: &StylingConfig) -> Option<Stylesheet> {
        let merged = config.clone().merged_into(self.defaults.clone());
        if merged.get("preflight").and_then(Value::as_bool) == Some(false) {
            return None;
        }
        if self.css.is_empty() {
            return None;
        }
        Some(Stylesheet::compile(self.css.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overlays_defaults() {
        let defaults = StylingConfig::new()
            .with("preflight", true)
            .with("hash", false);
        let merged = StylingConfig::new()
            .with("preflight", false)
            .merged_into(defaults);

        assert_eq!(merged.get("preflight"), Some(&Value::Bool(false)));
        assert_eq!(merged.get("hash"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_static_generator_serves_base_sheet() {
        let generator = StaticGenerator::new("*{box-sizing:border-box}");
        let sheet = generator.enhancement(&StylingConfig::new()).unwrap();
        assert_eq!(sheet.source(), "*{box-sizing:border-box}");
    }

    #[test]
    fn test_preflight_false_suppresses_enhancement() {
        let generator = StaticGenerator::new("*{box-sizing:border-box}");
        let config = StylingConfig::new().with("preflight", false);
        assert!(generator.enhancement(&config).is_none());
    }

    #[test]
    fn test_empty_css_yields_no_enhancement() {
        let generator = StaticGenerator::new("");
        assert!(generator.enhancement(&StylingConfig::new()).is_none());
    }
}
