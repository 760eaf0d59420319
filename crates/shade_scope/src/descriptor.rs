//! Per-instance descriptor
//!
//! Each scope element may carry a JSON payload in its `data-props`
//! attribute with optional identity fields (`type`, `id`) and an optional
//! per-instance script. The descriptor is an explicit optional-field
//! record: an absent attribute, or one that fails to parse, yields the
//! empty descriptor and a single logged diagnostic - a parse failure never
//! propagates out of construction or attachment.

use std::fmt;

use serde::Deserialize;
use tracing::error;

/// Attribute holding the instance descriptor JSON
pub const PROPS_ATTRIBUTE: &str = "data-props";

/// The per-instance JSON payload, all fields optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InstanceDescriptor {
    /// Identity class added to the boundary's first content node on attach
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Identity id; combined with `type` into `"<type>-<id>"`
    pub id: Option<DescriptorId>,
    /// Script text injected into the boundary at construction
    pub script: Option<String>,
}

impl InstanceDescriptor {
    /// Parse the descriptor attribute, degrading to the empty descriptor
    ///
    /// Reported failures are logged once and swallowed; the caller always
    /// receives a usable value.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str(raw) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                error!(%err, "failed to parse scope descriptor, treating as empty");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.id.is_none() && self.script.is_none()
    }
}

/// A descriptor id: JSON string or number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DescriptorId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorId::Text(text) => f.write_str(text),
            DescriptorId::Number(number) => write!(f, "{number}"),
        }
    }
}
