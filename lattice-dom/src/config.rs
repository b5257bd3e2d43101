//! Render configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options shared by the mount engine, the patch applier and the render
/// driver of one root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Attribute the identity token is stamped under.
    pub identity_attribute: String,

    /// Attribute keys with this prefix and a handler value become listeners.
    pub event_prefix: String,

    /// Attribute key whose style map is flattened into a declaration string.
    pub style_key: String,

    /// Prop names that collide with platform attribute names, mapped to the
    /// platform name (`className` → `class`).
    pub aliases: IndexMap<String, String>,

    /// Fail a render pass whose hook count differs from the previous pass.
    /// When false the drift is only logged.
    pub strict_hook_order: bool,

    /// Maximum nesting of components expanding into components.
    pub max_component_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let mut aliases = IndexMap::new();
        aliases.insert("className".to_string(), "class".to_string());
        aliases.insert("htmlFor".to_string(), "for".to_string());

        Self {
            identity_attribute: "data-lattice-id".to_string(),
            event_prefix: "on".to_string(),
            style_key: "style".to_string(),
            aliases,
            strict_hook_order: true,
            max_component_depth: 64,
        }
    }
}

impl RenderConfig {
    /// Defaults, but hook-count drift only warns.
    pub fn lenient() -> Self {
        Self {
            strict_hook_order: false,
            ..Default::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Config)
    }

    pub fn with_identity_attribute(mut self, name: impl Into<String>) -> Self {
        self.identity_attribute = name.into();
        self
    }

    pub fn with_alias(mut self, prop: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.aliases.insert(prop.into(), attribute.into());
        self
    }

    pub fn with_max_component_depth(mut self, depth: usize) -> Self {
        self.max_component_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.identity_attribute, "data-lattice-id");
        assert_eq!(config.aliases.get("className").map(String::as_str), Some("class"));
        assert_eq!(config.aliases.get("htmlFor").map(String::as_str), Some("for"));
        assert!(config.strict_hook_order);
        assert!(!RenderConfig::lenient().strict_hook_order);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let json = r#"{ "identity_attribute": "data-key", "max_component_depth": 8 }"#;
        let config = RenderConfig::from_json(json).unwrap();
        assert_eq!(config.identity_attribute, "data-key");
        assert_eq!(config.max_component_depth, 8);
        assert_eq!(config.event_prefix, "on");
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = RenderConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
