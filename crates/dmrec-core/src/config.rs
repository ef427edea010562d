//! # Configuration Surface
//!
//! The two knobs the core consumes: `output.indexLevel` (0|1|2, the
//! index-numbering convention) and `prefix.<family>` (serialization
//! namespace prefix per schema family). Loadable from a flat properties
//! map or from a JSON/YAML file, dispatched on extension. Unknown keys
//! are rejected rather than ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::DmrecError;
use crate::index::IndexLevel;
use crate::version::SchemaFamily;

/// Resolved configuration consumed by output projection and node
/// synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// The index-numbering convention for repeated output keys.
    pub index_level: IndexLevel,
    prefixes: BTreeMap<SchemaFamily, String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let mut prefixes = BTreeMap::new();
        prefixes.insert(SchemaFamily::Primary, "rec".to_string());
        prefixes.insert(SchemaFamily::Security, "sec".to_string());
        prefixes.insert(SchemaFamily::Coordinate, "gml".to_string());
        prefixes.insert(SchemaFamily::Relationship, "xlink".to_string());
        Self {
            index_level: IndexLevel::Never,
            prefixes,
        }
    }
}

impl ModelConfig {
    /// The serialization prefix for a schema family.
    pub fn prefix(&self, family: SchemaFamily) -> &str {
        // Every family has a default; overrides replace, never remove.
        self.prefixes
            .get(&family)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Override the serialization prefix for a schema family.
    pub fn set_prefix(&mut self, family: SchemaFamily, prefix: impl Into<String>) {
        self.prefixes.insert(family, prefix.into());
    }

    /// Build a configuration from a flat properties map.
    ///
    /// Recognized keys: `output.indexLevel` with value `0`, `1`, or `2`;
    /// `prefix.<family>` where `<family>` is one of `primary`,
    /// `security`, `coordinate`, `relationship`.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::Config` for unknown keys, unknown families,
    /// or out-of-range index levels.
    pub fn from_properties(
        properties: &BTreeMap<String, String>,
    ) -> Result<Self, DmrecError> {
        let mut config = Self::default();
        for (key, value) in properties {
            if key == "output.indexLevel" {
                let level: u8 = value.parse().map_err(|_| {
                    DmrecError::config(format!(
                        "output.indexLevel must be numeric, got {value:?}"
                    ))
                })?;
                config.index_level = IndexLevel::try_from(level)?;
            } else if let Some(family) = key.strip_prefix("prefix.") {
                let family: SchemaFamily = family.parse()?;
                config.set_prefix(family, value.clone());
            } else {
                return Err(DmrecError::config(format!(
                    "unknown configuration key: {key:?}"
                )));
            }
        }
        Ok(config)
    }

    /// Load a configuration file, dispatching on extension: `.yaml` /
    /// `.yml` parse as YAML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::Io` when the file cannot be read and
    /// `DmrecError::Config` when it cannot be parsed or contains
    /// unknown keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DmrecError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let raw: RawConfig = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| {
                DmrecError::config(format!("invalid YAML in {}: {e}", path.display()))
            })?,
            _ => serde_json::from_str(&content).map_err(|e| {
                DmrecError::config(format!("invalid JSON in {}: {e}", path.display()))
            })?,
        };

        raw.resolve()
    }
}

/// File-shaped configuration prior to validation.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    output: RawOutput,
    #[serde(default)]
    prefix: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    #[serde(rename = "indexLevel")]
    index_level: Option<u8>,
}

impl RawConfig {
    fn resolve(self) -> Result<ModelConfig, DmrecError> {
        let mut config = ModelConfig::default();
        if let Some(level) = self.output.index_level {
            config.index_level = IndexLevel::try_from(level)?;
        }
        for (family, prefix) in self.prefix {
            let family: SchemaFamily = family.parse()?;
            config.set_prefix(family, prefix);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes() {
        let config = ModelConfig::default();
        assert_eq!(config.prefix(SchemaFamily::Primary), "rec");
        assert_eq!(config.prefix(SchemaFamily::Security), "sec");
        assert_eq!(config.prefix(SchemaFamily::Coordinate), "gml");
        assert_eq!(config.prefix(SchemaFamily::Relationship), "xlink");
        assert_eq!(config.index_level, IndexLevel::Never);
    }

    #[test]
    fn test_from_properties_index_level() {
        let mut props = BTreeMap::new();
        props.insert("output.indexLevel".to_string(), "2".to_string());
        let config = ModelConfig::from_properties(&props).unwrap();
        assert_eq!(config.index_level, IndexLevel::Always);
    }

    #[test]
    fn test_from_properties_prefix_override() {
        let mut props = BTreeMap::new();
        props.insert("prefix.security".to_string(), "ism".to_string());
        let config = ModelConfig::from_properties(&props).unwrap();
        assert_eq!(config.prefix(SchemaFamily::Security), "ism");
        // Untouched families keep their defaults.
        assert_eq!(config.prefix(SchemaFamily::Primary), "rec");
    }

    #[test]
    fn test_from_properties_unknown_key_rejected() {
        let mut props = BTreeMap::new();
        props.insert("output.colour".to_string(), "blue".to_string());
        let err = ModelConfig::from_properties(&props).unwrap_err();
        assert!(matches!(err, DmrecError::Config { .. }));
    }

    #[test]
    fn test_from_properties_unknown_family_rejected() {
        let mut props = BTreeMap::new();
        props.insert("prefix.metric".to_string(), "m".to_string());
        assert!(ModelConfig::from_properties(&props).is_err());
    }

    #[test]
    fn test_from_properties_bad_level_rejected() {
        let mut props = BTreeMap::new();
        props.insert("output.indexLevel".to_string(), "7".to_string());
        assert!(ModelConfig::from_properties(&props).is_err());
        props.insert("output.indexLevel".to_string(), "two".to_string());
        assert!(ModelConfig::from_properties(&props).is_err());
    }

    #[test]
    fn test_raw_config_resolve_json() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"output": {"indexLevel": 1}, "prefix": {"security": "ism"}}"#,
        )
        .unwrap();
        let config = raw.resolve().unwrap();
        assert_eq!(config.index_level, IndexLevel::MultipleOnly);
        assert_eq!(config.prefix(SchemaFamily::Security), "ism");
    }

    #[test]
    fn test_raw_config_rejects_unknown_field() {
        let parsed: Result<RawConfig, _> =
            serde_json::from_str(r#"{"outputs": {"indexLevel": 1}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_raw_config_resolve_yaml() {
        let raw: RawConfig = serde_yaml::from_str(
            "output:\n  indexLevel: 2\nprefix:\n  primary: ddms\n",
        )
        .unwrap();
        let config = raw.resolve().unwrap();
        assert_eq!(config.index_level, IndexLevel::Always);
        assert_eq!(config.prefix(SchemaFamily::Primary), "ddms");
    }
}
