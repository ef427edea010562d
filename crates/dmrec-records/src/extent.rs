//! # Extent — Size of the Described Resource
//!
//! `extent` carries an optional `qualifier`/`value` attribute pair
//! (byte size, page count, duration). A value without a qualifier is a
//! cardinality violation; a qualifier without a value, or an entirely
//! empty element, is tolerated with a warning.

use dmrec_core::{
    ComponentKind, DmrecError, ModelConfig, ValidationMessage, VersionDescriptor,
};
use dmrec_model::{
    is_blank, line_opt, present, seal, synthesize_node, Assemble, Builder, Component,
    ComponentCore, NodeTree, OutputFormat,
};

use crate::support::{primary_value, set_primary_attribute};

/// The extent of the described resource.
#[derive(Debug, Clone)]
pub struct Extent {
    core: ComponentCore,
    qualifier: Option<String>,
    value: Option<String>,
}

impl Extent {
    /// Read an extent from a supplied tree node.
    ///
    /// # Errors
    ///
    /// Any violated structural rule, fail-fast.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        seal(Self {
            qualifier: primary_value(node, version, "qualifier"),
            value: primary_value(node, version, "value"),
            core: ComponentCore::new(version, node.clone()),
        })
    }

    /// Build an extent from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`Extent::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        qualifier: Option<&str>,
        value: Option<&str>,
    ) -> Result<Self, DmrecError> {
        let mut node = synthesize_node(version, ComponentKind::Extent);
        if let Some(qualifier) = qualifier {
            set_primary_attribute(&mut node, version, "qualifier", qualifier);
        }
        if let Some(value) = value {
            set_primary_attribute(&mut node, version, "value", value);
        }
        Self::from_tree(version, &node)
    }

    /// The qualifier attribute, if set.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// The value attribute, if set.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Assemble for Extent {
    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn structural_rules(&self) -> Result<(), DmrecError> {
        if !is_blank(&self.value) && is_blank(&self.qualifier) {
            return Err(DmrecError::cardinality(
                "the value attribute requires an accompanying qualifier",
            ));
        }
        Ok(())
    }

    fn warning_rules(&self) -> Vec<ValidationMessage> {
        let mut warnings = Vec::new();
        if is_blank(&self.qualifier) && is_blank(&self.value) {
            warnings.push(ValidationMessage::warning(
                "a completely empty extent element was found",
                "",
            ));
        } else if is_blank(&self.value) {
            warnings.push(ValidationMessage::warning(
                "a qualifier has been set without an accompanying value attribute",
                "",
            ));
        }
        warnings
    }
}

impl Component for Extent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Extent
    }

    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn output(
        &self,
        format: OutputFormat,
        _config: &ModelConfig,
        prefix: &str,
        suffix: &str,
    ) -> String {
        let base = format!("{prefix}{}{suffix}", self.name());
        format!(
            "{}{}",
            line_opt(format, &format!("{base}.qualifier"), self.qualifier()),
            line_opt(format, &format!("{base}.value"), self.value()),
        )
    }
}

impl PartialEq for Extent {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace()
            && self.qualifier == other.qualifier
            && self.value == other.value
    }
}

impl Eq for Extent {}

impl std::hash::Hash for Extent {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.namespace().hash(state);
        self.qualifier.hash(state);
        self.value.hash(state);
    }
}

/// Mutable staging counterpart of [`Extent`].
#[derive(Debug, Clone, Default)]
pub struct ExtentBuilder {
    /// The qualifier attribute.
    pub qualifier: Option<String>,
    /// The value attribute.
    pub value: Option<String>,
}

impl From<&Extent> for ExtentBuilder {
    fn from(extent: &Extent) -> Self {
        Self {
            qualifier: extent.qualifier().map(str::to_string),
            value: extent.value().map(str::to_string),
        }
    }
}

impl Builder for ExtentBuilder {
    type Target = Extent;

    fn is_empty(&self) -> bool {
        is_blank(&self.qualifier) && is_blank(&self.value)
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Extent>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        Extent::from_values(version, present(&self.qualifier), present(&self.value)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(id: &str) -> &'static VersionDescriptor {
        VersionDescriptor::lookup(id).unwrap()
    }

    #[test]
    fn test_from_values_serializes_two_primary_attributes() {
        let v = version("2.0");
        let extent = Extent::from_values(v, Some("sizeBytes"), Some("75000")).unwrap();
        let node = extent.core().node();
        assert_eq!(node.attributes().len(), 2);
        for attribute in node.attributes() {
            assert_eq!(attribute.name.namespace, node.namespace());
        }
    }

    #[test]
    fn test_text_output_at_level_never() {
        let v = version("2.0");
        let extent = Extent::from_values(v, Some("sizeBytes"), Some("75000")).unwrap();
        let config = ModelConfig::default();
        assert_eq!(
            extent.output(OutputFormat::Text, &config, "", ""),
            "extent.qualifier: sizeBytes\nextent.value: 75000\n"
        );
    }

    #[test]
    fn test_html_output_is_meta_lines() {
        let v = version("2.0");
        let extent = Extent::from_values(v, Some("sizeBytes"), Some("75000")).unwrap();
        let config = ModelConfig::default();
        assert_eq!(
            extent.output(OutputFormat::Html, &config, "", ""),
            "<meta name=\"extent.qualifier\" content=\"sizeBytes\" />\n\
             <meta name=\"extent.value\" content=\"75000\" />\n"
        );
    }

    #[test]
    fn test_value_without_qualifier_rejected() {
        let err = Extent::from_values(version("2.0"), None, Some("75000")).unwrap_err();
        assert!(matches!(err, DmrecError::Cardinality { .. }));
        assert_eq!(err.locator().unwrap().to_string(), "/rec:extent");
    }

    #[test]
    fn test_empty_extent_warns() {
        let extent = Extent::from_values(version("2.0"), None, None).unwrap();
        let warnings = extent.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].text.contains("completely empty"));
        assert_eq!(warnings[0].locator, "/rec:extent");
    }

    #[test]
    fn test_qualifier_without_value_warns() {
        let extent = Extent::from_values(version("2.0"), Some("sizeBytes"), None).unwrap();
        assert_eq!(extent.warnings().len(), 1);
        assert!(extent.warnings()[0].text.contains("without an accompanying value"));
    }

    #[test]
    fn test_wrong_name_rejected_across_versions() {
        for v in VersionDescriptor::all() {
            let node = NodeTree::element(
                "rec",
                "size",
                v.namespace(dmrec_core::SchemaFamily::Primary),
            );
            let err = Extent::from_tree(v, &node).unwrap_err();
            assert!(matches!(err, DmrecError::Structural { .. }), "version {v}");
        }
    }

    #[test]
    fn test_builder_roundtrip_preserves_equality_and_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let v = version("2.0");
        let extent = Extent::from_values(v, Some("pageCount"), Some("12")).unwrap();
        let rebuilt = ExtentBuilder::from(&extent).commit(v).unwrap().unwrap();
        assert_eq!(extent, rebuilt);

        let hash = |e: &Extent| {
            let mut hasher = DefaultHasher::new();
            e.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&extent), hash(&rebuilt));
    }

    #[test]
    fn test_untouched_builder_commits_to_none() {
        let builder = ExtentBuilder::default();
        assert!(builder.is_empty());
        assert!(builder.commit(version("2.0")).unwrap().is_none());
    }

    #[test]
    fn test_extents_differ_across_versions() {
        let a = Extent::from_values(version("2.0"), Some("sizeBytes"), Some("1")).unwrap();
        let b = Extent::from_values(version("3.0"), Some("sizeBytes"), Some("1")).unwrap();
        assert_ne!(a, b); // namespaces differ
    }
}
