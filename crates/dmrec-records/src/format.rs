//! # Format — Physical or Digital Form of the Resource
//!
//! `format` carries a required `mimeType` attribute, an optional
//! `medium` attribute, and at most one `extent` child.

use dmrec_core::{ComponentKind, DmrecError, ModelConfig, VersionDescriptor};
use dmrec_model::{
    child_output, is_blank, line, line_opt, present, seal, synthesize_node, Assemble,
    Builder, Component, ComponentCore, NodeTree, OutputFormat,
};

use crate::extent::{Extent, ExtentBuilder};
use crate::support::{primary_value, set_primary_attribute};

/// The format of the described resource.
#[derive(Debug, Clone)]
pub struct Format {
    core: ComponentCore,
    mime_type: String,
    medium: Option<String>,
    extent: Option<Extent>,
}

impl Format {
    /// Read a format from a supplied tree node.
    ///
    /// # Errors
    ///
    /// Any violated structural rule of the format or its extent child,
    /// fail-fast; child failures gain this element's locator segment.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        let ns = node.namespace().to_string();
        let extent = node
            .children_named(&ns, ComponentKind::Extent.as_str())
            .next()
            .map(|child| Extent::from_tree(version, child))
            .transpose()
            .map_err(|e| e.at(&node.qualified_name()))?;
        seal(Self {
            mime_type: primary_value(node, version, "mimeType").unwrap_or_default(),
            medium: primary_value(node, version, "medium"),
            extent,
            core: ComponentCore::new(version, node.clone()),
        })
    }

    /// Build a format from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`Format::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        mime_type: &str,
        medium: Option<&str>,
        extent: Option<&Extent>,
    ) -> Result<Self, DmrecError> {
        let mut node = synthesize_node(version, ComponentKind::Format);
        set_primary_attribute(&mut node, version, "mimeType", mime_type);
        if let Some(medium) = medium {
            set_primary_attribute(&mut node, version, "medium", medium);
        }
        if let Some(extent) = extent {
            node.push_child(extent.core().node().clone());
        }
        Self::from_tree(version, &node)
    }

    /// The required mime type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The medium, if set.
    pub fn medium(&self) -> Option<&str> {
        self.medium.as_deref()
    }

    /// The extent child, if present.
    pub fn extent(&self) -> Option<&Extent> {
        self.extent.as_ref()
    }
}

impl Assemble for Format {
    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn structural_rules(&self) -> Result<(), DmrecError> {
        if self.mime_type.trim().is_empty() {
            return Err(DmrecError::cardinality(
                "the mimeType attribute must have a value",
            ));
        }
        Ok(())
    }
}

impl Component for Format {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Format
    }

    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn child_components(&self) -> Vec<&dyn Component> {
        self.extent
            .as_ref()
            .map(|e| vec![e as &dyn Component])
            .unwrap_or_default()
    }

    fn output(
        &self,
        format: OutputFormat,
        config: &ModelConfig,
        prefix: &str,
        suffix: &str,
    ) -> String {
        let base = format!("{prefix}{}{suffix}", self.name());
        format!(
            "{}{}{}",
            line(format, &format!("{base}.mimeType"), self.mime_type()),
            line_opt(format, &format!("{base}.medium"), self.medium()),
            child_output(
                format,
                config,
                &format!("{base}."),
                self.extent.as_slice()
            ),
        )
    }
}

impl PartialEq for Format {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace()
            && self.mime_type == other.mime_type
            && self.medium == other.medium
            && self.extent == other.extent
    }
}

impl Eq for Format {}

impl std::hash::Hash for Format {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.namespace().hash(state);
        self.mime_type.hash(state);
        self.medium.hash(state);
        self.extent.hash(state);
    }
}

/// Mutable staging counterpart of [`Format`].
#[derive(Debug, Clone, Default)]
pub struct FormatBuilder {
    /// The mime type.
    pub mime_type: Option<String>,
    /// The medium.
    pub medium: Option<String>,
    /// The extent child.
    pub extent: ExtentBuilder,
}

impl From<&Format> for FormatBuilder {
    fn from(format: &Format) -> Self {
        Self {
            mime_type: Some(format.mime_type().to_string()),
            medium: format.medium().map(str::to_string),
            extent: format
                .extent()
                .map(ExtentBuilder::from)
                .unwrap_or_default(),
        }
    }
}

impl Builder for FormatBuilder {
    type Target = Format;

    fn is_empty(&self) -> bool {
        is_blank(&self.mime_type) && is_blank(&self.medium) && self.extent.is_empty()
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Format>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        let extent = self.extent.commit(version)?;
        Format::from_values(
            version,
            present(&self.mime_type).unwrap_or_default(),
            present(&self.medium),
            extent.as_ref(),
        )
        .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(id: &str) -> &'static VersionDescriptor {
        VersionDescriptor::lookup(id).unwrap()
    }

    fn sample_extent(v: &'static VersionDescriptor) -> Extent {
        Extent::from_values(v, Some("sizeBytes"), Some("75000")).unwrap()
    }

    #[test]
    fn test_from_values_with_extent() {
        let v = version("2.0");
        let format =
            Format::from_values(v, "text/xml", Some("digital"), Some(&sample_extent(v)))
                .unwrap();
        assert_eq!(format.mime_type(), "text/xml");
        assert_eq!(format.extent().unwrap().qualifier(), Some("sizeBytes"));
    }

    #[test]
    fn test_missing_mime_type_rejected() {
        let v = version("2.0");
        let node = synthesize_node(v, ComponentKind::Format);
        let err = Format::from_tree(v, &node).unwrap_err();
        assert!(matches!(err, DmrecError::Cardinality { .. }));
    }

    #[test]
    fn test_child_failure_gains_parent_locator() {
        let v = version("2.0");
        let mut node = synthesize_node(v, ComponentKind::Format);
        set_primary_attribute(&mut node, v, "mimeType", "text/xml");
        // Extent child with a value but no qualifier.
        let mut extent_node = synthesize_node(v, ComponentKind::Extent);
        set_primary_attribute(&mut extent_node, v, "value", "75000");
        node.push_child(extent_node);

        let err = Format::from_tree(v, &node).unwrap_err();
        assert_eq!(
            err.locator().unwrap().to_string(),
            "/rec:format/rec:extent"
        );
    }

    #[test]
    fn test_output_nests_extent_keys() {
        let v = version("2.0");
        let format =
            Format::from_values(v, "text/xml", None, Some(&sample_extent(v))).unwrap();
        let config = ModelConfig::default();
        assert_eq!(
            format.output(OutputFormat::Text, &config, "", ""),
            "format.mimeType: text/xml\n\
             format.extent.qualifier: sizeBytes\n\
             format.extent.value: 75000\n"
        );
    }

    #[test]
    fn test_extent_warning_surfaces_with_nested_locator() {
        let v = version("2.0");
        let empty_extent = Extent::from_values(v, None, None).unwrap();
        let format =
            Format::from_values(v, "text/xml", None, Some(&empty_extent)).unwrap();
        let warnings = format.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].locator, "/rec:format/rec:extent");
    }

    #[test]
    fn test_builder_roundtrip() {
        let v = version("3.0");
        let format =
            Format::from_values(v, "text/xml", Some("digital"), Some(&sample_extent(v)))
                .unwrap();
        let rebuilt = FormatBuilder::from(&format).commit(v).unwrap().unwrap();
        assert_eq!(format, rebuilt);
    }

    #[test]
    fn test_builder_extent_slot_committed_lazily() {
        let v = version("2.0");
        let mut builder = FormatBuilder::default();
        builder.mime_type = Some("text/xml".to_string());
        // Untouched extent slot commits to no child at all.
        let format = builder.commit(v).unwrap().unwrap();
        assert!(format.extent().is_none());
    }
}
