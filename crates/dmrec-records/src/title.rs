//! # Title and Subtitle — Names of the Described Resource
//!
//! `title` (at least one per record, non-empty text) and `subtitle`
//! (optional, defined from version "3.0") both carry text content and
//! security markings; the markings are required from version "3.0".

use dmrec_core::{ComponentKind, DmrecError, ModelConfig, VersionDescriptor};
use dmrec_model::{
    is_blank, line, present, seal, synthesize_node, Assemble, AttributeGroup, Builder,
    Component, ComponentCore, NodeTree, OutputFormat,
};

use crate::security::{SecurityAttributes, SecurityAttributesBuilder};

/// The record title.
#[derive(Debug, Clone)]
pub struct Title {
    core: ComponentCore,
    text: String,
    security: SecurityAttributes,
}

/// The record subtitle; defined from version "3.0".
#[derive(Debug, Clone)]
pub struct Subtitle {
    core: ComponentCore,
    text: String,
    security: SecurityAttributes,
}

fn titled_from_tree(
    version: &'static VersionDescriptor,
    node: &NodeTree,
) -> Result<(String, SecurityAttributes), DmrecError> {
    let text = node.text().unwrap_or_default().to_string();
    let security = SecurityAttributes::from_tree(version, node)
        .map_err(|e| e.at(&node.qualified_name()))?;
    Ok((text, security))
}

fn titled_node(
    version: &'static VersionDescriptor,
    kind: ComponentKind,
    text: &str,
    security: Option<&SecurityAttributes>,
) -> Result<NodeTree, DmrecError> {
    let mut node = synthesize_node(version, kind);
    node.set_text(text);
    SecurityAttributes::non_null_or_empty(security)
        .attach_to(&mut node)
        .map_err(|e| e.at(&node.qualified_name()))?;
    Ok(node)
}

fn require_text(text: &str, kind: ComponentKind) -> Result<(), DmrecError> {
    if text.trim().is_empty() {
        return Err(DmrecError::cardinality(format!(
            "{} must have a non-empty value",
            kind.as_str()
        )));
    }
    Ok(())
}

impl Title {
    /// Read a title from a supplied tree node.
    ///
    /// # Errors
    ///
    /// Any violated structural rule, fail-fast.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        let (text, security) = titled_from_tree(version, node)?;
        seal(Self {
            text,
            security,
            core: ComponentCore::new(version, node.clone()),
        })
    }

    /// Build a title from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`Title::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        text: &str,
        security: Option<&SecurityAttributes>,
    ) -> Result<Self, DmrecError> {
        let node = titled_node(version, ComponentKind::Title, text, security)?;
        Self::from_tree(version, &node)
    }

    /// The title text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The security markings.
    pub fn security(&self) -> &SecurityAttributes {
        &self.security
    }
}

impl Subtitle {
    /// Read a subtitle from a supplied tree node.
    ///
    /// # Errors
    ///
    /// Any violated structural rule, fail-fast. Fails with a
    /// version-range violation below version "3.0".
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        let (text, security) = titled_from_tree(version, node)?;
        seal(Self {
            text,
            security,
            core: ComponentCore::new(version, node.clone()),
        })
    }

    /// Build a subtitle from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`Subtitle::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        text: &str,
        security: Option<&SecurityAttributes>,
    ) -> Result<Self, DmrecError> {
        let node = titled_node(version, ComponentKind::Subtitle, text, security)?;
        Self::from_tree(version, &node)
    }

    /// The subtitle text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The security markings.
    pub fn security(&self) -> &SecurityAttributes {
        &self.security
    }
}

macro_rules! titled_component {
    ($type:ident, $kind:expr) => {
        impl Assemble for $type {
            fn core_mut(&mut self) -> &mut ComponentCore {
                &mut self.core
            }

            fn structural_rules(&self) -> Result<(), DmrecError> {
                require_text(&self.text, $kind)
            }
        }

        impl Component for $type {
            fn kind(&self) -> ComponentKind {
                $kind
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
                    line(format, &base, self.text()),
                    self.security.output(format, &format!("{base}.")),
                )
            }
        }

        impl PartialEq for $type {
            fn eq(&self, other: &Self) -> bool {
                self.namespace() == other.namespace()
                    && self.text == other.text
                    && self.security == other.security
            }
        }

        impl Eq for $type {}

        impl std::hash::Hash for $type {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.name().hash(state);
                self.namespace().hash(state);
                self.text.hash(state);
                self.security.hash(state);
            }
        }
    };
}

titled_component!(Title, ComponentKind::Title);
titled_component!(Subtitle, ComponentKind::Subtitle);

/// Mutable staging counterpart of [`Title`].
#[derive(Debug, Clone, Default)]
pub struct TitleBuilder {
    /// The title text.
    pub text: Option<String>,
    /// The security markings.
    pub security: SecurityAttributesBuilder,
}

impl From<&Title> for TitleBuilder {
    fn from(title: &Title) -> Self {
        Self {
            text: Some(title.text().to_string()),
            security: SecurityAttributesBuilder::from(title.security()),
        }
    }
}

impl Builder for TitleBuilder {
    type Target = Title;

    fn is_empty(&self) -> bool {
        is_blank(&self.text) && self.security.is_empty()
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Title>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        let security = self.security.commit(version)?;
        Title::from_values(
            version,
            present(&self.text).unwrap_or_default(),
            security.as_ref(),
        )
        .map(Some)
    }
}

/// Mutable staging counterpart of [`Subtitle`].
#[derive(Debug, Clone, Default)]
pub struct SubtitleBuilder {
    /// The subtitle text.
    pub text: Option<String>,
    /// The security markings.
    pub security: SecurityAttributesBuilder,
}

impl From<&Subtitle> for SubtitleBuilder {
    fn from(subtitle: &Subtitle) -> Self {
        Self {
            text: Some(subtitle.text().to_string()),
            security: SecurityAttributesBuilder::from(subtitle.security()),
        }
    }
}

impl Builder for SubtitleBuilder {
    type Target = Subtitle;

    fn is_empty(&self) -> bool {
        is_blank(&self.text) && self.security.is_empty()
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Subtitle>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        let security = self.security.commit(version)?;
        Subtitle::from_values(
            version,
            present(&self.text).unwrap_or_default(),
            security.as_ref(),
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

    fn markings(v: &'static VersionDescriptor) -> SecurityAttributes {
        SecurityAttributes::from_values(v, Some("U"), &["AUS"], None).unwrap()
    }

    #[test]
    fn test_title_unmarked_at_2_0() {
        let title = Title::from_values(version("2.0"), "Sample Title", None).unwrap();
        assert_eq!(title.text(), "Sample Title");
    }

    #[test]
    fn test_title_requires_markings_from_3_0() {
        let err = Title::from_values(version("3.0"), "Sample Title", None).unwrap_err();
        assert!(matches!(err, DmrecError::Cardinality { .. }));

        let v = version("3.0");
        let title = Title::from_values(v, "Sample Title", Some(&markings(v))).unwrap();
        assert_eq!(title.security().classification(), Some("U"));
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = Title::from_values(version("2.0"), "   ", None).unwrap_err();
        assert!(matches!(err, DmrecError::Cardinality { .. }));
    }

    #[test]
    fn test_subtitle_version_window() {
        let err = Subtitle::from_values(version("2.0"), "Below Window", None).unwrap_err();
        assert!(matches!(err, DmrecError::VersionRange { .. }));

        let v = version("3.0");
        assert!(Subtitle::from_values(v, "In Window", Some(&markings(v))).is_ok());
    }

    #[test]
    fn test_title_output_includes_markings() {
        let v = version("3.0");
        let title = Title::from_values(v, "Sample Title", Some(&markings(v))).unwrap();
        let config = ModelConfig::default();
        assert_eq!(
            title.output(OutputFormat::Text, &config, "", ""),
            "title: Sample Title\ntitle.classification: U\ntitle.ownerProducer: AUS\n"
        );
    }

    #[test]
    fn test_title_builder_roundtrip() {
        let v = version("3.1");
        let security =
            SecurityAttributes::from_values(v, Some("S"), &["AUS", "USA"], None).unwrap();
        let title = Title::from_values(v, "Sample Title", Some(&security)).unwrap();
        let rebuilt = TitleBuilder::from(&title).commit(v).unwrap().unwrap();
        assert_eq!(title, rebuilt);
    }

    #[test]
    fn test_title_from_tree_reads_text() {
        let v = version("2.0");
        let mut node = synthesize_node(v, ComponentKind::Title);
        node.set_text("From Tree");
        let title = Title::from_tree(v, &node).unwrap();
        assert_eq!(title.text(), "From Tree");
    }
}
