//! # Rights — Privacy and Ownership Markings
//!
//! `rights` carries three optional boolean attributes: `privacyAct`,
//! `intellectualProperty`, `copyright`. Unset attributes read as false.

use dmrec_core::{ComponentKind, DmrecError, ModelConfig, VersionDescriptor};
use dmrec_model::{
    line_opt, seal, synthesize_node, Assemble, Builder, Component, ComponentCore, NodeTree,
    OutputFormat,
};

use crate::support::{primary_value, set_primary_attribute};

const RIGHTS_ATTRIBUTES: [&str; 3] = ["privacyAct", "intellectualProperty", "copyright"];

/// Rights markings for the described resource.
#[derive(Debug, Clone)]
pub struct Rights {
    core: ComponentCore,
    privacy_act: Option<bool>,
    intellectual_property: Option<bool>,
    copyright: Option<bool>,
}

fn parse_flag(raw: Option<String>, local: &str) -> Result<Option<bool>, DmrecError> {
    match raw.as_deref() {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(DmrecError::structural(format!(
            "the {local} attribute must be a boolean, got {other:?}"
        ))),
    }
}

impl Rights {
    /// Read a rights element from a supplied tree node.
    ///
    /// # Errors
    ///
    /// Any violated structural rule, fail-fast.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        let qualified = node.qualified_name();
        let flag = |local: &str| -> Result<Option<bool>, DmrecError> {
            parse_flag(primary_value(node, version, local), local)
                .map_err(|e| e.at(&qualified))
        };
        seal(Self {
            privacy_act: flag("privacyAct")?,
            intellectual_property: flag("intellectualProperty")?,
            copyright: flag("copyright")?,
            core: ComponentCore::new(version, node.clone()),
        })
    }

    /// Build a rights element from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`Rights::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        privacy_act: Option<bool>,
        intellectual_property: Option<bool>,
        copyright: Option<bool>,
    ) -> Result<Self, DmrecError> {
        let mut node = synthesize_node(version, ComponentKind::Rights);
        let flags = [privacy_act, intellectual_property, copyright];
        for (local, flag) in RIGHTS_ATTRIBUTES.iter().zip(flags) {
            if let Some(flag) = flag {
                set_primary_attribute(&mut node, version, local, if flag { "true" } else { "false" });
            }
        }
        Self::from_tree(version, &node)
    }

    /// Whether the resource is protected by the Privacy Act.
    pub fn privacy_act(&self) -> bool {
        self.privacy_act.unwrap_or(false)
    }

    /// Whether the resource carries intellectual-property restrictions.
    pub fn intellectual_property(&self) -> bool {
        self.intellectual_property.unwrap_or(false)
    }

    /// Whether the resource is copyrighted.
    pub fn copyright(&self) -> bool {
        self.copyright.unwrap_or(false)
    }

    fn fields(&self) -> [(&'static str, Option<bool>); 3] {
        [
            ("privacyAct", self.privacy_act),
            ("intellectualProperty", self.intellectual_property),
            ("copyright", self.copyright),
        ]
    }
}

impl Assemble for Rights {
    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }
}

impl Component for Rights {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Rights
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
        self.fields()
            .iter()
            .map(|(local, flag)| {
                let value = flag.map(|f| if f { "true" } else { "false" });
                line_opt(format, &format!("{base}.{local}"), value)
            })
            .collect()
    }
}

impl PartialEq for Rights {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace()
            && self.privacy_act == other.privacy_act
            && self.intellectual_property == other.intellectual_property
            && self.copyright == other.copyright
    }
}

impl Eq for Rights {}

impl std::hash::Hash for Rights {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.namespace().hash(state);
        self.privacy_act.hash(state);
        self.intellectual_property.hash(state);
        self.copyright.hash(state);
    }
}

/// Mutable staging counterpart of [`Rights`].
#[derive(Debug, Clone, Default)]
pub struct RightsBuilder {
    /// Privacy Act protection.
    pub privacy_act: Option<bool>,
    /// Intellectual-property restrictions.
    pub intellectual_property: Option<bool>,
    /// Copyright.
    pub copyright: Option<bool>,
}

impl From<&Rights> for RightsBuilder {
    fn from(rights: &Rights) -> Self {
        Self {
            privacy_act: rights.privacy_act,
            intellectual_property: rights.intellectual_property,
            copyright: rights.copyright,
        }
    }
}

impl Builder for RightsBuilder {
    type Target = Rights;

    fn is_empty(&self) -> bool {
        self.privacy_act.is_none()
            && self.intellectual_property.is_none()
            && self.copyright.is_none()
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Rights>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        Rights::from_values(
            version,
            self.privacy_act,
            self.intellectual_property,
            self.copyright,
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

    #[test]
    fn test_unset_flags_read_false() {
        let rights = Rights::from_values(version("2.0"), None, None, None).unwrap();
        assert!(!rights.privacy_act());
        assert!(!rights.intellectual_property());
        assert!(!rights.copyright());
    }

    #[test]
    fn test_explicit_flags() {
        let rights =
            Rights::from_values(version("2.0"), Some(true), None, Some(false)).unwrap();
        assert!(rights.privacy_act());
        assert!(!rights.copyright());
    }

    #[test]
    fn test_non_boolean_attribute_rejected() {
        let v = version("2.0");
        let mut node = synthesize_node(v, ComponentKind::Rights);
        set_primary_attribute(&mut node, v, "privacyAct", "yes");
        let err = Rights::from_tree(v, &node).unwrap_err();
        assert!(matches!(err, DmrecError::Structural { .. }));
        assert_eq!(err.locator().unwrap().to_string(), "/rec:rights");
    }

    #[test]
    fn test_output_lists_only_explicit_flags() {
        let rights =
            Rights::from_values(version("2.0"), Some(true), None, Some(false)).unwrap();
        let config = ModelConfig::default();
        assert_eq!(
            rights.output(OutputFormat::Text, &config, "", ""),
            "rights.privacyAct: true\nrights.copyright: false\n"
        );
    }

    #[test]
    fn test_builder_roundtrip() {
        let v = version("2.0");
        let rights = Rights::from_values(v, Some(true), Some(false), None).unwrap();
        let rebuilt = RightsBuilder::from(&rights).commit(v).unwrap().unwrap();
        assert_eq!(rights, rebuilt);
    }

    #[test]
    fn test_empty_builder_commits_to_none() {
        assert!(RightsBuilder::default().commit(version("2.0")).unwrap().is_none());
    }
}
