//! # Security Attributes — Classification Markings
//!
//! The security-family attribute group: a classification token, the
//! producing organizations, and (from version "3.1") a compliance
//! listing. Carried by the root record and by title elements; required
//! on both from version "3.0".
//!
//! The attribute locals here are the same
//! [`policy`](dmrec_core::policy) constants the reserved-name tables are
//! built from, so extension content can never shadow them.

use dmrec_core::policy::{
    SECURITY_CLASSIFICATION, SECURITY_COMPLIES_WITH, SECURITY_OWNER_PRODUCER,
};
use dmrec_core::{DmrecError, ModelConfig, SchemaFamily, VersionDescriptor};
use dmrec_model::{
    is_blank, line_opt, AttributeGroup, Builder, NodeAttribute, NodeTree, OutputFormat, QName,
};

/// The permitted classification tokens, most permissive first.
pub const CLASSIFICATION_TOKENS: &[&str] = &["U", "C", "S", "TS", "R"];

/// Security markings for one record or element.
///
/// An empty group (no markings at all) is valid wherever the group is
/// optional; owners that require markings enforce presence themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityAttributes {
    version: Option<&'static VersionDescriptor>,
    classification: Option<String>,
    owner_producers: Vec<String>,
    complies_with: Option<String>,
}

impl SecurityAttributes {
    /// Read the group from an owner's node.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::Structural` for an unknown classification
    /// token and `DmrecError::VersionRange` when `compliesWith` appears
    /// below version "3.1".
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        let ns = version.namespace(SchemaFamily::Security);
        let split_producers = |raw: Option<&str>| -> Vec<String> {
            raw.map(|v| {
                v.split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default()
        };
        Self::assemble(
            version,
            node.attribute_value(ns, SECURITY_CLASSIFICATION)
                .map(str::to_string),
            split_producers(node.attribute_value(ns, SECURITY_OWNER_PRODUCER)),
            node.attribute_value(ns, SECURITY_COMPLIES_WITH)
                .map(str::to_string),
        )
    }

    /// Build the group from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`SecurityAttributes::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        classification: Option<&str>,
        owner_producers: &[&str],
        complies_with: Option<&str>,
    ) -> Result<Self, DmrecError> {
        Self::assemble(
            version,
            classification.map(str::to_string),
            owner_producers.iter().map(|p| p.to_string()).collect(),
            complies_with.map(str::to_string),
        )
    }

    fn assemble(
        version: &'static VersionDescriptor,
        classification: Option<String>,
        owner_producers: Vec<String>,
        complies_with: Option<String>,
    ) -> Result<Self, DmrecError> {
        if let Some(token) = classification.as_deref() {
            if !CLASSIFICATION_TOKENS.contains(&token) {
                return Err(DmrecError::structural(format!(
                    "unknown classification token {token:?}"
                )));
            }
        }
        if complies_with.is_some() && version.rank() < VersionDescriptor::lookup("3.1")?.rank()
        {
            return Err(DmrecError::version_range(format!(
                "compliesWith is not defined at version {version}"
            )));
        }
        Ok(Self {
            version: Some(version),
            classification,
            owner_producers,
            complies_with,
        })
    }

    /// The group if present, else a freshly constructed empty instance.
    pub fn non_null_or_empty(group: Option<&Self>) -> Self {
        group.cloned().unwrap_or_default()
    }

    /// The classification token, if marked.
    pub fn classification(&self) -> Option<&str> {
        self.classification.as_deref()
    }

    /// The producing organizations.
    pub fn owner_producers(&self) -> &[String] {
        &self.owner_producers
    }

    /// The compliance listing, if set (version "3.1" onward).
    pub fn complies_with(&self) -> Option<&str> {
        self.complies_with.as_deref()
    }

    /// Flattened projection lines under the given key base.
    pub fn output(&self, format: OutputFormat, base: &str) -> String {
        let producers = self.owner_producers.join(" ");
        let producers = (!producers.is_empty()).then_some(producers);
        format!(
            "{}{}{}",
            line_opt(
                format,
                &format!("{base}classification"),
                self.classification()
            ),
            line_opt(format, &format!("{base}ownerProducer"), producers.as_deref()),
            line_opt(format, &format!("{base}compliesWith"), self.complies_with()),
        )
    }
}

impl AttributeGroup for SecurityAttributes {
    fn attributes(&self) -> Vec<NodeAttribute> {
        let Some(version) = self.version else {
            return Vec::new();
        };
        let ns = version.namespace(SchemaFamily::Security);
        let prefix = ModelConfig::default().prefix(SchemaFamily::Security).to_string();
        let mut out = Vec::new();
        if let Some(classification) = &self.classification {
            out.push(NodeAttribute::new(
                QName::new(prefix.clone(), SECURITY_CLASSIFICATION, ns),
                classification,
            ));
        }
        if !self.owner_producers.is_empty() {
            out.push(NodeAttribute::new(
                QName::new(prefix.clone(), SECURITY_OWNER_PRODUCER, ns),
                self.owner_producers.join(" "),
            ));
        }
        if let Some(complies_with) = &self.complies_with {
            out.push(NodeAttribute::new(
                QName::new(prefix, SECURITY_COMPLIES_WITH, ns),
                complies_with,
            ));
        }
        out
    }
}

impl std::hash::Hash for SecurityAttributes {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.version.map(VersionDescriptor::rank).hash(state);
        self.classification.hash(state);
        self.owner_producers.hash(state);
        self.complies_with.hash(state);
    }
}

/// Mutable staging counterpart of [`SecurityAttributes`].
#[derive(Debug, Clone, Default)]
pub struct SecurityAttributesBuilder {
    /// The classification token.
    pub classification: Option<String>,
    /// The producing organizations.
    pub owner_producers: Vec<String>,
    /// The compliance listing (version "3.1" onward).
    pub complies_with: Option<String>,
}

impl From<&SecurityAttributes> for SecurityAttributesBuilder {
    fn from(group: &SecurityAttributes) -> Self {
        Self {
            classification: group.classification().map(str::to_string),
            owner_producers: group.owner_producers().to_vec(),
            complies_with: group.complies_with().map(str::to_string),
        }
    }
}

impl Builder for SecurityAttributesBuilder {
    type Target = SecurityAttributes;

    fn is_empty(&self) -> bool {
        is_blank(&self.classification)
            && self.owner_producers.iter().all(|p| p.trim().is_empty())
            && is_blank(&self.complies_with)
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<SecurityAttributes>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        let producers: Vec<&str> = self
            .owner_producers
            .iter()
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
            .collect();
        SecurityAttributes::from_values(
            version,
            self.classification.as_deref(),
            &producers,
            self.complies_with.as_deref(),
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
    fn test_from_values_valid_markings() {
        let group =
            SecurityAttributes::from_values(version("3.0"), Some("U"), &["AUS", "USA"], None)
                .unwrap();
        assert_eq!(group.classification(), Some("U"));
        assert_eq!(group.owner_producers(), ["AUS", "USA"]);
    }

    #[test]
    fn test_unknown_token_rejected() {
        let err = SecurityAttributes::from_values(version("3.0"), Some("X"), &[], None)
            .unwrap_err();
        assert!(matches!(err, DmrecError::Structural { .. }));
    }

    #[test]
    fn test_complies_with_below_3_1_rejected() {
        let err =
            SecurityAttributes::from_values(version("3.0"), Some("U"), &["AUS"], Some("ICD-710"))
                .unwrap_err();
        assert!(matches!(err, DmrecError::VersionRange { .. }));
    }

    #[test]
    fn test_complies_with_from_3_1_accepted() {
        let group =
            SecurityAttributes::from_values(version("3.1"), Some("U"), &["AUS"], Some("ICD-710"))
                .unwrap();
        assert_eq!(group.complies_with(), Some("ICD-710"));
    }

    #[test]
    fn test_from_tree_splits_owner_producers() {
        let v = version("3.0");
        let ns = v.namespace(SchemaFamily::Security);
        let mut node = NodeTree::element("rec", "title", v.namespace(SchemaFamily::Primary));
        node.push_attribute(NodeAttribute::new(
            QName::new("sec", SECURITY_CLASSIFICATION, ns),
            "S",
        ));
        node.push_attribute(NodeAttribute::new(
            QName::new("sec", SECURITY_OWNER_PRODUCER, ns),
            "AUS USA",
        ));
        let group = SecurityAttributes::from_tree(v, &node).unwrap();
        assert_eq!(group.owner_producers(), ["AUS", "USA"]);
    }

    #[test]
    fn test_attach_to_writes_security_namespace() {
        let v = version("3.0");
        let group =
            SecurityAttributes::from_values(v, Some("U"), &["AUS"], None).unwrap();
        let mut owner = NodeTree::element("rec", "title", v.namespace(SchemaFamily::Primary));
        group.attach_to(&mut owner).unwrap();
        let ns = v.namespace(SchemaFamily::Security);
        assert_eq!(owner.attribute_value(ns, "classification"), Some("U"));
        assert_eq!(owner.attribute_value(ns, "ownerProducer"), Some("AUS"));
    }

    #[test]
    fn test_empty_group_materializes_nothing() {
        let group = SecurityAttributes::non_null_or_empty(None);
        assert!(group.is_empty());
        assert!(group.attributes().is_empty());
    }

    #[test]
    fn test_output_lines() {
        let v = version("3.1");
        let group =
            SecurityAttributes::from_values(v, Some("U"), &["AUS"], Some("ICD-710")).unwrap();
        let text = group.output(OutputFormat::Text, "security.");
        assert_eq!(
            text,
            "security.classification: U\nsecurity.ownerProducer: AUS\nsecurity.compliesWith: ICD-710\n"
        );
    }

    #[test]
    fn test_builder_roundtrip() {
        let v = version("3.1");
        let group =
            SecurityAttributes::from_values(v, Some("TS"), &["AUS"], Some("ICD-710")).unwrap();
        let rebuilt = SecurityAttributesBuilder::from(&group)
            .commit(v)
            .unwrap()
            .unwrap();
        assert_eq!(group, rebuilt);
    }

    #[test]
    fn test_empty_builder_commits_to_none() {
        let builder = SecurityAttributesBuilder::default();
        assert!(builder.is_empty());
        assert_eq!(builder.commit(version("3.0")).unwrap(), None);
    }
}
