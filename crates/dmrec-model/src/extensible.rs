//! # Extensible Attributes — Admission of Caller-Supplied Content
//!
//! Admits arbitrary foreign-namespace attributes onto a component while
//! excluding anything that collides with structurally reserved names.
//! The reserved set for an (active version, owner kind) pair is the
//! union of the owner's declared attribute slots, its policy-fixed
//! constants, and the security-group locals where the kind carries
//! security markings — all window-filtered, all derived from the same
//! policy tables the validator interprets.
//!
//! Reserved sets are computed once per (version rank, owner kind) and
//! cached behind a `OnceLock`; admission is a set-membership check.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use tracing::trace;

use dmrec_core::policy;
use dmrec_core::{
    ComponentKind, DmrecError, SchemaFamily, VersionDescriptor, XSI_NAMESPACE,
};

use crate::group::AttributeGroup;
use crate::node::{NodeAttribute, NodeTree};

type ReservedSet = HashSet<(String, String)>;

/// (namespace, local) pairs reserved for the owner kind at the version.
fn reserved_names(
    version: &'static VersionDescriptor,
    kind: ComponentKind,
) -> &'static ReservedSet {
    static TABLES: OnceLock<HashMap<(u8, ComponentKind), ReservedSet>> = OnceLock::new();
    static EMPTY: OnceLock<ReservedSet> = OnceLock::new();
    let tables = TABLES.get_or_init(|| {
        let mut tables = HashMap::new();
        for version in VersionDescriptor::all() {
            for kind in ComponentKind::all_kinds() {
                tables.insert(
                    (version.rank(), *kind),
                    build_reserved_set(version, *kind),
                );
            }
        }
        tables
    });
    // Every (known version, known kind) pair is populated above; the
    // fallback is unreachable.
    tables
        .get(&(version.rank(), kind))
        .unwrap_or_else(|| EMPTY.get_or_init(ReservedSet::new))
}

fn build_reserved_set(version: &VersionDescriptor, kind: ComponentKind) -> ReservedSet {
    let rules = policy::policy(kind);
    let owner_ns = version.namespace(SchemaFamily::Primary);
    let security_ns = version.namespace(SchemaFamily::Security);
    let mut reserved = ReservedSet::new();

    for slot in rules.attributes {
        if slot.window.contains(version) {
            reserved.insert((owner_ns.to_string(), slot.local.to_string()));
        }
    }
    for fixed in rules.fixed {
        if fixed.window.contains(version) {
            reserved.insert((
                version.namespace(fixed.family).to_string(),
                fixed.local.to_string(),
            ));
        }
    }
    if rules.security_required.is_some() {
        for slot in policy::security_attribute_slots() {
            if slot.window.contains(version) {
                reserved.insert((security_ns.to_string(), slot.local.to_string()));
            }
        }
    }
    reserved
}

/// A bag of admitted extension attributes, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensibleAttributes {
    attributes: Vec<NodeAttribute>,
}

impl ExtensibleAttributes {
    /// Admit extension attributes from an owner's node.
    ///
    /// An attribute is admitted iff its namespace is not the
    /// XML-Schema-instance namespace, its namespace differs from the
    /// owner's declared namespace, and its (namespace, local name) is
    /// not reserved for the owner's kind at the active version.
    /// Excluded attributes are skipped silently — they belong to the
    /// structural layer, which validates them itself.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        owner_kind: ComponentKind,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        let owner_ns = node.namespace();
        let reserved = reserved_names(version, owner_kind);
        let mut admitted = Vec::new();
        for attribute in node.attributes() {
            let ns = attribute.name.namespace.as_str();
            let local = attribute.name.local.as_str();
            if ns == XSI_NAMESPACE || ns == owner_ns {
                continue;
            }
            if reserved.contains(&(ns.to_string(), local.to_string())) {
                trace!(name = %attribute.name, "extension attribute excluded as reserved");
                continue;
            }
            trace!(name = %attribute.name, "extension attribute admitted");
            admitted.push(attribute.clone());
        }
        Self::from_values(admitted)
    }

    /// Build a group from caller-supplied attributes, enforcing
    /// (namespace, local name) uniqueness within the group.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::AttributeCollision` on a duplicate pair.
    pub fn from_values(attributes: Vec<NodeAttribute>) -> Result<Self, DmrecError> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for attribute in &attributes {
            let key = (
                attribute.name.namespace.clone(),
                attribute.name.local.clone(),
            );
            if !seen.insert(key) {
                return Err(DmrecError::collision(attribute.name.qualified()));
            }
        }
        Ok(Self { attributes })
    }

    /// The group if present, else a freshly constructed empty instance.
    pub fn non_null_or_empty(group: Option<&Self>) -> Self {
        group.cloned().unwrap_or_default()
    }

    /// The admitted attributes, in encounter order.
    pub fn attributes(&self) -> &[NodeAttribute] {
        &self.attributes
    }
}

impl AttributeGroup for ExtensibleAttributes {
    fn attributes(&self) -> Vec<NodeAttribute> {
        self.attributes.clone()
    }
}

/// Mutable staging counterpart of [`ExtensibleAttributes`].
#[derive(Debug, Clone, Default)]
pub struct ExtensibleAttributesBuilder {
    /// The staged extension attributes, in encounter order.
    pub attributes: Vec<NodeAttribute>,
}

impl From<&ExtensibleAttributes> for ExtensibleAttributesBuilder {
    fn from(group: &ExtensibleAttributes) -> Self {
        Self {
            attributes: group.attributes().to_vec(),
        }
    }
}

impl crate::builder::Builder for ExtensibleAttributesBuilder {
    type Target = ExtensibleAttributes;

    fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn commit(
        &self,
        _version: &'static VersionDescriptor,
    ) -> Result<Option<ExtensibleAttributes>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        ExtensibleAttributes::from_values(self.attributes.clone()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::synthesize_node;
    use crate::node::QName;

    fn version(id: &str) -> &'static VersionDescriptor {
        VersionDescriptor::lookup(id).unwrap()
    }

    fn foreign(local: &str, value: &str) -> NodeAttribute {
        NodeAttribute::new(
            QName::new("ext", local, "urn:example:extensions"),
            value,
        )
    }

    #[test]
    fn test_foreign_attribute_admitted_same_namespace_excluded() {
        let v = version("2.0");
        let mut node = synthesize_node(v, ComponentKind::Record);
        node.push_attribute(foreign("relevance", "95"));
        node.push_attribute(NodeAttribute::new(
            QName::new("rec", "local", v.namespace(SchemaFamily::Primary)),
            "excluded",
        ));
        let group = ExtensibleAttributes::from_tree(v, ComponentKind::Record, &node).unwrap();
        assert_eq!(group.attributes().len(), 1);
        assert_eq!(group.attributes()[0].name.local, "relevance");
    }

    #[test]
    fn test_xsi_namespace_always_excluded() {
        let v = version("2.0");
        let mut node = synthesize_node(v, ComponentKind::Record);
        node.push_attribute(NodeAttribute::new(
            QName::new("xsi", "schemaLocation", XSI_NAMESPACE),
            "urn:x record.xsd",
        ));
        let group = ExtensibleAttributes::from_tree(v, ComponentKind::Record, &node).unwrap();
        assert!(group.is_empty());
    }

    #[test]
    fn test_reserved_security_local_excluded_for_marked_kind() {
        let v = version("3.0");
        let security_ns = v.namespace(SchemaFamily::Security);
        let mut node = synthesize_node(v, ComponentKind::Record);
        node.push_attribute(NodeAttribute::new(
            QName::new("sec", "classification", security_ns),
            "U",
        ));
        let group = ExtensibleAttributes::from_tree(v, ComponentKind::Record, &node).unwrap();
        assert!(group.is_empty());
    }

    #[test]
    fn test_security_namespace_not_reserved_for_unmarked_kind() {
        // Extent carries no security group, so a security-namespace
        // attribute is not reserved for it. (Admission and structural
        // validation are independent layers; the validator rejects it
        // for non-extensible kinds anyway.)
        let v = version("3.0");
        let security_ns = v.namespace(SchemaFamily::Security);
        let mut node = synthesize_node(v, ComponentKind::Extent);
        node.push_attribute(NodeAttribute::new(
            QName::new("sec", "classification", security_ns),
            "U",
        ));
        let group = ExtensibleAttributes::from_tree(v, ComponentKind::Extent, &node).unwrap();
        assert_eq!(group.attributes().len(), 1);
    }

    #[test]
    fn test_complies_with_reserved_only_from_3_1() {
        let security_attr = |v: &'static VersionDescriptor| {
            NodeAttribute::new(
                QName::new("sec", "compliesWith", v.namespace(SchemaFamily::Security)),
                "ICD-710",
            )
        };

        // At 3.0 the local is not yet structurally defined, so it is
        // admissible as extension content.
        let v30 = version("3.0");
        let mut node = synthesize_node(v30, ComponentKind::Record);
        node.push_attribute(security_attr(v30));
        let group =
            ExtensibleAttributes::from_tree(v30, ComponentKind::Record, &node).unwrap();
        assert_eq!(group.attributes().len(), 1);

        // From 3.1 it is reserved.
        let v31 = version("3.1");
        let mut node = synthesize_node(v31, ComponentKind::Record);
        node.push_attribute(security_attr(v31));
        let group =
            ExtensibleAttributes::from_tree(v31, ComponentKind::Record, &node).unwrap();
        assert!(group.is_empty());
    }

    #[test]
    fn test_encounter_order_retained() {
        let v = version("2.0");
        let mut node = synthesize_node(v, ComponentKind::Record);
        node.push_attribute(foreign("zulu", "1"));
        node.push_attribute(foreign("alpha", "2"));
        node.push_attribute(foreign("mike", "3"));
        let group = ExtensibleAttributes::from_tree(v, ComponentKind::Record, &node).unwrap();
        let locals: Vec<&str> = group
            .attributes()
            .iter()
            .map(|a| a.name.local.as_str())
            .collect();
        assert_eq!(locals, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_from_values_rejects_duplicates() {
        let err = ExtensibleAttributes::from_values(vec![
            foreign("relevance", "95"),
            foreign("relevance", "96"),
        ])
        .unwrap_err();
        assert!(matches!(err, DmrecError::AttributeCollision { .. }));
    }

    #[test]
    fn test_unqualified_foreign_attribute_admitted() {
        // An unqualified attribute has neither the instance-metadata
        // namespace nor the owner's namespace; if unreserved it is
        // admitted.
        let v = version("2.0");
        let mut node = synthesize_node(v, ComponentKind::Record);
        node.push_attribute(NodeAttribute::new(QName::unqualified("note"), "x"));
        let group = ExtensibleAttributes::from_tree(v, ComponentKind::Record, &node).unwrap();
        assert_eq!(group.attributes().len(), 1);
    }

    #[test]
    fn test_non_null_or_empty() {
        let group = ExtensibleAttributes::from_values(vec![foreign("a", "1")]).unwrap();
        assert_eq!(
            ExtensibleAttributes::non_null_or_empty(Some(&group))
                .attributes()
                .len(),
            1
        );
        assert!(ExtensibleAttributes::non_null_or_empty(None).is_empty());
    }
}
