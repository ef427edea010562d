//! # Identifier — Qualified Record Identifier
//!
//! `identifier` carries a required `qualifier`/`value` attribute pair.
//! A record declares at least one.

use dmrec_core::{ComponentKind, DmrecError, ModelConfig, VersionDescriptor};
use dmrec_model::{
    is_blank, line, present, seal, synthesize_node, Assemble, Builder, Component,
    ComponentCore, NodeTree, OutputFormat,
};

use crate::support::{primary_value, set_primary_attribute};

/// A qualified identifier for the record.
#[derive(Debug, Clone)]
pub struct Identifier {
    core: ComponentCore,
    qualifier: String,
    value: String,
}

impl Identifier {
    /// Read an identifier from a supplied tree node.
    ///
    /// # Errors
    ///
    /// Any violated structural rule, fail-fast.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        seal(Self {
            qualifier: primary_value(node, version, "qualifier").unwrap_or_default(),
            value: primary_value(node, version, "value").unwrap_or_default(),
            core: ComponentCore::new(version, node.clone()),
        })
    }

    /// Build an identifier from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`Identifier::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        qualifier: &str,
        value: &str,
    ) -> Result<Self, DmrecError> {
        let mut node = synthesize_node(version, ComponentKind::Identifier);
        set_primary_attribute(&mut node, version, "qualifier", qualifier);
        set_primary_attribute(&mut node, version, "value", value);
        Self::from_tree(version, &node)
    }

    /// The qualifier attribute.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The value attribute.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Assemble for Identifier {
    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn structural_rules(&self) -> Result<(), DmrecError> {
        // Presence is enforced by the policy table; blank values are
        // as useless as absent ones.
        if self.qualifier.trim().is_empty() {
            return Err(DmrecError::cardinality(
                "the qualifier attribute must have a value",
            ));
        }
        if self.value.trim().is_empty() {
            return Err(DmrecError::cardinality(
                "the value attribute must have a value",
            ));
        }
        Ok(())
    }
}

impl Component for Identifier {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Identifier
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
            line(format, &format!("{base}.qualifier"), self.qualifier()),
            line(format, &format!("{base}.value"), self.value()),
        )
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace()
            && self.qualifier == other.qualifier
            && self.value == other.value
    }
}

impl Eq for Identifier {}

impl std::hash::Hash for Identifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.namespace().hash(state);
        self.qualifier.hash(state);
        self.value.hash(state);
    }
}

/// Mutable staging counterpart of [`Identifier`].
#[derive(Debug, Clone, Default)]
pub struct IdentifierBuilder {
    /// The qualifier attribute.
    pub qualifier: Option<String>,
    /// The value attribute.
    pub value: Option<String>,
}

impl From<&Identifier> for IdentifierBuilder {
    fn from(identifier: &Identifier) -> Self {
        Self {
            qualifier: Some(identifier.qualifier().to_string()),
            value: Some(identifier.value().to_string()),
        }
    }
}

impl Builder for IdentifierBuilder {
    type Target = Identifier;

    fn is_empty(&self) -> bool {
        is_blank(&self.qualifier) && is_blank(&self.value)
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Identifier>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        Identifier::from_values(
            version,
            present(&self.qualifier).unwrap_or_default(),
            present(&self.value).unwrap_or_default(),
        )
        .map(Some)
    }
}
