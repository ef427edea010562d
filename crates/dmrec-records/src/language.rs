//! # Language — Language of the Described Resource
//!
//! `language` carries an optional `qualifier`/`value` attribute pair.
//! An entirely empty element is tolerated with a warning.

use dmrec_core::{
    ComponentKind, DmrecError, ModelConfig, ValidationMessage, VersionDescriptor,
};
use dmrec_model::{
    is_blank, line_opt, present, seal, synthesize_node, Assemble, Builder, Component,
    ComponentCore, NodeTree, OutputFormat,
};

use crate::support::{primary_value, set_primary_attribute};

/// The language of the described resource.
#[derive(Debug, Clone)]
pub struct Language {
    core: ComponentCore,
    qualifier: Option<String>,
    value: Option<String>,
}

impl Language {
    /// Read a language from a supplied tree node.
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

    /// Build a language from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`Language::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        qualifier: Option<&str>,
        value: Option<&str>,
    ) -> Result<Self, DmrecError> {
        let mut node = synthesize_node(version, ComponentKind::Language);
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

impl Assemble for Language {
    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn warning_rules(&self) -> Vec<ValidationMessage> {
        if is_blank(&self.qualifier) && is_blank(&self.value) {
            vec![ValidationMessage::warning(
                "a completely empty language element was found",
                "",
            )]
        } else {
            Vec::new()
        }
    }
}

impl Component for Language {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Language
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

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace()
            && self.qualifier == other.qualifier
            && self.value == other.value
    }
}

impl Eq for Language {}

impl std::hash::Hash for Language {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.namespace().hash(state);
        self.qualifier.hash(state);
        self.value.hash(state);
    }
}

/// Mutable staging counterpart of [`Language`].
#[derive(Debug, Clone, Default)]
pub struct LanguageBuilder {
    /// The qualifier attribute.
    pub qualifier: Option<String>,
    /// The value attribute.
    pub value: Option<String>,
}

impl From<&Language> for LanguageBuilder {
    fn from(language: &Language) -> Self {
        Self {
            qualifier: language.qualifier().map(str::to_string),
            value: language.value().map(str::to_string),
        }
    }
}

impl Builder for LanguageBuilder {
    type Target = Language;

    fn is_empty(&self) -> bool {
        is_blank(&self.qualifier) && is_blank(&self.value)
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Language>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        Language::from_values(version, present(&self.qualifier), present(&self.value))
            .map(Some)
    }
}
