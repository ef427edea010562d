//! # Description — Free Text About the Resource
//!
//! `description` carries plain text content. An empty description is
//! permitted but reported as a warning.

use dmrec_core::{
    ComponentKind, DmrecError, ModelConfig, ValidationMessage, VersionDescriptor,
};
use dmrec_model::{
    is_blank, line_opt, present, seal, synthesize_node, Assemble, Builder, Component,
    ComponentCore, NodeTree, OutputFormat,
};

/// A free-text description of the resource.
#[derive(Debug, Clone)]
pub struct Description {
    core: ComponentCore,
    text: String,
}

impl Description {
    /// Read a description from a supplied tree node.
    ///
    /// # Errors
    ///
    /// Any violated structural rule, fail-fast.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        seal(Self {
            text: node.text().unwrap_or_default().to_string(),
            core: ComponentCore::new(version, node.clone()),
        })
    }

    /// Build a description from raw text.
    ///
    /// # Errors
    ///
    /// Same failures as [`Description::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        text: &str,
    ) -> Result<Self, DmrecError> {
        let mut node = synthesize_node(version, ComponentKind::Description);
        node.set_text(text);
        Self::from_tree(version, &node)
    }

    /// The description text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Assemble for Description {
    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn warning_rules(&self) -> Vec<ValidationMessage> {
        if self.text.trim().is_empty() {
            vec![ValidationMessage::warning(
                "a completely empty description element was found",
                "",
            )]
        } else {
            Vec::new()
        }
    }
}

impl Component for Description {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Description
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
        let text = (!self.text.is_empty()).then_some(self.text.as_str());
        line_opt(format, &base, text)
    }
}

impl PartialEq for Description {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace() && self.text == other.text
    }
}

impl Eq for Description {}

impl std::hash::Hash for Description {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.namespace().hash(state);
        self.text.hash(state);
    }
}

/// Mutable staging counterpart of [`Description`].
#[derive(Debug, Clone, Default)]
pub struct DescriptionBuilder {
    /// The description text.
    pub text: Option<String>,
}

impl From<&Description> for DescriptionBuilder {
    fn from(description: &Description) -> Self {
        Self {
            text: Some(description.text().to_string()),
        }
    }
}

impl Builder for DescriptionBuilder {
    type Target = Description;

    fn is_empty(&self) -> bool {
        is_blank(&self.text)
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Description>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        Description::from_values(version, present(&self.text).unwrap_or_default()).map(Some)
    }
}
