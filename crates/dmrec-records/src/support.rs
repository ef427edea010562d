//! Shared element helpers for the concrete vocabulary.

use dmrec_core::{ModelConfig, SchemaFamily, VersionDescriptor};
use dmrec_model::{NodeAttribute, NodeTree, QName};

/// Set a primary-namespace attribute on a synthesized node.
pub(crate) fn set_primary_attribute(
    node: &mut NodeTree,
    version: &'static VersionDescriptor,
    local: &str,
    value: &str,
) {
    let config = ModelConfig::default();
    node.push_attribute(NodeAttribute::new(
        QName::new(
            config.prefix(SchemaFamily::Primary),
            local,
            version.namespace(SchemaFamily::Primary),
        ),
        value,
    ));
}

/// Read an owned copy of a primary-namespace attribute value.
pub(crate) fn primary_value(
    node: &NodeTree,
    version: &'static VersionDescriptor,
    local: &str,
) -> Option<String> {
    node.attribute_value(version.namespace(SchemaFamily::Primary), local)
        .map(str::to_string)
}
