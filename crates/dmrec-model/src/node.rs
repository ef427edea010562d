//! # Node Tree — The External Tree Contract
//!
//! [`NodeTree`] is the navigable tree shape exchanged with the reader and
//! writer collaborators: a qualified name, ordered attributes, ordered
//! child nodes, and optional text content. No further format assumptions
//! are made about where the tree came from.
//!
//! Rendering to XML text is provided for the writer side. Namespace
//! declarations are collected across the whole tree and emitted on the
//! root element; prefixes can be rewritten per schema family at render
//! time ([`NodeTree::to_xml_with`]), so the stored tree carries namespace
//! URIs as the source of truth.

use quick_xml::escape::escape;

use dmrec_core::{ModelConfig, SchemaFamily, VersionDescriptor};

/// A qualified name: serialization prefix, local name, namespace URI.
///
/// Equality and hashing are (local, namespace) only — the prefix is a
/// serialization artifact.
#[derive(Debug, Clone, Eq)]
pub struct QName {
    /// Serialization prefix; empty for unqualified names.
    pub prefix: String,
    /// The local name.
    pub local: String,
    /// Namespace URI; empty for unqualified names.
    pub namespace: String,
}

impl QName {
    /// Build a qualified name.
    pub fn new(
        prefix: impl Into<String>,
        local: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            local: local.into(),
            namespace: namespace.into(),
        }
    }

    /// An unqualified name (no prefix, no namespace).
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new("", local, "")
    }

    /// `prefix:local`, or just `local` when unprefixed.
    pub fn qualified(&self) -> String {
        if self.prefix.is_empty() {
            self.local.clone()
        } else {
            format!("{}:{}", self.prefix, self.local)
        }
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.local == other.local && self.namespace == other.namespace
    }
}

impl std::hash::Hash for QName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.local.hash(state);
        self.namespace.hash(state);
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// One attribute on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAttribute {
    /// The attribute's qualified name.
    pub name: QName,
    /// The attribute's string value.
    pub value: String,
}

impl NodeAttribute {
    /// Build an attribute.
    pub fn new(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// A navigable tree node: qualified name, ordered attributes, ordered
/// children, optional text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTree {
    name: QName,
    attributes: Vec<NodeAttribute>,
    children: Vec<NodeTree>,
    text: Option<String>,
}

impl NodeTree {
    /// Build an empty element node.
    pub fn element(
        prefix: impl Into<String>,
        local: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            name: QName::new(prefix, local, namespace),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// The node's qualified name.
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// The node's local name.
    pub fn local(&self) -> &str {
        &self.name.local
    }

    /// The node's namespace URI.
    pub fn namespace(&self) -> &str {
        &self.name.namespace
    }

    /// `prefix:local`, or just `local` when unprefixed.
    pub fn qualified_name(&self) -> String {
        self.name.qualified()
    }

    /// The node's text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the node's text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// All attributes in encounter order.
    pub fn attributes(&self) -> &[NodeAttribute] {
        &self.attributes
    }

    /// The attribute with the given namespace and local name, if present.
    pub fn attribute(&self, namespace: &str, local: &str) -> Option<&NodeAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace == namespace && a.name.local == local)
    }

    /// The value of the attribute with the given namespace and local
    /// name, if present.
    pub fn attribute_value(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attribute(namespace, local).map(|a| a.value.as_str())
    }

    /// Append an attribute without collision checking. Collision-aware
    /// attachment lives on the attribute-group contract.
    pub fn push_attribute(&mut self, attribute: NodeAttribute) {
        self.attributes.push(attribute);
    }

    /// All child nodes in document order.
    pub fn children(&self) -> &[NodeTree] {
        &self.children
    }

    /// Append a child node.
    pub fn push_child(&mut self, child: NodeTree) {
        self.children.push(child);
    }

    /// Child nodes matching the given namespace and local name, in
    /// document order.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local: &'a str,
    ) -> impl Iterator<Item = &'a NodeTree> + 'a {
        self.children
            .iter()
            .filter(move |c| c.name.namespace == namespace && c.name.local == local)
    }

    /// Render the tree as XML text using the stored prefixes. Namespace
    /// declarations for every (prefix, namespace) pair in the tree are
    /// emitted on the root element.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_element(&mut out, true, None);
        out
    }

    /// Render the tree as XML text, rewriting prefixes per schema family
    /// from the configuration. Namespaces not tracked by any family of
    /// the given version keep their stored prefixes.
    pub fn to_xml_with(&self, config: &ModelConfig, version: &VersionDescriptor) -> String {
        let rewrite = move |namespace: &str, stored: &str| -> String {
            for family in SchemaFamily::all_families() {
                if version.namespace(*family) == namespace {
                    return config.prefix(*family).to_string();
                }
            }
            stored.to_string()
        };
        let mut out = String::new();
        self.write_element(&mut out, true, Some(&rewrite));
        out
    }

    fn resolved_prefix(
        name: &QName,
        rewrite: Option<&dyn Fn(&str, &str) -> String>,
    ) -> String {
        match rewrite {
            Some(rewrite) if !name.namespace.is_empty() => {
                rewrite(&name.namespace, &name.prefix)
            }
            _ => name.prefix.clone(),
        }
    }

    fn rendered_name(name: &QName, rewrite: Option<&dyn Fn(&str, &str) -> String>) -> String {
        let prefix = Self::resolved_prefix(name, rewrite);
        if prefix.is_empty() {
            name.local.clone()
        } else {
            format!("{}:{}", prefix, name.local)
        }
    }

    /// Collect every (prefix, namespace) pair used in the tree, in
    /// first-encounter order.
    fn namespace_declarations(
        &self,
        rewrite: Option<&dyn Fn(&str, &str) -> String>,
        out: &mut Vec<(String, String)>,
    ) {
        let mut record = |name: &QName| {
            if name.namespace.is_empty() {
                return;
            }
            let prefix = Self::resolved_prefix(name, rewrite);
            let pair = (prefix, name.namespace.clone());
            if !out.contains(&pair) {
                out.push(pair);
            }
        };
        record(&self.name);
        for attribute in &self.attributes {
            record(&attribute.name);
        }
        for child in &self.children {
            child.namespace_declarations(rewrite, out);
        }
    }

    fn write_element(
        &self,
        out: &mut String,
        is_root: bool,
        rewrite: Option<&dyn Fn(&str, &str) -> String>,
    ) {
        let name = Self::rendered_name(&self.name, rewrite);
        out.push('<');
        out.push_str(&name);

        if is_root {
            let mut declarations = Vec::new();
            self.namespace_declarations(rewrite, &mut declarations);
            for (prefix, namespace) in declarations {
                if prefix.is_empty() {
                    out.push_str(&format!(" xmlns=\"{}\"", escape(&namespace)));
                } else {
                    out.push_str(&format!(
                        " xmlns:{}=\"{}\"",
                        prefix,
                        escape(&namespace)
                    ));
                }
            }
        }

        for attribute in &self.attributes {
            out.push_str(&format!(
                " {}=\"{}\"",
                Self::rendered_name(&attribute.name, rewrite),
                escape(&attribute.value)
            ));
        }

        if self.children.is_empty() && self.text.is_none() {
            out.push_str(" />");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_element(out, false, rewrite);
        }
        out.push_str(&format!("</{name}>"));
    }
}
