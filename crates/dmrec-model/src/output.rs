//! # Output Projection — Flattened Key/Value Renderings
//!
//! The flattened projection of a record: one line per populated scalar
//! field, hierarchical keys dot-joined (`format.extent.qualifier`),
//! repeated siblings annotated with bracketed ordinals per the
//! configured index-numbering convention. Two renderings: HTML meta-tag
//! lines with XML-escaped names and values, and plain `key: value`
//! text lines.

use quick_xml::escape::escape;

use dmrec_core::ModelConfig;

use crate::component::Component;

/// The rendering of a flattened projection line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<meta name="key" content="value" />` lines, XML-escaped.
    Html,
    /// `key: value` lines.
    Text,
}

/// One projection line for a populated value.
pub fn line(format: OutputFormat, key: &str, value: &str) -> String {
    match format {
        OutputFormat::Html => format!(
            "<meta name=\"{}\" content=\"{}\" />\n",
            escape(key),
            escape(value)
        ),
        OutputFormat::Text => format!("{key}: {value}\n"),
    }
}

/// One projection line when the value is populated, nothing otherwise.
pub fn line_opt(format: OutputFormat, key: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => line(format, key, v),
        _ => String::new(),
    }
}

/// Project a run of same-kind sibling components, assigning each its
/// ordinal marker per the configured index level. The marker is handed
/// to the child as its key suffix.
pub fn child_output<C: Component>(
    format: OutputFormat,
    config: &ModelConfig,
    prefix: &str,
    children: &[C],
) -> String {
    let total = children.len();
    children
        .iter()
        .enumerate()
        .map(|(position, child)| {
            // Positions are in bounds by construction; the fallback is
            // unreachable.
            let marker = config
                .index_level
                .marker(position, total)
                .unwrap_or_default();
            child.output(format, config, prefix, &marker)
        })
        .collect()
}
