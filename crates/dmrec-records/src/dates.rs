//! # Dates — Lifecycle Dates of the Described Resource
//!
//! `dates` carries up to four optional date attributes: `created`,
//! `posted`, `validTil`, `infoCutOff`. Each value must be a 4-digit
//! year, a full `YYYY-MM-DD` date, or an RFC 3339 timestamp. The raw
//! strings are retained for output fidelity; chrono validates them.

use chrono::{DateTime, NaiveDate};

use dmrec_core::{
    ComponentKind, DmrecError, ModelConfig, ValidationMessage, VersionDescriptor,
};
use dmrec_model::{
    is_blank, line_opt, present, seal, synthesize_node, Assemble, Builder, Component,
    ComponentCore, NodeTree, OutputFormat,
};

use crate::support::{primary_value, set_primary_attribute};

const DATE_ATTRIBUTES: [&str; 4] = ["created", "posted", "validTil", "infoCutOff"];

/// Lifecycle dates of the described resource.
#[derive(Debug, Clone)]
pub struct Dates {
    core: ComponentCore,
    created: Option<String>,
    posted: Option<String>,
    valid_til: Option<String>,
    info_cut_off: Option<String>,
}

impl Dates {
    /// Read a dates element from a supplied tree node.
    ///
    /// # Errors
    ///
    /// Any violated structural rule, fail-fast.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        seal(Self {
            created: primary_value(node, version, "created"),
            posted: primary_value(node, version, "posted"),
            valid_til: primary_value(node, version, "validTil"),
            info_cut_off: primary_value(node, version, "infoCutOff"),
            core: ComponentCore::new(version, node.clone()),
        })
    }

    /// Build a dates element from raw field values.
    ///
    /// # Errors
    ///
    /// Same failures as [`Dates::from_tree`].
    pub fn from_values(
        version: &'static VersionDescriptor,
        created: Option<&str>,
        posted: Option<&str>,
        valid_til: Option<&str>,
        info_cut_off: Option<&str>,
    ) -> Result<Self, DmrecError> {
        let mut node = synthesize_node(version, ComponentKind::Dates);
        let values = [created, posted, valid_til, info_cut_off];
        for (local, value) in DATE_ATTRIBUTES.iter().zip(values) {
            if let Some(value) = value {
                set_primary_attribute(&mut node, version, local, value);
            }
        }
        Self::from_tree(version, &node)
    }

    /// The creation date, if set.
    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }

    /// The posting date, if set.
    pub fn posted(&self) -> Option<&str> {
        self.posted.as_deref()
    }

    /// The expiration date, if set.
    pub fn valid_til(&self) -> Option<&str> {
        self.valid_til.as_deref()
    }

    /// The information cutoff date, if set.
    pub fn info_cut_off(&self) -> Option<&str> {
        self.info_cut_off.as_deref()
    }

    fn fields(&self) -> [(&'static str, &Option<String>); 4] {
        [
            ("created", &self.created),
            ("posted", &self.posted),
            ("validTil", &self.valid_til),
            ("infoCutOff", &self.info_cut_off),
        ]
    }
}

/// True for a 4-digit year, a `YYYY-MM-DD` date, or an RFC 3339
/// timestamp.
fn is_valid_date(value: &str) -> bool {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

impl Assemble for Dates {
    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn structural_rules(&self) -> Result<(), DmrecError> {
        for (local, slot) in self.fields() {
            if let Some(value) = slot.as_deref() {
                if !value.trim().is_empty() && !is_valid_date(value) {
                    return Err(DmrecError::structural(format!(
                        "the {local} attribute is not a valid date: {value:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn warning_rules(&self) -> Vec<ValidationMessage> {
        let all_blank = self.fields().iter().all(|(_, slot)| is_blank(slot));
        if all_blank {
            vec![ValidationMessage::warning(
                "a completely empty dates element was found",
                "",
            )]
        } else {
            Vec::new()
        }
    }
}

impl Component for Dates {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Dates
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
            .map(|(local, slot)| {
                line_opt(format, &format!("{base}.{local}"), slot.as_deref())
            })
            .collect()
    }
}

impl PartialEq for Dates {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace()
            && self.created == other.created
            && self.posted == other.posted
            && self.valid_til == other.valid_til
            && self.info_cut_off == other.info_cut_off
    }
}

impl Eq for Dates {}

impl std::hash::Hash for Dates {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.namespace().hash(state);
        self.created.hash(state);
        self.posted.hash(state);
        self.valid_til.hash(state);
        self.info_cut_off.hash(state);
    }
}

/// Mutable staging counterpart of [`Dates`].
#[derive(Debug, Clone, Default)]
pub struct DatesBuilder {
    /// The creation date.
    pub created: Option<String>,
    /// The posting date.
    pub posted: Option<String>,
    /// The expiration date.
    pub valid_til: Option<String>,
    /// The information cutoff date.
    pub info_cut_off: Option<String>,
}

impl From<&Dates> for DatesBuilder {
    fn from(dates: &Dates) -> Self {
        Self {
            created: dates.created().map(str::to_string),
            posted: dates.posted().map(str::to_string),
            valid_til: dates.valid_til().map(str::to_string),
            info_cut_off: dates.info_cut_off().map(str::to_string),
        }
    }
}

impl Builder for DatesBuilder {
    type Target = Dates;

    fn is_empty(&self) -> bool {
        is_blank(&self.created)
            && is_blank(&self.posted)
            && is_blank(&self.valid_til)
            && is_blank(&self.info_cut_off)
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Dates>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        Dates::from_values(
            version,
            present(&self.created),
            present(&self.posted),
            present(&self.valid_til),
            present(&self.info_cut_off),
        )
        .map(Some)
    }
}
