//! # Component Kinds — Single Source of Truth
//!
//! Defines the `ComponentKind` enum naming every record/element kind the
//! framework ships. This is the ONE definition used across the workspace.
//! Every `match` on `ComponentKind` must be exhaustive — adding a kind
//! forces every consumer (policy tables, reserved-name computation,
//! builders) to handle it at compile time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DmrecError;

/// All record/element kinds in the bundled vocabulary.
///
/// Each kind maps to exactly one element local name in the primary
/// namespace of the active version. The structural policy for a kind
/// (version window, child slots, attribute slots) lives in
/// [`policy`](crate::policy), keyed by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// The root record element owning all other kinds.
    Record,
    /// A qualified identifier for the record (at least one required).
    Identifier,
    /// The record title (at least one required).
    Title,
    /// An optional subtitle; only permitted from version "3.0".
    Subtitle,
    /// The language of the described resource.
    Language,
    /// Lifecycle dates of the described resource.
    Dates,
    /// Rights markings (privacy act, intellectual property, copyright).
    Rights,
    /// Physical/digital format of the described resource.
    Format,
    /// The extent of the format (byte size, page count, duration).
    Extent,
    /// Free-text description of the resource.
    Description,
}

/// Total number of kinds. Used for compile-time assertions.
pub const COMPONENT_KIND_COUNT: usize = 10;

impl ComponentKind {
    /// Returns all kinds in canonical order (root first, then the order
    /// in which children are declared on the root).
    pub fn all_kinds() -> &'static [ComponentKind] {
        &[
            Self::Record,
            Self::Identifier,
            Self::Title,
            Self::Subtitle,
            Self::Language,
            Self::Dates,
            Self::Rights,
            Self::Format,
            Self::Extent,
            Self::Description,
        ]
    }

    /// The element local name for this kind.
    ///
    /// This must match the serde serialization format and the element
    /// names accepted by `from_tree` constructors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Identifier => "identifier",
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Language => "language",
            Self::Dates => "dates",
            Self::Rights => "rights",
            Self::Format => "format",
            Self::Extent => "extent",
            Self::Description => "description",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = DmrecError;

    /// Parse a kind from its element local name.
    ///
    /// Accepts the same names produced by [`ComponentKind::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record" => Ok(Self::Record),
            "identifier" => Ok(Self::Identifier),
            "title" => Ok(Self::Title),
            "subtitle" => Ok(Self::Subtitle),
            "language" => Ok(Self::Language),
            "dates" => Ok(Self::Dates),
            "rights" => Ok(Self::Rights),
            "format" => Ok(Self::Format),
            "extent" => Ok(Self::Extent),
            "description" => Ok(Self::Description),
            other => Err(DmrecError::structural(format!(
                "unknown component kind: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_count() {
        assert_eq!(ComponentKind::all_kinds().len(), COMPONENT_KIND_COUNT);
    }

    #[test]
    fn test_all_kinds_unique() {
        let kinds = ComponentKind::all_kinds();
        let mut seen = std::collections::HashSet::new();
        for k in kinds {
            assert!(seen.insert(k), "Duplicate kind: {k}");
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in ComponentKind::all_kinds() {
            let s = kind.as_str();
            let parsed: ComponentKind = s.parse().unwrap_or_else(|e| {
                panic!("Failed to parse {s:?}: {e}")
            });
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("resource".parse::<ComponentKind>().is_err());
        assert!("Record".parse::<ComponentKind>().is_err()); // case-sensitive
        assert!("".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for kind in ComponentKind::all_kinds() {
            let json = serde_json::to_string(kind).unwrap();
            let expected = format!("\"{}\"", kind.as_str());
            assert_eq!(json, expected);
        }
    }

    #[test]
    fn test_exhaustive_match_compiles() {
        // Adding a kind variant causes a compile error here, forcing the
        // developer to update every policy and reserved-name table.
        fn kind_description(k: &ComponentKind) -> &'static str {
            match k {
                ComponentKind::Record => "root record",
                ComponentKind::Identifier => "qualified identifier",
                ComponentKind::Title => "title",
                ComponentKind::Subtitle => "subtitle",
                ComponentKind::Language => "language",
                ComponentKind::Dates => "lifecycle dates",
                ComponentKind::Rights => "rights markings",
                ComponentKind::Format => "format",
                ComponentKind::Extent => "extent",
                ComponentKind::Description => "description",
            }
        }
        for k in ComponentKind::all_kinds() {
            assert!(!kind_description(k).is_empty());
        }
    }
}
