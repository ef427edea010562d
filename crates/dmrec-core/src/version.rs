//! # Version Registry — Specification Revisions and Namespaces
//!
//! Defines [`VersionDescriptor`], one immutable static instance per known
//! revision of the record specification, with its namespace identifiers,
//! total-order rank, and alias resolution ("3.0.1" resolves to "3.0").
//!
//! ## No ambient current version
//!
//! The active descriptor is threaded explicitly (`&'static
//! VersionDescriptor`) into every construction call. [`VersionContext`] is
//! a plain value offering a `set_current`/`current` surface for callers
//! that want to hold a selection; it is NOT process-global state, so
//! concurrent construction under different versions is safe.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DmrecError;
use crate::kind::ComponentKind;
use crate::policy;

/// The XML Schema instance namespace. Attributes in this namespace are
/// never admitted as extension content.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// A schema family tracked by every version descriptor.
///
/// `Primary` carries the record elements themselves; the auxiliary
/// families carry attribute vocabularies layered onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFamily {
    /// The record element namespace.
    Primary,
    /// Security marking attributes.
    Security,
    /// Coordinate-reference attributes.
    Coordinate,
    /// Relationship/link attributes.
    Relationship,
}

impl SchemaFamily {
    /// Returns all tracked families in canonical order.
    pub fn all_families() -> &'static [SchemaFamily] {
        &[
            Self::Primary,
            Self::Security,
            Self::Coordinate,
            Self::Relationship,
        ]
    }

    /// The lowercase family name used in configuration keys
    /// (`prefix.<family>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Security => "security",
            Self::Coordinate => "coordinate",
            Self::Relationship => "relationship",
        }
    }
}

impl std::fmt::Display for SchemaFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaFamily {
    type Err = DmrecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "security" => Ok(Self::Security),
            "coordinate" => Ok(Self::Coordinate),
            "relationship" => Ok(Self::Relationship),
            other => Err(DmrecError::config(format!(
                "unknown schema family: {other:?}"
            ))),
        }
    }
}

// Rank constants referenced by the structural policy tables.
pub(crate) const RANK_2_0: u8 = 0;
pub(crate) const RANK_3_0: u8 = 1;
pub(crate) const RANK_3_1: u8 = 2;
pub(crate) const RANK_4_1: u8 = 3;
pub(crate) const RANK_5_0: u8 = 4;

/// One revision of the record specification: identifier, total-order
/// rank, primary namespace, and the auxiliary family namespaces.
///
/// Immutable; exactly one static instance exists per known version and
/// all lookups return `&'static` references to it.
#[derive(Debug, PartialEq, Eq)]
pub struct VersionDescriptor {
    id: &'static str,
    rank: u8,
    aliases: &'static [&'static str],
    primary_ns: &'static str,
    security_ns: &'static str,
    coordinate_ns: &'static str,
    relationship_ns: &'static str,
}

static VERSIONS: [VersionDescriptor; 5] = [
    VersionDescriptor {
        id: "2.0",
        rank: RANK_2_0,
        aliases: &[],
        primary_ns: "urn:dmrec:record:2.0",
        security_ns: "urn:dmrec:security:2",
        coordinate_ns: "http://www.opengis.net/gml",
        relationship_ns: "http://www.w3.org/1999/xlink",
    },
    VersionDescriptor {
        id: "3.0",
        rank: RANK_3_0,
        aliases: &["3.0.1"],
        primary_ns: "urn:dmrec:record:3.0",
        security_ns: "urn:dmrec:security:3",
        coordinate_ns: "http://www.opengis.net/gml",
        relationship_ns: "http://www.w3.org/1999/xlink",
    },
    VersionDescriptor {
        id: "3.1",
        rank: RANK_3_1,
        aliases: &[],
        primary_ns: "urn:dmrec:record:3.1",
        security_ns: "urn:dmrec:security:3",
        coordinate_ns: "http://www.opengis.net/gml",
        relationship_ns: "http://www.w3.org/1999/xlink",
    },
    VersionDescriptor {
        id: "4.1",
        rank: RANK_4_1,
        aliases: &["4.0.1"],
        primary_ns: "urn:dmrec:record:4",
        security_ns: "urn:dmrec:security:4",
        coordinate_ns: "http://www.opengis.net/gml/3.2",
        relationship_ns: "http://www.w3.org/1999/xlink",
    },
    VersionDescriptor {
        id: "5.0",
        rank: RANK_5_0,
        aliases: &[],
        primary_ns: "urn:dmrec:record:5",
        security_ns: "urn:dmrec:security:4",
        coordinate_ns: "http://www.opengis.net/gml/3.2",
        relationship_ns: "http://www.w3.org/1999/xlink",
    },
];

impl VersionDescriptor {
    /// Resolve a version identifier, normalizing aliases ("3.0.1" resolves
    /// to "3.0").
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::UnsupportedVersion` for identifiers that are
    /// neither a known id nor a known alias.
    pub fn lookup(id: &str) -> Result<&'static VersionDescriptor, DmrecError> {
        VERSIONS
            .iter()
            .find(|v| v.id == id || v.aliases.contains(&id))
            .ok_or_else(|| DmrecError::unsupported_version(id))
    }

    /// All known versions in rank order.
    pub fn all() -> &'static [VersionDescriptor] {
        &VERSIONS
    }

    /// The newest known version; the default when nothing was selected.
    pub fn latest() -> &'static VersionDescriptor {
        &VERSIONS[VERSIONS.len() - 1]
    }

    /// The canonical version identifier (never an alias).
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The total-order rank of this version.
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// The namespace URI for a schema family at this version.
    pub fn namespace(&self, family: SchemaFamily) -> &'static str {
        match family {
            SchemaFamily::Primary => self.primary_ns,
            SchemaFamily::Security => self.security_ns,
            SchemaFamily::Coordinate => self.coordinate_ns,
            SchemaFamily::Relationship => self.relationship_ns,
        }
    }

    /// True iff this version's rank is at least `other`'s.
    pub fn at_least(&self, other: &VersionDescriptor) -> bool {
        self.rank >= other.rank
    }

    /// True iff `rank(a) >= rank(b)`, after alias normalization of both
    /// identifiers.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::UnsupportedVersion` if either identifier is
    /// unknown.
    pub fn is_at_least(a: &str, b: &str) -> Result<bool, DmrecError> {
        Ok(Self::lookup(a)?.rank >= Self::lookup(b)?.rank)
    }

    /// True iff this version's structural policy permits the kind at all.
    pub fn supports(&self, kind: ComponentKind) -> bool {
        policy::policy(kind).window.contains(self)
    }

    /// Membership test across all tracked families of all versions.
    pub fn is_supported_namespace(uri: &str) -> bool {
        VERSIONS.iter().any(|v| {
            SchemaFamily::all_families()
                .iter()
                .any(|f| v.namespace(*f) == uri)
        })
    }

    /// Reverse lookup from a namespace URI to the earliest version that
    /// tracks it in any family. Primary namespaces identify their version
    /// uniquely; auxiliary namespaces may be shared across versions, in
    /// which case the lowest-ranked owner is returned.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::UnsupportedVersion` for URIs not tracked by
    /// any family of any version.
    pub fn for_namespace(uri: &str) -> Result<&'static VersionDescriptor, DmrecError> {
        VERSIONS
            .iter()
            .find(|v| {
                SchemaFamily::all_families()
                    .iter()
                    .any(|f| v.namespace(*f) == uri)
            })
            .ok_or_else(|| DmrecError::unsupported_version(uri))
    }
}

impl std::fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id)
    }
}

/// A held version selection.
///
/// Plain value, cheap to clone, safe to keep one per thread or per
/// logical operation. A fresh context selects the latest known version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionContext {
    current: &'static VersionDescriptor,
}

impl VersionContext {
    /// Create a context selecting the given version identifier.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::UnsupportedVersion` for unknown identifiers.
    pub fn new(id: &str) -> Result<Self, DmrecError> {
        Ok(Self {
            current: VersionDescriptor::lookup(id)?,
        })
    }

    /// Replace the current selection.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::UnsupportedVersion` for unknown identifiers;
    /// the previous selection is retained on failure.
    pub fn set_current(&mut self, id: &str) -> Result<(), DmrecError> {
        self.current = VersionDescriptor::lookup(id)?;
        Ok(())
    }

    /// The currently selected descriptor.
    pub fn current(&self) -> &'static VersionDescriptor {
        self.current
    }
}

impl Default for VersionContext {
    fn default() -> Self {
        Self {
            current: VersionDescriptor::latest(),
        }
    }
}
