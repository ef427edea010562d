//! # Error Types — Structured Failure Taxonomy
//!
//! Defines [`DmrecError`], the single fatal-error type for the record
//! framework, and [`Locator`], the slash-delimited path identifying where
//! a failure originated.
//!
//! ## Design
//!
//! - Every structural failure aborts construction immediately. There is no
//!   error aggregation: the first violated rule wins.
//! - A failure raised deep inside a child's validation bubbles with its
//!   payload unmodified but gains one locator segment per enclosing level
//!   via [`DmrecError::at()`], so the caller sees a root-relative path.
//! - Non-fatal diagnostics are never errors; they are
//!   [`ValidationMessage`](crate::message::ValidationMessage) warnings
//!   retained on the finished instance.

use std::fmt;

use thiserror::Error;

/// Hierarchical path identifying where a validation failure originated.
///
/// Segments are qualified element names, innermost recorded first and
/// ancestors prepended as the error unwinds. Displays as `/record/extent`;
/// an empty locator displays as `(root)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Locator(Vec<String>);

impl Locator {
    /// An empty locator (failure at the point of the API call itself).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A locator with a single innermost segment.
    pub fn leaf(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Prepend an ancestor segment as the error propagates upward.
    pub fn prepend(&mut self, segment: impl Into<String>) {
        self.0.insert(0, segment.into());
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns true if no segment has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Fatal failure raised during record construction or registry lookup.
///
/// All variants abort the operation that raised them; construction is a
/// pure function of its input and is never retried internally.
#[derive(Error, Debug)]
pub enum DmrecError {
    /// Wrong element name/namespace, or a malformed field value.
    #[error("structural violation at {locator}: {detail}")]
    Structural {
        /// What was violated.
        detail: String,
        /// Root-relative path to the violating element.
        locator: Locator,
    },

    /// A required child or attribute is missing, or multiplicity is violated.
    #[error("cardinality violation at {locator}: {detail}")]
    Cardinality {
        /// Which slot was violated and how.
        detail: String,
        /// Root-relative path to the violating element.
        locator: Locator,
    },

    /// An attribute with the same namespace and local name is already
    /// declared on the target owner.
    #[error("attribute collision at {locator}: {name} is already declared on the target")]
    AttributeCollision {
        /// The qualified name of the colliding attribute.
        name: String,
        /// Root-relative path to the owner.
        locator: Locator,
    },

    /// A component, child, or attribute was used outside the version
    /// window in which it is permitted.
    #[error("version range violation at {locator}: {detail}")]
    VersionRange {
        /// The out-of-window construct and the offending version.
        detail: String,
        /// Root-relative path to the violating element.
        locator: Locator,
    },

    /// An unrecognized version identifier or namespace URI was requested
    /// from the version registry.
    #[error("unsupported version: {id:?}")]
    UnsupportedVersion {
        /// The identifier or URI as supplied by the caller.
        id: String,
    },

    /// Index-numbering misuse: `total < 1` or `position` not in `[0, total)`.
    #[error("index position {position} out of range for total {total}")]
    IndexBounds {
        /// The requested zero-based position.
        position: usize,
        /// The claimed sibling count.
        total: usize,
    },

    /// The configuration surface rejected a key or value.
    #[error("configuration error: {detail}")]
    Config {
        /// What was rejected.
        detail: String,
    },

    /// IO error while loading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DmrecError {
    /// Structural violation with an empty locator; the failing element
    /// stamps its own name via [`DmrecError::at()`].
    pub fn structural(detail: impl Into<String>) -> Self {
        Self::Structural {
            detail: detail.into(),
            locator: Locator::root(),
        }
    }

    /// Cardinality violation with an empty locator.
    pub fn cardinality(detail: impl Into<String>) -> Self {
        Self::Cardinality {
            detail: detail.into(),
            locator: Locator::root(),
        }
    }

    /// Collision on the named attribute, with an empty locator.
    pub fn collision(name: impl Into<String>) -> Self {
        Self::AttributeCollision {
            name: name.into(),
            locator: Locator::root(),
        }
    }

    /// Version-window violation with an empty locator.
    pub fn version_range(detail: impl Into<String>) -> Self {
        Self::VersionRange {
            detail: detail.into(),
            locator: Locator::root(),
        }
    }

    /// Unrecognized version identifier or namespace URI.
    pub fn unsupported_version(id: impl Into<String>) -> Self {
        Self::UnsupportedVersion { id: id.into() }
    }

    /// Configuration rejection.
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// Prepend one locator segment as the error unwinds through an
    /// enclosing element. Variants without a locator pass through
    /// unchanged.
    #[must_use]
    pub fn at(mut self, segment: &str) -> Self {
        if let Some(locator) = self.locator_mut() {
            locator.prepend(segment);
        }
        self
    }

    /// The locator, for variants that carry one.
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            Self::Structural { locator, .. }
            | Self::Cardinality { locator, .. }
            | Self::AttributeCollision { locator, .. }
            | Self::VersionRange { locator, .. } => Some(locator),
            _ => None,
        }
    }

    fn locator_mut(&mut self) -> Option<&mut Locator> {
        match self {
            Self::Structural { locator, .. }
            | Self::Cardinality { locator, .. }
            | Self::AttributeCollision { locator, .. }
            | Self::VersionRange { locator, .. } => Some(locator),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display_empty() {
        assert_eq!(Locator::root().to_string(), "(root)");
    }

    #[test]
    fn test_locator_display_path() {
        let mut locator = Locator::leaf("extent");
        locator.prepend("format");
        locator.prepend("record");
        assert_eq!(locator.to_string(), "/record/format/extent");
    }

    #[test]
    fn test_at_prepends_innermost_first() {
        let err = DmrecError::structural("bad qualified name")
            .at("extent")
            .at("format")
            .at("record");
        let locator = err.locator().expect("structural carries a locator");
        assert_eq!(
            locator.segments(),
            ["record", "format", "extent"]
        );
    }

    #[test]
    fn test_at_passes_through_unlocated_variants() {
        let err = DmrecError::unsupported_version("9.9").at("record");
        assert!(err.locator().is_none());
        assert!(err.to_string().contains("9.9"));
    }

    #[test]
    fn test_display_includes_locator() {
        let err = DmrecError::cardinality("identifier requires at least 1 occurrence")
            .at("record");
        assert_eq!(
            err.to_string(),
            "cardinality violation at /record: identifier requires at least 1 occurrence"
        );
    }

    #[test]
    fn test_collision_names_attribute() {
        let err = DmrecError::collision("sec:classification");
        assert!(err.to_string().contains("sec:classification"));
    }
}
