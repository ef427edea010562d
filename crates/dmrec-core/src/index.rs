//! # Index Numbering — Bracketed Ordinals on Repeated Output Keys
//!
//! Governs whether a repeated key in the flattened output projection gets
//! a bracketed 1-based ordinal. A single enumerated setting with three
//! levels; the marker for `(position, total)` is bounds-checked.

use serde::{Deserialize, Serialize};

use crate::error::DmrecError;

/// Display rule for ordinal suffixes on repeated output keys.
///
/// Serialized as its numeric level (`0`, `1`, `2`) to match the
/// `output.indexLevel` configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum IndexLevel {
    /// Level 0: the marker is always empty.
    #[default]
    Never,
    /// Level 1: empty when the key occurs once, `[n]` otherwise.
    MultipleOnly,
    /// Level 2: always `[n]`.
    Always,
}

impl IndexLevel {
    /// The ordinal marker for the element at `position` among `total`
    /// siblings.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::IndexBounds` if `total < 1` or `position` is
    /// not in `[0, total)`.
    pub fn marker(&self, position: usize, total: usize) -> Result<String, DmrecError> {
        if total < 1 || position >= total {
            return Err(DmrecError::IndexBounds { position, total });
        }
        Ok(match self {
            Self::Never => String::new(),
            Self::MultipleOnly if total == 1 => String::new(),
            Self::MultipleOnly | Self::Always => format!("[{}]", position + 1),
        })
    }
}

impl TryFrom<u8> for IndexLevel {
    type Error = DmrecError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Never),
            1 => Ok(Self::MultipleOnly),
            2 => Ok(Self::Always),
            other => Err(DmrecError::config(format!(
                "output.indexLevel must be 0, 1, or 2, got {other}"
            ))),
        }
    }
}

impl From<IndexLevel> for u8 {
    fn from(level: IndexLevel) -> u8 {
        match level {
            IndexLevel::Never => 0,
            IndexLevel::MultipleOnly => 1,
            IndexLevel::Always => 2,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Markers are defined for every in-bounds (position, total) pair.
        #[test]
        fn marker_defined_in_bounds(total in 1usize..50, level in 0u8..=2) {
            let level = IndexLevel::try_from(level).unwrap();
            for position in 0..total {
                prop_assert!(level.marker(position, total).is_ok());
            }
        }

        /// Out-of-bounds positions always fail.
        #[test]
        fn marker_rejects_out_of_bounds(total in 1usize..50, excess in 0usize..10, level in 0u8..=2) {
            let level = IndexLevel::try_from(level).unwrap();
            prop_assert!(level.marker(total + excess, total).is_err());
        }

        /// At Always, the marker is the 1-based ordinal.
        #[test]
        fn always_marker_is_one_based(total in 1usize..50) {
            for position in 0..total {
                let marker = IndexLevel::Always.marker(position, total).unwrap();
                prop_assert_eq!(marker, format!("[{}]", position + 1));
            }
        }

        /// Never produces an empty marker for every in-bounds pair.
        #[test]
        fn never_marker_is_empty(total in 1usize..50) {
            for position in 0..total {
                prop_assert_eq!(IndexLevel::Never.marker(position, total).unwrap(), "");
            }
        }
    }
}
