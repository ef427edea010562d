//! # dmrec-records — The Bundled Record Vocabulary
//!
//! Concrete instantiations of the shared record machinery: the root
//! [`Record`], its element kinds, the security attribute group, and a
//! mirror builder for each. Every type here is a thin policy
//! instantiation — the version-conditional structure lives in the
//! `dmrec-core` policy tables and the validation control flow in
//! `dmrec-model`; this crate supplies field extraction, the per-kind
//! extra rules, and output projection.
//!
//! ## Construction
//!
//! Each kind offers `from_tree` (reader side) and `from_values` (caller
//! side); both run the same validation and produce immutable instances.
//! Builders stage mutations and `commit` back to validated instances;
//! an entirely empty builder commits to `None`.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code; no `panic!()` or `.unwrap()` outside tests.
//! - Structural equality and hashing skip policy-fixed constants.

mod support;

pub mod dates;
pub mod description;
pub mod extent;
pub mod format;
pub mod identifier;
pub mod language;
pub mod record;
pub mod rights;
pub mod security;
pub mod title;

pub use dates::{Dates, DatesBuilder};
pub use description::{Description, DescriptionBuilder};
pub use extent::{Extent, ExtentBuilder};
pub use format::{Format, FormatBuilder};
pub use identifier::{Identifier, IdentifierBuilder};
pub use language::{Language, LanguageBuilder};
pub use record::{Record, RecordBuilder};
pub use rights::{Rights, RightsBuilder};
pub use security::{SecurityAttributes, SecurityAttributesBuilder, CLASSIFICATION_TOKENS};
pub use title::{Subtitle, SubtitleBuilder, Title, TitleBuilder};
