//! # dmrec-core — Foundational Types for the Record Framework
//!
//! This crate is the bedrock of the dmrec workspace. It defines the
//! version registry, the component-kind taxonomy, the declarative
//! structural-policy tables, the failure taxonomy, and the configuration
//! surface. Every other crate in the workspace depends on `dmrec-core`;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Versions are static data.** One immutable [`VersionDescriptor`]
//!    per known revision; lookups return `&'static` references and alias
//!    identifiers normalize to their canonical id.
//!
//! 2. **No ambient current version.** The active descriptor is threaded
//!    explicitly into every construction call; [`VersionContext`] is a
//!    plain value, not process-global state.
//!
//! 3. **Structure is declared, not coded.** Version-conditional element
//!    windows, child cardinalities, attribute sets, and fixed constants
//!    live in one policy table per kind ([`policy`]); the shared
//!    validator interprets the tables.
//!
//! 4. **Fail fast, warn late.** Structural violations abort construction
//!    with a [`DmrecError`] carrying a root-relative locator; tolerated
//!    shapes surface as [`ValidationMessage`] warnings on the finished
//!    instance.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dmrec-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod index;
pub mod kind;
pub mod message;
pub mod policy;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use config::ModelConfig;
pub use error::{DmrecError, Locator};
pub use index::IndexLevel;
pub use kind::{ComponentKind, COMPONENT_KIND_COUNT};
pub use message::{Severity, ValidationMessage};
pub use version::{SchemaFamily, VersionContext, VersionDescriptor, XSI_NAMESPACE};
