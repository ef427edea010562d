//! # dmrec-model — Shared Record Machinery
//!
//! The machinery every concrete record kind reuses:
//!
//! - **Node tree** (`node.rs`): the navigable tree contract exchanged
//!   with reader/writer collaborators, with XML rendering and
//!   render-time prefix rewriting.
//!
//! - **Component assembly** (`component.rs`): the shared validation
//!   orchestrator interpreting the declarative policy tables — one
//!   fail-fast structural pass, one non-failing warning pass, locator
//!   annotation as errors unwind.
//!
//! - **Attribute groups** (`group.rs`, `extensible.rs`): the bag
//!   contract with collision-checked (non-transactional) attachment,
//!   and the extensible-attribute admission engine with precomputed
//!   reserved-name tables.
//!
//! - **Builder protocol** (`builder.rs`): mutable staging with explicit
//!   list growth, committing to validated immutable instances.
//!
//! - **Output projection** (`output.rs`): flattened key/value renderings
//!   with the bracketed-ordinal convention for repeated keys.
//!
//! ## Crate Policy
//!
//! - Depends on `dmrec-core` only.
//! - Construction performs no I/O and never suspends; every operation
//!   is a bounded walk of an in-memory tree.
//! - No `unsafe` code; no `panic!()` or `.unwrap()` outside tests.

pub mod builder;
pub mod component;
pub mod extensible;
pub mod group;
pub mod node;
pub mod output;

pub use builder::{is_blank, present, Builder, BuilderList};
pub use component::{seal, synthesize_node, Assemble, Component, ComponentCore};
pub use extensible::{ExtensibleAttributes, ExtensibleAttributesBuilder};
pub use group::{non_null_or_empty, AttributeGroup};
pub use node::{NodeAttribute, NodeTree, QName};
pub use output::{child_output, line, line_opt, OutputFormat};
