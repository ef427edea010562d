//! # Builder Protocol — Mutable Staging, Immutable Commit
//!
//! A builder mirrors a component's or attribute group's fields in
//! mutable form, is created fresh or seeded from an existing instance,
//! and produces a validated immutable value via `commit`. Committing an
//! entirely empty builder yields `None`; committing anything else runs
//! the target's `from_values` construction, propagating validation
//! failures unchanged — builder commits fail with exactly the same
//! errors as direct construction.
//!
//! List slots grow explicitly: `ensure_at_least` and `slot_mut` insert
//! default builders as needed, while `get` and iteration never mutate.

use dmrec_core::{DmrecError, VersionDescriptor};

/// Mutable staging counterpart of one immutable target type.
pub trait Builder: Default {
    /// The immutable type this builder commits to.
    type Target;

    /// True iff every scalar slot is unset or blank and every nested
    /// builder is itself empty.
    fn is_empty(&self) -> bool;

    /// Produce an immutable instance from the current field values.
    ///
    /// Returns `Ok(None)` when the builder [`is_empty`](Builder::is_empty);
    /// otherwise runs the target's `from_values` construction.
    /// May be called repeatedly; each call produces an independent
    /// instance.
    ///
    /// # Errors
    ///
    /// Any validation failure of the target's construction, unchanged.
    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Self::Target>, DmrecError>;
}

/// True iff an optional scalar slot is unset or blank.
pub fn is_blank(slot: &Option<String>) -> bool {
    slot.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// The slot's value when set and non-blank, `None` otherwise. Blank
/// slots commit as absent fields.
pub fn present(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().filter(|s| !s.trim().is_empty())
}

/// An ordered list of nested builders with explicit growth.
#[derive(Debug, Clone)]
pub struct BuilderList<B: Builder> {
    slots: Vec<B>,
}

impl<B: Builder> Default for BuilderList<B> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<B: Builder> BuilderList<B> {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the list with default builders until it holds at least
    /// `len` slots. Shrinking never happens.
    pub fn ensure_at_least(&mut self, len: usize) {
        while self.slots.len() < len {
            self.slots.push(B::default());
        }
    }

    /// Mutable access to the slot at `index`, growing the list to
    /// `index + 1` first. This is a growth operation, not a query; use
    /// [`get`](Self::get) for non-mutating access.
    pub fn slot_mut(&mut self, index: usize) -> &mut B {
        self.ensure_at_least(index + 1);
        &mut self.slots[index]
    }

    /// The slot at `index`, if the list is long enough. Never grows.
    pub fn get(&self, index: usize) -> Option<&B> {
        self.slots.get(index)
    }

    /// Append a populated builder.
    pub fn push(&mut self, builder: B) {
        self.slots.push(builder);
    }

    /// Number of slots, counting empty ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True iff every slot is empty (a list of untouched slots is
    /// empty for commit purposes).
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Builder::is_empty)
    }

    /// Iterate the slots.
    pub fn iter(&self) -> std::slice::Iter<'_, B> {
        self.slots.iter()
    }

    /// Commit every non-empty slot in order, dropping empty ones.
    ///
    /// # Errors
    ///
    /// The first slot commit failure, unchanged.
    pub fn commit_all(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Vec<B::Target>, DmrecError> {
        let mut out = Vec::new();
        for slot in &self.slots {
            if let Some(value) = slot.commit(version)? {
                out.push(value);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builder over a single string, committing to its uppercase form.
    #[derive(Debug, Clone, Default)]
    struct Probe {
        value: Option<String>,
    }

    impl Builder for Probe {
        type Target = String;

        fn is_empty(&self) -> bool {
            is_blank(&self.value)
        }

        fn commit(
            &self,
            _version: &'static VersionDescriptor,
        ) -> Result<Option<String>, DmrecError> {
            if self.is_empty() {
                return Ok(None);
            }
            match self.value.as_deref() {
                Some("poison") => Err(DmrecError::structural("poison value")),
                Some(v) => Ok(Some(v.to_uppercase())),
                None => Ok(None),
            }
        }
    }

    fn version() -> &'static VersionDescriptor {
        VersionDescriptor::lookup("2.0").unwrap()
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&None));
        assert!(is_blank(&Some(String::new())));
        assert!(is_blank(&Some("   ".to_string())));
        assert!(!is_blank(&Some("x".to_string())));
    }

    #[test]
    fn test_untouched_builder_commits_to_none() {
        let probe = Probe::default();
        assert!(probe.is_empty());
        assert_eq!(probe.commit(version()).unwrap(), None);
    }

    #[test]
    fn test_ensure_at_least_grows_with_defaults() {
        let mut list: BuilderList<Probe> = BuilderList::new();
        list.ensure_at_least(3);
        assert_eq!(list.len(), 3);
        assert!(list.is_empty());
        // Never shrinks.
        list.ensure_at_least(1);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_slot_mut_grows_to_index() {
        let mut list: BuilderList<Probe> = BuilderList::new();
        list.slot_mut(2).value = Some("c".to_string());
        assert_eq!(list.len(), 3);
        assert!(list.get(0).unwrap().is_empty());
        assert_eq!(list.get(2).unwrap().value.as_deref(), Some("c"));
    }

    #[test]
    fn test_get_never_grows() {
        let list: BuilderList<Probe> = BuilderList::new();
        assert!(list.get(5).is_none());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_commit_all_skips_empty_slots() {
        let mut list: BuilderList<Probe> = BuilderList::new();
        list.slot_mut(0).value = Some("a".to_string());
        list.ensure_at_least(3);
        list.slot_mut(2).value = Some("b".to_string());
        let committed = list.commit_all(version()).unwrap();
        assert_eq!(committed, ["A", "B"]);
    }

    #[test]
    fn test_commit_all_propagates_first_failure() {
        let mut list: BuilderList<Probe> = BuilderList::new();
        list.slot_mut(0).value = Some("ok".to_string());
        list.slot_mut(1).value = Some("poison".to_string());
        let err = list.commit_all(version()).unwrap_err();
        assert!(matches!(err, DmrecError::Structural { .. }));
    }

    #[test]
    fn test_list_with_only_blank_slots_is_empty() {
        let mut list: BuilderList<Probe> = BuilderList::new();
        list.slot_mut(4).value = Some("  ".to_string());
        assert!(list.is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Builder over a single optional string; commits to it verbatim.
    #[derive(Debug, Clone, Default)]
    struct Probe(Option<String>);

    impl Builder for Probe {
        type Target = String;

        fn is_empty(&self) -> bool {
            is_blank(&self.0)
        }

        fn commit(
            &self,
            _version: &'static VersionDescriptor,
        ) -> Result<Option<String>, DmrecError> {
            Ok(self.0.clone().filter(|v| !v.trim().is_empty()))
        }
    }

    proptest! {
        /// `slot_mut(k)` guarantees indices `0..=k` exist, whatever the
        /// starting length.
        #[test]
        fn slot_mut_guarantees_prefix(seed in 0usize..20, index in 0usize..20) {
            let mut list: BuilderList<Probe> = BuilderList::new();
            list.ensure_at_least(seed);
            let _ = list.slot_mut(index);
            prop_assert!(list.len() >= index + 1);
            prop_assert!(list.len() >= seed);
            for k in 0..=index {
                prop_assert!(list.get(k).is_some());
            }
        }

        /// `ensure_at_least` is idempotent and never shrinks.
        #[test]
        fn ensure_at_least_monotonic(a in 0usize..20, b in 0usize..20) {
            let mut list: BuilderList<Probe> = BuilderList::new();
            list.ensure_at_least(a);
            list.ensure_at_least(b);
            prop_assert_eq!(list.len(), a.max(b));
            list.ensure_at_least(a.max(b));
            prop_assert_eq!(list.len(), a.max(b));
        }
    }
}
