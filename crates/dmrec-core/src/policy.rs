//! # Structural Policy Tables — Declarative Version-Conditional Rules
//!
//! One table per component kind: version window, child slots with
//! min/max occurrence and their own windows, attribute slots with
//! requiredness and windows, and policy-fixed constant attributes. The
//! shared validator interprets these tables; no concrete type re-encodes
//! version conditionals in code.
//!
//! Fixed attributes carry no discriminating information and are excluded
//! from structural equality and hashing by the types that own them.

use crate::kind::ComponentKind;
use crate::version::{
    SchemaFamily, VersionDescriptor, RANK_2_0, RANK_3_0, RANK_3_1,
};

/// A half-open window of version ranks in which a construct is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionWindow {
    /// Lowest rank (inclusive) at which the construct exists.
    pub min_rank: u8,
    /// Highest rank (inclusive) at which it still exists; `None` = open.
    pub max_rank: Option<u8>,
}

impl VersionWindow {
    /// Permitted at every known version.
    pub const fn all() -> Self {
        Self {
            min_rank: RANK_2_0,
            max_rank: None,
        }
    }

    /// Permitted from the given rank onward.
    pub const fn since(min_rank: u8) -> Self {
        Self {
            min_rank,
            max_rank: None,
        }
    }

    /// True iff the window contains the given version.
    pub fn contains(&self, version: &VersionDescriptor) -> bool {
        version.rank() >= self.min_rank
            && self.max_rank.map_or(true, |max| version.rank() <= max)
    }
}

/// A declared child slot of a kind.
#[derive(Debug, Clone, Copy)]
pub struct ChildSlot {
    /// The child's kind.
    pub kind: ComponentKind,
    /// Minimum occurrence count (within the slot's window).
    pub min: u32,
    /// Maximum occurrence count; `None` = unbounded.
    pub max: Option<u32>,
    /// Window in which the slot exists at all.
    pub window: VersionWindow,
}

/// A declared attribute slot of a kind, in the owner's own namespace.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSlot {
    /// Attribute local name.
    pub local: &'static str,
    /// Whether the attribute must be present (within the window).
    pub required: bool,
    /// Window in which the attribute exists at all.
    pub window: VersionWindow,
}

/// An attribute whose value the policy fixes to a constant.
#[derive(Debug, Clone, Copy)]
pub struct FixedAttribute {
    /// The schema family supplying the attribute's namespace.
    pub family: SchemaFamily,
    /// Attribute local name.
    pub local: &'static str,
    /// The mandated constant value.
    pub value: &'static str,
    /// Window in which the attribute is mandated.
    pub window: VersionWindow,
}

/// The complete structural policy for one component kind.
#[derive(Debug, Clone, Copy)]
pub struct KindPolicy {
    /// The kind this policy governs.
    pub kind: ComponentKind,
    /// Window in which the kind exists at all.
    pub window: VersionWindow,
    /// Whether the element carries text content.
    pub carries_text: bool,
    /// Declared child slots, in policy order.
    pub children: &'static [ChildSlot],
    /// Declared attribute slots in the owner's namespace.
    pub attributes: &'static [AttributeSlot],
    /// Policy-fixed constant attributes.
    pub fixed: &'static [FixedAttribute],
    /// `Some(window)` iff the kind carries a security attribute group;
    /// the group is required where the window contains the version.
    pub security_required: Option<VersionWindow>,
    /// Whether the kind admits caller-supplied extension attributes.
    pub extensible: bool,
}

impl KindPolicy {
    /// The declared slot for a child kind, if any.
    pub fn child_slot(&self, kind: ComponentKind) -> Option<&ChildSlot> {
        self.children.iter().find(|slot| slot.kind == kind)
    }

    /// The declared attribute slot for a local name, if any.
    pub fn attribute(&self, local: &str) -> Option<&AttributeSlot> {
        self.attributes.iter().find(|slot| slot.local == local)
    }
}

/// Security-group attribute locals, with the windows in which each
/// exists. Single source for the concrete group AND the reserved-name
/// tables — the two can never drift apart.
pub const SECURITY_CLASSIFICATION: &str = "classification";
/// Space-joined list of producing organizations.
pub const SECURITY_OWNER_PRODUCER: &str = "ownerProducer";
/// Compliance listing; exists only from version "3.1".
pub const SECURITY_COMPLIES_WITH: &str = "compliesWith";
/// Root-only marker mandated from version "3.0".
pub const SECURITY_RESOURCE_ELEMENT: &str = "resourceElement";

static SECURITY_ATTRIBUTES: [AttributeSlot; 3] = [
    AttributeSlot {
        local: SECURITY_CLASSIFICATION,
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: SECURITY_OWNER_PRODUCER,
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: SECURITY_COMPLIES_WITH,
        required: false,
        window: VersionWindow::since(RANK_3_1),
    },
];

/// The attribute slots of the security group, window-annotated.
/// Requiredness is contextual (owners decide); the slots here carry
/// existence windows only.
pub fn security_attribute_slots() -> &'static [AttributeSlot] {
    &SECURITY_ATTRIBUTES
}

static RECORD_CHILDREN: [ChildSlot; 8] = [
    ChildSlot {
        kind: ComponentKind::Identifier,
        min: 1,
        max: None,
        window: VersionWindow::all(),
    },
    ChildSlot {
        kind: ComponentKind::Title,
        min: 1,
        max: None,
        window: VersionWindow::all(),
    },
    ChildSlot {
        kind: ComponentKind::Subtitle,
        min: 0,
        max: None,
        window: VersionWindow::since(RANK_3_0),
    },
    ChildSlot {
        kind: ComponentKind::Language,
        min: 0,
        max: None,
        window: VersionWindow::all(),
    },
    ChildSlot {
        kind: ComponentKind::Dates,
        min: 0,
        max: Some(1),
        window: VersionWindow::all(),
    },
    ChildSlot {
        kind: ComponentKind::Rights,
        min: 0,
        max: Some(1),
        window: VersionWindow::all(),
    },
    ChildSlot {
        kind: ComponentKind::Format,
        min: 0,
        max: None,
        window: VersionWindow::all(),
    },
    ChildSlot {
        kind: ComponentKind::Description,
        min: 0,
        max: Some(1),
        window: VersionWindow::all(),
    },
];

static RECORD_FIXED: [FixedAttribute; 1] = [FixedAttribute {
    family: SchemaFamily::Security,
    local: SECURITY_RESOURCE_ELEMENT,
    value: "true",
    window: VersionWindow::since(RANK_3_0),
}];

static IDENTIFIER_ATTRIBUTES: [AttributeSlot; 2] = [
    AttributeSlot {
        local: "qualifier",
        required: true,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "value",
        required: true,
        window: VersionWindow::all(),
    },
];

static LANGUAGE_ATTRIBUTES: [AttributeSlot; 2] = [
    AttributeSlot {
        local: "qualifier",
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "value",
        required: false,
        window: VersionWindow::all(),
    },
];

static DATES_ATTRIBUTES: [AttributeSlot; 4] = [
    AttributeSlot {
        local: "created",
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "posted",
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "validTil",
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "infoCutOff",
        required: false,
        window: VersionWindow::all(),
    },
];

static RIGHTS_ATTRIBUTES: [AttributeSlot; 3] = [
    AttributeSlot {
        local: "privacyAct",
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "intellectualProperty",
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "copyright",
        required: false,
        window: VersionWindow::all(),
    },
];

static FORMAT_CHILDREN: [ChildSlot; 1] = [ChildSlot {
    kind: ComponentKind::Extent,
    min: 0,
    max: Some(1),
    window: VersionWindow::all(),
}];

static FORMAT_ATTRIBUTES: [AttributeSlot; 2] = [
    AttributeSlot {
        local: "mimeType",
        required: true,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "medium",
        required: false,
        window: VersionWindow::all(),
    },
];

static EXTENT_ATTRIBUTES: [AttributeSlot; 2] = [
    AttributeSlot {
        local: "qualifier",
        required: false,
        window: VersionWindow::all(),
    },
    AttributeSlot {
        local: "value",
        required: false,
        window: VersionWindow::all(),
    },
];

static POLICIES: [KindPolicy; 10] = [
    KindPolicy {
        kind: ComponentKind::Record,
        window: VersionWindow::all(),
        carries_text: false,
        children: &RECORD_CHILDREN,
        attributes: &[],
        fixed: &RECORD_FIXED,
        security_required: Some(VersionWindow::since(RANK_3_0)),
        extensible: true,
    },
    KindPolicy {
        kind: ComponentKind::Identifier,
        window: VersionWindow::all(),
        carries_text: false,
        children: &[],
        attributes: &IDENTIFIER_ATTRIBUTES,
        fixed: &[],
        security_required: None,
        extensible: false,
    },
    KindPolicy {
        kind: ComponentKind::Title,
        window: VersionWindow::all(),
        carries_text: true,
        children: &[],
        attributes: &[],
        fixed: &[],
        security_required: Some(VersionWindow::since(RANK_3_0)),
        extensible: false,
    },
    KindPolicy {
        kind: ComponentKind::Subtitle,
        window: VersionWindow::since(RANK_3_0),
        carries_text: true,
        children: &[],
        attributes: &[],
        fixed: &[],
        security_required: Some(VersionWindow::since(RANK_3_0)),
        extensible: false,
    },
    KindPolicy {
        kind: ComponentKind::Language,
        window: VersionWindow::all(),
        carries_text: false,
        children: &[],
        attributes: &LANGUAGE_ATTRIBUTES,
        fixed: &[],
        security_required: None,
        extensible: false,
    },
    KindPolicy {
        kind: ComponentKind::Dates,
        window: VersionWindow::all(),
        carries_text: false,
        children: &[],
        attributes: &DATES_ATTRIBUTES,
        fixed: &[],
        security_required: None,
        extensible: false,
    },
    KindPolicy {
        kind: ComponentKind::Rights,
        window: VersionWindow::all(),
        carries_text: false,
        children: &[],
        attributes: &RIGHTS_ATTRIBUTES,
        fixed: &[],
        security_required: None,
        extensible: false,
    },
    KindPolicy {
        kind: ComponentKind::Format,
        window: VersionWindow::all(),
        carries_text: false,
        children: &FORMAT_CHILDREN,
        attributes: &FORMAT_ATTRIBUTES,
        fixed: &[],
        security_required: None,
        extensible: false,
    },
    KindPolicy {
        kind: ComponentKind::Extent,
        window: VersionWindow::all(),
        carries_text: false,
        children: &[],
        attributes: &EXTENT_ATTRIBUTES,
        fixed: &[],
        security_required: None,
        extensible: false,
    },
    KindPolicy {
        kind: ComponentKind::Description,
        window: VersionWindow::all(),
        carries_text: true,
        children: &[],
        attributes: &[],
        fixed: &[],
        security_required: None,
        extensible: false,
    },
];

/// The structural policy for a kind.
pub fn policy(kind: ComponentKind) -> &'static KindPolicy {
    let index = match kind {
        ComponentKind::Record => 0,
        ComponentKind::Identifier => 1,
        ComponentKind::Title => 2,
        ComponentKind::Subtitle => 3,
        ComponentKind::Language => 4,
        ComponentKind::Dates => 5,
        ComponentKind::Rights => 6,
        ComponentKind::Format => 7,
        ComponentKind::Extent => 8,
        ComponentKind::Description => 9,
    };
    &POLICIES[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ComponentKind;
    use crate::version::VersionDescriptor;

    #[test]
    fn test_policy_lookup_matches_kind() {
        for kind in ComponentKind::all_kinds() {
            assert_eq!(policy(*kind).kind, *kind);
        }
    }

    #[test]
    fn test_window_all_contains_every_version() {
        let window = VersionWindow::all();
        for v in VersionDescriptor::all() {
            assert!(window.contains(v));
        }
    }

    #[test]
    fn test_window_since_excludes_below() {
        let v2 = VersionDescriptor::lookup("2.0").unwrap();
        let v3 = VersionDescriptor::lookup("3.0").unwrap();
        let window = policy(ComponentKind::Subtitle).window;
        assert!(!window.contains(v2));
        assert!(window.contains(v3));
    }

    #[test]
    fn test_window_bounded_above() {
        let window = VersionWindow {
            min_rank: 0,
            max_rank: Some(1),
        };
        let v3_1 = VersionDescriptor::lookup("3.1").unwrap();
        assert!(!window.contains(v3_1));
    }

    #[test]
    fn test_record_requires_identifier_and_title() {
        let p = policy(ComponentKind::Record);
        assert_eq!(p.child_slot(ComponentKind::Identifier).unwrap().min, 1);
        assert_eq!(p.child_slot(ComponentKind::Title).unwrap().min, 1);
        assert!(p.child_slot(ComponentKind::Extent).is_none());
    }

    #[test]
    fn test_record_is_the_only_extensible_kind() {
        for kind in ComponentKind::all_kinds() {
            let expected = *kind == ComponentKind::Record;
            assert_eq!(policy(*kind).extensible, expected, "kind {kind}");
        }
    }

    #[test]
    fn test_identifier_attributes_required() {
        let p = policy(ComponentKind::Identifier);
        assert!(p.attribute("qualifier").unwrap().required);
        assert!(p.attribute("value").unwrap().required);
        assert!(p.attribute("medium").is_none());
    }

    #[test]
    fn test_complies_with_windowed_to_3_1() {
        let slot = security_attribute_slots()
            .iter()
            .find(|s| s.local == SECURITY_COMPLIES_WITH)
            .unwrap();
        let v3_0 = VersionDescriptor::lookup("3.0").unwrap();
        let v3_1 = VersionDescriptor::lookup("3.1").unwrap();
        assert!(!slot.window.contains(v3_0));
        assert!(slot.window.contains(v3_1));
    }

    #[test]
    fn test_record_fixed_attribute_from_3_0() {
        let fixed = &policy(ComponentKind::Record).fixed[0];
        assert_eq!(fixed.local, SECURITY_RESOURCE_ELEMENT);
        assert_eq!(fixed.value, "true");
        let v2 = VersionDescriptor::lookup("2.0").unwrap();
        assert!(!fixed.window.contains(v2));
    }

    #[test]
    fn test_supports_delegates_to_window() {
        let v2 = VersionDescriptor::lookup("2.0").unwrap();
        assert!(!v2.supports(ComponentKind::Subtitle));
        assert!(v2.supports(ComponentKind::Extent));
    }
}
