//! # Component Assembly — Shared Validation Orchestration
//!
//! Every record/element value object is built the same way: construct a
//! candidate (from a supplied tree or from synthesized values), then pass
//! it through [`seal`], the single validation orchestrator. The
//! orchestrator interprets the declarative policy table for the
//! candidate's kind — qualified name, version window, child cardinality,
//! attribute admissibility and requiredness, fixed constants — then runs
//! the kind's own structural extras, failing fast on the first violated
//! rule. Only after validation succeeds does the warning pass run; it
//! appends every triggered warning to the instance and never raises.
//!
//! Lifecycle per instance: `Uninitialized → Assembling → Validated`.
//! There is no backward transition: a candidate that fails any rule is
//! dropped inside its constructor and never becomes observable.
//!
//! Each concrete kind supplies exactly two small rule functions through
//! [`Assemble`] (`structural_rules`, `warning_rules`); the phase
//! ordering, fail-fast semantics, and locator annotation live here and
//! are never re-implemented per kind.

use tracing::debug;

use dmrec_core::policy::{self, KindPolicy};
use dmrec_core::{
    ComponentKind, DmrecError, ModelConfig, SchemaFamily, ValidationMessage,
    VersionDescriptor, XSI_NAMESPACE,
};

use crate::node::NodeTree;
use crate::output::OutputFormat;

/// The state shared by every component: the active version, the owned
/// tree node (retained for re-serialization), and the warnings collected
/// by the validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCore {
    version: &'static VersionDescriptor,
    node: NodeTree,
    warnings: Vec<ValidationMessage>,
}

impl ComponentCore {
    /// Start assembling a component around an owned node.
    pub fn new(version: &'static VersionDescriptor, node: NodeTree) -> Self {
        Self {
            version,
            node,
            warnings: Vec::new(),
        }
    }

    /// The version this component was constructed under.
    pub fn version(&self) -> &'static VersionDescriptor {
        self.version
    }

    /// The owned tree node.
    pub fn node(&self) -> &NodeTree {
        &self.node
    }

    /// Warnings recorded on this component itself (children excluded).
    pub fn warnings(&self) -> &[ValidationMessage] {
        &self.warnings
    }
}

/// Synthesize an empty element node for a kind under a version, using
/// the default serialization prefix for the primary family. Prefix
/// rewrites are applied at render time, not here.
pub fn synthesize_node(version: &'static VersionDescriptor, kind: ComponentKind) -> NodeTree {
    let config = ModelConfig::default();
    NodeTree::element(
        config.prefix(SchemaFamily::Primary),
        kind.as_str(),
        version.namespace(SchemaFamily::Primary),
    )
}

/// The read surface shared by every sealed component.
pub trait Component {
    /// The component's kind.
    fn kind(&self) -> ComponentKind;

    /// The shared core.
    fn core(&self) -> &ComponentCore;

    /// Child components in declaration order, for warning aggregation.
    fn child_components(&self) -> Vec<&dyn Component> {
        Vec::new()
    }

    /// Extra locator text appended to this component's path segment.
    fn locator_suffix(&self) -> String {
        String::new()
    }

    /// The element local name.
    fn name(&self) -> &str {
        self.core().node().local()
    }

    /// The element namespace URI.
    fn namespace(&self) -> &str {
        self.core().node().namespace()
    }

    /// All warnings for this component and its descendants, each child
    /// warning gaining this component's path segment as a prefix.
    fn warnings(&self) -> Vec<ValidationMessage> {
        let segment = locator_segment(self.core(), &self.locator_suffix());
        let mut out = self.core().warnings().to_vec();
        for child in self.child_components() {
            for warning in child.warnings() {
                out.push(warning.nested_under(&segment));
            }
        }
        out
    }

    /// The flattened output projection: one line per populated scalar
    /// field, children recursively prefixed, honoring the configured
    /// index-numbering convention. `suffix` carries the ordinal marker
    /// assigned by the enclosing component.
    fn output(
        &self,
        format: OutputFormat,
        config: &ModelConfig,
        prefix: &str,
        suffix: &str,
    ) -> String;
}

/// The assembly surface a concrete kind hands to [`seal`], on top of
/// its [`Component`] read surface.
pub trait Assemble: Component + Sized {
    /// Mutable access for the warning pass.
    fn core_mut(&mut self) -> &mut ComponentCore;

    /// Kind-specific structural rules, run after the policy checks.
    /// Fail fast: return the first violation.
    fn structural_rules(&self) -> Result<(), DmrecError> {
        Ok(())
    }

    /// Kind-specific warning rules, run only after validation succeeds.
    /// Locators are stamped by the orchestrator; return messages with an
    /// empty locator.
    fn warning_rules(&self) -> Vec<ValidationMessage> {
        Vec::new()
    }
}

fn locator_segment(core: &ComponentCore, suffix: &str) -> String {
    format!("{}{}", core.node().qualified_name(), suffix)
}

/// Validate a candidate and transition it to its immutable state.
///
/// Rule order: qualified name, version window, child slots, attribute
/// admissibility and constants, required presence, then the kind's own
/// structural extras. The first violation aborts with the candidate's
/// path segment stamped on the error locator. The warning pass runs
/// last and never fails.
pub fn seal<T: Assemble>(mut candidate: T) -> Result<T, DmrecError> {
    let kind = candidate.kind();
    let rules = policy::policy(kind);
    let segment = locator_segment(candidate.core(), &candidate.locator_suffix());

    let checked = check_policy(candidate.core(), rules)
        .and_then(|()| candidate.structural_rules());
    if let Err(error) = checked {
        debug!(kind = %kind, error = %error, "construction rejected");
        return Err(error.at(&segment));
    }

    let warnings: Vec<ValidationMessage> = candidate
        .warning_rules()
        .into_iter()
        .map(|w| w.nested_under(&segment))
        .collect();
    candidate.core_mut().warnings = warnings;
    Ok(candidate)
}

fn check_policy(core: &ComponentCore, rules: &KindPolicy) -> Result<(), DmrecError> {
    check_qualified_name(core, rules)?;
    check_version_window(core, rules)?;
    check_child_slots(core, rules)?;
    check_attribute_admissibility(core, rules)?;
    check_required_presence(core, rules)?;
    Ok(())
}

fn check_qualified_name(core: &ComponentCore, rules: &KindPolicy) -> Result<(), DmrecError> {
    let expected_local = rules.kind.as_str();
    let expected_ns = core.version().namespace(SchemaFamily::Primary);
    let node = core.node();
    if node.local() != expected_local || node.namespace() != expected_ns {
        return Err(DmrecError::structural(format!(
            "expected element {expected_local:?} in namespace {expected_ns:?}, \
             found {:?} in namespace {:?}",
            node.local(),
            node.namespace()
        )));
    }
    Ok(())
}

fn check_version_window(core: &ComponentCore, rules: &KindPolicy) -> Result<(), DmrecError> {
    if !rules.window.contains(core.version()) {
        return Err(DmrecError::version_range(format!(
            "element {:?} is not defined at version {}",
            rules.kind.as_str(),
            core.version()
        )));
    }
    Ok(())
}

fn check_child_slots(core: &ComponentCore, rules: &KindPolicy) -> Result<(), DmrecError> {
    let version = core.version();
    let owner_ns = version.namespace(SchemaFamily::Primary);
    let node = core.node();

    for child in node.children() {
        if child.namespace() == owner_ns
            && !rules.children.iter().any(|s| s.kind.as_str() == child.local())
        {
            return Err(DmrecError::structural(format!(
                "unexpected child element {:?}",
                child.local()
            )));
        }
    }

    for slot in rules.children {
        let count = node.children_named(owner_ns, slot.kind.as_str()).count() as u32;
        if !slot.window.contains(version) {
            if count > 0 {
                return Err(DmrecError::version_range(format!(
                    "child {:?} is not defined at version {}",
                    slot.kind.as_str(),
                    version
                )));
            }
            continue;
        }
        if count < slot.min {
            return Err(DmrecError::cardinality(format!(
                "child {:?} requires at least {} occurrence(s), found {count}",
                slot.kind.as_str(),
                slot.min
            )));
        }
        if let Some(max) = slot.max {
            if count > max {
                return Err(DmrecError::cardinality(format!(
                    "child {:?} permits at most {max} occurrence(s), found {count}",
                    slot.kind.as_str()
                )));
            }
        }
    }
    Ok(())
}

fn check_attribute_admissibility(
    core: &ComponentCore,
    rules: &KindPolicy,
) -> Result<(), DmrecError> {
    let version = core.version();
    let owner_ns = version.namespace(SchemaFamily::Primary);
    let security_ns = version.namespace(SchemaFamily::Security);

    for attribute in core.node().attributes() {
        let ns = attribute.name.namespace.as_str();
        let local = attribute.name.local.as_str();
        if ns == XSI_NAMESPACE {
            continue;
        }

        // Policy-fixed constants may live in any family.
        if let Some(fixed) = rules
            .fixed
            .iter()
            .find(|f| f.local == local && version.namespace(f.family) == ns)
        {
            if !fixed.window.contains(version) {
                return Err(DmrecError::version_range(format!(
                    "attribute {:?} is not defined at version {}",
                    local, version
                )));
            }
            if attribute.value != fixed.value {
                return Err(DmrecError::structural(format!(
                    "attribute {:?} must equal {:?}, found {:?}",
                    local, fixed.value, attribute.value
                )));
            }
            continue;
        }

        if ns == owner_ns {
            match rules.attribute(local) {
                Some(slot) if slot.window.contains(version) => {}
                Some(_) => {
                    return Err(DmrecError::version_range(format!(
                        "attribute {local:?} is not defined at version {version}"
                    )));
                }
                None => {
                    return Err(DmrecError::structural(format!(
                        "unexpected attribute {local:?}"
                    )));
                }
            }
        } else if rules.security_required.is_some() && ns == security_ns {
            match policy::security_attribute_slots()
                .iter()
                .find(|s| s.local == local)
            {
                Some(slot) if slot.window.contains(version) => {}
                Some(_) => {
                    return Err(DmrecError::version_range(format!(
                        "security attribute {local:?} is not defined at version {version}"
                    )));
                }
                None => {
                    return Err(DmrecError::structural(format!(
                        "unexpected security attribute {local:?}"
                    )));
                }
            }
        } else if !rules.extensible {
            return Err(DmrecError::structural(format!(
                "unexpected attribute {} in namespace {ns:?}",
                attribute.name.qualified()
            )));
        }
    }
    Ok(())
}

fn check_required_presence(core: &ComponentCore, rules: &KindPolicy) -> Result<(), DmrecError> {
    let version = core.version();
    let owner_ns = version.namespace(SchemaFamily::Primary);
    let security_ns = version.namespace(SchemaFamily::Security);
    let node = core.node();

    for slot in rules.attributes {
        if slot.required
            && slot.window.contains(version)
            && node.attribute(owner_ns, slot.local).is_none()
        {
            return Err(DmrecError::cardinality(format!(
                "required attribute {:?} is missing",
                slot.local
            )));
        }
    }

    for fixed in rules.fixed {
        if fixed.window.contains(version) {
            let ns = version.namespace(fixed.family);
            if node.attribute(ns, fixed.local).is_none() {
                return Err(DmrecError::cardinality(format!(
                    "required attribute {:?} is missing",
                    fixed.local
                )));
            }
        }
    }

    if let Some(window) = rules.security_required {
        if window.contains(version) {
            let classification =
                node.attribute_value(security_ns, policy::SECURITY_CLASSIFICATION);
            let owner_producer =
                node.attribute_value(security_ns, policy::SECURITY_OWNER_PRODUCER);
            if classification.map_or(true, |v| v.trim().is_empty()) {
                return Err(DmrecError::cardinality(format!(
                    "security attribute {:?} is required from version 3.0",
                    policy::SECURITY_CLASSIFICATION
                )));
            }
            if owner_producer.map_or(true, |v| v.trim().is_empty()) {
                return Err(DmrecError::cardinality(format!(
                    "security attribute {:?} is required from version 3.0",
                    policy::SECURITY_OWNER_PRODUCER
                )));
            }
        }
    }
    Ok(())
}
