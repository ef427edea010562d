//! # Attribute Groups — Shared Bag Contract
//!
//! An attribute group is a bag of (namespace, local name, value) tuples
//! validated and serialized independently of a component's children:
//! security markings, coordinate-reference attributes, free-form
//! extension attributes. The contract is materialization
//! ([`AttributeGroup::attributes`]), emptiness, and in-place attachment
//! to an owner node with collision detection.
//!
//! `attach_to` is NOT transactional: attributes attached before a
//! colliding one remain on the owner. Callers that need atomicity must
//! attach to a scratch clone first.

use dmrec_core::DmrecError;

use crate::node::{NodeAttribute, NodeTree};

/// Shared contract for attribute bags.
pub trait AttributeGroup {
    /// The group's attributes, materialized in declaration order.
    fn attributes(&self) -> Vec<NodeAttribute>;

    /// True iff the group materializes no attributes.
    fn is_empty(&self) -> bool {
        self.attributes().is_empty()
    }

    /// Attach every attribute in the group to the owner node.
    ///
    /// # Errors
    ///
    /// Returns `DmrecError::AttributeCollision` naming the first
    /// attribute whose (namespace, local name) the owner already
    /// declares. Attributes attached before the collision remain
    /// attached.
    fn attach_to(&self, owner: &mut NodeTree) -> Result<(), DmrecError> {
        for attribute in self.attributes() {
            if owner
                .attribute(&attribute.name.namespace, &attribute.name.local)
                .is_some()
            {
                return Err(
                    DmrecError::collision(attribute.name.qualified())
                        .at(&owner.qualified_name()),
                );
            }
            owner.push_attribute(attribute);
        }
        Ok(())
    }
}

/// The group if present, else a freshly constructed empty instance.
/// Callers never branch on "absent" vs "empty".
pub fn non_null_or_empty<G>(group: Option<&G>) -> G
where
    G: AttributeGroup + Clone + Default,
{
    group.cloned().unwrap_or_default()
}
