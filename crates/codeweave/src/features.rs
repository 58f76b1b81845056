//! Collaborator interfaces consumed by the model and diagram layers.
//!
//! Codeweave does not resolve symbols itself. The host plugs in:
//!
//! - a [`RelationshipDiscovery`] that lists the entities related to a given
//!   entity (asynchronous, usually backed by a compiler or an index),
//! - a [`Presentability`] predicate that decides which discovered entities
//!   deserve a node,
//! - a [`RelationshipFeatures`] table describing per-stereotype semantics:
//!   legal pairs, transitivity partitions and connector looks.
//!
//! Default implementations are provided for the latter two.

use std::fmt;

use async_trait::async_trait;

use codeweave_core::{
    connector::ConnectorType,
    identifier::{EntityRef, Name},
    stereotype::{DirectedRelationshipType, NodeStereotype, Origin, RelationshipStereotype},
};

use crate::error::CodeweaveError;

/// Everything needed to create a model node for an external entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    pub entity: EntityRef,
    pub name: Name,
    pub stereotype: NodeStereotype,
    pub origin: Origin,
}

impl EntityDescriptor {
    pub fn new(entity: EntityRef, name: Name, stereotype: NodeStereotype, origin: Origin) -> Self {
        Self {
            entity,
            name,
            stereotype,
            origin,
        }
    }
}

/// One discovered relationship: `origin` relates to `candidate` through
/// `relationship`, seen from `origin`.
///
/// With an [`Outgoing`](codeweave_core::stereotype::EdgeDirection::Outgoing)
/// direction the relationship runs from `origin` to `candidate`; with
/// `Incoming` it runs from `candidate` to `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedEntity {
    pub origin: EntityRef,
    pub candidate: EntityDescriptor,
    pub relationship: DirectedRelationshipType,
    pub payload: Option<EntityRef>,
}

/// Source of truth for relationships between external entities.
#[async_trait]
pub trait RelationshipDiscovery: fmt::Debug + Send + Sync {
    /// Lists the entities related to `entity`, optionally restricted to one
    /// directed relationship type.
    async fn related_entities(
        &self,
        entity: &EntityRef,
        filter: Option<DirectedRelationshipType>,
    ) -> Result<Vec<RelatedEntity>, CodeweaveError>;
}

/// Decides whether a discovered entity is shown at all.
pub trait Presentability: fmt::Debug + Send + Sync {
    fn is_presentable(&self, candidate: &EntityDescriptor) -> bool;
}

/// Built-in primitive type names hidden by [`DefaultPresentability`].
const PRIMITIVE_TYPE_NAMES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long", "ulong",
    "short", "ushort", "nint", "nuint", "object", "string", "void", "Boolean", "Byte", "SByte",
    "Char", "Decimal", "Double", "Single", "Int16", "Int32", "Int64", "UInt16", "UInt32", "UInt64",
    "IntPtr", "UIntPtr", "Object", "String", "Void",
];

/// Hides externally referenced primitive types; shows everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPresentability;

impl Presentability for DefaultPresentability {
    fn is_presentable(&self, candidate: &EntityDescriptor) -> bool {
        candidate.origin != Origin::Metadata
            || !PRIMITIVE_TYPE_NAMES
                .iter()
                .any(|primitive| candidate.name == *primitive)
    }
}

/// Identifies a transitivity partition.
///
/// Connectors whose stereotypes map to the same key share one reachability
/// graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionKey(Name);

impl PartitionKey {
    pub fn new(name: &str) -> Self {
        Self(Name::new(name))
    }

    pub fn name(self) -> Name {
        self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-stereotype relationship semantics.
pub trait RelationshipFeatures: fmt::Debug + Send + Sync {
    /// Legal (source, target) node stereotype pairs.
    ///
    /// The mutation path checks this list on top of the fixed table of
    /// [`RelationshipStereotype::is_valid_between`], so an implementation can
    /// narrow the legal pairs but never widen them.
    fn valid_pairs(&self, stereotype: RelationshipStereotype) -> Vec<(NodeStereotype, NodeStereotype)> {
        stereotype.valid_pairs()
    }

    /// The transitivity partition the stereotype belongs to.
    fn partition_key(&self, stereotype: RelationshipStereotype) -> PartitionKey;

    /// How connectors of this stereotype look.
    fn connector_type(&self, stereotype: RelationshipStereotype) -> ConnectorType {
        ConnectorType::for_stereotype(stereotype)
    }
}

/// Inheritance and implementation share the `subtyping` partition;
/// containment and association get one partition each.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRelationshipFeatures;

impl RelationshipFeatures for DefaultRelationshipFeatures {
    fn partition_key(&self, stereotype: RelationshipStereotype) -> PartitionKey {
        match stereotype {
            RelationshipStereotype::Inheritance | RelationshipStereotype::Implementation => {
                PartitionKey::new("subtyping")
            }
            RelationshipStereotype::Containment => PartitionKey::new("containment"),
            RelationshipStereotype::Association => PartitionKey::new("association"),
        }
    }
}
