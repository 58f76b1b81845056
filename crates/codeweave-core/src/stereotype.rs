//! Node and relationship stereotypes.
//!
//! Stereotypes are closed sets of tags that classify the domain role of a
//! node or relationship. The legal (source, target) pairs of every
//! relationship stereotype are fixed here; the model refuses to build a
//! relationship outside this table.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Error returned when parsing a stereotype or direction from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseStereotypeError {
    kind: &'static str,
    value: String,
}

/// The domain role of a model node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStereotype {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    Field,
    Property,
    Method,
    Event,
    Constant,
}

impl NodeStereotype {
    pub const ALL: [NodeStereotype; 10] = [
        Self::Class,
        Self::Interface,
        Self::Struct,
        Self::Enum,
        Self::Delegate,
        Self::Field,
        Self::Property,
        Self::Method,
        Self::Event,
        Self::Constant,
    ];

    /// Returns true for type-like stereotypes that can own members.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Struct | Self::Enum | Self::Delegate
        )
    }

    /// Returns true for member stereotypes.
    pub fn is_member(self) -> bool {
        !self.is_type()
    }

    /// Returns the directed relationship types worth exploring from a node of
    /// this stereotype, in a stable order.
    ///
    /// A type is listed as [`EdgeDirection::Outgoing`] when this stereotype
    /// appears as a legal source of the relationship, and as
    /// [`EdgeDirection::Incoming`] when it appears as a legal target.
    ///
    /// # Examples
    ///
    /// ```
    /// use codeweave_core::stereotype::{
    ///     DirectedRelationshipType, EdgeDirection, NodeStereotype, RelationshipStereotype,
    /// };
    ///
    /// let explorable = NodeStereotype::Constant.explorable_relationships();
    /// assert_eq!(
    ///     explorable,
    ///     vec![DirectedRelationshipType::new(
    ///         RelationshipStereotype::Containment,
    ///         EdgeDirection::Incoming,
    ///     )]
    /// );
    /// ```
    pub fn explorable_relationships(self) -> Vec<DirectedRelationshipType> {
        use EdgeDirection::{Incoming, Outgoing};
        use RelationshipStereotype::{Association, Containment, Implementation, Inheritance};

        let pairs: &[(RelationshipStereotype, EdgeDirection)] = match self {
            Self::Class => &[
                (Containment, Outgoing),
                (Containment, Incoming),
                (Inheritance, Outgoing),
                (Inheritance, Incoming),
                (Implementation, Outgoing),
                (Association, Outgoing),
                (Association, Incoming),
            ],
            Self::Interface => &[
                (Containment, Outgoing),
                (Containment, Incoming),
                (Inheritance, Outgoing),
                (Inheritance, Incoming),
                (Implementation, Incoming),
                (Association, Outgoing),
                (Association, Incoming),
            ],
            Self::Struct => &[
                (Containment, Outgoing),
                (Containment, Incoming),
                (Implementation, Outgoing),
                (Association, Outgoing),
                (Association, Incoming),
            ],
            Self::Enum => &[
                (Containment, Outgoing),
                (Containment, Incoming),
                (Association, Incoming),
            ],
            Self::Delegate => &[
                (Containment, Incoming),
                (Association, Outgoing),
                (Association, Incoming),
            ],
            Self::Field | Self::Property | Self::Method | Self::Event => {
                &[(Containment, Incoming), (Association, Outgoing)]
            }
            Self::Constant => &[(Containment, Incoming)],
        };

        pairs
            .iter()
            .map(|&(stereotype, direction)| DirectedRelationshipType::new(stereotype, direction))
            .collect()
    }
}

impl fmt::Display for NodeStereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Delegate => "delegate",
            Self::Field => "field",
            Self::Property => "property",
            Self::Method => "method",
            Self::Event => "event",
            Self::Constant => "constant",
        };
        f.write_str(name)
    }
}

impl FromStr for NodeStereotype {
    type Err = ParseStereotypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stereotype| stereotype.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseStereotypeError {
                kind: "node stereotype",
                value: s.to_string(),
            })
    }
}

/// Where an entity was declared relative to the analysed code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Authored in the analysed source.
    #[default]
    Source,
    /// Referenced from external metadata.
    Metadata,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Metadata => f.write_str("metadata"),
        }
    }
}

/// The domain role of a model relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStereotype {
    Containment,
    Association,
    Implementation,
    Inheritance,
}

impl RelationshipStereotype {
    pub const ALL: [RelationshipStereotype; 4] = [
        Self::Containment,
        Self::Association,
        Self::Implementation,
        Self::Inheritance,
    ];

    /// Returns true if a relationship of this stereotype may connect a
    /// `source` node to a `target` node.
    ///
    /// # Examples
    ///
    /// ```
    /// use codeweave_core::stereotype::{NodeStereotype, RelationshipStereotype};
    ///
    /// let inheritance = RelationshipStereotype::Inheritance;
    /// assert!(inheritance.is_valid_between(NodeStereotype::Class, NodeStereotype::Class));
    /// assert!(!inheritance.is_valid_between(NodeStereotype::Class, NodeStereotype::Property));
    /// ```
    pub fn is_valid_between(self, source: NodeStereotype, target: NodeStereotype) -> bool {
        use NodeStereotype::*;

        match self {
            Self::Inheritance => matches!((source, target), (Class, Class) | (Interface, Interface)),
            Self::Implementation => {
                matches!((source, target), (Class, Interface) | (Struct, Interface))
            }
            Self::Containment => match source {
                Class | Struct | Interface => true,
                Enum => target == Constant,
                _ => false,
            },
            Self::Association => {
                matches!(
                    source,
                    Class | Struct | Interface | Delegate | Field | Property | Method | Event
                ) && matches!(target, Class | Interface | Struct | Enum | Delegate)
            }
        }
    }

    /// Enumerates every legal (source, target) pair for this stereotype.
    pub fn valid_pairs(self) -> Vec<(NodeStereotype, NodeStereotype)> {
        NodeStereotype::ALL
            .into_iter()
            .flat_map(|source| {
                NodeStereotype::ALL
                    .into_iter()
                    .map(move |target| (source, target))
            })
            .filter(|&(source, target)| self.is_valid_between(source, target))
            .collect()
    }
}

impl fmt::Display for RelationshipStereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Containment => "containment",
            Self::Association => "association",
            Self::Implementation => "implementation",
            Self::Inheritance => "inheritance",
        };
        f.write_str(name)
    }
}

impl FromStr for RelationshipStereotype {
    type Err = ParseStereotypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stereotype| stereotype.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseStereotypeError {
                kind: "relationship stereotype",
                value: s.to_string(),
            })
    }
}

/// Direction in which a relationship is followed from a given node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    /// From the node to the relationship's target.
    Outgoing,
    /// From the node to the relationship's source.
    Incoming,
}

impl EdgeDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Outgoing => Self::Incoming,
            Self::Incoming => Self::Outgoing,
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outgoing => f.write_str("outgoing"),
            Self::Incoming => f.write_str("incoming"),
        }
    }
}

impl FromStr for EdgeDirection {
    type Err = ParseStereotypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "outgoing" => Ok(Self::Outgoing),
            "incoming" => Ok(Self::Incoming),
            _ => Err(ParseStereotypeError {
                kind: "edge direction",
                value: s.to_string(),
            }),
        }
    }
}

/// A relationship stereotype paired with the direction it is followed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectedRelationshipType {
    stereotype: RelationshipStereotype,
    direction: EdgeDirection,
}

impl DirectedRelationshipType {
    pub fn new(stereotype: RelationshipStereotype, direction: EdgeDirection) -> Self {
        Self {
            stereotype,
            direction,
        }
    }

    pub fn outgoing(stereotype: RelationshipStereotype) -> Self {
        Self::new(stereotype, EdgeDirection::Outgoing)
    }

    pub fn incoming(stereotype: RelationshipStereotype) -> Self {
        Self::new(stereotype, EdgeDirection::Incoming)
    }

    pub fn stereotype(self) -> RelationshipStereotype {
        self.stereotype
    }

    pub fn direction(self) -> EdgeDirection {
        self.direction
    }
}

impl fmt::Display for DirectedRelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.stereotype, self.direction)
    }
}
