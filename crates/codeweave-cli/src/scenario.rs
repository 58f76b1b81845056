//! Scenario files.
//!
//! A scenario describes a small code base as TOML: the entities, the
//! relationships between them, and which entity to expand from.
//!
//! ```toml
//! [[entity]]
//! key = "Shop.Order"
//! name = "Order"
//! stereotype = "class"
//!
//! [[entity]]
//! key = "Shop.Customer"
//! name = "Customer"
//! stereotype = "class"
//!
//! [[relationship]]
//! source = "Shop.Order"
//! target = "Shop.Customer"
//! stereotype = "association"
//!
//! [expand]
//! seed = "Shop.Order"
//! recursive = true
//! ```
//!
//! An entity with a `container` is shown inside that container before the
//! expansion runs. The scenario doubles as the [`RelationshipDiscovery`]
//! backing the expansion.

use std::collections::HashMap;

use async_trait::async_trait;
use log::trace;
use serde::Deserialize;

use codeweave::{
    CodeweaveError,
    engine::MutationSession,
    expansion::ExpansionRequest,
    features::{EntityDescriptor, RelatedEntity, RelationshipDiscovery},
    identifier::{EntityRef, Name, NodeId},
    stereotype::{
        DirectedRelationshipType, EdgeDirection, NodeStereotype, Origin, RelationshipStereotype,
    },
};

use crate::CliError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityEntry {
    key: String,
    name: Option<String>,
    stereotype: NodeStereotype,
    #[serde(default)]
    origin: Origin,
    container: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RelationshipEntry {
    source: String,
    target: String,
    stereotype: RelationshipStereotype,
}

/// The `[expand]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpandSection {
    pub seed: String,
    #[serde(default)]
    pub recursive: bool,
    /// Restricts discovery to one relationship stereotype.
    pub stereotype: Option<RelationshipStereotype>,
    /// Direction the `stereotype` filter is followed in; outgoing by default.
    pub direction: Option<EdgeDirection>,
    /// Hide connectors implied by other connectors of the same partition.
    #[serde(default)]
    pub prune_redundant: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    #[serde(default, rename = "entity")]
    entities: Vec<EntityEntry>,
    #[serde(default, rename = "relationship")]
    relationships: Vec<RelationshipEntry>,
    expand: ExpandSection,
}

/// A validated scenario.
#[derive(Debug)]
pub struct Scenario {
    catalogue: Catalogue,
    containers: Vec<(String, String)>,
    expand: ExpandSection,
}

impl Scenario {
    /// Parses and validates scenario text.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ScenarioSyntax`] for malformed TOML and
    /// [`CliError::Scenario`] for references to undeclared entities or
    /// duplicate keys.
    pub fn parse(source: &str) -> Result<Self, CliError> {
        let file: ScenarioFile = toml::from_str(source).map_err(|err| CliError::ScenarioSyntax {
            message: err.message().to_string(),
            src: source.to_string(),
            span: err.span(),
        })?;

        let mut catalogue = Catalogue::default();
        let mut containers = Vec::new();
        for entry in file.entities {
            let name = entry.name.as_deref().unwrap_or_else(|| short_name(&entry.key));
            let descriptor = EntityDescriptor::new(
                EntityRef::new(entry.key.as_str()),
                Name::new(name),
                entry.stereotype,
                entry.origin,
            );
            if catalogue.entities.insert(entry.key.clone(), descriptor).is_some() {
                return Err(CliError::Scenario(format!("duplicate entity `{}`", entry.key)));
            }
            if let Some(container) = entry.container {
                containers.push((entry.key, container));
            }
        }

        for (key, container) in &containers {
            catalogue.require(container)?;
            if key == container {
                return Err(CliError::Scenario(format!("entity `{key}` contains itself")));
            }
        }
        for entry in file.relationships {
            catalogue.require(&entry.source)?;
            catalogue.require(&entry.target)?;
            catalogue
                .edges
                .push((entry.source, entry.target, entry.stereotype));
        }
        catalogue.require(&file.expand.seed)?;

        Ok(Self {
            catalogue,
            containers,
            expand: file.expand,
        })
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn expand(&self) -> &ExpandSection {
        &self.expand
    }

    /// Adds the seed and every contained entity to the model and shows them,
    /// containers first. Returns the seed's node id.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Scenario`] if containers form a cycle.
    pub fn prepare(&self, session: &mut MutationSession<'_>) -> Result<NodeId, CliError> {
        let parents: HashMap<&str, &str> = self
            .containers
            .iter()
            .map(|(key, container)| (key.as_str(), container.as_str()))
            .collect();

        for (key, _) in &self.containers {
            let mut chain = vec![key.as_str()];
            while let Some(&parent) = parents.get(chain[chain.len() - 1]) {
                if chain.contains(&parent) {
                    return Err(CliError::Scenario(format!(
                        "containment cycle through `{parent}`"
                    )));
                }
                chain.push(parent);
            }

            let mut parent = None;
            for key in chain.into_iter().rev() {
                let id = self.add_entity(session, key)?;
                session.show_node(id, parent)?;
                parent = Some(id);
            }
        }

        self.add_entity(session, &self.expand.seed)
    }

    /// Builds the expansion request for the seed node.
    pub fn request(&self, seed: NodeId) -> ExpansionRequest {
        let mut request = ExpansionRequest::new(seed);
        if let Some(stereotype) = self.expand.stereotype {
            let direction = self.expand.direction.unwrap_or(EdgeDirection::Outgoing);
            request = request.with_filter(DirectedRelationshipType::new(stereotype, direction));
        }
        if self.expand.recursive {
            request = request.recursive();
        }
        request
    }

    fn add_entity(&self, session: &mut MutationSession<'_>, key: &str) -> Result<NodeId, CliError> {
        let descriptor = self.catalogue.require(key)?;
        Ok(session.get_or_add_model_node(
            descriptor.name,
            descriptor.stereotype,
            descriptor.origin,
            descriptor.entity.clone(),
        ))
    }
}

/// The last dotted segment of a key.
fn short_name(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

/// Entities and relationships of a scenario, served as a discovery source.
///
/// Each declared relationship is reported outgoing from its source and
/// incoming to its target.
#[derive(Debug, Default)]
pub struct Catalogue {
    entities: HashMap<String, EntityDescriptor>,
    edges: Vec<(String, String, RelationshipStereotype)>,
}

impl Catalogue {
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.edges.len()
    }

    fn require(&self, key: &str) -> Result<&EntityDescriptor, CliError> {
        self.entities
            .get(key)
            .ok_or_else(|| CliError::Scenario(format!("unknown entity `{key}`")))
    }
}

#[async_trait]
impl RelationshipDiscovery for Catalogue {
    async fn related_entities(
        &self,
        entity: &EntityRef,
        filter: Option<DirectedRelationshipType>,
    ) -> Result<Vec<RelatedEntity>, CodeweaveError> {
        let mut related = Vec::new();
        for (source, target, stereotype) in &self.edges {
            let (other, direction) = if source == entity.as_str() {
                (target, EdgeDirection::Outgoing)
            } else if target == entity.as_str() {
                (source, EdgeDirection::Incoming)
            } else {
                continue;
            };
            let relationship = DirectedRelationshipType::new(*stereotype, direction);
            if filter.is_some_and(|filter| filter != relationship) {
                continue;
            }
            let candidate = self
                .entities
                .get(other.as_str())
                .cloned()
                .ok_or_else(|| CodeweaveError::Discovery(format!("unknown entity `{other}`")))?;
            related.push(RelatedEntity {
                origin: entity.clone(),
                candidate,
                relationship,
                payload: None,
            });
        }
        trace!(entity:% = entity, related = related.len(); "Discovered related entities");
        Ok(related)
    }
}
