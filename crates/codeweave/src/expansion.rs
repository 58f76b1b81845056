//! Growing the model and diagram outward from a seed node.
//!
//! [`extend_with_related`] asks a [`RelationshipDiscovery`] for the entities
//! related to the seed, adds the presentable ones to the model and the
//! diagram, and in recursive mode repeats for every newly reached node. An
//! explicit worklist and a visited set scoped to the call keep cyclic
//! relationship graphs finite: every node is expanded at most once.

use std::collections::{HashSet, VecDeque};

use log::{debug, info, trace, warn};
use tokio::sync::mpsc;

use codeweave_core::{
    identifier::{NodeId, RelationshipId},
    stereotype::{DirectedRelationshipType, EdgeDirection},
};

use crate::{
    engine::{CancellationToken, MutationSession},
    error::CodeweaveError,
    features::{Presentability, RelatedEntity, RelationshipDiscovery},
};

/// What to expand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionRequest {
    pub start: NodeId,
    /// Restricts discovery to one directed relationship type.
    pub filter: Option<DirectedRelationshipType>,
    pub recursive: bool,
}

impl ExpansionRequest {
    pub fn new(start: NodeId) -> Self {
        Self {
            start,
            filter: None,
            recursive: false,
        }
    }

    pub fn with_filter(self, filter: DirectedRelationshipType) -> Self {
        Self {
            filter: Some(filter),
            ..self
        }
    }

    pub fn recursive(self) -> Self {
        Self {
            recursive: true,
            ..self
        }
    }
}

/// What an expansion did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionOutcome {
    /// Nodes reached, in discovery order, starting with the seed.
    pub visited: Vec<NodeId>,
    /// Model nodes created by this run.
    pub added_nodes: Vec<NodeId>,
    /// Model relationships created by this run.
    pub added_relationships: Vec<RelationshipId>,
}

/// A progress notification, sent before each node is expanded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionProgress {
    pub current: NodeId,
    pub expanded: usize,
    pub pending: usize,
}

/// Receives best-effort progress notifications.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: ExpansionProgress);
}

impl ProgressReporter for mpsc::UnboundedSender<ExpansionProgress> {
    fn report(&self, progress: ExpansionProgress) {
        if self.send(progress).is_err() {
            trace!("Progress receiver dropped");
        }
    }
}

/// Adds the entities related to `request.start` to the session's model and
/// diagram.
///
/// The seed is shown at the top level first if it is not on the diagram yet.
/// Discovered candidates join the seed's layout group; their connectors are
/// shown when both ends share a group. Candidates rejected by
/// `presentability` are skipped entirely.
///
/// # Errors
///
/// - [`CodeweaveError::NotFound`] if the seed is not in the model
/// - [`CodeweaveError::Cancelled`] once `cancel` is triggered
/// - [`CodeweaveError::Discovery`] if discovery fails
/// - [`CodeweaveError::InvalidRelationship`] if discovery reports an illegal pair
///
/// A failed expansion rolls the session back to where it was before the call,
/// so the session stays usable and committing it publishes none of the walk.
pub async fn extend_with_related(
    session: &mut MutationSession<'_>,
    request: &ExpansionRequest,
    discovery: &dyn RelationshipDiscovery,
    presentability: &dyn Presentability,
    cancel: &CancellationToken,
    progress: Option<&dyn ProgressReporter>,
) -> Result<ExpansionOutcome, CodeweaveError> {
    let savepoint = session.savepoint();
    let result = walk(session, request, discovery, presentability, cancel, progress).await;
    if let Err(err) = &result {
        debug!(start:? = request.start, err:%; "Expansion failed");
        session.rollback_to(savepoint);
    }
    result
}

async fn walk(
    session: &mut MutationSession<'_>,
    request: &ExpansionRequest,
    discovery: &dyn RelationshipDiscovery,
    presentability: &dyn Presentability,
    cancel: &CancellationToken,
    progress: Option<&dyn ProgressReporter>,
) -> Result<ExpansionOutcome, CodeweaveError> {
    debug!(start:? = request.start, recursive = request.recursive; "Extending with related entities");
    if session.model().try_get_node(request.start).is_none() {
        return Err(CodeweaveError::model_node_not_found(request.start));
    }
    session.show_node(request.start, None)?;
    let group = session.diagram().group_owner_of(request.start).flatten();

    let mut outcome = ExpansionOutcome {
        visited: vec![request.start],
        ..Default::default()
    };
    let mut visited: HashSet<NodeId> = HashSet::from([request.start]);
    let mut worklist: VecDeque<NodeId> = VecDeque::from([request.start]);
    let mut expanded = 0;

    while let Some(current) = worklist.pop_front() {
        session.check_cancelled(cancel)?;
        if let Some(reporter) = progress {
            reporter.report(ExpansionProgress {
                current,
                expanded,
                pending: worklist.len(),
            });
        }

        let Some(node) = session.model().try_get_node(current).cloned() else {
            continue;
        };
        let related = discovery
            .related_entities(node.payload(), request.filter)
            .await?;
        session.check_cancelled(cancel)?;
        expanded += 1;
        trace!(node_id:? = current, related = related.len(); "Discovered related entities");

        for entity in related {
            if &entity.origin != node.payload() {
                warn!(origin:% = entity.origin, expected:% = node.payload(); "Skipping entity related to another origin");
                continue;
            }
            if !presentability.is_presentable(&entity.candidate) {
                trace!(candidate:% = entity.candidate.entity; "Skipping unpresentable entity");
                continue;
            }

            let (candidate, relationship) = add_related(session, current, &entity, &mut outcome)?;
            if !session.diagram().contains_node(candidate) {
                session.show_node(candidate, group)?;
            }
            // A candidate shown elsewhere earlier may sit in another group.
            if session.diagram().share_group(current, candidate) {
                session.show_relationship(relationship)?;
            }

            if visited.insert(candidate) {
                outcome.visited.push(candidate);
                if request.recursive {
                    worklist.push_back(candidate);
                }
            }
        }
    }

    info!(
        visited = outcome.visited.len(),
        added_nodes = outcome.added_nodes.len(),
        added_relationships = outcome.added_relationships.len();
        "Expansion finished"
    );
    Ok(outcome)
}

/// Gets or creates the candidate node and the relationship to it.
fn add_related(
    session: &mut MutationSession<'_>,
    current: NodeId,
    entity: &RelatedEntity,
    outcome: &mut ExpansionOutcome,
) -> Result<(NodeId, RelationshipId), CodeweaveError> {
    let descriptor = &entity.candidate;
    let known = session
        .model()
        .try_get_node_by_payload(&descriptor.entity)
        .is_some();
    let candidate = session.get_or_add_model_node(
        descriptor.name,
        descriptor.stereotype,
        descriptor.origin,
        descriptor.entity.clone(),
    );
    if !known {
        outcome.added_nodes.push(candidate);
    }

    let (source, target) = match entity.relationship.direction() {
        EdgeDirection::Outgoing => (current, candidate),
        EdgeDirection::Incoming => (candidate, current),
    };
    let stereotype = entity.relationship.stereotype();
    let related = session
        .model()
        .find_relationship(source, target, stereotype)
        .is_some();
    let relationship = session.get_or_add_model_relationship(
        source,
        target,
        stereotype,
        entity.payload.clone(),
    )?;
    if !related {
        outcome.added_relationships.push(relationship);
    }

    Ok((candidate, relationship))
}
