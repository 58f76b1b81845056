use std::sync::Arc;

use log::{debug, info, trace};
use tokio::sync::MutexGuard;

use codeweave_core::{
    geometry::{Point, Size},
    identifier::{EntityRef, Name, NodeId, RelationshipId},
    stereotype::{NodeStereotype, Origin, RelationshipStereotype},
};

use super::{ChangeEvent, CommittedChange, ModelStore, Snapshot, geometry};
use crate::{
    diagram::{Diagram, DiagramConnector, DiagramEvent, DiagramNode, DiagramUpdate},
    error::CodeweaveError,
    layout::{GroupLayout, LayoutUnifier},
    model::{Model, ModelNode, ModelRelationship, ModelUpdate},
};

use super::cancel::CancellationToken;

/// An exclusive, atomic batch of mutations against one store.
///
/// The session works on private copies of the current model and diagram.
/// [`commit`](Self::commit) publishes the result as one snapshot together
/// with every event recorded along the way; dropping the session discards
/// everything. Operations that fail leave the working copies untouched.
#[derive(Debug)]
pub struct MutationSession<'a> {
    store: &'a ModelStore,
    _guard: MutexGuard<'a, ()>,
    base: Arc<Snapshot>,
    diagram: Diagram,
    unifier: LayoutUnifier,
    events: Vec<ChangeEvent>,
}

impl<'a> MutationSession<'a> {
    pub(super) fn new(store: &'a ModelStore, guard: MutexGuard<'a, ()>) -> Self {
        let base = store.snapshot();
        Self {
            store,
            _guard: guard,
            diagram: base.diagram().clone(),
            unifier: LayoutUnifier::from_config(store.config().layout()),
            base,
            events: Vec::new(),
        }
    }

    /// Returns the snapshot this session started from.
    pub fn base(&self) -> &Arc<Snapshot> {
        &self.base
    }

    /// Returns the working model.
    pub fn model(&self) -> &Model {
        self.diagram.model()
    }

    /// Returns the working diagram.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Returns the events recorded so far.
    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    /// # Errors
    ///
    /// Returns [`CodeweaveError::Cancelled`] once `cancel` was triggered.
    pub fn check_cancelled(&self, cancel: &CancellationToken) -> Result<(), CodeweaveError> {
        cancel.check()
    }

    /// Captures the working copies so a multi-step operation can undo itself.
    pub(crate) fn savepoint(&self) -> Savepoint {
        Savepoint {
            diagram: self.diagram.clone(),
            events: self.events.len(),
        }
    }

    /// Returns the working copies to `savepoint`, dropping later events.
    pub(crate) fn rollback_to(&mut self, savepoint: Savepoint) {
        trace!(
            discarded = self.events.len().saturating_sub(savepoint.events);
            "Rolling back session"
        );
        self.diagram = savepoint.diagram;
        self.events.truncate(savepoint.events);
    }

    // =====================================================================
    // Model operations
    // =====================================================================

    /// Adds a model node. Re-adding an existing node is a no-op.
    pub fn add_model_node(&mut self, node: ModelNode) -> NodeId {
        let id = node.id();
        let update = self.model().add_node(node);
        self.apply_model(update);
        id
    }

    /// Returns the model node standing for `payload`, creating it if needed.
    pub fn get_or_add_model_node(
        &mut self,
        name: Name,
        stereotype: NodeStereotype,
        origin: Origin,
        payload: EntityRef,
    ) -> NodeId {
        let (id, update) = self
            .model()
            .get_or_add_node(name, stereotype, origin, payload);
        self.apply_model(update);
        id
    }

    /// Points a model node at another entity and refreshes its diagram node.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the model node does not exist.
    pub fn update_model_node_payload(
        &mut self,
        id: NodeId,
        payload: EntityRef,
    ) -> Result<(), CodeweaveError> {
        let update = self.model().update_node_payload(id, payload)?;
        self.apply_model(update);

        if let Some(node) = self.model().try_get_node(id).cloned() {
            let update = self.diagram.update_model_node(node)?;
            self.apply_diagram(update);
        }
        Ok(())
    }

    /// Removes a model node with its relationships, then prunes the diagram.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the model node does not exist.
    pub fn remove_model_node(&mut self, id: NodeId) -> Result<(), CodeweaveError> {
        let update = self.model().remove_node(id)?;
        self.apply_model(update);
        self.hide_node(id)
    }

    /// Adds a model relationship. Re-adding an existing one is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if an endpoint does not exist, or
    /// [`CodeweaveError::InvalidRelationship`] for a pair outside the store's
    /// [`RelationshipFeatures::valid_pairs`](crate::features::RelationshipFeatures::valid_pairs).
    pub fn add_model_relationship(
        &mut self,
        relationship: ModelRelationship,
    ) -> Result<RelationshipId, CodeweaveError> {
        let id = relationship.id();
        let update = self
            .model()
            .add_relationship_with(relationship, self.diagram.features().as_ref())?;
        self.apply_model(update);
        Ok(id)
    }

    /// Returns the relationship of the given stereotype between two nodes,
    /// creating it if needed.
    ///
    /// # Errors
    ///
    /// Same as [`add_model_relationship`](Self::add_model_relationship).
    pub fn get_or_add_model_relationship(
        &mut self,
        source: NodeId,
        target: NodeId,
        stereotype: RelationshipStereotype,
        payload: Option<EntityRef>,
    ) -> Result<RelationshipId, CodeweaveError> {
        let (id, update) = self.model().get_or_add_relationship_with(
            source,
            target,
            stereotype,
            payload,
            self.diagram.features().as_ref(),
        )?;
        self.apply_model(update);
        Ok(id)
    }

    /// Removes a model relationship and its connector.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the relationship does not exist.
    pub fn remove_model_relationship(&mut self, id: RelationshipId) -> Result<(), CodeweaveError> {
        let update = self.model().remove_relationship(id)?;
        self.apply_model(update);
        self.hide_relationship(id);
        Ok(())
    }

    // =====================================================================
    // Diagram operations
    // =====================================================================

    /// Shows a model node inside `parent` (or at the top level).
    ///
    /// The node starts unplaced with the configured default payload size.
    /// Showing a node that is already on the diagram is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the model node or the parent
    /// is missing.
    pub fn show_node(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), CodeweaveError> {
        debug!(node_id:? = id, parent:? = parent; "Showing node");
        if self.diagram.contains_node(id) {
            return Ok(());
        }
        let model_node = self
            .model()
            .try_get_node(id)
            .cloned()
            .ok_or_else(|| CodeweaveError::model_node_not_found(id))?;

        let payload_size = self.store.config().layout().default_payload_size();
        let update = self
            .diagram
            .add_node(DiagramNode::new(model_node, parent, payload_size))?;
        self.apply_diagram(update);
        self.propagate(Some(id), parent)
    }

    /// Hides a node, its descendants and their connectors. A no-op for nodes
    /// that are not shown.
    pub fn hide_node(&mut self, id: NodeId) -> Result<(), CodeweaveError> {
        let Some(node) = self.diagram.try_get_node(id).cloned() else {
            return Ok(());
        };
        let update = self.diagram.remove_node(id);
        self.apply_diagram(update);
        self.propagate(None, node.parent())
    }

    /// Shows a model relationship between two shown nodes.
    ///
    /// Showing a connector that is already on the diagram is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the relationship or an
    /// endpoint's diagram node is missing, or
    /// [`CodeweaveError::CrossLayoutGroup`] if the endpoints live in
    /// different layout groups.
    pub fn show_relationship(&mut self, id: RelationshipId) -> Result<(), CodeweaveError> {
        debug!(relationship_id:? = id; "Showing relationship");
        let relationship = self
            .model()
            .try_get_relationship(id)
            .cloned()
            .ok_or_else(|| CodeweaveError::model_relationship_not_found(id))?;

        let connector_type = self
            .diagram
            .features()
            .connector_type(relationship.stereotype());
        let update = self
            .diagram
            .add_connector(DiagramConnector::new(relationship, connector_type))?;
        self.apply_diagram(update);
        Ok(())
    }

    /// Hides a connector. A no-op for connectors that are not shown.
    pub fn hide_relationship(&mut self, id: RelationshipId) {
        let update = self.diagram.remove_connector(id);
        self.apply_diagram(update);
    }

    /// Hides every connector made redundant by the other connectors of its
    /// partition and returns their ids.
    ///
    /// Redundancy is re-evaluated after each removal, so of two parallel
    /// connectors only one is hidden.
    pub fn hide_redundant_connectors(&mut self) -> Vec<RelationshipId> {
        let candidates: Vec<_> = self
            .diagram
            .connectors()
            .iter()
            .map(|connector| (connector.id(), connector.stereotype()))
            .collect();

        let mut hidden = Vec::new();
        for (id, stereotype) in candidates {
            if self.diagram.is_connector_redundant(id, stereotype) {
                trace!(connector_id:? = id; "Hiding redundant connector");
                self.hide_relationship(id);
                hidden.push(id);
            }
        }
        hidden
    }

    /// Moves a node within its layout group.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the node is not shown.
    pub fn move_node(&mut self, id: NodeId, top_left: Point) -> Result<(), CodeweaveError> {
        debug!(node_id:? = id, x = top_left.x(), y = top_left.y(); "Moving node");
        let node = self.require_node(id)?;
        self.update_node(&node, node.with_top_left(Some(top_left)))
    }

    /// Resizes the payload area of a node.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the node is not shown.
    pub fn resize_payload(&mut self, id: NodeId, payload_size: Size) -> Result<(), CodeweaveError> {
        debug!(node_id:? = id, width = payload_size.width(), height = payload_size.height(); "Resizing payload");
        let node = self.require_node(id)?;
        self.update_node(&node, node.with_payload_size(payload_size))
    }

    /// Replaces a connector route, given in canvas coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the connector is not shown.
    pub fn update_route(
        &mut self,
        id: RelationshipId,
        route: Vec<Point>,
    ) -> Result<(), CodeweaveError> {
        let update = self.diagram.update_route(id, route)?;
        self.apply_diagram(update);
        Ok(())
    }

    /// Applies relative positions produced by an external layout step, then
    /// recomputes all derived geometry and sets every route.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the layout names a node or
    /// connector that is not shown.
    pub fn apply_layout(&mut self, layout: &GroupLayout) -> Result<(), CodeweaveError> {
        debug!(version = self.diagram.version(); "Applying layout");
        let mut diagram = self.diagram.clone();
        let mut events = Vec::new();

        place_boxes(&mut diagram, layout, &mut events)?;
        geometry::refresh_all(&mut diagram, &self.unifier, &mut events)?;
        for (id, route) in self.unifier.unify(layout).routes {
            let update = diagram.update_route(id, route)?;
            events.extend(update.events);
            diagram = update.diagram;
        }

        self.diagram = diagram;
        self.record_diagram(events);
        Ok(())
    }

    /// Removes every shape, then every model element.
    pub fn clear(&mut self) {
        let update = self.diagram.clear();
        self.apply_diagram(update);
        let update = self.model().clear();
        self.apply_model(update);
    }

    // =====================================================================
    // Commit
    // =====================================================================

    /// Publishes the working copies as the store's next snapshot.
    ///
    /// A session that recorded no events publishes nothing; the returned
    /// change then has `old == new`.
    pub fn commit(self) -> Arc<CommittedChange> {
        if self.events.is_empty() {
            trace!(revision = self.base.revision(); "Nothing to commit");
            return Arc::new(CommittedChange {
                old: Arc::clone(&self.base),
                new: self.base,
                events: Vec::new(),
            });
        }

        let new = Arc::new(Snapshot::new(self.diagram, self.base.revision() + 1));
        self.store.state.send_replace(Arc::clone(&new));

        info!(
            revision = new.revision(),
            events = self.events.len();
            "Committed change"
        );
        let change = Arc::new(CommittedChange {
            old: self.base,
            new,
            events: self.events,
        });
        if self.store.events.send(Arc::clone(&change)).is_err() {
            trace!("No change subscribers");
        }
        change
    }

    fn require_node(&self, id: NodeId) -> Result<Arc<DiagramNode>, CodeweaveError> {
        self.diagram
            .try_get_node(id)
            .cloned()
            .ok_or_else(|| CodeweaveError::diagram_node_not_found(id))
    }

    /// Replaces a node's own geometry and propagates the effects.
    fn update_node(&mut self, old: &DiagramNode, new: DiagramNode) -> Result<(), CodeweaveError> {
        let mut diagram = self.diagram.clone();
        let mut events = Vec::new();
        let (id, parent) = (new.id(), new.parent());

        geometry::replace_node(&mut diagram, old, new, &mut events)?;
        geometry::propagate(&mut diagram, &self.unifier, Some(id), parent, &mut events)?;

        self.diagram = diagram;
        self.record_diagram(events);
        Ok(())
    }

    fn propagate(
        &mut self,
        changed: Option<NodeId>,
        parent: Option<NodeId>,
    ) -> Result<(), CodeweaveError> {
        let mut diagram = self.diagram.clone();
        let mut events = Vec::new();
        geometry::propagate(&mut diagram, &self.unifier, changed, parent, &mut events)?;
        self.diagram = diagram;
        self.record_diagram(events);
        Ok(())
    }

    fn apply_model(&mut self, update: ModelUpdate) {
        if update.is_empty() {
            return;
        }
        self.diagram = self.diagram.with_model(update.model);
        self.events
            .extend(update.events.into_iter().map(ChangeEvent::Model));
    }

    fn apply_diagram(&mut self, update: DiagramUpdate) {
        if update.is_empty() {
            return;
        }
        self.diagram = update.diagram;
        self.record_diagram(update.events);
    }

    fn record_diagram(&mut self, events: Vec<DiagramEvent>) {
        self.events
            .extend(events.into_iter().map(ChangeEvent::Diagram));
    }
}

/// Working state captured by [`MutationSession::savepoint`].
#[derive(Debug)]
pub(crate) struct Savepoint {
    diagram: Diagram,
    events: usize,
}

/// Sets relative positions and payload sizes for every box of `layout`.
fn place_boxes(
    diagram: &mut Diagram,
    layout: &GroupLayout,
    events: &mut Vec<DiagramEvent>,
) -> Result<(), CodeweaveError> {
    for (id, box_layout) in layout.boxes() {
        let node = diagram
            .try_get_node(id)
            .cloned()
            .ok_or_else(|| CodeweaveError::diagram_node_not_found(id))?;
        let placed = node
            .with_top_left(Some(box_layout.top_left()))
            .with_payload_size(box_layout.payload_size());
        geometry::replace_node(diagram, &node, placed, events)?;

        if let Some(children) = box_layout.children() {
            place_boxes(diagram, children, events)?;
        }
    }
    Ok(())
}
