//! The mutation engine.
//!
//! A [`ModelStore`] owns the current model/diagram pair. Writers take turns
//! through one FIFO [`tokio::sync::Mutex`]: [`ModelStore::begin`] waits for
//! the previous session to finish and hands out a [`MutationSession`] working
//! on private copies. Committing swaps the published [`Snapshot`] and then
//! broadcasts the [`CommittedChange`]. Readers never wait: they grab the
//! current snapshot from a [`tokio::sync::watch`] channel.
//!
//! # Example
//!
//! ```
//! # use codeweave::{config::AppConfig, engine::ModelStore, model::ModelNode};
//! # use codeweave::identifier::{EntityRef, Name};
//! # use codeweave::stereotype::{NodeStereotype, Origin};
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = ModelStore::new(AppConfig::default());
//! let mut session = store.begin().await;
//! let id = session.add_model_node(ModelNode::new(
//!     Name::new("Order"),
//!     NodeStereotype::Class,
//!     Origin::Source,
//!     EntityRef::from("T:Shop.Order"),
//! ));
//! session.show_node(id, None).unwrap();
//! let change = session.commit();
//!
//! assert_eq!(change.events.len(), 2);
//! assert!(store.snapshot().diagram().contains_node(id));
//! # });
//! ```

mod cancel;
mod geometry;
mod session;

pub use cancel::{CancellationSource, CancellationToken};
pub use session::MutationSession;

use std::sync::Arc;

use log::debug;
use tokio::sync::{Mutex, broadcast, watch};

use codeweave_core::{
    geometry::{Point, Size},
    identifier::{EntityRef, NodeId, RelationshipId},
};

use crate::{
    config::AppConfig,
    diagram::{Diagram, DiagramEvent},
    error::CodeweaveError,
    expansion::{self, ExpansionOutcome, ExpansionRequest, ProgressReporter},
    features::{
        DefaultRelationshipFeatures, Presentability, RelationshipDiscovery, RelationshipFeatures,
    },
    layout::GroupLayout,
    model::{Model, ModelEvent, ModelNode, ModelRelationship},
};

/// A published, immutable state of the store.
#[derive(Debug, Clone)]
pub struct Snapshot {
    diagram: Diagram,
    revision: u64,
}

impl Snapshot {
    fn new(diagram: Diagram, revision: u64) -> Self {
        Self { diagram, revision }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn model(&self) -> &Model {
        self.diagram.model()
    }

    /// Returns the number of commits that led to this snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// One event of a committed change, in the order it happened.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    Model(ModelEvent),
    Diagram(DiagramEvent),
}

/// What one session changed.
#[derive(Debug, Clone)]
pub struct CommittedChange {
    pub old: Arc<Snapshot>,
    pub new: Arc<Snapshot>,
    pub events: Vec<ChangeEvent>,
}

impl CommittedChange {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn model_events(&self) -> impl Iterator<Item = &ModelEvent> {
        self.events.iter().filter_map(|event| match event {
            ChangeEvent::Model(event) => Some(event),
            ChangeEvent::Diagram(_) => None,
        })
    }

    pub fn diagram_events(&self) -> impl Iterator<Item = &DiagramEvent> {
        self.events.iter().filter_map(|event| match event {
            ChangeEvent::Diagram(event) => Some(event),
            ChangeEvent::Model(_) => None,
        })
    }
}

/// Owner of one model/diagram pair.
#[derive(Debug)]
pub struct ModelStore {
    lock: Mutex<()>,
    state: watch::Sender<Arc<Snapshot>>,
    events: broadcast::Sender<Arc<CommittedChange>>,
    config: AppConfig,
}

impl ModelStore {
    /// Creates an empty store with the default relationship features.
    pub fn new(config: AppConfig) -> Self {
        Self::with_features(config, Arc::new(DefaultRelationshipFeatures))
    }

    pub fn with_features(config: AppConfig, features: Arc<dyn RelationshipFeatures>) -> Self {
        let initial = Snapshot::new(Diagram::new(Model::new(), features), 0);
        let (state, _) = watch::channel(Arc::new(initial));
        let (events, _) = broadcast::channel(config.engine().event_capacity());
        Self {
            lock: Mutex::new(()),
            state,
            events,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.state.borrow())
    }

    /// Returns a receiver that always sees the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.state.subscribe()
    }

    /// Subscribes to committed changes. Drop the receiver to unsubscribe.
    ///
    /// A receiver that falls more than the configured capacity behind loses
    /// the oldest changes.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<CommittedChange>> {
        self.events.subscribe()
    }

    /// Waits for exclusive access and starts a session on the current snapshot.
    pub async fn begin(&self) -> MutationSession<'_> {
        let guard = self.lock.lock().await;
        debug!(revision = self.state.borrow().revision(); "Mutation session started");
        MutationSession::new(self, guard)
    }

    pub async fn add_model_node(&self, node: ModelNode) -> Arc<CommittedChange> {
        let mut session = self.begin().await;
        session.add_model_node(node);
        session.commit()
    }

    pub async fn remove_model_node(&self, id: NodeId) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.remove_model_node(id)).await
    }

    pub async fn update_model_node_payload(
        &self,
        id: NodeId,
        payload: EntityRef,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.update_model_node_payload(id, payload))
            .await
    }

    pub async fn add_model_relationship(
        &self,
        relationship: ModelRelationship,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.add_model_relationship(relationship).map(|_| ()))
            .await
    }

    pub async fn remove_model_relationship(
        &self,
        id: RelationshipId,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.remove_model_relationship(id)).await
    }

    pub async fn show_node(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.show_node(id, parent)).await
    }

    pub async fn hide_node(&self, id: NodeId) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.hide_node(id)).await
    }

    pub async fn show_relationship(
        &self,
        id: RelationshipId,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.show_relationship(id)).await
    }

    pub async fn hide_relationship(&self, id: RelationshipId) -> Arc<CommittedChange> {
        let mut session = self.begin().await;
        session.hide_relationship(id);
        session.commit()
    }

    pub async fn move_node(
        &self,
        id: NodeId,
        top_left: Point,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.move_node(id, top_left)).await
    }

    pub async fn resize_payload(
        &self,
        id: NodeId,
        payload_size: Size,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.resize_payload(id, payload_size))
            .await
    }

    pub async fn update_route(
        &self,
        id: RelationshipId,
        route: Vec<Point>,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.update_route(id, route)).await
    }

    /// Hides every redundant connector in one commit and returns their ids.
    pub async fn hide_redundant_connectors(&self) -> (Vec<RelationshipId>, Arc<CommittedChange>) {
        let mut session = self.begin().await;
        let hidden = session.hide_redundant_connectors();
        (hidden, session.commit())
    }

    pub async fn apply_layout(
        &self,
        layout: &GroupLayout,
    ) -> Result<Arc<CommittedChange>, CodeweaveError> {
        self.run(|session| session.apply_layout(layout)).await
    }

    pub async fn clear(&self) -> Arc<CommittedChange> {
        let mut session = self.begin().await;
        session.clear();
        session.commit()
    }

    /// Runs one expansion in its own session.
    ///
    /// Nothing is committed if the expansion fails or is cancelled.
    ///
    /// # Errors
    ///
    /// See [`expansion::extend_with_related`].
    pub async fn extend_with_related(
        &self,
        request: &ExpansionRequest,
        discovery: &dyn RelationshipDiscovery,
        presentability: &dyn Presentability,
        cancel: &CancellationToken,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<(ExpansionOutcome, Arc<CommittedChange>), CodeweaveError> {
        let mut session = self.begin().await;
        let outcome = expansion::extend_with_related(
            &mut session,
            request,
            discovery,
            presentability,
            cancel,
            progress,
        )
        .await?;
        Ok((outcome, session.commit()))
    }

    async fn run<F>(&self, op: F) -> Result<Arc<CommittedChange>, CodeweaveError>
    where
        F: FnOnce(&mut MutationSession<'_>) -> Result<(), CodeweaveError>,
    {
        let mut session = self.begin().await;
        op(&mut session)?;
        Ok(session.commit())
    }
}
