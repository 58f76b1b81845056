//! Integration tests for recursive expansion through the store API.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use codeweave::{
    CodeweaveError,
    config::AppConfig,
    engine::{CancellationSource, CancellationToken, ModelStore},
    expansion::{self, ExpansionProgress, ExpansionRequest, ProgressReporter},
    features::{DefaultPresentability, EntityDescriptor, RelatedEntity, RelationshipDiscovery},
    identifier::{EntityRef, Name, NodeId},
    model::ModelNode,
    stereotype::{
        DirectedRelationshipType, EdgeDirection, NodeStereotype, Origin, RelationshipStereotype,
    },
};

/// Static catalogue serving outgoing edges and their incoming mirrors.
#[derive(Debug, Default)]
struct Catalogue {
    entities: HashMap<String, EntityDescriptor>,
    edges: Vec<(String, String, RelationshipStereotype)>,
    calls: AtomicUsize,
}

impl Catalogue {
    fn entity(mut self, key: &str, stereotype: NodeStereotype, origin: Origin) -> Self {
        self.entities.insert(
            key.to_string(),
            EntityDescriptor::new(EntityRef::from(key), Name::new(key), stereotype, origin),
        );
        self
    }

    fn class(self, key: &str) -> Self {
        self.entity(key, NodeStereotype::Class, Origin::Source)
    }

    fn edge(mut self, source: &str, target: &str, stereotype: RelationshipStereotype) -> Self {
        self.edges
            .push((source.to_string(), target.to_string(), stereotype));
        self
    }

    fn seed(&self, key: &str) -> ModelNode {
        let descriptor = &self.entities[key];
        ModelNode::new(
            descriptor.name,
            descriptor.stereotype,
            descriptor.origin,
            descriptor.entity.clone(),
        )
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelationshipDiscovery for Catalogue {
    async fn related_entities(
        &self,
        entity: &EntityRef,
        filter: Option<DirectedRelationshipType>,
    ) -> Result<Vec<RelatedEntity>, CodeweaveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
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
        Ok(related)
    }
}

async fn seeded(catalogue: &Catalogue, key: &str) -> (ModelStore, NodeId) {
    let store = ModelStore::new(AppConfig::default());
    let seed = catalogue.seed(key);
    let id = seed.id();
    store.add_model_node(seed).await;
    (store, id)
}

fn cycle() -> Catalogue {
    Catalogue::default()
        .class("A")
        .class("B")
        .class("C")
        .edge("A", "B", RelationshipStereotype::Association)
        .edge("B", "C", RelationshipStereotype::Association)
        .edge("C", "A", RelationshipStereotype::Association)
}

#[tokio::test]
async fn test_recursive_expansion_of_a_cycle_terminates() {
    let catalogue = cycle();
    let (store, a) = seeded(&catalogue, "A").await;

    let request = ExpansionRequest::new(a).recursive();
    let (outcome, change) = store
        .extend_with_related(
            &request,
            &catalogue,
            &DefaultPresentability,
            &CancellationToken::none(),
            None,
        )
        .await
        .expect("expansion should succeed");

    assert_eq!(outcome.visited.len(), 3);
    assert_eq!(outcome.visited[0], a);
    assert_eq!(outcome.added_nodes.len(), 2);
    assert_eq!(outcome.added_relationships.len(), 3);
    assert_eq!(catalogue.calls(), 3);

    let snapshot = &change.new;
    assert_eq!(snapshot.model().node_count(), 3);
    assert_eq!(snapshot.model().relationship_count(), 3);
    assert_eq!(snapshot.diagram().nodes().len(), 3);
    assert_eq!(snapshot.diagram().connectors().len(), 3);
}

#[tokio::test]
async fn test_repeated_expansion_is_idempotent() {
    let catalogue = cycle();
    let (store, a) = seeded(&catalogue, "A").await;
    let request = ExpansionRequest::new(a).recursive();
    let cancel = CancellationToken::none();

    store
        .extend_with_related(&request, &catalogue, &DefaultPresentability, &cancel, None)
        .await
        .unwrap();
    let revision = store.snapshot().revision();

    let (outcome, change) = store
        .extend_with_related(&request, &catalogue, &DefaultPresentability, &cancel, None)
        .await
        .unwrap();
    assert!(outcome.added_nodes.is_empty());
    assert!(outcome.added_relationships.is_empty());
    assert!(change.is_empty());
    assert_eq!(store.snapshot().revision(), revision);
}

#[tokio::test]
async fn test_single_level_expansion_stops_at_neighbours() {
    let catalogue = cycle();
    let (store, a) = seeded(&catalogue, "A").await;

    let (outcome, _) = store
        .extend_with_related(
            &ExpansionRequest::new(a),
            &catalogue,
            &DefaultPresentability,
            &CancellationToken::none(),
            None,
        )
        .await
        .unwrap();

    // A -> B outgoing and C -> A incoming.
    assert_eq!(outcome.visited.len(), 3);
    assert_eq!(catalogue.calls(), 1);
    assert_eq!(store.snapshot().model().relationship_count(), 2);
}

#[tokio::test]
async fn test_filter_restricts_discovery() {
    let catalogue = Catalogue::default()
        .class("Base")
        .class("Derived")
        .class("Helper")
        .edge("Derived", "Base", RelationshipStereotype::Inheritance)
        .edge("Derived", "Helper", RelationshipStereotype::Association);
    let (store, derived) = seeded(&catalogue, "Derived").await;

    let request = ExpansionRequest::new(derived)
        .with_filter(DirectedRelationshipType::outgoing(RelationshipStereotype::Inheritance))
        .recursive();
    let (outcome, change) = store
        .extend_with_related(
            &request,
            &catalogue,
            &DefaultPresentability,
            &CancellationToken::none(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.visited.len(), 2);
    let base = change
        .new
        .model()
        .try_get_node_by_payload(&EntityRef::from("Base"))
        .expect("base class should be added");
    assert_eq!(outcome.visited[1], base.id());
    assert!(change.new.model().try_get_node_by_payload(&EntityRef::from("Helper")).is_none());
}

#[tokio::test]
async fn test_unpresentable_candidates_are_skipped() {
    let catalogue = Catalogue::default()
        .class("Order")
        .entity("Int32", NodeStereotype::Struct, Origin::Metadata)
        .entity("Total", NodeStereotype::Property, Origin::Source)
        .edge("Order", "Int32", RelationshipStereotype::Association)
        .edge("Order", "Total", RelationshipStereotype::Containment);
    let (store, order) = seeded(&catalogue, "Order").await;

    let (outcome, change) = store
        .extend_with_related(
            &ExpansionRequest::new(order),
            &catalogue,
            &DefaultPresentability,
            &CancellationToken::none(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.added_nodes.len(), 1);
    assert!(change.new.model().try_get_node_by_payload(&EntityRef::from("Int32")).is_none());
}

#[tokio::test]
async fn test_invalid_pair_aborts_the_session() {
    let catalogue = Catalogue::default()
        .class("Order")
        .entity("Total", NodeStereotype::Property, Origin::Source)
        .edge("Order", "Total", RelationshipStereotype::Inheritance);
    let (store, order) = seeded(&catalogue, "Order").await;
    let revision = store.snapshot().revision();

    let err = store
        .extend_with_related(
            &ExpansionRequest::new(order),
            &catalogue,
            &DefaultPresentability,
            &CancellationToken::none(),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CodeweaveError::InvalidRelationship { .. }));
    assert_eq!(store.snapshot().revision(), revision);
    assert_eq!(store.snapshot().model().node_count(), 1);
}

#[tokio::test]
async fn test_failed_expansion_rolls_the_session_back() {
    let catalogue = Catalogue::default()
        .class("Order")
        .class("Customer")
        .entity("Total", NodeStereotype::Property, Origin::Source)
        .edge("Order", "Customer", RelationshipStereotype::Association)
        .edge("Order", "Total", RelationshipStereotype::Inheritance);
    let (store, order) = seeded(&catalogue, "Order").await;
    let revision = store.snapshot().revision();

    let mut session = store.begin().await;
    let err = expansion::extend_with_related(
        &mut session,
        &ExpansionRequest::new(order),
        &catalogue,
        &DefaultPresentability,
        &CancellationToken::none(),
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CodeweaveError::InvalidRelationship { .. }));
    assert_eq!(session.model().node_count(), 1);
    assert!(session.diagram().nodes().is_empty());
    assert!(session.events().is_empty());

    let change = session.commit();
    assert!(change.is_empty());
    assert_eq!(store.snapshot().revision(), revision);
    assert_eq!(store.snapshot().model().node_count(), 1);
    assert!(store.snapshot().diagram().nodes().is_empty());
}

#[tokio::test]
async fn test_session_stays_usable_after_a_failed_expansion() {
    let catalogue = Catalogue::default()
        .class("Order")
        .entity("Total", NodeStereotype::Property, Origin::Source)
        .edge("Order", "Total", RelationshipStereotype::Inheritance);
    let (store, order) = seeded(&catalogue, "Order").await;

    let mut session = store.begin().await;
    session.show_node(order, None).unwrap();
    let recorded = session.events().len();

    expansion::extend_with_related(
        &mut session,
        &ExpansionRequest::new(order),
        &catalogue,
        &DefaultPresentability,
        &CancellationToken::none(),
        None,
    )
    .await
    .unwrap_err();

    assert_eq!(session.events().len(), recorded);
    let change = session.commit();
    assert_eq!(change.new.diagram().nodes().len(), 1);
    assert_eq!(change.new.model().node_count(), 1);
}

#[tokio::test]
async fn test_cancelled_expansion_commits_nothing() {
    let catalogue = cycle();
    let (store, a) = seeded(&catalogue, "A").await;
    let source = CancellationSource::new();
    source.cancel();

    let err = store
        .extend_with_related(
            &ExpansionRequest::new(a).recursive(),
            &catalogue,
            &DefaultPresentability,
            &source.token(),
            None,
        )
        .await
        .unwrap_err();

    assert!(err.is_cancellation());
    assert_eq!(catalogue.calls(), 0);
    assert!(store.snapshot().diagram().nodes().is_empty());
}

#[tokio::test]
async fn test_progress_is_reported_per_node() {
    let catalogue = cycle();
    let (store, a) = seeded(&catalogue, "A").await;
    let (sender, mut receiver) = mpsc::unbounded_channel::<ExpansionProgress>();

    store
        .extend_with_related(
            &ExpansionRequest::new(a).recursive(),
            &catalogue,
            &DefaultPresentability,
            &CancellationToken::none(),
            Some(&sender as &dyn ProgressReporter),
        )
        .await
        .unwrap();
    drop(sender);

    let mut reports = Vec::new();
    while let Some(progress) = receiver.recv().await {
        reports.push(progress);
    }
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].current, a);
    assert_eq!(reports[0].expanded, 0);
    assert_eq!(reports[2].expanded, 2);
}

#[tokio::test]
async fn test_expansion_inside_a_container() {
    let catalogue = Catalogue::default()
        .class("Outer")
        .class("A")
        .class("B")
        .edge("A", "B", RelationshipStereotype::Association);
    let store = ModelStore::new(AppConfig::default());

    let mut session = store.begin().await;
    let outer = session.add_model_node(catalogue.seed("Outer"));
    let a = session.add_model_node(catalogue.seed("A"));
    session.show_node(outer, None).unwrap();
    session.show_node(a, Some(outer)).unwrap();
    session.commit();

    let (outcome, change) = store
        .extend_with_related(
            &ExpansionRequest::new(a),
            &catalogue,
            &DefaultPresentability,
            &CancellationToken::none(),
            None,
        )
        .await
        .unwrap();

    let b = outcome.visited[1];
    let diagram = change.new.diagram();
    assert_eq!(diagram.try_get_node(b).and_then(|node| node.parent()), Some(outer));
    assert_eq!(diagram.connectors().len(), 1);
}
