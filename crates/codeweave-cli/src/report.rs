//! Plain-text report of a run.

use std::{fmt, sync::Arc};

use codeweave::{
    diagram::{Diagram, LayoutGroup},
    engine::{CommittedChange, Snapshot},
    expansion::ExpansionOutcome,
    identifier::NodeId,
};

/// Everything a run produced, rendered through [`fmt::Display`].
#[derive(Debug)]
pub struct Report<'a> {
    pub scenario: &'a str,
    pub snapshot: &'a Snapshot,
    pub outcome: &'a ExpansionOutcome,
    pub commits: &'a [Arc<CommittedChange>],
    pub pruned: usize,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario: {}", self.scenario)?;
        writeln!(f, "revision: {}", self.snapshot.revision())?;
        writeln!(f)?;

        writeln!(f, "[expansion]")?;
        writeln!(f, "visited: {}", self.outcome.visited.len())?;
        writeln!(f, "added nodes: {}", self.outcome.added_nodes.len())?;
        writeln!(f, "added relationships: {}", self.outcome.added_relationships.len())?;
        writeln!(f, "pruned connectors: {}", self.pruned)?;
        writeln!(f)?;

        writeln!(f, "[commits]")?;
        for change in self.commits.iter().filter(|change| !change.is_empty()) {
            writeln!(
                f,
                "revision {}: {} model events, {} diagram events",
                change.new.revision(),
                change.model_events().count(),
                change.diagram_events().count()
            )?;
        }
        writeln!(f)?;

        let diagram = self.snapshot.diagram();
        writeln!(f, "[nodes]")?;
        write_group(f, diagram.root(), 0)?;
        writeln!(f)?;

        writeln!(f, "[connectors]")?;
        for connector in diagram.connectors() {
            let redundant = if diagram.is_connector_redundant(connector.id(), connector.stereotype()) {
                " (redundant)"
            } else {
                ""
            };
            writeln!(
                f,
                "{} -> {} {} [{}] {} points{}",
                node_name(diagram, connector.source()),
                node_name(diagram, connector.target()),
                connector.stereotype(),
                connector.connector_type(),
                connector.route().len(),
                redundant
            )?;
        }
        Ok(())
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, group: &LayoutGroup, depth: usize) -> fmt::Result {
    for node in group.nodes() {
        let model_node = node.model_node();
        write!(
            f,
            "{:indent$}{} <{}>",
            "",
            model_node.name(),
            model_node.stereotype(),
            indent = depth * 2
        )?;
        match node.absolute_rect() {
            Some(rect) => writeln!(
                f,
                " at ({}, {}) size {}x{}",
                rect.min_x(),
                rect.min_y(),
                rect.width(),
                rect.height()
            )?,
            None => writeln!(f, " unplaced")?,
        }
        if let Some(children) = group.child_group(node.id()) {
            write_group(f, children, depth + 1)?;
        }
    }
    Ok(())
}

fn node_name(diagram: &Diagram, id: NodeId) -> String {
    diagram
        .try_get_node(id)
        .map(|node| node.model_node().name().to_string())
        .unwrap_or_else(|| id.to_string())
}
