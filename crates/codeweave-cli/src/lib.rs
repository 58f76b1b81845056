//! CLI logic for the Codeweave model and diagram engine.
//!
//! A run loads a scenario, seeds the store with it, expands the seed through
//! the scenario's relationships, lays the diagram out and writes a text
//! report of the result.

pub mod error_adapter;
pub mod report;
pub mod row_layout;
pub mod scenario;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::{fs, sync::Arc};

use log::{info, warn};
use tokio::sync::mpsc;

use codeweave::{
    engine::{CancellationSource, ModelStore},
    expansion::{ExpansionProgress, ProgressReporter},
    features::DefaultPresentability,
    layout::LayoutUnifier,
};

use report::Report;
use row_layout::{DEFAULT_SPACING, row_layout};
use scenario::Scenario;

/// Run the Codeweave CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed or inconsistent scenarios
/// - Engine errors raised while expanding or laying out
pub async fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scenario"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;
    let scenario = Scenario::parse(&source)?;
    info!(
        entities = scenario.catalogue().entity_count(),
        relationships = scenario.catalogue().relationship_count();
        "Scenario loaded"
    );

    let store = ModelStore::new(app_config);
    let unifier = LayoutUnifier::from_config(store.config().layout());
    let mut commits = Vec::new();

    let mut session = store.begin().await;
    let seed = scenario.prepare(&mut session)?;
    commits.push(session.commit());

    let cancel = Arc::new(CancellationSource::new());
    let interrupt = {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling expansion");
                cancel.cancel();
            }
        })
    };

    let (sender, mut receiver) = mpsc::unbounded_channel::<ExpansionProgress>();
    let progress = tokio::spawn(async move {
        let mut reports = 0;
        while let Some(progress) = receiver.recv().await {
            info!(
                node_id:? = progress.current,
                expanded = progress.expanded,
                pending = progress.pending;
                "Expanding"
            );
            reports += 1;
        }
        reports
    });

    let expansion = store
        .extend_with_related(
            &scenario.request(seed),
            scenario.catalogue(),
            &DefaultPresentability,
            &cancel.token(),
            Some(&sender as &dyn ProgressReporter),
        )
        .await;
    drop(sender);
    interrupt.abort();
    let (outcome, change) = expansion?;
    commits.push(change);

    match progress.await {
        Ok(reports) => info!(reports; "Expansion finished"),
        Err(err) => warn!(err:%; "Progress logger failed"),
    }

    let mut pruned = 0;
    if scenario.expand().prune_redundant {
        let mut session = store.begin().await;
        pruned = session.hide_redundant_connectors().len();
        commits.push(session.commit());
    }

    let snapshot = store.snapshot();
    let layout = row_layout(snapshot.diagram(), &unifier, DEFAULT_SPACING);
    let change = store.apply_layout(&layout).await?;
    let snapshot = Arc::clone(&change.new);
    commits.push(change);

    let report = Report {
        scenario: &args.input,
        snapshot: &snapshot,
        outcome: &outcome,
        commits: &commits,
        pruned,
    };
    fs::write(&args.output, report.to_string())?;

    info!(
        output_file = args.output,
        revision = snapshot.revision();
        "Report written"
    );
    Ok(())
}
