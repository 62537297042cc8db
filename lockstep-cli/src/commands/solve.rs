//! Synchronize every selected walker.

use anyhow::{Context, Result};
use lockstep_core::{Outcome, Solver};
use lockstep_types::MapDocument;
use std::path::Path;

use super::load_map;
use crate::config::Config;

/// Compute the first step at which every start node's walker is accepting.
pub fn outcome(doc: &MapDocument, config: &Config) -> Result<Outcome> {
    let graph = doc
        .graph(&config.walkers.accept)
        .context("Invalid graph")?;
    let starts = graph.select(&config.walkers.start);
    tracing::debug!(
        "{} nodes, {} accepting, {} walkers, tape length {}",
        graph.len(),
        graph.accepting_count(),
        starts.len(),
        doc.tape().len()
    );

    let outcome = Solver::new(&graph, doc.tape())
        .with_detector(config.analysis.detector)
        .with_parallel(config.analysis.parallel)
        .solve(&starts)?;
    Ok(outcome)
}

/// Run the solve command.
pub fn run(input: &Path, config: &Config) -> Result<()> {
    let doc = load_map(input)?;
    println!("{}", outcome(&doc, config)?);
    Ok(())
}
