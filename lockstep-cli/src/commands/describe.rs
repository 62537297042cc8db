//! Show each walker's cycle descriptor.

use anyhow::{Context, Result};
use lockstep_core::{CycleDescriptor, Solver};
use lockstep_types::MapDocument;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::load_map;
use crate::config::Config;

/// One walker's analysis.
#[derive(Debug, Clone, Serialize)]
pub struct WalkerReport {
    /// Start node name.
    pub start: String,
    /// The walker's accepting steps.
    pub descriptor: CycleDescriptor,
    /// The first few accepting steps.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preview: Vec<u64>,
}

/// Analyse every selected walker, listing up to `preview` accepting steps each.
pub fn reports(doc: &MapDocument, config: &Config, preview: usize) -> Result<Vec<WalkerReport>> {
    let graph = doc
        .graph(&config.walkers.accept)
        .context("Invalid graph")?;
    let starts = graph.select(&config.walkers.start);
    let descriptors = Solver::new(&graph, doc.tape())
        .with_detector(config.analysis.detector)
        .with_parallel(config.analysis.parallel)
        .describe(&starts)?;

    Ok(starts
        .iter()
        .zip(descriptors)
        .map(|(&start, descriptor)| WalkerReport {
            start: graph.name(start).unwrap_or("?").to_string(),
            preview: descriptor.accepted_until(u64::MAX).take(preview).collect(),
            descriptor,
        })
        .collect())
}

impl fmt::Display for WalkerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.descriptor;
        writeln!(f, "{}:", self.start)?;
        writeln!(
            f,
            "  tail:  {} steps, accepting at {:?}",
            d.tail_length(),
            d.tail_accepting_steps()
        )?;
        writeln!(
            f,
            "  cycle: {} steps, accepting at offsets {:?}",
            d.cycle_length(),
            d.cycle_accepting_offsets()
        )?;
        if d.is_never() {
            writeln!(f, "  never accepting")?;
        } else if !self.preview.is_empty() {
            writeln!(f, "  first: {:?}", self.preview)?;
        }
        Ok(())
    }
}

/// Human-readable rendering, one block per walker.
pub fn render_text(reports: &[WalkerReport]) -> String {
    reports.iter().map(WalkerReport::to_string).collect()
}

/// Run the describe command.
pub fn run(input: &Path, config: &Config, json: bool, preview: usize) -> Result<()> {
    let doc = load_map(input)?;
    let reports = reports(&doc, config, preview)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print!("{}", render_text(&reports));
    }
    Ok(())
}
