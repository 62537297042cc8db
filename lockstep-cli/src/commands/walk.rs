//! Follow a single walker from one named node to another.

use anyhow::{Context, Result};
use lockstep_core::{Outcome, Solver};
use lockstep_types::{MapDocument, NodePattern};
use std::path::Path;

use super::load_map;
use crate::config::Config;

/// Steps needed to walk from `from` until first standing on `to`.
///
/// A one-walker synchronization: the target is the only accepting node.
pub fn outcome(doc: &MapDocument, from: &str, to: &str, config: &Config) -> Result<Outcome> {
    let graph = doc
        .graph(&NodePattern::Name(to.to_string()))
        .context("Invalid graph")?;
    let start = graph
        .lookup(from)
        .with_context(|| format!("Unknown start node {}", from))?;
    if graph.lookup(to).is_none() {
        anyhow::bail!("Unknown target node {}", to);
    }

    let outcome = Solver::new(&graph, doc.tape())
        .with_detector(config.analysis.detector)
        .with_parallel(false)
        .solve(&[start])?;
    Ok(outcome)
}

/// Run the walk command.
pub fn run(input: &Path, from: &str, to: &str, config: &Config) -> Result<()> {
    let doc = load_map(input)?;
    println!("{}", outcome(&doc, from, to, config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{SINGLE_WALKER, TWO_GHOSTS};

    #[test]
    fn aaa_to_zzz_takes_six_steps() {
        let doc = MapDocument::parse(SINGLE_WALKER).unwrap();
        let result = outcome(&doc, "AAA", "ZZZ", &Config::default()).unwrap();
        assert_eq!(result, Outcome::Synchronized(6));
    }

    #[test]
    fn unreachable_target_has_no_solution() {
        let doc = MapDocument::parse(TWO_GHOSTS).unwrap();
        let result = outcome(&doc, "11A", "22Z", &Config::default()).unwrap();
        assert_eq!(result, Outcome::NoSolution);
    }

    #[test]
    fn unknown_nodes_are_errors() {
        let doc = MapDocument::parse(SINGLE_WALKER).unwrap();
        let config = Config::default();
        assert!(outcome(&doc, "QQQ", "ZZZ", &config).is_err());
        assert!(outcome(&doc, "AAA", "QQQ", &config).is_err());
    }
}
