//! The solver driver
//!
//! Builds the model, runs depth-first search, and maps the engine outcome
//! onto the caller-facing [`SearchOutcome`]. Unsatisfiability and timeouts
//! come back as values; only configuration problems are errors.

use crate::error::HarmonyResult;
use crate::params::PieceParameters;
use crate::piece::TonalPiece;
use crate::solution::PieceSolution;
use cadenza_solver::{DfsEngine, EngineOutcome};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Knobs of a single generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Seed for the randomized degree branching; a fixed seed makes the
    /// first solution reproducible
    pub seed: u64,
    /// Wall-clock budget; `None` searches until exhaustion
    pub timeout: Option<Duration>,
    /// Upper bound on explored nodes
    pub node_limit: u64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            seed: cadenza_config::SEARCH.seed,
            timeout: None,
            node_limit: cadenza_config::SEARCH.node_limit,
        }
    }
}

impl SolveOptions {
    /// Options with the default timeout from the configuration crate
    pub fn with_default_timeout() -> Self {
        SolveOptions {
            timeout: Some(Duration::from_millis(
                cadenza_config::SEARCH.default_timeout_ms,
            )),
            ..SolveOptions::default()
        }
    }
}

/// Outcome of a generation run
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The first admissible progression found
    Solution(Box<PieceSolution>),
    /// The constraints admit no progression
    Unsatisfiable,
    /// The search stopped on its time or node budget before finding one
    Timeout,
}

impl SearchOutcome {
    /// The solution, if one was found
    pub fn solution(&self) -> Option<&PieceSolution> {
        match self {
            SearchOutcome::Solution(solution) => Some(solution),
            _ => None,
        }
    }
}

/// Generate a progression with default options
pub fn solve(params: &PieceParameters) -> HarmonyResult<SearchOutcome> {
    solve_with(params, &SolveOptions::default())
}

/// Generate a progression
pub fn solve_with(params: &PieceParameters, options: &SolveOptions) -> HarmonyResult<SearchOutcome> {
    let piece = TonalPiece::new(params, options.seed)?;
    let mut engine = DfsEngine::new(piece.space().clone()).with_node_limit(options.node_limit);
    if let Some(timeout) = options.timeout {
        engine = engine.with_deadline(Instant::now() + timeout);
    }
    debug!("searching: {params}");
    let outcome = engine.next();
    let stats = engine.stats();
    Ok(match outcome {
        EngineOutcome::Solution(space) => {
            info!(
                "solution found in {} nodes ({} failures)",
                stats.nodes, stats.failures
            );
            SearchOutcome::Solution(Box::new(piece.extract(&space, stats)))
        }
        EngineOutcome::Exhausted => {
            info!("no solution: search exhausted after {} nodes", stats.nodes);
            SearchOutcome::Unsatisfiable
        }
        EngineOutcome::Stopped(reason) => {
            info!("search stopped ({reason:?}) after {} nodes", stats.nodes);
            SearchOutcome::Timeout
        }
    })
}
