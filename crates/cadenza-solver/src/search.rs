//! Depth-first search over constraint spaces
//!
//! The engine keeps an explicit stack of spaces. Each step pops a space,
//! propagates it to fixed point, and either discards it (failure), returns
//! it (no choice left — a solution), or splits it into the two alternatives
//! of the next branching choice. Exhaustion and stopping are ordinary
//! outcomes; the caller decides what a timeout means.

use crate::space::{Space, SpaceStatus};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Why the engine stopped before exhausting the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The wall-clock deadline passed
    Deadline,
    /// The node budget ran out
    NodeLimit,
}

/// Outcome of one `next()` call
#[derive(Debug)]
pub enum EngineOutcome {
    /// A fully propagated space with no open choice
    Solution(Box<Space>),
    /// The whole tree has been explored
    Exhausted,
    /// The engine hit a stop condition first
    Stopped(StopReason),
}

/// Counters describing an engine run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes popped and propagated
    pub nodes: u64,
    /// Nodes discarded after a wipeout
    pub failures: u64,
    /// Solutions returned so far
    pub solutions: u64,
    /// Deepest stack seen
    pub max_depth: usize,
}

/// Depth-first engine with space cloning.
#[derive(Debug)]
pub struct DfsEngine {
    stack: Vec<Space>,
    stats: SearchStats,
    deadline: Option<Instant>,
    node_limit: u64,
}

impl DfsEngine {
    /// An engine rooted at `space`, with the default node budget
    pub fn new(space: Space) -> Self {
        DfsEngine {
            stack: vec![space],
            stats: SearchStats::default(),
            deadline: None,
            node_limit: cadenza_config::SEARCH.node_limit,
        }
    }

    /// Stop once the wall clock reaches `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop after exploring `limit` nodes
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = limit;
        self
    }

    /// Statistics for the run so far
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Search for the next solution
    pub fn next(&mut self) -> EngineOutcome {
        loop {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    debug!(
                        "search stopped at deadline after {} nodes ({} failures)",
                        self.stats.nodes, self.stats.failures
                    );
                    return EngineOutcome::Stopped(StopReason::Deadline);
                }
            }
            if self.stats.nodes >= self.node_limit {
                debug!("search stopped at node limit {}", self.node_limit);
                return EngineOutcome::Stopped(StopReason::NodeLimit);
            }

            let Some(mut space) = self.stack.pop() else {
                debug!(
                    "search exhausted after {} nodes ({} failures)",
                    self.stats.nodes, self.stats.failures
                );
                return EngineOutcome::Exhausted;
            };
            self.stats.nodes += 1;

            if space.status() == SpaceStatus::Failed {
                self.stats.failures += 1;
                trace!("node {} failed", self.stats.nodes);
                continue;
            }

            match space.choose() {
                None => {
                    self.stats.solutions += 1;
                    debug!(
                        "solution {} found after {} nodes ({} failures)",
                        self.stats.solutions, self.stats.nodes, self.stats.failures
                    );
                    return EngineOutcome::Solution(Box::new(space));
                }
                Some(choice) => {
                    trace!("branching on {} = {}", choice.var, choice.value);
                    let mut right = space.clone();
                    right.commit_exclude(choice);
                    space.commit_assign(choice);
                    self.stack.push(right);
                    self.stack.push(space);
                    self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brancher::{ValSel, VarSel};
    use crate::literal::Lit;
    use std::time::Duration;

    /// Three variables, pairwise distinct, two values each: unsatisfiable
    fn pigeonhole() -> Space {
        let mut s = Space::new();
        let vars: Vec<_> = (0..3).map(|_| s.new_var(0, 1).unwrap()).collect();
        for i in 0..vars.len() {
            for j in i + 1..vars.len() {
                s.post_lit(Lit::VarNe(vars[i], vars[j])).unwrap();
            }
        }
        s.branch(vars, VarSel::SmallestDomain, ValSel::Min).unwrap();
        s
    }

    #[test]
    fn test_finds_a_solution() {
        let mut s = Space::new();
        let x = s.new_var(0, 3).unwrap();
        let y = s.new_var(0, 3).unwrap();
        s.post_lit(Lit::VarNe(x, y)).unwrap();
        s.post_lit(Lit::Ge(y, 2)).unwrap();
        s.branch(vec![x, y], VarSel::SmallestDomain, ValSel::Min)
            .unwrap();
        let mut engine = DfsEngine::new(s);
        match engine.next() {
            EngineOutcome::Solution(sol) => {
                assert!(sol.is_fully_assigned());
                assert_ne!(sol.value(x), sol.value(y));
                assert!(sol.value(y).unwrap() >= 2);
            }
            other => panic!("expected a solution, got {other:?}"),
        }
    }

    #[test]
    fn test_unsat_is_exhausted() {
        let mut engine = DfsEngine::new(pigeonhole());
        assert!(matches!(engine.next(), EngineOutcome::Exhausted));
        assert!(engine.stats().failures > 0);
        assert_eq!(engine.stats().solutions, 0);
    }

    #[test]
    fn test_enumeration_continues_after_a_solution() {
        let mut s = Space::new();
        let x = s.new_var(0, 2).unwrap();
        s.branch(vec![x], VarSel::SmallestDomain, ValSel::Min)
            .unwrap();
        let mut engine = DfsEngine::new(s);
        let mut seen = Vec::new();
        while let EngineOutcome::Solution(sol) = engine.next() {
            seen.push(sol.value(x).unwrap());
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_node_limit_stops() {
        let mut engine = DfsEngine::new(pigeonhole()).with_node_limit(2);
        assert!(matches!(
            engine.next(),
            EngineOutcome::Stopped(StopReason::NodeLimit)
        ));
    }

    #[test]
    fn test_deadline_stops() {
        let deadline = Instant::now() - Duration::from_millis(1);
        let mut engine = DfsEngine::new(pigeonhole()).with_deadline(deadline);
        assert!(matches!(
            engine.next(),
            EngineOutcome::Stopped(StopReason::Deadline)
        ));
    }

    #[test]
    fn test_first_solution_is_deterministic_per_seed() {
        let build = |seed: u64| {
            let mut s = Space::with_seed(seed);
            let vars: Vec<_> = (0..4).map(|_| s.new_var(0, 9).unwrap()).collect();
            for w in vars.windows(2) {
                s.post_lit(Lit::VarNe(w[0], w[1])).unwrap();
            }
            s.branch(vars, VarSel::SmallestDomain, ValSel::Random)
                .unwrap();
            s
        };
        let solve = |seed: u64| {
            let mut engine = DfsEngine::new(build(seed));
            match engine.next() {
                EngineOutcome::Solution(sol) => {
                    (0..4).map(|i| sol.value(crate::var::IntVar::from_index(i)).unwrap())
                        .collect::<Vec<_>>()
                }
                other => panic!("expected a solution, got {other:?}"),
            }
        };
        assert_eq!(solve(11), solve(11));
        assert_eq!(solve(99), solve(99));
    }
}
