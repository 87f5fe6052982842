//! The constraint space: domain store, propagator network and branchers
//!
//! A [`Space`] is one node of the search tree. The propagator network is
//! immutable once search starts and shared between clones through `Arc`;
//! the domain store, the per-propagator subsumption flags and the branching
//! RNG are cloned deeply, which is all the state a backtrack needs to
//! restore. This mirrors the copy-and-commit discipline of space-based
//! constraint engines.

use crate::brancher::{Brancher, ValSel, VarSel};
use crate::domain::Domain;
use crate::error::{SolverError, SolverResult};
use crate::literal::Lit;
use crate::propagator::{Operand, PropOutcome, Propagator};
use crate::var::IntVar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use std::sync::Arc;

/// Result of propagating a space to fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceStatus {
    /// All propagators are at fixed point, no empty domain
    Stable,
    /// Some domain was wiped out; the node must be abandoned
    Failed,
}

/// A branching decision: try `var = value`, on backtrack `var ≠ value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// The variable to label
    pub var: IntVar,
    /// The value to try first
    pub value: i32,
}

/// A constraint-store snapshot: variables, constraints and branchers.
#[derive(Debug, Clone)]
pub struct Space {
    doms: Vec<Domain>,
    props: Arc<Vec<Propagator>>,
    /// var index -> propagator ids watching it
    subs: Arc<Vec<Vec<u32>>>,
    branchers: Arc<Vec<Brancher>>,
    /// per-propagator subsumption flags, grows with `props`
    disabled: Vec<bool>,
    /// propagators awaiting a run
    pending: Vec<u32>,
    queued: Vec<bool>,
    failed: bool,
    rng: StdRng,
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

impl Space {
    /// An empty space with the default seed
    pub fn new() -> Self {
        Self::with_seed(cadenza_config::SEARCH.seed)
    }

    /// An empty space whose random value selection uses `seed`
    pub fn with_seed(seed: u64) -> Self {
        Space {
            doms: Vec::new(),
            props: Arc::new(Vec::new()),
            subs: Arc::new(Vec::new()),
            branchers: Arc::new(Vec::new()),
            disabled: Vec::new(),
            pending: Vec::new(),
            queued: Vec::new(),
            failed: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Number of variables
    pub fn num_vars(&self) -> usize {
        self.doms.len()
    }

    /// Create a variable with the interval domain `[lo, hi]`
    pub fn new_var(&mut self, lo: i32, hi: i32) -> SolverResult<IntVar> {
        self.push_var(Domain::interval(lo, hi)?)
    }

    /// Create a variable holding exactly the given values
    pub fn new_var_values(&mut self, values: &[i32]) -> SolverResult<IntVar> {
        self.push_var(Domain::from_values(values)?)
    }

    fn push_var(&mut self, dom: Domain) -> SolverResult<IntVar> {
        let subs = Arc::get_mut(&mut self.subs).ok_or(SolverError::ModelFrozen)?;
        subs.push(Vec::new());
        self.doms.push(dom);
        Ok(IntVar::from_index(self.doms.len() - 1))
    }

    /// Current domain of a variable
    pub fn dom(&self, v: IntVar) -> Domain {
        self.doms[v.index()]
    }

    /// Assigned value of a variable, if any
    pub fn value(&self, v: IntVar) -> Option<i32> {
        self.doms[v.index()].value()
    }

    /// Whether every variable is assigned
    pub fn is_fully_assigned(&self) -> bool {
        self.doms.iter().all(|d| d.is_assigned())
    }

    /// Post a propagator
    pub fn post(&mut self, prop: Propagator) -> SolverResult<()> {
        let id = {
            let props = Arc::get_mut(&mut self.props).ok_or(SolverError::ModelFrozen)?;
            props.push(prop);
            (props.len() - 1) as u32
        };
        let watched = self.props[id as usize].watched_vars();
        let subs = Arc::get_mut(&mut self.subs).ok_or(SolverError::ModelFrozen)?;
        for v in watched {
            subs[v.index()].push(id);
        }
        self.disabled.push(false);
        self.queued.push(true);
        self.pending.push(id);
        Ok(())
    }

    /// Post `table[index] = value`
    pub fn post_element(
        &mut self,
        table: Vec<i32>,
        index: IntVar,
        value: Operand,
    ) -> SolverResult<()> {
        if table.is_empty() {
            return Err(SolverError::EmptyTable);
        }
        self.post(Propagator::Element {
            table: Arc::new(table),
            index,
            value,
        })
    }

    /// Post `table[row * cols + col] = value` over a row-major table
    pub fn post_element2d(
        &mut self,
        table: Vec<i32>,
        cols: usize,
        row: IntVar,
        col: IntVar,
        value: Operand,
    ) -> SolverResult<()> {
        if table.is_empty() || cols == 0 {
            return Err(SolverError::EmptyTable);
        }
        if table.len() % cols != 0 {
            return Err(SolverError::RaggedTable {
                len: table.len(),
                cols,
            });
        }
        self.post(Propagator::Element2d {
            table: Arc::new(table),
            cols,
            row,
            col,
            value,
        })
    }

    /// Post the disjunction `lits₁ ∨ lits₂ ∨ …`
    pub fn post_clause(&mut self, lits: Vec<Lit>) -> SolverResult<()> {
        if lits.is_empty() {
            return Err(SolverError::EmptyClause);
        }
        self.post(Propagator::Clause {
            lits: SmallVec::from_vec(lits),
        })
    }

    /// Post a single literal as a fact
    pub fn post_lit(&mut self, lit: Lit) -> SolverResult<()> {
        self.post_clause(vec![lit])
    }

    /// Post `conds₁ ∧ conds₂ ∧ … ⇒ cons₁ ∧ cons₂ ∧ …`
    ///
    /// Compiles to one clause per consequence literal; every condition must
    /// be negatable.
    pub fn post_implication(&mut self, conds: &[Lit], cons: &[Lit]) -> SolverResult<()> {
        let negated: Vec<Lit> = conds
            .iter()
            .map(|c| c.negated().ok_or(SolverError::NotNegatable))
            .collect::<SolverResult<_>>()?;
        for consequence in cons {
            let mut lits = negated.clone();
            lits.push(consequence.clone());
            self.post_clause(lits)?;
        }
        Ok(())
    }

    /// Post `conds₁ ∧ … ⇒ alt₁ ∨ alt₂ ∨ …` as a single clause
    pub fn post_implication_any(&mut self, conds: &[Lit], alts: &[Lit]) -> SolverResult<()> {
        let mut lits: Vec<Lit> = conds
            .iter()
            .map(|c| c.negated().ok_or(SolverError::NotNegatable))
            .collect::<SolverResult<_>>()?;
        lits.extend(alts.iter().cloned());
        self.post_clause(lits)
    }

    /// Post `lo ≤ Σ vars ≤ hi`
    pub fn post_sum(&mut self, vars: Vec<IntVar>, lo: i32, hi: i32) -> SolverResult<()> {
        self.post(Propagator::Sum {
            vars: Arc::new(vars),
            lo,
            hi,
        })
    }

    /// Append a brancher; branchers fire in posting order
    pub fn branch(&mut self, vars: Vec<IntVar>, var_sel: VarSel, val_sel: ValSel) -> SolverResult<()> {
        let branchers = Arc::get_mut(&mut self.branchers).ok_or(SolverError::ModelFrozen)?;
        branchers.push(Brancher::new(vars, var_sel, val_sel));
        Ok(())
    }

    fn schedule_var(&mut self, v: IntVar) {
        for idx in 0..self.subs[v.index()].len() {
            let p = self.subs[v.index()][idx];
            if !self.disabled[p as usize] && !self.queued[p as usize] {
                self.queued[p as usize] = true;
                self.pending.push(p);
            }
        }
    }

    /// Run propagation to fixed point
    pub fn status(&mut self) -> SpaceStatus {
        if self.failed {
            return SpaceStatus::Failed;
        }
        while let Some(p) = self.pending.pop() {
            self.queued[p as usize] = false;
            if self.disabled[p as usize] {
                continue;
            }
            let props = Arc::clone(&self.props);
            match props[p as usize].propagate(&mut self.doms) {
                PropOutcome::Failed => {
                    self.failed = true;
                    self.pending.clear();
                    self.queued.iter_mut().for_each(|q| *q = false);
                    return SpaceStatus::Failed;
                }
                PropOutcome::Subsumed { touched } => {
                    self.disabled[p as usize] = true;
                    for v in touched {
                        self.schedule_var(v);
                    }
                }
                PropOutcome::AtFixpoint { touched } => {
                    for v in touched {
                        self.schedule_var(v);
                    }
                }
            }
        }
        SpaceStatus::Stable
    }

    /// Next branching decision, or `None` when every brancher is done.
    ///
    /// Advances the space's RNG; call once per node, before cloning
    /// children, so both children observe the same generator state.
    pub fn choose(&mut self) -> Option<Choice> {
        let branchers = Arc::clone(&self.branchers);
        for b in branchers.iter() {
            if let Some((var, value)) = b.choose(&self.doms, &mut self.rng) {
                return Some(Choice { var, value });
            }
        }
        None
    }

    /// Commit the left alternative of a choice: `var = value`
    pub fn commit_assign(&mut self, choice: Choice) {
        if self.doms[choice.var.index()].assign(choice.value) {
            self.schedule_var(choice.var);
        }
        if self.doms[choice.var.index()].is_empty() {
            self.failed = true;
        }
    }

    /// Commit the right alternative of a choice: `var ≠ value`
    pub fn commit_exclude(&mut self, choice: Choice) {
        if self.doms[choice.var.index()].remove(choice.value) {
            self.schedule_var(choice.var);
        }
        if self.doms[choice.var.index()].is_empty() {
            self.failed = true;
        }
    }
}
