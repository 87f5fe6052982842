//! Branching strategies
//!
//! A brancher owns an ordered set of variables and describes how to pick the
//! next one to label and which value to try first. Branchers fire in posting
//! order: the harmonic model labels chord degrees section by section before
//! it touches states and qualities.

use crate::domain::Domain;
use crate::var::IntVar;
use rand::rngs::StdRng;
use rand::Rng;

/// Variable selection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSel {
    /// First-fail: the unassigned variable with the fewest values left,
    /// ties broken by position
    SmallestDomain,
    /// Leftmost unassigned variable
    InOrder,
}

/// Value selection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValSel {
    /// Smallest value first
    Min,
    /// Uniformly random value, drawn from the space's seeded generator
    Random,
}

/// A labelling directive over a set of variables.
#[derive(Debug, Clone)]
pub struct Brancher {
    vars: Vec<IntVar>,
    var_sel: VarSel,
    val_sel: ValSel,
}

impl Brancher {
    /// A new brancher over `vars`
    pub fn new(vars: Vec<IntVar>, var_sel: VarSel, val_sel: ValSel) -> Self {
        Brancher {
            vars,
            var_sel,
            val_sel,
        }
    }

    /// Pick the next variable and value, or `None` when every variable of
    /// this brancher is already assigned
    pub fn choose(&self, doms: &[Domain], rng: &mut StdRng) -> Option<(IntVar, i32)> {
        let var = match self.var_sel {
            VarSel::SmallestDomain => self
                .vars
                .iter()
                .copied()
                .filter(|v| !doms[v.index()].is_assigned())
                .min_by_key(|v| doms[v.index()].size()),
            VarSel::InOrder => self
                .vars
                .iter()
                .copied()
                .find(|v| !doms[v.index()].is_assigned()),
        }?;
        let dom = doms[var.index()];
        let value = match self.val_sel {
            ValSel::Min => dom.min()?,
            ValSel::Random => dom.nth(rng.gen_range(0..dom.size()))?,
        };
        Some((var, value))
    }
}
