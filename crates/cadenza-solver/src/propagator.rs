//! Propagators
//!
//! Four propagator shapes cover the whole harmonic model:
//!
//! - [`Propagator::Element`] — `table[index] = value` for a constant table,
//!   a variable index and a variable or constant result;
//! - [`Propagator::Element2d`] — `table[row * cols + col] = value`, the
//!   element-over-an-arithmetic-index form every rule-table lookup needs
//!   (and, with a constant result of 1, a binary extensional constraint);
//! - [`Propagator::Clause`] — a disjunction of [`Lit`]s with unit
//!   propagation, the compilation target of all reified implications;
//! - [`Propagator::Sum`] — `lo ≤ Σ vars ≤ hi` with bounds reasoning, used
//!   for the chromatic and seventh counters.
//!
//! Propagators are immutable descriptions; all mutable search state lives in
//! the domain store. Each `propagate` call reports the variables it touched
//! so the space can wake the propagators subscribed to them.

use crate::domain::Domain;
use crate::literal::{Lit, LitStatus};
use crate::var::IntVar;
use smallvec::SmallVec;
use std::sync::Arc;

/// Result position of an element constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A variable result
    Var(IntVar),
    /// A fixed result
    Const(i32),
}

/// Outcome of one propagation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropOutcome {
    /// Domains are consistent with this propagator for now
    AtFixpoint { touched: SmallVec<[IntVar; 4]> },
    /// The propagator holds under every remaining assignment
    Subsumed { touched: SmallVec<[IntVar; 4]> },
    /// Some domain was wiped out
    Failed,
}

/// A constraint posted on a space.
#[derive(Debug, Clone)]
pub enum Propagator {
    /// `table[index] = value`
    Element {
        table: Arc<Vec<i32>>,
        index: IntVar,
        value: Operand,
    },
    /// `table[row * cols + col] = value`
    Element2d {
        table: Arc<Vec<i32>>,
        cols: usize,
        row: IntVar,
        col: IntVar,
        value: Operand,
    },
    /// `lit₁ ∨ lit₂ ∨ …`
    Clause { lits: SmallVec<[Lit; 4]> },
    /// `lo ≤ Σ vars ≤ hi`
    Sum {
        vars: Arc<Vec<IntVar>>,
        lo: i32,
        hi: i32,
    },
}

impl Propagator {
    /// Variables whose domain changes must wake this propagator
    pub fn watched_vars(&self) -> Vec<IntVar> {
        match self {
            Propagator::Element { index, value, .. } => {
                let mut vars = vec![*index];
                if let Operand::Var(v) = value {
                    vars.push(*v);
                }
                vars
            }
            Propagator::Element2d {
                row, col, value, ..
            } => {
                let mut vars = vec![*row, *col];
                if let Operand::Var(v) = value {
                    vars.push(*v);
                }
                vars
            }
            Propagator::Clause { lits } => {
                let mut vars: Vec<IntVar> = lits.iter().flat_map(|l| l.vars()).collect();
                vars.sort_unstable();
                vars.dedup();
                vars
            }
            Propagator::Sum { vars, .. } => vars.as_ref().clone(),
        }
    }

    /// Run this propagator against the domain store
    pub fn propagate(&self, doms: &mut [Domain]) -> PropOutcome {
        match self {
            Propagator::Element {
                table,
                index,
                value,
            } => propagate_element(table, *index, *value, doms),
            Propagator::Element2d {
                table,
                cols,
                row,
                col,
                value,
            } => propagate_element2d(table, *cols, *row, *col, *value, doms),
            Propagator::Clause { lits } => propagate_clause(lits, doms),
            Propagator::Sum { vars, lo, hi } => propagate_sum(vars, *lo, *hi, doms),
        }
    }
}

fn value_domain(value: Operand, doms: &[Domain]) -> ValueView {
    match value {
        Operand::Var(v) => ValueView::Dom(doms[v.index()]),
        Operand::Const(c) => ValueView::Const(c),
    }
}

enum ValueView {
    Dom(Domain),
    Const(i32),
}

impl ValueView {
    fn accepts(&self, v: i32) -> bool {
        match self {
            ValueView::Dom(d) => d.contains(v),
            ValueView::Const(c) => *c == v,
        }
    }
}

fn finish(
    touched: SmallVec<[IntVar; 4]>,
    doms: &[Domain],
    subsumed: bool,
) -> PropOutcome {
    if touched.iter().any(|v| doms[v.index()].is_empty()) {
        PropOutcome::Failed
    } else if subsumed {
        PropOutcome::Subsumed { touched }
    } else {
        PropOutcome::AtFixpoint { touched }
    }
}

fn propagate_element(
    table: &[i32],
    index: IntVar,
    value: Operand,
    doms: &mut [Domain],
) -> PropOutcome {
    let mut touched: SmallVec<[IntVar; 4]> = SmallVec::new();

    let view = value_domain(value, doms);
    if doms[index.index()].retain(|i| {
        (0..table.len() as i32).contains(&i) && view.accepts(table[i as usize])
    }) {
        touched.push(index);
    }
    if doms[index.index()].is_empty() {
        return PropOutcome::Failed;
    }

    if let Operand::Var(v) = value {
        let idx_dom = doms[index.index()];
        if doms[v.index()].retain(|val| idx_dom.iter().any(|i| table[i as usize] == val)) {
            touched.push(v);
        }
    }

    let subsumed = doms[index.index()].is_assigned()
        && match value {
            Operand::Var(v) => doms[v.index()].is_assigned(),
            Operand::Const(_) => true,
        };
    finish(touched, doms, subsumed)
}

fn propagate_element2d(
    table: &[i32],
    cols: usize,
    row: IntVar,
    col: IntVar,
    value: Operand,
    doms: &mut [Domain],
) -> PropOutcome {
    let mut touched: SmallVec<[IntVar; 4]> = SmallVec::new();
    let rows = table.len() / cols;
    let cell = |r: i32, c: i32| -> Option<i32> {
        ((0..rows as i32).contains(&r) && (0..cols as i32).contains(&c))
            .then(|| table[r as usize * cols + c as usize])
    };

    let view = value_domain(value, doms);
    let col_dom = doms[col.index()];
    if doms[row.index()].retain(|r| {
        col_dom
            .iter()
            .any(|c| cell(r, c).is_some_and(|val| view.accepts(val)))
    }) {
        touched.push(row);
    }
    if doms[row.index()].is_empty() {
        return PropOutcome::Failed;
    }

    let view = value_domain(value, doms);
    let row_dom = doms[row.index()];
    if doms[col.index()].retain(|c| {
        row_dom
            .iter()
            .any(|r| cell(r, c).is_some_and(|val| view.accepts(val)))
    }) {
        touched.push(col);
    }
    if doms[col.index()].is_empty() {
        return PropOutcome::Failed;
    }

    if let Operand::Var(v) = value {
        let row_dom = doms[row.index()];
        let col_dom = doms[col.index()];
        if doms[v.index()].retain(|val| {
            row_dom
                .iter()
                .any(|r| col_dom.iter().any(|c| cell(r, c) == Some(val)))
        }) {
            touched.push(v);
        }
    }

    let subsumed = doms[row.index()].is_assigned()
        && doms[col.index()].is_assigned()
        && match value {
            Operand::Var(v) => doms[v.index()].is_assigned(),
            Operand::Const(_) => true,
        };
    finish(touched, doms, subsumed)
}

fn propagate_clause(lits: &[Lit], doms: &mut [Domain]) -> PropOutcome {
    let mut open: SmallVec<[&Lit; 4]> = SmallVec::new();
    for lit in lits {
        match lit.status(doms) {
            LitStatus::Entailed => {
                return PropOutcome::Subsumed {
                    touched: SmallVec::new(),
                }
            }
            LitStatus::Unknown => open.push(lit),
            LitStatus::Disentailed => {}
        }
    }
    match open.len() {
        0 => PropOutcome::Failed,
        1 => {
            // unit: the last open literal must hold
            let lit = open[0];
            match lit.enforce(doms) {
                None => PropOutcome::Failed,
                Some(touched) => {
                    let touched: SmallVec<[IntVar; 4]> = touched.into_iter().collect();
                    let subsumed = lit.status(doms) == LitStatus::Entailed;
                    finish(touched, doms, subsumed)
                }
            }
        }
        _ => PropOutcome::AtFixpoint {
            touched: SmallVec::new(),
        },
    }
}

fn propagate_sum(vars: &[IntVar], lo: i32, hi: i32, doms: &mut [Domain]) -> PropOutcome {
    let mut sum_min = 0i64;
    let mut sum_max = 0i64;
    for v in vars {
        let d = doms[v.index()];
        match (d.min(), d.max()) {
            (Some(min), Some(max)) => {
                sum_min += i64::from(min);
                sum_max += i64::from(max);
            }
            _ => return PropOutcome::Failed,
        }
    }
    if sum_min > i64::from(hi) || sum_max < i64::from(lo) {
        return PropOutcome::Failed;
    }

    let mut touched: SmallVec<[IntVar; 4]> = SmallVec::new();
    for v in vars {
        let d = doms[v.index()];
        let (min, max) = (d.min().unwrap_or(0), d.max().unwrap_or(0));
        // bounds the variable may still take given the others' bounds
        let upper = i64::from(hi) - (sum_min - i64::from(min));
        let lower = i64::from(lo) - (sum_max - i64::from(max));
        let mut changed = false;
        if upper < i64::from(max) {
            changed |= doms[v.index()].remove_above(upper as i32);
        }
        if lower > i64::from(min) {
            changed |= doms[v.index()].remove_below(lower as i32);
        }
        if changed {
            touched.push(*v);
            if doms[v.index()].is_empty() {
                return PropOutcome::Failed;
            }
        }
    }

    let subsumed = vars.iter().all(|v| doms[v.index()].is_assigned());
    finish(touched, doms, subsumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverResult;

    fn doms(specs: &[(i32, i32)]) -> Vec<Domain> {
        specs
            .iter()
            .map(|&(lo, hi)| Domain::interval(lo, hi))
            .collect::<SolverResult<_>>()
            .unwrap()
    }

    fn v(i: usize) -> IntVar {
        IntVar::from_index(i)
    }

    #[test]
    fn test_element_prunes_both_sides() {
        // table: [10, 20, 30, 20]
        let table = Arc::new(vec![10, 20, 30, 20]);
        let mut d = doms(&[(0, 3), (0, 50)]);
        let p = Propagator::Element {
            table,
            index: v(0),
            value: Operand::Var(v(1)),
        };
        p.propagate(&mut d);
        assert_eq!(d[1].iter().collect::<Vec<_>>(), vec![10, 20, 30]);

        d[1].retain(|val| val == 20);
        p.propagate(&mut d);
        assert_eq!(d[0].iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_element_const_value() {
        // transition-style row lookup: keep indices whose cell is 1
        let table = Arc::new(vec![1, 0, 0, 1, 1]);
        let mut d = doms(&[(0, 4)]);
        let p = Propagator::Element {
            table,
            index: v(0),
            value: Operand::Const(1),
        };
        p.propagate(&mut d);
        assert_eq!(d[0].iter().collect::<Vec<_>>(), vec![0, 3, 4]);
    }

    #[test]
    fn test_element_out_of_range_fails() {
        let table = Arc::new(vec![7]);
        let mut d = doms(&[(1, 3), (0, 10)]);
        let p = Propagator::Element {
            table,
            index: v(0),
            value: Operand::Var(v(1)),
        };
        assert_eq!(p.propagate(&mut d), PropOutcome::Failed);
    }

    #[test]
    fn test_element2d_binary_table() {
        // 2x3 table, allowed pairs have cell 1
        let table = Arc::new(vec![1, 0, 0, 0, 0, 1]);
        let mut d = doms(&[(0, 1), (0, 2)]);
        let p = Propagator::Element2d {
            table,
            cols: 3,
            row: v(0),
            col: v(1),
            value: Operand::Const(1),
        };
        p.propagate(&mut d);
        // both rows still feasible, but column 1 is not
        assert_eq!(d[1].iter().collect::<Vec<_>>(), vec![0, 2]);
        d[0].assign(1);
        let out = p.propagate(&mut d);
        assert_eq!(d[1].value(), Some(2));
        assert!(matches!(out, PropOutcome::Subsumed { .. }));
    }

    #[test]
    fn test_element2d_value_var() {
        // bass-table-style lookup
        let table = Arc::new(vec![0, 2, 4, 1, 3, 5]);
        let mut d = doms(&[(0, 1), (0, 2), (0, 6)]);
        let p = Propagator::Element2d {
            table: Arc::clone(&table),
            cols: 3,
            row: v(0),
            col: v(1),
            value: Operand::Var(v(2)),
        };
        p.propagate(&mut d);
        assert_eq!(d[2].iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        d[2].retain(|val| val == 5);
        p.propagate(&mut d);
        assert_eq!(d[0].value(), Some(1));
        assert_eq!(d[1].value(), Some(2));
    }

    #[test]
    fn test_clause_unit_propagation() {
        // (x = 2) ∨ (y = 0): kill the first disjunct, the second must fire
        let mut d = doms(&[(0, 4), (0, 4)]);
        let p = Propagator::Clause {
            lits: SmallVec::from_vec(vec![Lit::Eq(v(0), 2), Lit::Eq(v(1), 0)]),
        };
        d[0].remove(2);
        let out = p.propagate(&mut d);
        assert_eq!(d[1].value(), Some(0));
        assert!(matches!(out, PropOutcome::Subsumed { .. }));
    }

    #[test]
    fn test_clause_all_disentailed_fails() {
        let mut d = doms(&[(0, 4)]);
        d[0].assign(1);
        let p = Propagator::Clause {
            lits: SmallVec::from_vec(vec![Lit::Eq(v(0), 2), Lit::Eq(v(0), 3)]),
        };
        assert_eq!(p.propagate(&mut d), PropOutcome::Failed);
    }

    #[test]
    fn test_clause_entailed_is_subsumed() {
        let mut d = doms(&[(0, 4)]);
        d[0].assign(2);
        let p = Propagator::Clause {
            lits: SmallVec::from_vec(vec![Lit::Eq(v(0), 2), Lit::Eq(v(0), 3)]),
        };
        assert!(matches!(p.propagate(&mut d), PropOutcome::Subsumed { .. }));
    }

    #[test]
    fn test_sum_bounds() {
        // three booleans, sum in [2, 2]
        let mut d = doms(&[(0, 1), (0, 1), (0, 1)]);
        let p = Propagator::Sum {
            vars: Arc::new(vec![v(0), v(1), v(2)]),
            lo: 2,
            hi: 2,
        };
        p.propagate(&mut d);
        // nothing decided yet
        assert!(!d[0].is_assigned());
        d[0].assign(0);
        p.propagate(&mut d);
        // remaining two must both be 1
        assert_eq!(d[1].value(), Some(1));
        assert_eq!(d[2].value(), Some(1));
    }

    #[test]
    fn test_sum_infeasible_fails() {
        let mut d = doms(&[(0, 1), (0, 1)]);
        let p = Propagator::Sum {
            vars: Arc::new(vec![v(0), v(1)]),
            lo: 3,
            hi: 3,
        };
        assert_eq!(p.propagate(&mut d), PropOutcome::Failed);
    }
}
