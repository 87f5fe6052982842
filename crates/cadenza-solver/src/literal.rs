//! Atomic relations over variables, the building blocks of clauses
//!
//! Every reified rule of the harmonic model compiles down to a disjunction
//! of these literals; the clause propagator's unit rule then provides the
//! implication machinery the model needs without auxiliary 0/1 variables.

use crate::domain::Domain;
use crate::var::IntVar;
use smallvec::SmallVec;

/// Truth status of a literal against the current domains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitStatus {
    /// Holds under every remaining assignment
    Entailed,
    /// Holds under no remaining assignment
    Disentailed,
    /// Still undecided
    Unknown,
}

/// An atomic relation over one or two finite-domain variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lit {
    /// `v = c`
    Eq(IntVar, i32),
    /// `v ≠ c`
    Ne(IntVar, i32),
    /// `v ≤ c`
    Le(IntVar, i32),
    /// `v ≥ c`
    Ge(IntVar, i32),
    /// `v ∈ values`
    In(IntVar, SmallVec<[i32; 4]>),
    /// `v ∉ values`
    NotIn(IntVar, SmallVec<[i32; 4]>),
    /// `x = y`
    VarEq(IntVar, IntVar),
    /// `x ≠ y`
    VarNe(IntVar, IntVar),
    /// `x ≡ y + delta (mod modulus)`
    VarEqShiftMod {
        x: IntVar,
        y: IntVar,
        delta: i32,
        modulus: i32,
    },
}

fn congruent(a: i32, b: i32, delta: i32, modulus: i32) -> bool {
    (a - b - delta).rem_euclid(modulus) == 0
}

impl Lit {
    /// The variables this literal watches
    pub fn vars(&self) -> SmallVec<[IntVar; 2]> {
        match *self {
            Lit::Eq(v, _) | Lit::Ne(v, _) | Lit::Le(v, _) | Lit::Ge(v, _) => {
                SmallVec::from_slice(&[v])
            }
            Lit::In(v, _) | Lit::NotIn(v, _) => SmallVec::from_slice(&[v]),
            Lit::VarEq(x, y) | Lit::VarNe(x, y) | Lit::VarEqShiftMod { x, y, .. } => {
                SmallVec::from_slice(&[x, y])
            }
        }
    }

    /// The logically opposite literal, where one exists
    pub fn negated(&self) -> Option<Lit> {
        match self {
            Lit::Eq(v, c) => Some(Lit::Ne(*v, *c)),
            Lit::Ne(v, c) => Some(Lit::Eq(*v, *c)),
            Lit::Le(v, c) => Some(Lit::Ge(*v, *c + 1)),
            Lit::Ge(v, c) => Some(Lit::Le(*v, *c - 1)),
            Lit::In(v, vals) => Some(Lit::NotIn(*v, vals.clone())),
            Lit::NotIn(v, vals) => Some(Lit::In(*v, vals.clone())),
            Lit::VarEq(x, y) => Some(Lit::VarNe(*x, *y)),
            Lit::VarNe(x, y) => Some(Lit::VarEq(*x, *y)),
            Lit::VarEqShiftMod { .. } => None,
        }
    }

    /// Truth status under the given domains
    pub fn status(&self, doms: &[Domain]) -> LitStatus {
        let dom = |v: IntVar| doms[v.index()];
        match self {
            Lit::Eq(v, c) => {
                let d = dom(*v);
                if !d.contains(*c) {
                    LitStatus::Disentailed
                } else if d.is_assigned() {
                    LitStatus::Entailed
                } else {
                    LitStatus::Unknown
                }
            }
            Lit::Ne(v, c) => {
                let d = dom(*v);
                if !d.contains(*c) {
                    LitStatus::Entailed
                } else if d.is_assigned() {
                    LitStatus::Disentailed
                } else {
                    LitStatus::Unknown
                }
            }
            Lit::Le(v, c) => {
                let d = dom(*v);
                match (d.min(), d.max()) {
                    (Some(min), Some(max)) => {
                        if max <= *c {
                            LitStatus::Entailed
                        } else if min > *c {
                            LitStatus::Disentailed
                        } else {
                            LitStatus::Unknown
                        }
                    }
                    _ => LitStatus::Disentailed,
                }
            }
            Lit::Ge(v, c) => {
                let d = dom(*v);
                match (d.min(), d.max()) {
                    (Some(min), Some(max)) => {
                        if min >= *c {
                            LitStatus::Entailed
                        } else if max < *c {
                            LitStatus::Disentailed
                        } else {
                            LitStatus::Unknown
                        }
                    }
                    _ => LitStatus::Disentailed,
                }
            }
            Lit::In(v, vals) => {
                let d = dom(*v);
                let mut any = false;
                let mut all = true;
                for val in d.iter() {
                    if vals.contains(&val) {
                        any = true;
                    } else {
                        all = false;
                    }
                }
                if !any {
                    LitStatus::Disentailed
                } else if all {
                    LitStatus::Entailed
                } else {
                    LitStatus::Unknown
                }
            }
            Lit::NotIn(v, vals) => match Lit::In(*v, vals.clone()).status(doms) {
                LitStatus::Entailed => LitStatus::Disentailed,
                LitStatus::Disentailed => LitStatus::Entailed,
                LitStatus::Unknown => LitStatus::Unknown,
            },
            Lit::VarEq(x, y) => {
                let (dx, dy) = (dom(*x), dom(*y));
                if dx.is_disjoint_from(dy) {
                    LitStatus::Disentailed
                } else if dx.is_assigned() && dy.is_assigned() && dx.value() == dy.value() {
                    LitStatus::Entailed
                } else {
                    LitStatus::Unknown
                }
            }
            Lit::VarNe(x, y) => {
                let (dx, dy) = (dom(*x), dom(*y));
                if dx.is_disjoint_from(dy) {
                    LitStatus::Entailed
                } else if dx.is_assigned() && dy.is_assigned() && dx.value() == dy.value() {
                    LitStatus::Disentailed
                } else {
                    LitStatus::Unknown
                }
            }
            Lit::VarEqShiftMod {
                x,
                y,
                delta,
                modulus,
            } => {
                let (dx, dy) = (dom(*x), dom(*y));
                let mut any = false;
                let mut all = true;
                for a in dx.iter() {
                    for b in dy.iter() {
                        if congruent(a, b, *delta, *modulus) {
                            any = true;
                        } else {
                            all = false;
                        }
                    }
                }
                if !any {
                    LitStatus::Disentailed
                } else if all {
                    LitStatus::Entailed
                } else {
                    LitStatus::Unknown
                }
            }
        }
    }

    /// Prune domains towards making this literal true; returns the set of
    /// variables whose domain changed, or `None` on wipeout.
    ///
    /// Enforcement is as strong as the literal allows: value literals become
    /// domain operations, variable pairs get arc-consistent filtering, and
    /// disequalities prune only once one side is assigned.
    pub fn enforce(&self, doms: &mut [Domain]) -> Option<SmallVec<[IntVar; 2]>> {
        let mut touched: SmallVec<[IntVar; 2]> = SmallVec::new();
        match self {
            Lit::Eq(v, c) => {
                if doms[v.index()].assign(*c) {
                    touched.push(*v);
                }
            }
            Lit::Ne(v, c) => {
                if doms[v.index()].remove(*c) {
                    touched.push(*v);
                }
            }
            Lit::Le(v, c) => {
                if doms[v.index()].remove_above(*c) {
                    touched.push(*v);
                }
            }
            Lit::Ge(v, c) => {
                if doms[v.index()].remove_below(*c) {
                    touched.push(*v);
                }
            }
            Lit::In(v, vals) => {
                if doms[v.index()].retain(|val| vals.contains(&val)) {
                    touched.push(*v);
                }
            }
            Lit::NotIn(v, vals) => {
                if doms[v.index()].retain(|val| !vals.contains(&val)) {
                    touched.push(*v);
                }
            }
            Lit::VarEq(x, y) => {
                let dy = doms[y.index()];
                if doms[x.index()].intersect(dy) {
                    touched.push(*x);
                }
                let dx = doms[x.index()];
                if doms[y.index()].intersect(dx) {
                    touched.push(*y);
                }
            }
            Lit::VarNe(x, y) => {
                if let Some(val) = doms[x.index()].value() {
                    if doms[y.index()].remove(val) {
                        touched.push(*y);
                    }
                }
                if let Some(val) = doms[y.index()].value() {
                    if doms[x.index()].remove(val) {
                        touched.push(*x);
                    }
                }
            }
            Lit::VarEqShiftMod {
                x,
                y,
                delta,
                modulus,
            } => {
                let dy = doms[y.index()];
                if doms[x.index()].retain(|a| dy.iter().any(|b| congruent(a, b, *delta, *modulus)))
                {
                    touched.push(*x);
                }
                let dx = doms[x.index()];
                if doms[y.index()].retain(|b| dx.iter().any(|a| congruent(a, b, *delta, *modulus)))
                {
                    touched.push(*y);
                }
            }
        }
        for v in &touched {
            if doms[v.index()].is_empty() {
                return None;
            }
        }
        Some(touched)
    }
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
    fn test_eq_status() {
        let d = doms(&[(0, 5)]);
        assert_eq!(Lit::Eq(v(0), 3).status(&d), LitStatus::Unknown);
        assert_eq!(Lit::Eq(v(0), 9).status(&d), LitStatus::Disentailed);
        let mut d = d;
        d[0].assign(3);
        assert_eq!(Lit::Eq(v(0), 3).status(&d), LitStatus::Entailed);
        assert_eq!(Lit::Ne(v(0), 3).status(&d), LitStatus::Disentailed);
    }

    #[test]
    fn test_bound_literals() {
        let d = doms(&[(2, 8)]);
        assert_eq!(Lit::Le(v(0), 8).status(&d), LitStatus::Entailed);
        assert_eq!(Lit::Le(v(0), 1).status(&d), LitStatus::Disentailed);
        assert_eq!(Lit::Ge(v(0), 5).status(&d), LitStatus::Unknown);
        let mut d = d;
        Lit::Ge(v(0), 5).enforce(&mut d).unwrap();
        assert_eq!(d[0].min(), Some(5));
    }

    #[test]
    fn test_in_literals() {
        let d = doms(&[(0, 3)]);
        let lit = Lit::In(v(0), SmallVec::from_slice(&[1, 2]));
        assert_eq!(lit.status(&d), LitStatus::Unknown);
        let mut d = d;
        lit.enforce(&mut d).unwrap();
        assert_eq!(d[0].iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(lit.status(&d), LitStatus::Entailed);
        assert_eq!(
            Lit::NotIn(v(0), SmallVec::from_slice(&[1, 2])).status(&d),
            LitStatus::Disentailed
        );
    }

    #[test]
    fn test_var_pair_literals() {
        let mut d = doms(&[(0, 3), (2, 6)]);
        assert_eq!(Lit::VarEq(v(0), v(1)).status(&d), LitStatus::Unknown);
        Lit::VarEq(v(0), v(1)).enforce(&mut d).unwrap();
        assert_eq!(d[0].iter().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(d[1].iter().collect::<Vec<_>>(), vec![2, 3]);

        let mut d = doms(&[(0, 1), (5, 6)]);
        assert_eq!(Lit::VarEq(v(0), v(1)).status(&d), LitStatus::Disentailed);
        assert_eq!(Lit::VarNe(v(0), v(1)).status(&d), LitStatus::Entailed);
        d[0].assign(0);
        d[1] = Domain::interval(0, 3).unwrap();
        Lit::VarNe(v(0), v(1)).enforce(&mut d).unwrap();
        assert!(!d[1].contains(0));
    }

    #[test]
    fn test_shift_mod_literal() {
        // x = (y + 1) mod 7 over bass degrees
        let lit = Lit::VarEqShiftMod {
            x: v(0),
            y: v(1),
            delta: 1,
            modulus: 7,
        };
        let mut d = doms(&[(0, 6), (0, 6)]);
        d[1].assign(6);
        lit.enforce(&mut d).unwrap();
        assert_eq!(d[0].value(), Some(0)); // wraps around

        let mut d = doms(&[(0, 6), (0, 6)]);
        d[0].assign(3);
        d[1].assign(2);
        assert_eq!(lit.status(&d), LitStatus::Entailed);
        d[1].assign(2);
        d[0] = Domain::interval(0, 6).unwrap();
        d[0].assign(5);
        assert_eq!(lit.status(&d), LitStatus::Disentailed);
    }

    #[test]
    fn test_negation_round_trip() {
        let lits = [
            Lit::Eq(v(0), 2),
            Lit::Le(v(0), 4),
            Lit::Ge(v(0), 1),
            Lit::In(v(0), SmallVec::from_slice(&[1, 2])),
            Lit::VarEq(v(0), v(1)),
        ];
        for lit in lits {
            let neg = lit.negated().unwrap();
            assert_eq!(neg.negated().unwrap(), lit);
        }
        let modlit = Lit::VarEqShiftMod {
            x: v(0),
            y: v(1),
            delta: 1,
            modulus: 7,
        };
        assert!(modlit.negated().is_none());
    }

    #[test]
    fn test_enforce_wipeout() {
        let mut d = doms(&[(0, 3)]);
        assert!(Lit::Eq(v(0), 9).enforce(&mut d).is_none());
    }
}
