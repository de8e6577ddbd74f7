//! Incremental propagation over a shared graph
use {
    super::ModalImplicationGraph,
    crate::types::*,
    std::{fmt, sync::Arc},
};

/// A propagation session over a [`ModalImplicationGraph`].
///
/// It holds a model, the log of literals set since creation, and the number
/// of literals of each weak clause which aren't falsified yet.
/// `reset` undoes the log from its tail, so a `Visitor` can be rolled back
/// to any earlier length.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use yasa::{mig::*, solver::Solver, types::*};
/// let cnf = CNF::from_vec_i32(vec![vec![1, 2, 3], vec![-1, 4]]).unwrap();
/// let mut solver = Solver::instantiate(&Config::default(), &cnf);
/// let mig = Arc::new(MigBuilder::new(&cnf).build(&mut solver).unwrap());
/// let mut visitor = Visitor::new(mig);
/// assert!(visitor.propagate(&[-2, -3]).is_ok());
/// assert_eq!(visitor.added_literals(), &[-2, -3, 1, 4]);
/// assert!(visitor.is_contradiction(&[-4]));
/// visitor.reset(0);
/// assert!(visitor.added_literals().is_empty());
/// ```
#[derive(Clone)]
pub struct Visitor {
    mig: Arc<ModalImplicationGraph>,
    /// assigned literal of each var, or 0
    model: Vec<Lit>,
    /// literals set since creation, except core literals
    log: Vec<Lit>,
    /// the number of non-falsified literals of each weak clause
    counts: Vec<u32>,
    /// literals to be processed
    queue: Vec<Lit>,
}

impl fmt::Debug for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Visitor{:?}", self.log)
    }
}

impl Visitor {
    /// make a visitor with only core literals assigned.
    pub fn new(mig: Arc<ModalImplicationGraph>) -> Self {
        let mut model: Vec<Lit> = vec![0; mig.num_vars()];
        for l in mig.core_literals() {
            model[l.vi()] = *l;
        }
        let counts = mig
            .weak_clauses()
            .iter()
            .map(|c| c.len() as u32)
            .collect::<Vec<_>>();
        Visitor {
            mig,
            model,
            log: Vec::new(),
            counts,
            queue: Vec::new(),
        }
    }
    /// make a visitor and propagate `lits` in it.
    pub fn with_literals(
        mig: Arc<ModalImplicationGraph>,
        lits: &[Lit],
    ) -> Result<Self, Contradiction> {
        let mut visitor = Visitor::new(mig);
        visitor.propagate(lits)?;
        Ok(visitor)
    }
    pub fn mig(&self) -> &Arc<ModalImplicationGraph> {
        &self.mig
    }
    /// return the model: the assigned literal of each var, or 0.
    pub fn model(&self) -> &[Lit] {
        &self.model
    }
    /// return the literals set since creation, in order.
    pub fn added_literals(&self) -> &[Lit] {
        &self.log
    }
    pub fn num_added_literals(&self) -> usize {
        self.log.len()
    }
    /// return the number of assigned vars including core ones.
    pub fn num_assigned(&self) -> usize {
        self.log.len() + self.mig.core_literals().len()
    }
    /// return `true` if all vars are assigned.
    pub fn is_complete(&self) -> bool {
        self.num_assigned() == self.mig.num_vars()
    }
    /// return the assigned literal of the var of `lit`, or 0.
    #[inline]
    pub fn value(&self, lit: Lit) -> Lit {
        self.model[lit.vi()]
    }
    /// set `lits` and all literals implied by them. 0 is ignored.
    /// On a contradiction, the visitor is rolled back to the state before the call.
    pub fn propagate(&mut self, lits: &[Lit]) -> PropagationResult {
        let keep = self.log.len();
        for l in lits.iter().filter(|l| **l != 0) {
            let current = self.model[l.vi()];
            if current == *l {
                continue;
            }
            if current == -*l || self.assign_and_propagate(*l).is_err() {
                self.queue.clear();
                self.reset(keep);
                return Err(Contradiction);
            }
        }
        #[cfg(feature = "boundary_check")]
        self.check_counts();
        Ok(())
    }
    /// return `true` if `lits` can't be set together with the current literals.
    /// The visitor keeps its state in either case.
    pub fn is_contradiction(&mut self, lits: &[Lit]) -> bool {
        let keep = self.log.len();
        let result = self.propagate(lits).is_err();
        self.reset(keep);
        result
    }
    /// undo the literals set after the first `keep` ones.
    pub fn reset(&mut self, keep: usize) {
        while keep < self.log.len() {
            let Some(l) = self.log.pop() else {
                break;
            };
            for cid in self.mig.vertex(l).weak.iter() {
                self.counts[*cid] += 1;
            }
            self.model[l.vi()] = 0;
        }
        #[cfg(feature = "boundary_check")]
        self.check_counts();
    }
    /// return the number of non-falsified literals of each weak clause.
    pub fn clause_counts(&self) -> &[u32] {
        &self.counts
    }
    #[cfg(feature = "boundary_check")]
    fn check_counts(&self) {
        for (cid, c) in self.mig.clauses.iter().enumerate() {
            let n = c.iter().filter(|l| self.model[l.vi()] != -**l).count();
            assert_eq!(self.counts[cid] as usize, n, "broken count of clause #{cid}");
        }
    }
    fn assign(&mut self, lit: Lit) {
        debug_assert_eq!(self.model[lit.vi()], 0);
        self.model[lit.vi()] = lit;
        self.log.push(lit);
        for cid in self.mig.vertex(lit).weak.iter() {
            self.counts[*cid] -= 1;
        }
        self.queue.push(lit);
    }
    fn assign_and_propagate(&mut self, lit: Lit) -> PropagationResult {
        let mig = Arc::clone(&self.mig);
        self.assign(lit);
        while let Some(l) = self.queue.pop() {
            let vertex = mig.vertex(l);
            for s in vertex.strong.iter() {
                match self.model[s.vi()] {
                    0 => self.assign(*s),
                    v if v == *s => (),
                    _ => return Err(Contradiction),
                }
            }
            'next_clause: for cid in vertex.weak.iter() {
                if 1 < self.counts[*cid] {
                    continue;
                }
                let mut unit: Lit = 0;
                for k in mig.clauses[*cid].iter() {
                    match self.model[k.vi()] {
                        0 => unit = *k,
                        v if v == *k => continue 'next_clause,
                        _ => (),
                    }
                }
                if unit == 0 {
                    return Err(Contradiction);
                }
                self.assign(unit);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{mig::MigBuilder, solver::Solver},
    };

    fn mig(clauses: Vec<Vec<i32>>) -> Arc<ModalImplicationGraph> {
        let cnf = CNF::from_vec_i32(clauses).expect("valid cnf");
        let mut solver = Solver::instantiate(&Config::default(), &cnf);
        Arc::new(MigBuilder::new(&cnf).build(&mut solver).expect("satisfiable"))
    }

    #[test]
    fn test_weak_propagation() {
        let mig = mig(vec![vec![1, 2, 3], vec![-1, -2, 4, 5]]);
        let mut v = Visitor::new(mig);
        assert!(v.propagate(&[-1]).is_ok());
        assert_eq!(v.value(2), 0);
        assert!(v.propagate(&[-2]).is_ok());
        assert_eq!(v.value(3), 3);
        assert_eq!(v.added_literals(), &[-1, -2, 3]);
        v.reset(1);
        assert_eq!(v.model(), &[-1, 0, 0, 0, 0]);
        assert_eq!(v.clause_counts(), &[2, 4]);
        v.reset(0);
        assert!(v.propagate(&[1, 2, -4]).is_ok());
        assert_eq!(v.value(5), 5);
        assert_eq!(v.value(3), 0);
        assert_eq!(v.clause_counts(), &[3, 1]);
    }
    #[test]
    fn test_contradiction_rolls_back() {
        let mig = mig(vec![vec![-1, 2], vec![-2, 3], vec![-3, -4, 5], vec![1, 4, 6]]);
        let mut v = Visitor::new(mig);
        assert!(v.propagate(&[4, -5]).is_ok());
        assert_eq!(v.value(3), -3);
        let before = (v.model().to_vec(), v.clause_counts().to_vec());
        assert_eq!(v.propagate(&[6, 1]), Err(Contradiction));
        assert_eq!(v.model(), &before.0[..]);
        assert_eq!(v.clause_counts(), &before.1[..]);
        assert!(v.is_contradiction(&[2]));
        assert!(!v.is_contradiction(&[6]));
        assert_eq!(v.model(), &before.0[..]);
        assert_eq!(v.propagate(&[0, 4]), Ok(()));
    }
    #[test]
    fn test_core_literals() {
        let mig = mig(vec![vec![1], vec![-1, 2, 3], vec![2, 3, 4]]);
        let mut v = Visitor::new(mig);
        assert_eq!(v.value(1), 1);
        assert_eq!(v.num_assigned(), 1);
        assert!(v.added_literals().is_empty());
        assert!(v.is_contradiction(&[-1]));
        assert!(v.propagate(&[-2]).is_ok());
        assert_eq!(v.added_literals(), &[-2, 3]);
    }
    #[test]
    fn test_fork() {
        let mig = mig(vec![vec![1, 2, 3]]);
        let mut v = Visitor::new(mig);
        assert!(v.propagate(&[-1]).is_ok());
        let mut w = v.clone();
        assert!(w.propagate(&[-2]).is_ok());
        assert_eq!(w.value(3), 3);
        assert_eq!(v.value(3), 0);
        assert_eq!(v.added_literals(), &[-1]);
    }
}
