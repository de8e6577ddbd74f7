//! Conflict Analysis
use {
    super::{AssignReason, ClauseId, DecisionLevel, Solver},
    crate::types::*,
};

impl Solver {
    /// return a first UIP clause and the level to backjump to.
    /// The asserting literal is placed at index 0, a literal of the
    /// backjump level at index 1.
    pub(crate) fn analyze(&mut self, conflict: ClauseId) -> (Vec<Lit>, DecisionLevel) {
        let current = self.decision_level();
        let mut learnt: Vec<Lit> = vec![0];
        let mut path_cnt = 0;
        let mut p: Lit = 0;
        let mut ti = self.trail.len();
        let mut cid = conflict;
        loop {
            for i in 0..self.clauses[cid].lits.len() {
                let q = self.clauses[cid].lits[i];
                if q == p {
                    continue;
                }
                let v = &mut self.vars[q.vi()];
                if v.is(FlagVar::CA_SEEN) || v.level == 0 {
                    continue;
                }
                v.turn_on(FlagVar::CA_SEEN);
                if v.level == current {
                    path_cnt += 1;
                } else {
                    learnt.push(q);
                }
            }
            loop {
                ti -= 1;
                p = self.trail[ti];
                if self.vars[p.vi()].is(FlagVar::CA_SEEN) {
                    break;
                }
            }
            self.vars[p.vi()].turn_off(FlagVar::CA_SEEN);
            path_cnt -= 1;
            if path_cnt == 0 {
                break;
            }
            match self.vars[p.vi()].reason {
                AssignReason::Implication(c) => cid = c,
                reason => unreachable!("analyze found {reason:?} at {p}"),
            }
        }
        learnt[0] = -p;
        for l in learnt[1..].iter() {
            self.vars[l.vi()].turn_off(FlagVar::CA_SEEN);
        }
        let mut backjump = 0;
        if 1 < learnt.len() {
            let mut max_i = 1;
            for i in 2..learnt.len() {
                if self.vars[learnt[max_i].vi()].level < self.vars[learnt[i].vi()].level {
                    max_i = i;
                }
            }
            learnt.swap(1, max_i);
            backjump = self.vars[learnt[1].vi()].level;
        }
        (learnt, backjump)
    }
    /// return the number of distinct levels in `lits`.
    pub(crate) fn compute_rank(&self, lits: &[Lit]) -> u32 {
        let mut levels = lits
            .iter()
            .map(|l| self.vars[l.vi()].level)
            .collect::<Vec<_>>();
        levels.sort_unstable();
        levels.dedup();
        levels.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_uip() {
        // deciding 1 then 2 leads to a conflict whose first UIP is 3.
        let cnf = CNF::from_vec_i32(vec![
            vec![-1, -2, 3],
            vec![-3, 4],
            vec![-3, 5],
            vec![-4, -5],
        ])
        .expect("valid cnf");
        let mut s = Solver::instantiate(&Config::default(), &cnf);
        s.assign_by_decision(1);
        assert_eq!(s.propagate(), None);
        s.assign_by_decision(2);
        let conflict = s.propagate().expect("conflict");
        let (learnt, level) = s.analyze(conflict);
        assert_eq!(learnt, vec![-3]);
        assert_eq!(level, 0);
        assert!(s.vars.iter().all(|v| !v.is(FlagVar::CA_SEEN)));
    }
}
