//! CDCL search engine
use {
    super::{AssignReason, Certificate, LubySeries, Solver, SolverResult},
    crate::types::*,
    tracing::trace,
};

/// the number of conflicts between restarts is `RESTART_UNIT` times a Luby number.
const RESTART_UNIT: usize = 100;

impl Solver {
    /// run CDCL under the assumptions. The solver must be at the root level.
    pub(crate) fn search(&mut self) -> SolverResult {
        debug_assert_eq!(self.decision_level(), 0);
        if self.propagate().is_some() {
            self.ok = false;
            return Ok(Certificate::UNSAT);
        }
        let mut luby = LubySeries::new(RESTART_UNIT);
        let mut restart_at = luby.next().unwrap_or(RESTART_UNIT);
        let mut num_conflict = 0;
        let mut since_restart = 0;
        loop {
            if let Some(cid) = self.propagate() {
                num_conflict += 1;
                since_restart += 1;
                self.stats.num_conflict += 1;
                if self.decision_level() == 0 {
                    self.ok = false;
                    return Ok(Certificate::UNSAT);
                }
                let (learnt, backjump) = self.analyze(cid);
                self.cancel_until(backjump);
                if learnt.len() == 1 {
                    self.assign_at_root(learnt[0]);
                } else {
                    let rank = self.compute_rank(&learnt);
                    let lit = learnt[0];
                    let cid = self.attach_clause(learnt, true, rank);
                    self.assign_by_implication(lit, cid);
                }
                if 0 < self.conflict_limit && self.conflict_limit <= num_conflict {
                    trace!(conflicts = num_conflict, "solver gave up");
                    return Err(SolverError::TimeOut);
                }
                continue;
            }
            if restart_at <= since_restart {
                since_restart = 0;
                restart_at = luby.next().unwrap_or(RESTART_UNIT);
                self.stats.num_restart += 1;
                self.cancel_until(0);
                if self.max_learnt < self.num_learnt {
                    self.reduce();
                    if !self.ok {
                        return Ok(Certificate::UNSAT);
                    }
                }
                continue;
            }
            // take the next assumption as a decision
            let lv = self.decision_level() as usize;
            if lv < self.assumptions.len() {
                let a = self.assumptions[lv];
                match self.lit_value(a) {
                    Some(true) => self.new_decision_level(),
                    Some(false) => return Ok(Certificate::UNSAT),
                    None => self.assign_by_decision(a),
                }
                continue;
            }
            let Some(vi) = self.select_var() else {
                return Ok(Certificate::SAT(
                    self.vars
                        .iter()
                        .enumerate()
                        .map(|(vi, v)| lit_of(vi, v.assign == Some(true)))
                        .collect(),
                ));
            };
            self.stats.num_decision += 1;
            let positive = self.vars[vi].is(FlagVar::PHASE);
            self.assign_by_decision(lit_of(vi, positive));
        }
    }
    /// return the first unassigned var in the decision order.
    fn select_var(&mut self) -> Option<VarId> {
        while self.order_head < self.order.len() {
            let vi = self.order[self.order_head];
            if self.vars[vi].assign.is_none() {
                return Some(vi);
            }
            self.order_head += 1;
        }
        None
    }
    /// remove a half of the learnt clauses with the worst ranks and
    /// simplify all clauses by the root assignments.
    fn reduce(&mut self) {
        debug_assert_eq!(self.decision_level(), 0);
        self.stats.num_reduction += 1;
        let mut ranks = self
            .clauses
            .iter()
            .filter(|c| c.learnt)
            .map(|c| (c.rank, c.lits.len()))
            .collect::<Vec<_>>();
        ranks.sort_unstable();
        let threshold = ranks
            .get(ranks.len() / 2)
            .copied()
            .unwrap_or((u32::MAX, usize::MAX));
        let clauses = std::mem::take(&mut self.clauses);
        for w in self.watches.iter_mut() {
            w.clear();
        }
        self.num_learnt = 0;
        let mut units: Vec<Lit> = Vec::new();
        for mut c in clauses.into_iter() {
            if c.learnt && 2 < c.rank && threshold < (c.rank, c.lits.len()) {
                continue;
            }
            if c.lits.iter().any(|l| self.lit_value(*l) == Some(true)) {
                continue;
            }
            c.lits.retain(|l| self.lit_value(*l).is_none());
            match c.lits.len() {
                0 => {
                    self.ok = false;
                    return;
                }
                1 => units.push(c.lits[0]),
                _ => {
                    self.attach_clause(c.lits, c.learnt, c.rank);
                }
            }
        }
        for v in self.vars.iter_mut() {
            v.reason = AssignReason::None;
        }
        for l in units {
            match self.lit_value(l) {
                Some(true) => (),
                Some(false) => {
                    self.ok = false;
                    return;
                }
                None => self.assign_at_root(l),
            }
        }
        if self.propagate().is_some() {
            self.ok = false;
        }
        self.max_learnt += self.max_learnt / 10;
        trace!(learnts = self.num_learnt, "reduced");
    }
}
