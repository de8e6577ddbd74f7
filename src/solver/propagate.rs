//! assignment management and unit propagation
use {
    super::{AssignReason, ClauseId, DecisionLevel, Solver},
    crate::types::*,
    std::mem,
};

impl Solver {
    pub(crate) fn assign_at_root(&mut self, lit: Lit) {
        debug_assert_eq!(self.decision_level(), 0);
        self.assign(lit, AssignReason::None);
    }
    pub(crate) fn assign_by_decision(&mut self, lit: Lit) {
        self.new_decision_level();
        let lv = self.decision_level();
        self.assign(lit, AssignReason::Decision(lv));
    }
    pub(crate) fn assign_by_implication(&mut self, lit: Lit, cid: ClauseId) {
        let reason = if self.decision_level() == 0 {
            AssignReason::None
        } else {
            AssignReason::Implication(cid)
        };
        self.assign(lit, reason);
    }
    fn assign(&mut self, lit: Lit, reason: AssignReason) {
        let level = self.decision_level();
        let v = &mut self.vars[lit.vi()];
        debug_assert!(v.assign.is_none());
        v.assign = Some(lit.is_positive());
        v.level = level;
        v.reason = reason;
        self.trail.push(lit);
    }
    pub(crate) fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }
    /// undo the assignments above level `lv`.
    pub(crate) fn cancel_until(&mut self, lv: DecisionLevel) {
        if self.decision_level() <= lv {
            return;
        }
        let lim = self.trail_lim[lv as usize];
        for lit in self.trail.drain(lim..) {
            let v = &mut self.vars[lit.vi()];
            v.assign = None;
            v.reason = AssignReason::None;
            if v.order_pos < self.order_head {
                self.order_head = v.order_pos;
            }
        }
        self.trail_lim.truncate(lv as usize);
        self.q_head = self.q_head.min(lim);
    }
    /// propagate the assignments in the trail.
    /// Returns the conflicting clause if any.
    pub(crate) fn propagate(&mut self) -> Option<ClauseId> {
        while self.q_head < self.trail.len() {
            let p = self.trail[self.q_head];
            self.q_head += 1;
            self.stats.num_propagation += 1;
            let false_lit = -p;
            let mut ws = mem::take(&mut self.watches[false_lit.vertex()]);
            let mut conflict: Option<ClauseId> = None;
            let mut i = 0;
            'next_watch: while i < ws.len() {
                let w = ws[i];
                if self.lit_value(w.blocker) == Some(true) {
                    i += 1;
                    continue;
                }
                let Solver {
                    ref mut clauses,
                    ref vars,
                    ref mut watches,
                    ..
                } = self;
                let lits = &mut clauses[w.cid].lits;
                if lits[0] == false_lit {
                    lits.swap(0, 1);
                }
                let first = lits[0];
                let value = |l: Lit| vars[l.vi()].assign.map(|b| b == l.is_positive());
                let first_value = value(first);
                if first_value == Some(true) {
                    ws[i].blocker = first;
                    i += 1;
                    continue;
                }
                for k in 2..lits.len() {
                    if value(lits[k]) != Some(false) {
                        lits.swap(1, k);
                        watches[lits[1].vertex()].push(super::Watcher {
                            cid: w.cid,
                            blocker: first,
                        });
                        ws.swap_remove(i);
                        continue 'next_watch;
                    }
                }
                if first_value == Some(false) {
                    conflict = Some(w.cid);
                    break;
                }
                self.assign_by_implication(first, w.cid);
                i += 1;
            }
            self.watches[false_lit.vertex()] = ws;
            if conflict.is_some() {
                self.q_head = self.trail.len();
                return conflict;
            }
        }
        None
    }
}
