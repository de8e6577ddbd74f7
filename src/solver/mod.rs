/// Module `solver` provides a small CDCL solver used as the sampling oracle.
/// Module `analyze` provides first UIP conflict analysis.
mod analyze;
/// Module `luby` provides the restart schedule.
mod luby;
/// Module `propagate` provides assignment management and unit propagation.
mod propagate;
/// CDCL search engine
mod search;

pub use self::luby::LubySeries;

use {
    crate::types::*,
    rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng},
    std::fmt,
};

/// Normal results returned by Solver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Certificate {
    /// It is satisfiable; `vec` is such an assignment sorted by var order.
    SAT(Vec<Lit>),
    /// It is unsatisfiable under the current assumptions.
    UNSAT,
}

/// The return type of `Solver::solve`.
/// This captures the following three cases:
/// * `Certificate::SAT` -- solved with a satisfiable assignment set,
/// * `Certificate::UNSAT` -- proved that it's an unsatisfiable problem, and
/// * `SolverError::TimeOut` -- gave up within the conflict budget.
pub type SolverResult = Result<Certificate, SolverError>;

/// API for the oracle used by the sampler.
pub trait SatSolverIF {
    /// return the number of vars.
    fn num_vars(&self) -> usize;
    /// add a clause at the root level.
    ///
    /// # Errors
    ///
    /// * `SolverError::InvalidLiteral` if a literal in it is out of range.
    /// * `SolverError::Inconsistent` if the formula became unsatisfiable.
    fn add_clause<V: AsRef<[Lit]>>(&mut self, lits: V) -> MaybeInconsistent;
    /// push a literal to the assumption stack.
    fn push_assumption(&mut self, lit: Lit);
    /// push literals to the assumption stack.
    fn push_assumptions(&mut self, lits: &[Lit]) {
        for l in lits.iter() {
            self.push_assumption(*l);
        }
    }
    /// shrink the assumption stack to `len`.
    fn pop_assumptions(&mut self, len: usize);
    /// return the size of the assumption stack.
    fn num_assumptions(&self) -> usize;
    /// return `Certificate::SAT` with a full model or `Certificate::UNSAT`
    /// under the current assumptions.
    ///
    /// # Errors
    ///
    /// * `SolverError::TimeOut` if the conflict budget is exhausted.
    /// * `SolverError::InvalidLiteral` if an assumption is out of range.
    fn solve(&mut self) -> SolverResult;
    /// re-permute the decision order and draw new decision phases.
    fn shuffle_order(&mut self, rng: &mut StdRng);
    /// reseed the decision order and phases.
    fn randomize_selection(&mut self, seed: u64) {
        self.shuffle_order(&mut StdRng::seed_from_u64(seed));
    }
}

pub type ClauseId = usize;
pub type DecisionLevel = u32;

/// The reason of an assignment
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AssignReason {
    /// decided or assumed
    Decision(DecisionLevel),
    /// implied by a clause
    Implication(ClauseId),
    /// unassigned or asserted at the root level
    #[default]
    None,
}

/// Object representing a variable of the solver.
#[derive(Clone, Debug, Default)]
pub struct Var {
    pub(crate) assign: Option<bool>,
    pub(crate) level: DecisionLevel,
    pub(crate) reason: AssignReason,
    /// the position in the decision order
    pub(crate) order_pos: usize,
    flags: FlagVar,
}

impl FlagIF for Var {
    type FlagType = FlagVar;
    #[inline]
    fn is(&self, flag: Self::FlagType) -> bool {
        self.flags.contains(flag)
    }
    #[inline]
    fn set(&mut self, f: Self::FlagType, b: bool) {
        self.flags.set(f, b);
    }
    #[inline]
    fn turn_off(&mut self, flag: Self::FlagType) {
        self.flags.remove(flag);
    }
    #[inline]
    fn turn_on(&mut self, flag: Self::FlagType) {
        self.flags.insert(flag);
    }
}

/// A clause stored in the solver. Watched literals are the first two.
#[derive(Clone, Debug, Default)]
pub struct ClauseData {
    pub(crate) lits: Vec<Lit>,
    pub(crate) learnt: bool,
    /// literal block distance at learning
    pub(crate) rank: u32,
}

/// An entry of a watch list
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Watcher {
    pub(crate) cid: ClauseId,
    /// a literal of the clause; the clause is satisfied if it holds
    pub(crate) blocker: Lit,
}

/// Counters for debug messages
#[derive(Clone, Debug, Default)]
pub struct SolverStats {
    pub num_solve: usize,
    pub num_conflict: usize,
    pub num_decision: usize,
    pub num_propagation: usize,
    pub num_restart: usize,
    pub num_reduction: usize,
}

/// The SAT solver object.
///
/// ```
/// use yasa::{solver::*, types::*};
/// let cnf = CNF::from_vec_i32(vec![vec![1, 2], vec![-1, 3], vec![-2, -3]]).unwrap();
/// let mut s = Solver::instantiate(&Config::default(), &cnf);
/// s.push_assumption(-3);
/// assert_eq!(s.solve(), Ok(Certificate::SAT(vec![-1, 2, -3])));
/// s.push_assumption(-2);
/// assert_eq!(s.solve(), Ok(Certificate::UNSAT));
/// s.pop_assumptions(0);
/// assert!(matches!(s.solve(), Ok(Certificate::SAT(_))));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Solver {
    pub(crate) vars: Vec<Var>,
    pub(crate) clauses: Vec<ClauseData>,
    /// watch lists indexed by [`LitIF::vertex`]; visited when the literal becomes false
    pub(crate) watches: Vec<Vec<Watcher>>,
    pub(crate) trail: Vec<Lit>,
    pub(crate) trail_lim: Vec<usize>,
    pub(crate) q_head: usize,
    /// decision order
    pub(crate) order: Vec<VarId>,
    pub(crate) order_head: usize,
    pub(crate) assumptions: Vec<Lit>,
    pub(crate) num_learnt: usize,
    pub(crate) max_learnt: usize,
    pub(crate) conflict_limit: usize,
    /// `false` if the formula is unsatisfiable at the root level
    pub(crate) ok: bool,
    pub stats: SolverStats,
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Solver(vars:{}, clauses:{}, learnts:{}, solve:{}, conflicts:{}, restarts:{})",
            self.vars.len(),
            self.clauses.len() - self.num_learnt,
            self.num_learnt,
            self.stats.num_solve,
            self.stats.num_conflict,
            self.stats.num_restart,
        )
    }
}

impl Instantiate for Solver {
    fn instantiate(config: &Config, cnf: &CNF) -> Solver {
        let num_vars = cnf.num_vars() as usize;
        let mut s = Solver {
            vars: (0..num_vars)
                .map(|vi| Var {
                    order_pos: vi,
                    ..Var::default()
                })
                .collect(),
            watches: vec![Vec::new(); 2 * num_vars],
            order: (0..num_vars).collect(),
            max_learnt: (cnf.num_clauses() / 3).max(2000),
            conflict_limit: config.solver_conflict_limit,
            ok: true,
            ..Solver::default()
        };
        for c in cnf.clauses().iter() {
            if s.add_clause(c).is_err() {
                break;
            }
        }
        s
    }
}

impl SatSolverIF for Solver {
    fn num_vars(&self) -> usize {
        self.vars.len()
    }
    fn add_clause<V: AsRef<[Lit]>>(&mut self, lits: V) -> MaybeInconsistent {
        if let Some(l) = lits
            .as_ref()
            .iter()
            .find(|l| **l == 0 || self.vars.len() < l.unsigned_abs() as usize)
        {
            return Err(SolverError::InvalidLiteral(*l));
        }
        if !self.ok {
            return Err(SolverError::Inconsistent);
        }
        debug_assert_eq!(self.decision_level(), 0);
        let mut c: Vec<Lit> = Vec::with_capacity(lits.as_ref().len());
        for l in lits.as_ref().iter() {
            match self.lit_value(*l) {
                Some(true) => return Ok(()),
                Some(false) => (),
                None if c.contains(&-*l) => return Ok(()),
                None if c.contains(l) => (),
                None => c.push(*l),
            }
        }
        match c.len() {
            0 => {
                self.ok = false;
                Err(SolverError::Inconsistent)
            }
            1 => {
                self.assign_at_root(c[0]);
                if self.propagate().is_some() {
                    self.ok = false;
                    return Err(SolverError::Inconsistent);
                }
                Ok(())
            }
            _ => {
                self.attach_clause(c, false, 0);
                Ok(())
            }
        }
    }
    fn push_assumption(&mut self, lit: Lit) {
        self.assumptions.push(lit);
    }
    fn pop_assumptions(&mut self, len: usize) {
        self.assumptions.truncate(len);
    }
    fn num_assumptions(&self) -> usize {
        self.assumptions.len()
    }
    fn solve(&mut self) -> SolverResult {
        if let Some(l) = self
            .assumptions
            .iter()
            .find(|l| **l == 0 || self.vars.len() < l.unsigned_abs() as usize)
        {
            return Err(SolverError::InvalidLiteral(*l));
        }
        self.stats.num_solve += 1;
        if !self.ok {
            return Ok(Certificate::UNSAT);
        }
        let result = self.search();
        self.cancel_until(0);
        result
    }
    fn shuffle_order(&mut self, rng: &mut StdRng) {
        self.order.shuffle(rng);
        for (i, vi) in self.order.iter().enumerate() {
            let v = &mut self.vars[*vi];
            v.order_pos = i;
            v.set(FlagVar::PHASE, rng.gen::<bool>());
        }
        self.order_head = 0;
    }
}

impl Solver {
    /// return the value of a literal under the current assignment.
    #[inline]
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.vars[lit.vi()].assign.map(|b| b == lit.is_positive())
    }
    #[inline]
    pub fn decision_level(&self) -> DecisionLevel {
        self.trail_lim.len() as DecisionLevel
    }
    /// return the number of clauses including learnt ones.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
    pub(crate) fn attach_clause(&mut self, lits: Vec<Lit>, learnt: bool, rank: u32) -> ClauseId {
        debug_assert!(1 < lits.len());
        let cid = self.clauses.len();
        self.watches[lits[0].vertex()].push(Watcher {
            cid,
            blocker: lits[1],
        });
        self.watches[lits[1].vertex()].push(Watcher {
            cid,
            blocker: lits[0],
        });
        self.clauses.push(ClauseData { lits, learnt, rank });
        if learnt {
            self.num_learnt += 1;
        }
        cid
    }
}
