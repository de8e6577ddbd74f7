//! Checks on assignments and samples
use {
    crate::{
        combination::{CombinationSpecIF, TWiseCombinations},
        mig::{ModalImplicationGraph, Visitor},
        sample::SampleBitIndex,
        solver::{Certificate, SatSolverIF},
        types::*,
    },
    std::{fmt, ops::ControlFlow, sync::Arc},
};

/// return a clause which `assignment` doesn't satisfy, or `None`.
/// Literals out of the range of the formula are ignored.
///
/// ```
/// use yasa::{types::*, validator::validate};
/// let cnf = CNF::from_vec_i32(vec![vec![1, 2], vec![-1, 3]]).unwrap();
/// assert!(validate(&cnf, &[1, -2, 3]).is_none());
/// assert_eq!(validate(&cnf, &[1, -2, -3]), Some(&vec![-1, 3]));
/// ```
pub fn validate<'a>(cnf: &'a CNF, assignment: &[Lit]) -> Option<&'a Clause> {
    let mut model: Vec<Lit> = vec![0; cnf.num_vars() as usize];
    for l in assignment.iter().filter(|l| **l != 0) {
        if let Some(v) = model.get_mut(l.vi()) {
            *v = *l;
        }
    }
    cnf.clauses()
        .iter()
        .find(|c| !c.iter().any(|l| model.get(l.vi()) == Some(l)))
}

/// The classification of all combinations of `t` literals over the vars
/// which aren't fixed by the formula.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CoverageReport {
    /// combinations which occur in some configuration
    pub covered: usize,
    /// valid combinations which occur in no configuration
    pub uncovered: usize,
    /// combinations which occur in no solution
    pub invalid: usize,
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "covered:{}, uncovered:{}, invalid:{}, coverage:{:>7.3}%",
            self.covered,
            self.uncovered,
            self.invalid,
            100.0 * self.ratio(),
        )
    }
}

impl CoverageReport {
    /// return the covered share of the valid combinations.
    pub fn ratio(&self) -> f64 {
        let valid = self.covered + self.uncovered;
        if valid == 0 {
            1.0
        } else {
            self.covered as f64 / valid as f64
        }
    }
    pub fn is_complete(&self) -> bool {
        self.uncovered == 0
    }
}

/// classify the `t`-wise combinations against a sample.
/// An uncovered combination is invalid if it contradicts the graph or the
/// solver refutes it. Undecided ones are counted as uncovered.
pub fn coverage<'a, S, I>(
    mig: &Arc<ModalImplicationGraph>,
    solver: &mut S,
    sample: I,
    t: usize,
) -> CoverageReport
where
    S: SatSolverIF,
    I: IntoIterator<Item = &'a Vec<Lit>>,
{
    let num_vars = mig.num_vars();
    let mut index = SampleBitIndex::new(num_vars);
    for (slot, config) in sample.into_iter().enumerate() {
        index.reserve(slot);
        for l in config.iter().filter(|l| **l != 0 && l.vi() < num_vars) {
            index.set(slot, *l);
        }
    }
    let combinations = TWiseCombinations::from_mig(mig, t);
    let mut visitor = Visitor::new(Arc::clone(mig));
    let mut report = CoverageReport::default();
    let _ = combinations.for_each(&mut |lits| {
        if index.test(lits) {
            report.covered += 1;
        } else if visitor.is_contradiction(lits) {
            report.invalid += 1;
        } else {
            let base = solver.num_assumptions();
            solver.push_assumptions(lits);
            let result = solver.solve();
            solver.pop_assumptions(base);
            match result {
                Ok(Certificate::UNSAT) => report.invalid += 1,
                _ => report.uncovered += 1,
            }
        }
        ControlFlow::Continue(())
    });
    report
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{mig::MigBuilder, solver::Solver},
    };

    #[test]
    fn test_validate_ignores_zero_and_out_of_range() {
        let cnf = CNF::from_vec_i32(vec![vec![1, 2], vec![-2]]).expect("valid cnf");
        assert!(validate(&cnf, &[1, -2, 0, 9]).is_none());
        assert_eq!(validate(&cnf, &[-1, -2]), Some(&vec![1, 2]));
        assert_eq!(validate(&cnf, &[]), Some(&vec![1, 2]));
    }
    #[test]
    fn test_coverage_of_a_clause() {
        let config = Config::default();
        let cnf = CNF::from_vec_i32(vec![vec![1, 2, 3]]).expect("valid cnf");
        let mut solver = Solver::instantiate(&config, &cnf);
        let mig = Arc::new(MigBuilder::new(&cnf).build(&mut solver).expect("satisfiable"));
        let empty: Vec<Vec<Lit>> = Vec::new();
        let report = coverage(&mig, &mut solver, &empty, 2);
        assert_eq!(report.covered, 0);
        assert_eq!(report.uncovered, 12);
        assert_eq!(report.invalid, 0);
        assert_eq!(report.ratio(), 0.0);
        let sample = vec![vec![1, 2, 3], vec![-1, -2, 3], vec![1, -2, -3], vec![-1, 2, -3]];
        let report = coverage(&mig, &mut solver, &sample, 2);
        assert_eq!(report.covered, 12);
        assert!(report.is_complete());
        assert_eq!(report.ratio(), 1.0);
    }
    #[test]
    fn test_invalid_combinations() {
        let config = Config::default();
        let cnf = CNF::from_vec_i32(vec![vec![1, 2, 3], vec![3, 4], vec![-4, 5]])
            .expect("valid cnf");
        let mut solver = Solver::instantiate(&config, &cnf);
        let mig = Arc::new(MigBuilder::new(&cnf).build(&mut solver).expect("satisfiable"));
        let empty: Vec<Vec<Lit>> = Vec::new();
        let report = coverage(&mig, &mut solver, &empty, 2);
        assert_eq!(report.covered + report.uncovered + report.invalid, 40);
        // -3 & -4, -3 & -5, 4 & -5 contradict the binary clauses
        assert_eq!(report.invalid, 3);
    }
}
