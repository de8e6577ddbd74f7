use {
    proptest::prelude::*,
    std::sync::Arc,
    yasa::{
        mig::{MigBuilder, ModalImplicationGraph, Visitor},
        sample::SampleBitIndex,
        validator::validate,
        CnfIf, Config, Instantiate, Lit, Solver, Yasa, CNF,
    },
};

const NUM_VARS: i32 = 6;

// ============================================================================
// Strategies
// ============================================================================

prop_compose! {
    fn any_lit()(var in 1..=NUM_VARS, positive in any::<bool>()) -> Lit {
        if positive { var } else { -var }
    }
}

prop_compose! {
    fn any_clause()(lits in prop::collection::vec(any_lit(), 1..4)) -> Vec<Lit> {
        lits
    }
}

prop_compose! {
    fn any_formula()(clauses in prop::collection::vec(any_clause(), 1..10)) -> Vec<Vec<Lit>> {
        // mention every var so that the formula has NUM_VARS vars
        let mut clauses = clauses;
        clauses.push((1..=NUM_VARS).collect());
        clauses
    }
}

prop_compose! {
    fn any_configuration()(lits in prop::collection::vec(any_lit(), 0..5)) -> Vec<Lit> {
        let mut model: Vec<Lit> = vec![0; NUM_VARS as usize];
        for l in lits {
            model[l.unsigned_abs() as usize - 1] = l;
        }
        model.into_iter().filter(|l| *l != 0).collect()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn build(clauses: &[Vec<Lit>]) -> Option<(CNF, Arc<ModalImplicationGraph>)> {
    let cnf = CNF::from_vec_i32(clauses).ok()?;
    let mut solver = Solver::instantiate(&Config::default(), &cnf);
    let mig = MigBuilder::new(&cnf).build(&mut solver).ok()?;
    Some((cnf, Arc::new(mig)))
}

/// all solutions by enumeration
fn solutions(cnf: &CNF) -> Vec<Vec<Lit>> {
    let n = cnf.num_vars();
    (0..1u32 << n)
        .map(|bits| {
            (0..n)
                .map(|i| {
                    let var = i as Lit + 1;
                    if bits & (1 << i) != 0 {
                        var
                    } else {
                        -var
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|assignment| validate(cnf, assignment).is_none())
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reset_restores_the_visitor(
        formula in any_formula(),
        first in prop::collection::vec(any_lit(), 0..3),
        second in prop::collection::vec(any_lit(), 1..4),
    ) {
        let Some((_, mig)) = build(&formula) else {
            return Err(TestCaseError::reject("unsatisfiable"));
        };
        let mut visitor = Visitor::new(mig);
        let origin = (visitor.model().to_vec(), visitor.clause_counts().to_vec());
        prop_assume!(visitor.propagate(&first).is_ok());
        let keep = visitor.num_added_literals();
        let before = (visitor.model().to_vec(), visitor.clause_counts().to_vec());
        let _ = visitor.propagate(&second);
        visitor.reset(keep);
        prop_assert_eq!(visitor.model(), &before.0[..]);
        prop_assert_eq!(visitor.clause_counts(), &before.1[..]);
        visitor.reset(0);
        prop_assert_eq!(visitor.model(), &origin.0[..]);
        prop_assert_eq!(visitor.clause_counts(), &origin.1[..]);
    }

    #[test]
    fn propagation_is_sound(
        formula in any_formula(),
        lits in prop::collection::vec(any_lit(), 1..4),
    ) {
        let Some((cnf, mig)) = build(&formula) else {
            return Err(TestCaseError::reject("unsatisfiable"));
        };
        let extending = solutions(&cnf)
            .into_iter()
            .filter(|s| lits.iter().all(|l| s.contains(l)))
            .collect::<Vec<_>>();
        let mut visitor = Visitor::new(mig);
        match visitor.propagate(&lits) {
            Ok(()) => {
                for s in extending.iter() {
                    for l in visitor.model().iter().filter(|l| **l != 0) {
                        prop_assert!(s.contains(l), "{} isn't implied by {:?}", l, lits);
                    }
                }
            }
            Err(_) => prop_assert!(extending.is_empty(), "{:?} is satisfiable", lits),
        }
    }

    #[test]
    fn bit_index_finds_supersets(
        configurations in prop::collection::vec(any_configuration(), 0..6),
        query in prop::collection::vec(any_lit(), 0..3),
    ) {
        let index = SampleBitIndex::from_configurations(
            NUM_VARS as usize,
            configurations.iter().map(|c| c.as_slice()),
        );
        let expected = configurations
            .iter()
            .any(|c| query.iter().all(|l| c.contains(l)));
        prop_assert_eq!(index.test(&query), expected);
    }

    #[test]
    fn samples_cover_valid_pairs(formula in any_formula(), seed in 0u64..1000) {
        let Some((cnf, _)) = build(&formula) else {
            return Err(TestCaseError::reject("unsatisfiable"));
        };
        let config = Config { seed, ..Config::default() };
        let mut yasa = Yasa::new(config, &cnf).expect("satisfiable");
        let sample = yasa.sample().expect("completable");
        for c in sample.iter() {
            prop_assert!(validate(&cnf, c).is_none());
        }
        let all = solutions(&cnf);
        let free = (1..=NUM_VARS)
            .filter(|v| all.iter().any(|s| s.contains(v)) && all.iter().any(|s| s.contains(&-v)))
            .collect::<Vec<_>>();
        for (i, a) in free.iter().enumerate() {
            for b in free[i + 1..].iter() {
                for (x, y) in [(*a, *b), (*a, -*b), (-*a, *b), (-*a, -*b)] {
                    if all.iter().any(|s| s.contains(&x) && s.contains(&y)) {
                        prop_assert!(
                            sample.iter().any(|c| c.contains(&x) && c.contains(&y)),
                            "({}, {}) is uncovered", x, y
                        );
                    }
                }
            }
        }
    }
}
