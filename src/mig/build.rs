//! Graph builder
use {
    super::ModalImplicationGraph,
    crate::{
        solver::{Certificate, SatSolverIF},
        types::*,
    },
    ahash::AHashSet,
    tracing::{debug, warn},
};

/// Builder of [`ModalImplicationGraph`] from a formula and a solver loaded with it.
#[derive(Debug)]
pub struct MigBuilder<'a> {
    cnf: &'a CNF,
    num_vars: usize,
}

impl<'a> MigBuilder<'a> {
    pub fn new(cnf: &'a CNF) -> Self {
        MigBuilder {
            cnf,
            num_vars: cnf.num_vars() as usize,
        }
    }
    /// compute core literals, strong and weak edges.
    /// The solver gets a unit clause for every core literal found.
    ///
    /// # Errors
    ///
    /// * `SamplingError::Unsatisfiable` if the formula has no solution.
    /// * `SamplingError::TimeOut` if the first solution can't be found within the budget.
    ///
    /// # Example
    ///
    /// ```
    /// use yasa::{mig::MigBuilder, solver::Solver, types::*};
    /// let cnf = CNF::from_vec_i32(vec![vec![1], vec![-1, 2], vec![3, 4], vec![-3, 4, 5]]).unwrap();
    /// let mut solver = Solver::instantiate(&Config::default(), &cnf);
    /// let mig = MigBuilder::new(&cnf).build(&mut solver).unwrap();
    /// assert_eq!(mig.core_literals().len(), 2);
    /// assert!(mig.vertex(1).is_core() && mig.vertex(2).is_core());
    /// assert_eq!(mig.vertex(-3).strong_edges(), &[4]);
    /// ```
    pub fn build<S: SatSolverIF>(
        self,
        solver: &mut S,
    ) -> Result<ModalImplicationGraph, SamplingError> {
        let mut core = self.find_core(solver)?;
        for l in core.iter() {
            solver
                .add_clause([*l])
                .map_err(|_| SamplingError::Unsatisfiable)?;
        }
        let clauses = self.simplify(&mut core)?;
        let mut mig = ModalImplicationGraph::with_vars(self.num_vars);
        for l in core.iter() {
            mig.vertices[l.vertex()].core = true;
        }
        mig.core = core;
        let mut direct: Vec<Vec<Lit>> = vec![Vec::new(); 2 * self.num_vars];
        for c in clauses.iter() {
            if c.len() == 2 {
                direct[(-c[0]).vertex()].push(c[1]);
                direct[(-c[1]).vertex()].push(c[0]);
            } else {
                let cid = mig.clauses.len();
                for l in c.iter() {
                    mig.vertices[(-*l).vertex()].weak.push(cid);
                }
                mig.clauses.push(c.clone());
            }
        }
        close_strong_edges(&mut mig, &direct);
        debug!(
            core = mig.core.len(),
            strong = mig.num_strong_edges(),
            weak = mig.clauses.len(),
            "modal implication graph"
        );
        Ok(mig)
    }
    /// return core literals: literals which hold in every solution.
    fn find_core<S: SatSolverIF>(&self, solver: &mut S) -> Result<Vec<Lit>, SamplingError> {
        let mut candidates: Vec<Lit> = match solver.solve() {
            Ok(Certificate::SAT(model)) => model,
            Ok(Certificate::UNSAT) | Err(SolverError::Inconsistent) => {
                return Err(SamplingError::Unsatisfiable)
            }
            Err(_) => return Err(SamplingError::TimeOut),
        };
        candidates.resize(self.num_vars, 0);
        let mut core: Vec<Lit> = Vec::new();
        for vi in 0..self.num_vars {
            let l = candidates[vi];
            if l == 0 {
                continue;
            }
            candidates[vi] = 0;
            let base = solver.num_assumptions();
            solver.push_assumption(-l);
            let result = solver.solve();
            solver.pop_assumptions(base);
            match result {
                Ok(Certificate::UNSAT) => core.push(l),
                Ok(Certificate::SAT(model)) => {
                    for (c, m) in candidates.iter_mut().zip(model.iter()) {
                        if *c != *m {
                            *c = 0;
                        }
                    }
                }
                Err(SolverError::Inconsistent) => return Err(SamplingError::Unsatisfiable),
                Err(e) => warn!(lit = l, "core check is inconclusive: {e}"),
            }
        }
        Ok(core)
    }
    /// remove satisfied clauses and falsified literals w.r.t. the core.
    /// Clauses shrunk to a unit add their literal to `core`.
    fn simplify(&self, core: &mut Vec<Lit>) -> Result<Vec<Vec<Lit>>, SamplingError> {
        let mut fixed: Vec<Lit> = vec![0; self.num_vars];
        for l in core.iter() {
            fixed[l.vi()] = *l;
        }
        let mut clauses: Vec<Vec<Lit>> = self.cnf.clauses().to_vec();
        loop {
            let mut found = false;
            let mut remains: Vec<Vec<Lit>> = Vec::with_capacity(clauses.len());
            for c in clauses.into_iter() {
                if c.iter().any(|l| fixed[l.vi()] == *l) {
                    continue;
                }
                let c: Vec<Lit> = c
                    .into_iter()
                    .filter(|l| fixed[l.vi()] != -*l)
                    .collect::<Vec<_>>();
                match c.len() {
                    0 => return Err(SamplingError::Unsatisfiable),
                    1 => {
                        if fixed[c[0].vi()] == 0 {
                            fixed[c[0].vi()] = c[0];
                            core.push(c[0]);
                            found = true;
                        }
                    }
                    _ => remains.push(c),
                }
            }
            clauses = remains;
            if !found {
                break;
            }
        }
        let mut seen: AHashSet<Vec<Lit>> = AHashSet::new();
        clauses.retain(|c| {
            let mut key = c.clone();
            key.sort_unstable();
            seen.insert(key)
        });
        Ok(clauses)
    }
}

/// store the transitive closure of `direct` as strong edges.
fn close_strong_edges(mig: &mut ModalImplicationGraph, direct: &[Vec<Lit>]) {
    let mut stamp: Vec<usize> = vec![usize::MAX; direct.len()];
    let mut stack: Vec<Lit> = Vec::new();
    for v in 0..direct.len() {
        if direct[v].is_empty() {
            continue;
        }
        stamp[v] = v;
        stack.extend_from_slice(&direct[v]);
        let mut closure: Vec<Lit> = Vec::new();
        while let Some(l) = stack.pop() {
            let w = l.vertex();
            if stamp[w] == v {
                continue;
            }
            stamp[w] = v;
            closure.push(l);
            stack.extend_from_slice(&direct[w]);
        }
        mig.vertices[v].strong = closure;
    }
}
