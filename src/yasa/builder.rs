//! Greedy construction of a sample in passes
use {
    crate::{
        mig::ModalImplicationGraph,
        sample::{PartialConfiguration, Sample, SampleBitIndex, Solution, SolutionCache},
        solver::{Certificate, SatSolverIF},
        types::*,
    },
    rand::{rngs::StdRng, SeedableRng},
    std::{cmp::Reverse, mem, sync::Arc},
    tracing::{debug, trace},
};

/// The state of the greedy covering loop.
/// `current` is the sample of the running pass; `best` is the smallest
/// sample of the finished passes.
#[derive(Debug)]
pub struct SampleBuilder<S> {
    pub(crate) mig: Arc<ModalImplicationGraph>,
    pub(crate) solver: S,
    pub(crate) rng: StdRng,
    /// the rolling cache of solver solutions, kept over passes
    cache: SolutionCache,
    initial: Vec<Vec<Lit>>,
    allow_change_to_initial: bool,
    configuration_limit: usize,
    initial_counts_towards_limit: bool,
    current: Vec<PartialConfiguration>,
    index: SampleBitIndex,
    best: Option<Vec<PartialConfiguration>>,
    best_index: SampleBitIndex,
    best_over_limit: bool,
    /// indices into `current` which may absorb the combination under work
    candidates: Vec<usize>,
    /// the combination under work and its implications
    trial: Option<PartialConfiguration>,
    over_limit: bool,
    /// the size of `best` after each pass
    history: Vec<usize>,
}

impl<S: SatSolverIF> SampleBuilder<S> {
    pub fn new(config: &Config, mig: Arc<ModalImplicationGraph>, mut solver: S) -> Self {
        let num_vars = mig.num_vars();
        let mut rng = StdRng::seed_from_u64(config.seed);
        solver.shuffle_order(&mut rng);
        SampleBuilder {
            mig,
            solver,
            rng,
            cache: SolutionCache::new(num_vars, config.internal_solution_limit),
            initial: Vec::new(),
            allow_change_to_initial: config.allow_change_to_initial_sample,
            configuration_limit: config.configuration_limit,
            initial_counts_towards_limit: config.initial_sample_counts_towards_limit,
            current: Vec::new(),
            index: SampleBitIndex::new(num_vars),
            best: None,
            best_index: SampleBitIndex::new(num_vars),
            best_over_limit: false,
            candidates: Vec::new(),
            trial: None,
            over_limit: false,
            history: Vec::new(),
        }
    }
    pub fn set_initial_sample(&mut self, sample: Vec<Vec<Lit>>) {
        self.initial = sample;
    }
    /// return the maximum number of configurations in a sample.
    pub fn max_sample_size(&self) -> usize {
        if self.initial_counts_towards_limit {
            self.configuration_limit
        } else {
            self.configuration_limit.saturating_add(self.initial.len())
        }
    }
    pub fn is_over_limit(&self) -> bool {
        self.over_limit
    }
    pub fn best_over_limit(&self) -> bool {
        self.best_over_limit
    }
    pub fn history(&self) -> &[usize] {
        &self.history
    }
    pub fn current_len(&self) -> usize {
        self.current.len()
    }
    pub fn best_len(&self) -> Option<usize> {
        self.best.as_ref().map(|b| b.len())
    }
    /// forget the samples of the previous run.
    pub fn restart(&mut self) {
        self.best = None;
        self.best_index = SampleBitIndex::new(self.mig.num_vars());
        self.best_over_limit = false;
        self.history.clear();
    }
    /// start a pass with the initial sample.
    ///
    /// # Errors
    ///
    /// `SamplingError::InvalidInitialSample` if an initial configuration is
    /// out of range or contradicts the formula.
    pub fn init_sample(&mut self) -> Result<(), SamplingError> {
        let num_vars = self.mig.num_vars();
        let max_sample_size = self.max_sample_size();
        self.over_limit = false;
        self.current = Vec::with_capacity(self.initial.len());
        self.index = SampleBitIndex::new(num_vars);
        self.candidates.clear();
        self.trial = None;
        for (i, lits) in self.initial.iter().enumerate() {
            if max_sample_size <= self.current.len() {
                self.over_limit = true;
                break;
            }
            if lits.iter().any(|l| num_vars < l.unsigned_abs() as usize) {
                return Err(SamplingError::InvalidInitialSample(i));
            }
            let mut config = PartialConfiguration::new(
                self.current.len(),
                self.allow_change_to_initial,
                Arc::clone(&self.mig),
                lits,
            )
            .map_err(|_| SamplingError::InvalidInitialSample(i))?;
            if config.allow_change() {
                config.init_solution_list(&self.cache);
            }
            if config.is_complete() {
                config.clear_solutions();
            }
            self.index.set_all(config.id, config.model());
            self.current.push(config);
        }
        self.sort_current();
        Ok(())
    }
    /// cover a combination in the first pass.
    pub fn cover(&mut self, lits: &[Lit]) {
        if self.index.test(lits) {
            return;
        }
        match PartialConfiguration::new(0, true, Arc::clone(&self.mig), lits) {
            Ok(trial) => self.trial = Some(trial),
            Err(_) => return,
        }
        let done = if self.cache.contains(lits) {
            self.try_cover_with_cache(lits)
        } else {
            self.is_settled_by_solver(lits)
        };
        if !done && !self.try_cover_with_sat(lits) {
            self.new_configuration(lits);
        }
        self.candidates.clear();
        self.trial = None;
    }
    /// cover a combination in a later pass. Only the combinations covered by
    /// the best sample are tried.
    pub fn recover(&mut self, lits: &[Lit]) {
        if self.index.test(lits) || !self.best_index.test(lits) {
            return;
        }
        if !self.try_cover_with_cache(lits) && !self.try_cover_with_sat(lits) {
            self.new_configuration(lits);
        }
        self.candidates.clear();
        self.trial = None;
    }
    /// keep the current sample if it is the smallest so far.
    pub fn set_best(&mut self) {
        let improved = self
            .best
            .as_ref()
            .map_or(true, |best| self.current.len() < best.len());
        if improved {
            self.best = Some(mem::take(&mut self.current));
            self.best_over_limit = self.over_limit;
        }
        if let Some(len) = self.best_len() {
            self.history.push(len);
        }
    }
    /// build the index over the best sample, used by `recover`.
    pub fn index_best(&mut self) {
        if let Some(best) = self.best.as_ref() {
            self.best_index = SampleBitIndex::from_configurations(
                self.mig.num_vars(),
                best.iter().map(|c| c.model()),
            );
        }
    }
    /// complete the configurations of the best sample.
    /// The output is in the reverse order of construction.
    ///
    /// # Errors
    ///
    /// `SamplingError::Degraded` if a configuration can't be completed.
    pub fn finalize(&mut self) -> Result<Sample, SamplingError> {
        let SampleBuilder {
            ref mut solver,
            ref best,
            best_over_limit,
            ..
        } = self;
        let Some(best) = best else {
            return Ok(Sample::default());
        };
        let mut configurations: Vec<Vec<Lit>> = Vec::with_capacity(best.len());
        for (j, config) in best.iter().enumerate().rev() {
            match auto_complete(solver, config) {
                Ok(lits) => configurations.push(lits),
                Err(cause) => {
                    configurations.extend(best[..=j].iter().rev().map(|c| c.literals()));
                    return Err(SamplingError::Degraded {
                        cause: Box::new(cause),
                        partial: Sample::new(configurations, *best_over_limit),
                    });
                }
            }
        }
        Ok(Sample::new(configurations, *best_over_limit))
    }
    fn sort_current(&mut self) {
        self.current.sort_by_key(|c| Reverse(c.count_literals()));
    }
    /// the literals which must hold to cover the combination
    fn required_literals(&self, lits: &[Lit]) -> Vec<Lit> {
        match self.trial.as_ref() {
            Some(trial) => trial.added_literals().to_vec(),
            None => lits.to_vec(),
        }
    }
    /// store a solver solution and diversify the next one.
    fn add_solver_solution(&mut self, model: Vec<Lit>) -> Solution {
        let solution: Solution = Arc::from(model);
        self.cache.push(Arc::clone(&solution));
        self.solver.shuffle_order(&mut self.rng);
        solution
    }
    /// extend the `k`-th configuration with the combination.
    fn select(&mut self, k: usize, lits: &[Lit]) -> bool {
        let config = &mut self.current[k];
        let Ok(old) = config.extend(lits) else {
            return false;
        };
        for l in config.added_literals()[old..].iter() {
            self.index.set(config.id, *l);
        }
        config.update_solution_list(old);
        true
    }
    fn change(&mut self, k: usize) {
        if self.current[k].is_complete() {
            self.current[k].clear_solutions();
        }
        self.sort_current();
    }
    /// try the configurations which have a cached solution with the combination.
    /// The other open configurations which accept it become candidates.
    fn try_cover_with_cache(&mut self, lits: &[Lit]) -> bool {
        let required = self.required_literals(lits);
        for k in 0..self.current.len() {
            let config = &self.current[k];
            if !config.is_open() || !config.accepts(&required) {
                continue;
            }
            if config.has_solution_for(lits) && self.select(k, lits) {
                self.change(k);
                return true;
            }
            self.candidates.push(k);
        }
        false
    }
    /// ask the solver for a solution with the combination.
    /// Returns `true` if the combination got covered, or it is unsatisfiable
    /// or undecidable.
    fn is_settled_by_solver(&mut self, lits: &[Lit]) -> bool {
        let required = self.required_literals(lits);
        let base = self.solver.num_assumptions();
        self.solver.push_assumptions(&required);
        let result = self.solver.solve();
        self.solver.pop_assumptions(base);
        let model = match result {
            Ok(Certificate::SAT(model)) => model,
            Ok(Certificate::UNSAT) => return true,
            Err(e) => {
                trace!(?lits, "skip an undecidable combination: {e}");
                return true;
            }
        };
        let solution = self.add_solver_solution(model);
        for (k, config) in self.current.iter().enumerate() {
            if config.is_open() && config.accepts(&required) {
                self.candidates.push(k);
            }
        }
        let mut chosen: Option<usize> = None;
        for k in self.candidates.iter() {
            let config = &mut self.current[*k];
            if config.compatible_with(&solution) {
                if chosen.is_none() {
                    chosen = Some(*k);
                } else {
                    config.push_solution(Arc::clone(&solution));
                }
            }
        }
        match chosen {
            Some(k) if self.select(k, lits) => {
                self.current[k].push_solution(solution);
                self.change(k);
                true
            }
            _ => false,
        }
    }
    fn try_cover_with_sat(&mut self, lits: &[Lit]) -> bool {
        for i in 0..self.candidates.len() {
            let k = self.candidates[i];
            if self.try_select_sat(k, lits) {
                self.change(k);
                return true;
            }
        }
        false
    }
    /// extend the `k`-th configuration if the solver proves it possible.
    fn try_select_sat(&mut self, k: usize, lits: &[Lit]) -> bool {
        let required = self.required_literals(lits);
        let Ok(old) = self.current[k].extend(lits) else {
            return false;
        };
        let config = &self.current[k];
        let model = config.model();
        let mut assumptions = config.added_literals().to_vec();
        assumptions.extend(required.iter().filter(|l| model[l.vi()] == 0));
        let base = self.solver.num_assumptions();
        self.solver.push_assumptions(&assumptions);
        let result = self.solver.solve();
        self.solver.pop_assumptions(base);
        match result {
            Ok(Certificate::SAT(model)) => {
                let solution = self.add_solver_solution(model);
                let config = &mut self.current[k];
                for l in config.added_literals()[old..].iter() {
                    self.index.set(config.id, *l);
                }
                config.update_solution_list(old);
                config.push_solution(solution);
                true
            }
            _ => {
                self.current[k].reset_to(old);
                false
            }
        }
    }
    /// open a configuration for the combination.
    fn new_configuration(&mut self, lits: &[Lit]) {
        if self.max_sample_size() <= self.current.len() {
            self.over_limit = true;
            return;
        }
        let mut config = match self.trial.take() {
            Some(trial) => trial,
            None => match PartialConfiguration::new(0, true, Arc::clone(&self.mig), lits) {
                Ok(config) => config,
                Err(_) => return,
            },
        };
        config.id = self.current.len();
        config.init_solution_list(&self.cache);
        if config.is_complete() {
            config.clear_solutions();
        }
        self.index.set_all(config.id, config.model());
        debug!(
            id = config.id,
            literals = config.count_literals(),
            solutions = config.solutions().len(),
            cached = self.cache.len(),
            "new configuration"
        );
        self.current.push(config);
        self.sort_current();
    }
}

/// return a full assignment which extends the configuration.
fn auto_complete<S: SatSolverIF>(
    solver: &mut S,
    config: &PartialConfiguration,
) -> Result<Vec<Lit>, SamplingError> {
    if !config.is_open() {
        return Ok(config.literals());
    }
    if let Some(solution) = config.first_solution() {
        return Ok(solution.to_vec());
    }
    let base = solver.num_assumptions();
    solver.push_assumptions(config.added_literals());
    let result = solver.solve();
    solver.pop_assumptions(base);
    match result {
        Ok(Certificate::SAT(model)) => Ok(model),
        Ok(Certificate::UNSAT) | Err(SolverError::Inconsistent) => {
            Err(SamplingError::Inconsistent { id: config.id })
        }
        Err(_) => Err(SamplingError::TimeOut),
    }
}
