//! Module `yasa` provides the greedy t-wise sampler.
/// Module `builder` provides the covering loop.
mod builder;
/// Module `monitor` provides progress and cancellation.
mod monitor;

pub use self::{builder::SampleBuilder, monitor::Monitor};

use {
    crate::{
        combination::{CombinationSpecIF, TWiseCombinations},
        mig::{MigBuilder, ModalImplicationGraph},
        solver::{SatSolverIF, Solver},
        types::*,
    },
    std::{ops::ControlFlow, sync::Arc},
    tracing::info,
};

/// The sampler: it builds a sample covering all valid combinations of
/// `t` literals, repeats the construction with shuffled combinations, and
/// returns the smallest sample with all configurations completed.
///
/// ```
/// use yasa::{types::*, yasa::Yasa};
/// let cnf = CNF::from_vec_i32(vec![vec![1, 2, 3]]).unwrap();
/// let mut yasa = Yasa::new(Config::default(), &cnf).unwrap();
/// let sample = yasa.sample().unwrap();
/// assert!(!sample.is_over_limit());
/// assert!(sample.iter().all(|c| c.len() == 3 && c.iter().any(|l| 0 < *l)));
/// ```
#[derive(Debug)]
pub struct Yasa<S = Solver, C = TWiseCombinations> {
    config: Config,
    combinations: C,
    builder: SampleBuilder<S>,
    monitor: Monitor,
}

impl Yasa<Solver, TWiseCombinations> {
    /// make a sampler for a formula.
    ///
    /// # Errors
    ///
    /// * `SamplingError::InvalidParameter` if `config` is invalid.
    /// * `SamplingError::Unsatisfiable` if the formula has no solution.
    pub fn new(config: Config, cnf: &CNF) -> Result<Self, SamplingError> {
        config.validate()?;
        let mut solver = Solver::instantiate(&config, cnf);
        let mig = MigBuilder::new(cnf).build(&mut solver)?;
        let combinations = TWiseCombinations::from_mig(&mig, config.t);
        Yasa::with_parts(config, Arc::new(mig), solver, combinations)
    }
}

/// load the formula and the initial sample named in `Config`.
impl TryFrom<Config> for Yasa<Solver, TWiseCombinations> {
    type Error = SamplingError;
    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let cnf = CNF::load(&config.cnf_file)?;
        let initial = match config.initial_sample_file.as_ref() {
            Some(path) => Sample::load(path)?,
            None => Vec::new(),
        };
        Ok(Yasa::new(config, &cnf)?.with_initial_sample(initial))
    }
}

impl<S: SatSolverIF, C: CombinationSpecIF> Yasa<S, C> {
    /// make a sampler from its collaborators. The solver must hold the
    /// formula of `mig`.
    pub fn with_parts(
        config: Config,
        mig: Arc<ModalImplicationGraph>,
        solver: S,
        combinations: C,
    ) -> Result<Self, SamplingError> {
        config.validate()?;
        let builder = SampleBuilder::new(&config, mig, solver);
        Ok(Yasa {
            config,
            combinations,
            builder,
            monitor: Monitor::default(),
        })
    }
    /// set configurations which every pass starts from.
    /// Each one is a list of literals; 0 is ignored.
    pub fn with_initial_sample(mut self, sample: Vec<Vec<Lit>>) -> Self {
        self.builder.set_initial_sample(sample);
        self
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn mig(&self) -> &Arc<ModalImplicationGraph> {
        &self.builder.mig
    }
    /// return a handle to observe or cancel sampling.
    pub fn monitor(&self) -> Monitor {
        self.monitor.clone()
    }
    /// return `true` if the retained sample missed some combinations
    /// because of the configuration limit.
    pub fn is_over_limit(&self) -> bool {
        self.builder.best_over_limit()
    }
    /// return the size of the retained sample after each finished pass.
    pub fn best_sample_sizes(&self) -> &[usize] {
        self.builder.history()
    }
    /// build and return a sample. Each call starts from scratch.
    /// A cancel request stops the running call, or the next one if none runs.
    ///
    /// # Errors
    ///
    /// * `SamplingError::Cancelled` if cancelled through a [`Monitor`].
    ///   `intermediate_result` returns the best sample of the finished passes.
    /// * `SamplingError::InvalidInitialSample` on a broken initial configuration.
    /// * `SamplingError::Degraded` if a configuration can't be completed.
    pub fn sample(&mut self) -> Result<Sample, SamplingError> {
        let result = self.run_passes();
        self.monitor.resume();
        result?;
        self.builder.finalize()
    }
    fn run_passes(&mut self) -> Result<(), SamplingError> {
        let passes = self.config.num_passes();
        let Yasa {
            ref mut builder,
            ref mut combinations,
            ref monitor,
            ..
        } = self;
        monitor.start(combinations.total_steps().saturating_mul(passes));
        builder.restart();
        builder.init_sample()?;
        monitor.next_pass();
        let flow = combinations.for_each(&mut |lits| {
            if monitor.is_cancelled() {
                return ControlFlow::Break(());
            }
            monitor.step();
            builder.cover(lits);
            ControlFlow::Continue(())
        });
        if flow.is_break() {
            return Err(SamplingError::Cancelled);
        }
        finish_pass(builder, 1);
        if !builder.is_over_limit() && 1 < passes {
            builder.index_best();
            for pass in 2..=passes {
                combinations.shuffle(&mut builder.rng);
                builder.init_sample()?;
                monitor.next_pass();
                let flow = combinations.for_each(&mut |lits| {
                    if monitor.is_cancelled() {
                        return ControlFlow::Break(());
                    }
                    monitor.step();
                    builder.recover(lits);
                    ControlFlow::Continue(())
                });
                if flow.is_break() {
                    return Err(SamplingError::Cancelled);
                }
                finish_pass(builder, pass);
            }
        }
        monitor.finish();
        Ok(())
    }
    /// return the best sample of the finished passes, completed.
    /// The sample is empty if no pass has finished.
    pub fn intermediate_result(&mut self) -> Result<Sample, SamplingError> {
        self.builder.finalize()
    }
}

fn finish_pass<S: SatSolverIF>(builder: &mut SampleBuilder<S>, pass: usize) {
    let size = builder.current_len();
    let over_limit = builder.is_over_limit();
    builder.set_best();
    info!(
        pass,
        size,
        best = builder.best_len().unwrap_or(0),
        over_limit,
        "finished a pass"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters() {
        let cnf = CNF::from_vec_i32(vec![vec![1, 2]]).expect("valid cnf");
        let config = Config {
            t: 0,
            ..Config::default()
        };
        assert!(matches!(
            Yasa::new(config, &cnf),
            Err(SamplingError::InvalidParameter(_))
        ));
        let config = Config {
            iterations: 0,
            ..Config::default()
        };
        assert!(matches!(
            Yasa::new(config, &cnf),
            Err(SamplingError::InvalidParameter(_))
        ));
    }
    #[test]
    fn test_unsatisfiable_formula() {
        let cnf = CNF::from_vec_i32(vec![vec![1], vec![-1, 2], vec![-2]]).expect("valid cnf");
        assert!(matches!(
            Yasa::new(Config::default(), &cnf),
            Err(SamplingError::Unsatisfiable)
        ));
    }
    #[test]
    fn test_cancel_before_start() {
        let cnf = CNF::from_vec_i32(vec![vec![1, 2, 3]]).expect("valid cnf");
        let mut yasa = Yasa::new(Config::default(), &cnf).expect("satisfiable");
        yasa.monitor().cancel();
        assert!(matches!(yasa.sample(), Err(SamplingError::Cancelled)));
        assert_eq!(yasa.intermediate_result().map(|s| s.len()).ok(), Some(0));
        assert!(yasa.best_sample_sizes().is_empty());
        assert!(!yasa.monitor().is_cancelled());
        assert!(yasa.sample().is_ok());
        assert_eq!(yasa.best_sample_sizes().len(), 1);
    }
    #[test]
    fn test_sample_twice() {
        let cnf = CNF::from_vec_i32(vec![vec![1, 2, 3], vec![-3, 4]]).expect("valid cnf");
        let config = Config {
            iterations: 2,
            ..Config::default()
        };
        let mut yasa = Yasa::new(config, &cnf).expect("satisfiable");
        let monitor = yasa.monitor();
        assert!(yasa.sample().is_ok());
        assert_eq!(yasa.best_sample_sizes().len(), 2);
        assert!(yasa.sample().is_ok());
        assert_eq!(yasa.best_sample_sizes().len(), 2);
        assert_eq!(monitor.current_pass(), 2);
    }
    #[test]
    fn test_progress_over_limit() {
        let config = Config {
            iterations: 3,
            configuration_limit: 1,
            ..Config::default()
        };
        let mut yasa = Yasa::new(config, &CNF::with_vars(4)).expect("satisfiable");
        let monitor = yasa.monitor();
        let sample = yasa.sample().expect("completable");
        assert!(sample.is_over_limit());
        assert_eq!(monitor.current_pass(), 1);
        assert_eq!(monitor.total_steps(), 3 * 24);
        assert_eq!(monitor.current_step(), monitor.total_steps());
        assert_eq!(yasa.best_sample_sizes(), &[1]);
    }
    #[test]
    fn test_progress() {
        let cnf = CNF::from_vec_i32(vec![vec![1, 2, 3], vec![-3, 4]]).expect("valid cnf");
        let config = Config {
            iterations: 3,
            ..Config::default()
        };
        let mut yasa = Yasa::new(config, &cnf).expect("satisfiable");
        let monitor = yasa.monitor();
        let sample = yasa.sample().expect("completable");
        assert_eq!(monitor.total_steps(), 3 * 24);
        assert_eq!(monitor.current_step(), monitor.total_steps());
        assert_eq!(monitor.current_pass(), 3);
        assert_eq!(yasa.best_sample_sizes().len(), 3);
        assert_eq!(yasa.best_sample_sizes().last(), Some(&sample.len()));
    }
}
