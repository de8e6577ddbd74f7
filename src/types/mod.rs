//! Module `types' provides various building blocks, including
//! some common traits.

/// methods on flags used in configurations and solver vars
pub mod flags;
/// methods on literals
pub mod lit;

pub use self::{flags::*, lit::*};

pub use {
    crate::{config::Config, sample::Sample},
    yasa_cnf::{Clause, CnfError, CnfIf, CNF},
};

use thiserror::Error;

/// API for object instantiation based on `Config` and `CNF`.
/// This is implemented by the modules which are sized by a formula.
///
/// # Example
///
/// ```
/// use yasa::{solver::Solver, types::*};
/// let cnf = CNF::from_vec_i32(vec![vec![1, 2], vec![-1, 3]]).unwrap();
/// let s = Solver::instantiate(&Config::default(), &cnf);
/// assert_eq!(yasa::solver::SatSolverIF::num_vars(&s), 3);
///```
pub trait Instantiate {
    /// make and return an object from `Config` and `CNF`.
    fn instantiate(config: &Config, cnf: &CNF) -> Self;
}

/// The signal that an assignment is logically impossible.
/// It is an expected outcome of propagation, not a failure.
#[derive(Clone, Copy, Debug, Default, Eq, Error, PartialEq)]
#[error("contradiction")]
pub struct Contradiction;

/// Return type of propagation
pub type PropagationResult = Result<(), Contradiction>;

/// Internal errors of the backing solver.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SolverError {
    /// A literal out of the range of the formula. '0' is an example.
    #[error("invalid literal {0}")]
    InvalidLiteral(Lit),
    /// The formula is unsatisfiable at the root level.
    #[error("inconsistent formula")]
    Inconsistent,
    /// The conflict budget of a single call was exhausted.
    #[error("time out")]
    TimeOut,
}

/// A Return type used by solver functions.
pub type MaybeInconsistent = Result<(), SolverError>;

/// Errors surfaced by sampling.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("initial configuration #{0} contradicts the formula")]
    InvalidInitialSample(usize),
    #[error("the formula is unsatisfiable")]
    Unsatisfiable,
    #[error("configuration #{id} can't be completed to a solution")]
    Inconsistent { id: usize },
    #[error("the solver gave up")]
    TimeOut,
    #[error("sampling was cancelled")]
    Cancelled,
    #[error("{cause}; returned a degraded sample of {} configurations", partial.len())]
    Degraded {
        cause: Box<SamplingError>,
        partial: Sample,
    },
    #[error(transparent)]
    Cnf(#[from] CnfError),
}

impl SamplingError {
    /// return the degraded sample carried by a fatal error, if any.
    pub fn partial_sample(&self) -> Option<&Sample> {
        match self {
            SamplingError::Degraded { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_error() {
        let e = SamplingError::Degraded {
            cause: Box::new(SamplingError::TimeOut),
            partial: Sample::new(vec![vec![1, -2]], false),
        };
        assert_eq!(e.partial_sample().map(|s| s.len()), Some(1));
        assert_eq!(
            e.to_string(),
            "the solver gave up; returned a degraded sample of 1 configurations"
        );
    }
}
