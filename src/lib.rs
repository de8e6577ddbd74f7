//! A greedy t-wise sampler of configurations for a propositional formula.
//!
//! Given a formula in CNF and a strength `t`, `yasa` builds a small set of
//! full assignments (a *sample*) such that every combination of `t`
//! literals over distinct variables which occurs in some solution occurs in
//! at least one assignment of the sample.
//!
//! # Example
//!
//! ```
//! use yasa::{validator, Config, CnfIf, Yasa, CNF};
//! let cnf = CNF::from_vec_i32(vec![vec![1, 2, 3], vec![-1, -2]]).unwrap();
//! let config = Config { t: 2, ..Config::default() };
//! let mut sampler = Yasa::new(config, &cnf).unwrap();
//! let sample = sampler.sample().unwrap();
//! for c in sample.iter() {
//!     assert!(validator::validate(&cnf, c).is_none());
//! }
//! ```
/// Module `combination` provides the combinations to cover.
pub mod combination;
/// Module `config` provides the sampler configuration and its CLI.
pub mod config;
/// Module `mig` provides the modal implication graph.
pub mod mig;
/// Module `sample` provides configurations and the sample.
pub mod sample;
/// Module `solver` provides a small CDCL solver with assumptions.
pub mod solver;
/// Module `types` provides various building blocks.
pub mod types;
/// Module `validator` checks assignments and samples.
pub mod validator;
/// Module `yasa` provides the sampler.
pub mod yasa;

pub use crate::{
    solver::{Certificate, SatSolverIF, Solver},
    types::*,
    yasa::{Monitor, Yasa},
};
