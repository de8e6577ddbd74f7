/// Crate `combination` provides the sequences of literal combinations to be covered.
use {
    crate::{mig::ModalImplicationGraph, types::*},
    rand::{rngs::StdRng, seq::SliceRandom, Rng},
    std::ops::ControlFlow,
};

/// API for a restartable sequence of literal combinations.
pub trait CombinationSpecIF {
    /// return the size of each combination.
    fn t(&self) -> usize;
    /// return the number of combinations, saturated at `usize::MAX`.
    fn total_steps(&self) -> usize;
    /// call `f` for each combination in order until it returns `ControlFlow::Break`.
    fn for_each(&self, f: &mut dyn FnMut(&[Lit]) -> ControlFlow<()>) -> ControlFlow<()>;
    /// reorder the sequence.
    fn shuffle(&mut self, rng: &mut StdRng);
}

/// All combinations of `t` literals over distinct variables.
/// The variables are enumerated as lexicographic `t`-subsets and each subset
/// yields all `2^t` polarity patterns.
///
/// # Example
///
/// ```
/// use std::ops::ControlFlow;
/// use yasa::combination::*;
/// let combinations = TWiseCombinations::new(0..3, 2);
/// assert_eq!(combinations.total_steps(), 12);
/// let mut count = 0;
/// let _ = combinations.for_each(&mut |c| {
///     assert_ne!(c[0].abs(), c[1].abs());
///     count += 1;
///     ControlFlow::Continue(())
/// });
/// assert_eq!(count, 12);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TWiseCombinations {
    /// one literal per variable; its sign is the first polarity
    literals: Vec<Lit>,
    t: usize,
}

impl TWiseCombinations {
    /// make combinations over the variables; `t` is clamped to the number of them.
    pub fn new<I: IntoIterator<Item = VarId>>(vars: I, t: usize) -> Self {
        let literals = vars
            .into_iter()
            .map(|vi| lit_of(vi, true))
            .collect::<Vec<_>>();
        let t = t.min(literals.len().max(1));
        TWiseCombinations { literals, t }
    }
    /// make combinations over the variables which aren't fixed in the graph.
    pub fn from_mig(mig: &ModalImplicationGraph, t: usize) -> Self {
        TWiseCombinations::new(mig.non_core_vars(), t)
    }
    pub fn literals(&self) -> &[Lit] {
        &self.literals
    }
}

impl CombinationSpecIF for TWiseCombinations {
    fn t(&self) -> usize {
        self.t
    }
    fn total_steps(&self) -> usize {
        let m = self.literals.len() as u128;
        let t = self.t as u128;
        if m < t || self.t == 0 {
            return 0;
        }
        let mut steps: u128 = 1;
        for i in 0..t {
            steps = match steps.checked_mul(m - i) {
                Some(s) => s / (i + 1),
                None => return usize::MAX,
            };
        }
        for _ in 0..t {
            match steps.checked_mul(2) {
                Some(s) => steps = s,
                None => return usize::MAX,
            }
        }
        usize::try_from(steps).unwrap_or(usize::MAX)
    }
    fn for_each(&self, f: &mut dyn FnMut(&[Lit]) -> ControlFlow<()>) -> ControlFlow<()> {
        let m = self.literals.len();
        let t = self.t;
        if t == 0 || m < t {
            return ControlFlow::Continue(());
        }
        let mut index: Vec<usize> = (0..t).collect();
        let mut negated: Vec<bool> = vec![false; t];
        let mut combination: Vec<Lit> = vec![0; t];
        loop {
            negated.iter_mut().for_each(|b| *b = false);
            loop {
                for k in 0..t {
                    let l = self.literals[index[k]];
                    combination[k] = if negated[k] { -l } else { l };
                }
                f(&combination)?;
                // increment the polarity pattern as a binary counter
                let Some(k) = negated.iter().rposition(|b| !*b) else {
                    break;
                };
                negated[k] = true;
                negated[k + 1..].iter_mut().for_each(|b| *b = false);
            }
            // move to the next t-subset
            let Some(i) = (0..t).rev().find(|i| index[*i] < m - t + *i) else {
                break;
            };
            index[i] += 1;
            for j in i + 1..t {
                index[j] = index[j - 1] + 1;
            }
        }
        ControlFlow::Continue(())
    }
    fn shuffle(&mut self, rng: &mut StdRng) {
        self.literals.shuffle(rng);
        for l in self.literals.iter_mut() {
            if rng.gen::<bool>() {
                *l = -*l;
            }
        }
    }
}
