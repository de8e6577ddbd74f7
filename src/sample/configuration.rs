//! Configurations under construction
use {
    super::{Solution, SolutionCache},
    crate::{mig::ModalImplicationGraph, mig::Visitor, types::*},
    std::{fmt, sync::Arc},
};

/// A configuration under construction: a [`Visitor`] holding its literals
/// and the cached solutions which agree with all of them.
#[derive(Clone)]
pub struct PartialConfiguration {
    /// the slot in the sample bit index
    pub(crate) id: usize,
    flags: FlagConfig,
    visitor: Visitor,
    solutions: Vec<Solution>,
}

impl fmt::Debug for PartialConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PartialConfiguration#{}{{literals: {}, flags: {:?}, solutions: {}}}",
            self.id,
            self.count_literals(),
            self.flags,
            self.solutions.len(),
        )
    }
}

impl FlagIF for PartialConfiguration {
    type FlagType = FlagConfig;
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

impl PartialConfiguration {
    /// make a configuration holding `lits` and their implications.
    ///
    /// # Errors
    ///
    /// `Contradiction` if `lits` can't hold together.
    pub fn new(
        id: usize,
        allow_change: bool,
        mig: Arc<ModalImplicationGraph>,
        lits: &[Lit],
    ) -> Result<Self, Contradiction> {
        let mut flags = FlagConfig::empty();
        flags.set(FlagConfig::ALLOW_CHANGE, allow_change);
        Ok(PartialConfiguration {
            id,
            flags,
            visitor: Visitor::with_literals(mig, lits)?,
            solutions: Vec::new(),
        })
    }
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn allow_change(&self) -> bool {
        self.is(FlagConfig::ALLOW_CHANGE)
    }
    pub fn is_complete(&self) -> bool {
        self.visitor.is_complete()
    }
    /// return `true` if more literals may be added to it.
    pub fn is_open(&self) -> bool {
        self.allow_change() && !self.is_complete()
    }
    /// return the number of assigned vars including core ones.
    pub fn count_literals(&self) -> usize {
        self.visitor.num_assigned()
    }
    /// return the literals added since creation, in order.
    pub fn added_literals(&self) -> &[Lit] {
        self.visitor.added_literals()
    }
    pub fn num_added_literals(&self) -> usize {
        self.visitor.num_added_literals()
    }
    /// return the assigned literal of each var, or 0.
    pub fn model(&self) -> &[Lit] {
        self.visitor.model()
    }
    /// return the assigned literals.
    pub fn literals(&self) -> Vec<Lit> {
        self.model().iter().filter(|l| **l != 0).copied().collect()
    }
    /// add `lits` and their implications. Returns the number of
    /// added literals before the call, to be used by `reset_to`.
    /// On a contradiction, it is kept intact.
    pub fn extend(&mut self, lits: &[Lit]) -> Result<usize, Contradiction> {
        let old = self.visitor.num_added_literals();
        self.visitor.propagate(lits)?;
        Ok(old)
    }
    /// undo the literals added after the first `keep` ones.
    pub fn reset_to(&mut self, keep: usize) {
        self.visitor.reset(keep);
    }
    /// return `true` if no literal in `lits` is negated in it.
    pub fn accepts(&self, lits: &[Lit]) -> bool {
        let model = self.model();
        lits.iter().all(|l| model[l.vi()] != -*l)
    }
    /// return `true` if `solution` agrees with all assigned literals.
    pub fn compatible_with(&self, solution: &[Lit]) -> bool {
        self.model()
            .iter()
            .zip(solution.iter())
            .all(|(m, s)| *m == 0 || m == s)
    }
    /// return `true` if a cached solution contains all `lits`.
    pub fn has_solution_for(&self, lits: &[Lit]) -> bool {
        self.solutions
            .iter()
            .any(|s| lits.iter().all(|l| s[l.vi()] == *l))
    }
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }
    pub fn first_solution(&self) -> Option<&Solution> {
        self.solutions.first()
    }
    pub fn push_solution(&mut self, solution: Solution) {
        self.solutions.push(solution);
    }
    pub fn clear_solutions(&mut self) {
        self.solutions = Vec::new();
    }
    /// collect the cached solutions which agree with it.
    pub fn init_solution_list(&mut self, cache: &SolutionCache) {
        self.solutions = cache
            .iter()
            .filter(|s| self.compatible_with(s))
            .cloned()
            .collect();
    }
    /// drop the solutions which disagree with the literals added after `from`.
    pub fn update_solution_list(&mut self, from: usize) {
        let PartialConfiguration {
            ref visitor,
            ref mut solutions,
            ..
        } = self;
        let added = &visitor.added_literals()[from..];
        solutions.retain(|s| added.iter().all(|l| s[l.vi()] == *l));
    }
}
