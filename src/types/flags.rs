use bitflags::bitflags;

/// API for object properties.
pub trait FlagIF {
    type FlagType;
    /// return true if the flag in on.
    fn is(&self, flag: Self::FlagType) -> bool;
    /// set the flag.
    fn set(&mut self, f: Self::FlagType, b: bool);
    /// toggle the flag off.
    fn turn_off(&mut self, flag: Self::FlagType);
    /// toggle the flag on.
    fn turn_on(&mut self, flag: Self::FlagType);
}

bitflags! {
    /// Misc flags used by [`PartialConfiguration`](`crate::sample::PartialConfiguration`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagConfig: u8 {
        /// the sampler may add literals to this configuration.
        const ALLOW_CHANGE = 0b0000_0001;
    }
}

bitflags! {
    /// Misc flags used by the vars of [`Solver`](`crate::solver::Solver`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagVar: u8 {
        /// the preferred polarity at decision.
        const PHASE        = 0b0000_0001;
        /// a var is checked during in the current conflict analysis.
        const CA_SEEN      = 0b0000_0010;
    }
}
