//! Rolling cache of solver solutions
use {
    super::{SampleBitIndex, Solution},
    crate::types::*,
};

/// The most recent solutions found by the solver, at most `capacity` of them.
/// The oldest one is evicted before a new one is stored.
#[derive(Clone, Debug, Default)]
pub struct SolutionCache {
    capacity: usize,
    slots: Vec<Solution>,
    /// the slot to be overwritten next once full
    next: usize,
    index: SampleBitIndex,
}

impl SolutionCache {
    pub fn new(num_vars: usize, capacity: usize) -> Self {
        SolutionCache {
            capacity,
            slots: Vec::new(),
            next: 0,
            index: SampleBitIndex::new(num_vars),
        }
    }
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    /// store a solution, evicting the oldest one if full.
    /// Nothing is stored with no capacity.
    pub fn push(&mut self, solution: Solution) {
        if self.capacity == 0 {
            return;
        }
        let slot = if self.slots.len() < self.capacity {
            self.slots.push(solution);
            self.slots.len() - 1
        } else {
            let slot = self.next;
            self.index.clear(slot);
            self.slots[slot] = solution;
            self.next = (slot + 1) % self.capacity;
            slot
        };
        self.index.set_all(slot, &self.slots[slot]);
    }
    /// return an iterator over the stored solutions from the oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Solution> + '_ {
        let (newer, older) = self.slots.split_at(self.next);
        older.iter().chain(newer.iter())
    }
    /// return `true` if a stored solution contains all `lits`.
    pub fn contains(&self, lits: &[Lit]) -> bool {
        self.index.test(lits)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::Arc};

    #[test]
    fn test_eviction() {
        let mut cache = SolutionCache::new(2, 2);
        cache.push(Arc::from(vec![1, 2]));
        cache.push(Arc::from(vec![1, -2]));
        assert!(cache.contains(&[1, 2]));
        cache.push(Arc::from(vec![-1, -2]));
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&[1, 2]));
        assert!(cache.contains(&[-1]));
        assert_eq!(
            cache.iter().map(|s| s.to_vec()).collect::<Vec<_>>(),
            vec![vec![1, -2], vec![-1, -2]]
        );
        cache.push(Arc::from(vec![-1, 2]));
        assert_eq!(
            cache.iter().map(|s| s.to_vec()).collect::<Vec<_>>(),
            vec![vec![-1, -2], vec![-1, 2]]
        );
        assert!(!cache.contains(&[1, 2]));
    }
    #[test]
    fn test_no_capacity() {
        let mut cache = SolutionCache::new(2, 0);
        cache.push(Arc::from(vec![1, 2]));
        assert!(cache.is_empty());
        assert!(!cache.contains(&[1]));
    }
}
