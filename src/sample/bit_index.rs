//! per-literal bitsets over configuration slots
use crate::types::*;

const WORD: usize = u64::BITS as usize;

/// An index from literals to the slots containing them.
///
/// # Example
///
/// ```
/// use yasa::sample::SampleBitIndex;
/// let mut index = SampleBitIndex::new(3);
/// index.set_all(0, &[1, -2, 3]);
/// index.set_all(1, &[-1, -2]);
/// assert!(index.test(&[1, 3]));
/// assert!(index.test(&[-1, -2]));
/// assert!(!index.test(&[-1, 3]));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SampleBitIndex {
    /// indexed by [`LitIF::vertex`]
    bits: Vec<Vec<u64>>,
    num_slots: usize,
}

impl SampleBitIndex {
    pub fn new(num_vars: usize) -> Self {
        SampleBitIndex {
            bits: vec![Vec::new(); 2 * num_vars],
            num_slots: 0,
        }
    }
    /// build an index in which slot `i` holds the literals of the `i`-th item.
    pub fn from_configurations<'a, I>(num_vars: usize, configurations: I) -> Self
    where
        I: IntoIterator<Item = &'a [Lit]>,
    {
        let mut index = SampleBitIndex::new(num_vars);
        for (slot, lits) in configurations.into_iter().enumerate() {
            index.reserve(slot);
            index.set_all(slot, lits);
        }
        index
    }
    /// return the number of slots which were touched.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }
    /// make `slot` a valid slot even if it holds nothing.
    pub fn reserve(&mut self, slot: usize) {
        self.num_slots = self.num_slots.max(slot + 1);
    }
    /// mark `slot` as containing `lit`.
    pub fn set(&mut self, slot: usize, lit: Lit) {
        debug_assert_ne!(lit, 0);
        self.reserve(slot);
        let v = &mut self.bits[lit.vertex()];
        let w = slot / WORD;
        if v.len() <= w {
            v.resize(w + 1, 0);
        }
        v[w] |= 1 << (slot % WORD);
    }
    /// mark `slot` as containing all non-zero literals in `lits`.
    pub fn set_all(&mut self, slot: usize, lits: &[Lit]) {
        self.reserve(slot);
        for l in lits.iter().filter(|l| **l != 0) {
            self.set(slot, *l);
        }
    }
    /// make `slot` hold nothing.
    pub fn clear(&mut self, slot: usize) {
        let w = slot / WORD;
        let mask = !(1 << (slot % WORD));
        for v in self.bits.iter_mut() {
            if let Some(word) = v.get_mut(w) {
                *word &= mask;
            }
        }
    }
    /// return `true` if a slot contains all literals in `lits`.
    pub fn test(&self, lits: &[Lit]) -> bool {
        let mut lens = lits
            .iter()
            .filter(|l| **l != 0)
            .map(|l| self.bits[l.vertex()].len());
        let Some(len) = lens.next() else {
            return 0 < self.num_slots;
        };
        let num_words = lens.fold(len, usize::min);
        (0..num_words).any(|w| {
            lits.iter()
                .filter(|l| **l != 0)
                .try_fold(!0u64, |acc, l| {
                    let acc = acc & self.bits[l.vertex()][w];
                    (acc != 0).then_some(acc)
                })
                .is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_many_slots() {
        let mut index = SampleBitIndex::new(4);
        for slot in 0..200 {
            index.set(slot, if slot % 2 == 0 { 1 } else { -1 });
        }
        index.set(130, 2);
        index.set(131, 3);
        assert_eq!(index.num_slots(), 200);
        assert!(index.test(&[1, 2]));
        assert!(index.test(&[-1, 3]));
        assert!(!index.test(&[1, 3]));
        assert!(!index.test(&[4]));
        index.clear(130);
        assert!(!index.test(&[1, 2]));
        assert!(index.test(&[1]));
        assert!(index.test(&[]));
        assert!(!SampleBitIndex::new(4).test(&[]));
    }
    #[test]
    fn test_from_configurations() {
        let configs: Vec<Vec<Lit>> = vec![vec![1, 2, 0], vec![-1, 0, 3]];
        let index = SampleBitIndex::from_configurations(3, configs.iter().map(|c| c.as_slice()));
        assert_eq!(index.num_slots(), 2);
        assert!(index.test(&[1, 2]));
        assert!(index.test(&[-1, 3, 0]));
        assert!(!index.test(&[2, 3]));
    }
}
