use std::fmt;

/// Restart intervals scaled by `unit`: 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, ...
#[derive(Clone, Debug)]
pub struct LubySeries {
    index: usize,
    unit: usize,
}

impl fmt::Display for LubySeries {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Luby[index:{}, unit:{}]", self.index, self.unit)
    }
}

impl Iterator for LubySeries {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        // find the finite subsequence that contains `index`, and its size.
        let mut size = 1;
        let mut seq = 0;
        while size < self.index + 1 {
            seq += 1;
            size = 2 * size + 1;
        }
        let mut x = self.index;
        while size - 1 != x {
            size = (size - 1) >> 1;
            seq -= 1;
            x %= size;
        }
        self.index += 1;
        Some(self.unit.saturating_mul(1 << seq))
    }
}

impl LubySeries {
    pub fn new(unit: usize) -> Self {
        LubySeries { index: 0, unit }
    }
}
