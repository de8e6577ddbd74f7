//! Module `sample` provides configurations, their index and the output.
/// Module `bit_index` provides the per-literal index over configurations.
mod bit_index;
/// Module `configuration` provides configurations under construction.
mod configuration;
/// Module `solution_cache` provides the rolling cache of solver solutions.
mod solution_cache;

pub use self::{
    bit_index::SampleBitIndex, configuration::PartialConfiguration,
    solution_cache::SolutionCache,
};

use {
    crate::types::*,
    std::{
        fmt,
        fs::File,
        io::{BufRead, BufReader, BufWriter, Write},
        path::Path,
        sync::Arc,
    },
};

/// A full assignment found by the solver: one literal per var.
pub type Solution = Arc<[Lit]>;

/// The result of sampling.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sample {
    configurations: Vec<Vec<Lit>>,
    over_limit: bool,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.configurations.iter() {
            for l in c.iter() {
                write!(f, "{l} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

impl Sample {
    pub fn new(configurations: Vec<Vec<Lit>>, over_limit: bool) -> Self {
        Sample {
            configurations,
            over_limit,
        }
    }
    pub fn len(&self) -> usize {
        self.configurations.len()
    }
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Vec<Lit>> + '_ {
        self.configurations.iter()
    }
    pub fn configurations(&self) -> &[Vec<Lit>] {
        &self.configurations
    }
    /// return `true` if some combination was left uncovered because
    /// the configuration limit was reached.
    pub fn is_over_limit(&self) -> bool {
        self.over_limit
    }
    pub fn into_configurations(self) -> Vec<Vec<Lit>> {
        self.configurations
    }
    /// read configurations: literals separated by spaces, each line terminated by 0.
    /// Lines starting with 'c' are comments.
    pub fn load(path: &Path) -> Result<Vec<Vec<Lit>>, CnfError> {
        let reader = BufReader::new(File::open(path)?);
        let mut configurations: Vec<Vec<Lit>> = Vec::new();
        let mut current: Vec<Lit> = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.starts_with('c') {
                continue;
            }
            for seg in line.split_whitespace() {
                match seg.parse::<Lit>() {
                    Ok(0) => configurations.push(std::mem::take(&mut current)),
                    Ok(l) => current.push(l),
                    Err(_) => return Err(CnfError::InvalidLiteral(seg.to_string())),
                }
            }
        }
        if !current.is_empty() {
            configurations.push(current);
        }
        Ok(configurations)
    }
    /// write configurations in the format of `load`.
    pub fn save(&self, path: &Path) -> Result<(), CnfError> {
        let mut buf = BufWriter::new(File::create(path)?);
        write!(buf, "{self}")?;
        buf.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Sample {
    type Item = &'a Vec<Lit>;
    type IntoIter = std::slice::Iter<'a, Vec<Lit>>;
    fn into_iter(self) -> Self::IntoIter {
        self.configurations.iter()
    }
}
