use {
    ahash::AHashSet,
    std::{
        fs::File,
        io::{BufRead, BufReader, BufWriter, Write},
        path::Path,
    },
    thiserror::Error,
};

pub type Clause = Vec<i32>;

/// Errors raised while building, loading or saving a `CNF`.
#[derive(Debug, Error)]
pub enum CnfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no valid 'p cnf' header found")]
    InvalidHeader,
    #[error("invalid literal '{0}'")]
    InvalidLiteral(String),
    #[error("the formula contains an empty clause")]
    EmptyClause,
}

/// A propositional formula in conjunctive normal form.
///
/// Duplicated clauses are stored once; tautologies are dropped.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CNF {
    num_vars: u32,
    clauses: Vec<Clause>,
    cls_map: AHashSet<Clause>,
}

impl std::fmt::Display for CNF {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CNF({} vars, {} clauses)",
            self.num_vars(),
            self.num_clauses()
        )
    }
}

pub trait CnfIf: Sized {
    type Error;
    /// Add a `Clause`. A clause already in it, or a tautology, is ignored.
    fn add_clause<C: AsRef<[i32]>>(&mut self, clause: C) -> Result<&mut CNF, Self::Error>;
    fn from_vec_i32<V: AsRef<[Clause]>>(clauses: V) -> Result<Self, Self::Error>;
    fn load(file: &Path) -> Result<Self, Self::Error>;
    fn num_vars(&self) -> u32;
    fn num_clauses(&self) -> usize;
    fn clauses(&self) -> &[Clause];
    fn save(&self, file: &Path) -> Result<(), Self::Error>;
    fn dump_to_string(&self) -> String;
}

impl CNF {
    /// make an empty formula over `num_vars` variables. Variables which
    /// appear in no clause are free.
    pub fn with_vars(num_vars: u32) -> Self {
        CNF {
            num_vars,
            ..CNF::default()
        }
    }
}

impl CnfIf for CNF {
    type Error = CnfError;
    fn add_clause<C: AsRef<[i32]>>(&mut self, clause: C) -> Result<&mut CNF, Self::Error> {
        let c = clause.as_ref();
        if c.is_empty() {
            return Err(CnfError::EmptyClause);
        }
        if let Some(l) = c.iter().find(|l| **l == 0 || **l == i32::MIN) {
            return Err(CnfError::InvalidLiteral(l.to_string()));
        }
        let mut cc = c.to_vec();
        cc.sort_unstable();
        cc.dedup();
        if cc.iter().any(|l| cc.binary_search(&-l).is_ok()) {
            return Ok(self);
        }
        if self.cls_map.contains(&cc) {
            return Ok(self);
        }
        self.num_vars = self
            .num_vars
            .max(cc.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0));
        let mut kept: Clause = Vec::with_capacity(cc.len());
        for l in c.iter() {
            if !kept.contains(l) {
                kept.push(*l);
            }
        }
        self.cls_map.insert(cc);
        self.clauses.push(kept);
        Ok(self)
    }
    fn from_vec_i32<V: AsRef<[Clause]>>(clauses: V) -> Result<Self, Self::Error> {
        let mut cnf: CNF = CNF::default();
        for ref_c in clauses.as_ref().iter() {
            cnf.add_clause(ref_c)?;
        }
        Ok(cnf)
    }
    fn load(path: &Path) -> Result<Self, Self::Error> {
        let fs = File::open(path)?;
        let mut reader = BufReader::new(fs);
        let mut buf = String::new();
        let mut found_valid_header = false;
        let mut cnf = CNF::default();
        let mut vec: Vec<i32> = Vec::new();
        loop {
            buf.clear();
            match reader.read_line(&mut buf)? {
                0 => break,
                _ if buf.starts_with('c') || buf.starts_with('%') => continue,
                _ if found_valid_header => {
                    for seg in buf.split_whitespace() {
                        match seg.parse::<i32>() {
                            Ok(0) => {
                                if !vec.is_empty() {
                                    cnf.add_clause(&vec)?;
                                }
                                vec.clear();
                            }
                            Ok(l) => vec.push(l),
                            Err(_) => return Err(CnfError::InvalidLiteral(seg.to_string())),
                        }
                    }
                }
                _ => {
                    let mut iter = buf.split_whitespace();
                    if iter.next() == Some("p") && iter.next() == Some("cnf") {
                        if let Some(Ok(v)) = iter.next().map(|s| s.parse::<u32>()) {
                            if iter.next().map(|s| s.parse::<usize>()).is_some() {
                                cnf.num_vars = v;
                                found_valid_header = true;
                            }
                        }
                    }
                }
            }
        }
        if !found_valid_header {
            return Err(CnfError::InvalidHeader);
        }
        if !vec.is_empty() {
            cnf.add_clause(&vec)?;
        }
        Ok(cnf)
    }
    fn num_vars(&self) -> u32 {
        self.num_vars
    }
    fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
    fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
    fn save(&self, file: &Path) -> Result<(), Self::Error> {
        let mut buf = BufWriter::new(File::create(file)?);
        buf.write_all(self.dump_to_string().as_bytes())?;
        Ok(())
    }
    fn dump_to_string(&self) -> String {
        format!(
            "p cnf {} {}\n{}",
            self.num_vars,
            self.clauses.len(),
            self.clauses
                .iter()
                .map(|cls| {
                    let mut line = cls
                        .iter()
                        .map(|ch| format!("{ch}"))
                        .collect::<Vec<_>>()
                        .join(" ");
                    line.push_str(" 0");
                    line
                })
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}
