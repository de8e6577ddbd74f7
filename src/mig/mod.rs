//! Module `mig` provides the Modal Implication Graph and propagation over it.
/// Module `build` computes the graph from a formula.
mod build;
/// Module `visitor` provides incremental propagation sessions.
mod visitor;

pub use self::{build::MigBuilder, visitor::Visitor};

use {
    crate::types::*,
    std::{fmt, slice::Iter},
};

/// A vertex of the graph, one per literal.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Vertex {
    /// the literal this vertex stands for
    pub(crate) lit: Lit,
    /// `true` if the literal holds in every solution
    pub(crate) core: bool,
    /// literals forced whenever `lit` is set; transitively closed
    pub(crate) strong: Vec<Lit>,
    /// clauses which lose a candidate literal whenever `lit` is set
    pub(crate) weak: Vec<usize>,
}

impl Vertex {
    pub fn lit(&self) -> Lit {
        self.lit
    }
    pub fn is_core(&self) -> bool {
        self.core
    }
    pub fn strong_edges(&self) -> &[Lit] {
        &self.strong
    }
    pub fn weak_edges(&self) -> &[usize] {
        &self.weak
    }
}

/// Precomputed propagation structure over the literals of a formula.
/// It is immutable once built and shared by all [`Visitor`]s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModalImplicationGraph {
    pub(crate) num_vars: usize,
    /// indexed by [`LitIF::vertex`]
    pub(crate) vertices: Vec<Vertex>,
    /// simplified clauses with three or more literals
    pub(crate) clauses: Vec<Vec<Lit>>,
    /// core literals in the order found
    pub(crate) core: Vec<Lit>,
}

impl fmt::Display for ModalImplicationGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MIG(vars:{}, core:{}, strong:{}, weak:{})",
            self.num_vars,
            self.core.len(),
            self.num_strong_edges(),
            self.clauses.len(),
        )
    }
}

impl ModalImplicationGraph {
    /// make a graph over `num_vars` free variables.
    pub fn with_vars(num_vars: usize) -> Self {
        ModalImplicationGraph {
            num_vars,
            vertices: (0..2 * num_vars)
                .map(|v| Vertex {
                    lit: lit_of_vertex(v),
                    ..Vertex::default()
                })
                .collect(),
            clauses: Vec::new(),
            core: Vec::new(),
        }
    }
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }
    pub fn vertex(&self, lit: Lit) -> &Vertex {
        &self.vertices[lit.vertex()]
    }
    pub fn iter(&self) -> Iter<'_, Vertex> {
        self.vertices.iter()
    }
    pub fn core_literals(&self) -> &[Lit] {
        &self.core
    }
    /// return `true` if the variable is fixed in every solution.
    pub fn is_core_var(&self, vi: VarId) -> bool {
        self.vertices[vi << 1].core || self.vertices[(vi << 1) | 1].core
    }
    /// return an iterator over the variables which aren't fixed.
    pub fn non_core_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        (0..self.num_vars).filter(|vi| !self.is_core_var(*vi))
    }
    /// return the clauses used by weak propagation.
    pub fn weak_clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }
    pub fn num_strong_edges(&self) -> usize {
        self.vertices.iter().map(|v| v.strong.len()).sum()
    }
}
