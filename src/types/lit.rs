/// Literal as a signed integer: the magnitude is the variable id (1-based),
/// the sign is the polarity. `0` is not a literal.
pub type Lit = i32;

/// Variable index, 0-based.
pub type VarId = usize;

/// API for literal encodings.
///
/// # Examples
///
/// ```
/// use yasa::types::*;
/// assert_eq!((-1 as Lit).vertex(), 0);
/// assert_eq!(( 1 as Lit).vertex(), 1);
/// assert_eq!((-2 as Lit).vertex(), 2);
/// assert_eq!(( 2 as Lit).vertex(), 3);
/// assert_eq!(lit_of_vertex(3), 2);
/// assert_eq!((-5 as Lit).vi(), 4);
/// ```
pub trait LitIF {
    /// return the 0-based variable index.
    fn vi(self) -> VarId;
    /// return the index of the vertex for this literal:
    /// `2 * vi` for a negative literal and `2 * vi + 1` for a positive one.
    /// The complement of vertex `x` is `x ^ 1`.
    fn vertex(self) -> usize;
    /// return `true` if the literal is positive.
    fn is_positive(self) -> bool;
}

impl LitIF for Lit {
    #[inline]
    fn vi(self) -> VarId {
        self.unsigned_abs() as usize - 1
    }
    #[inline]
    fn vertex(self) -> usize {
        (self.vi() << 1) | (0 < self) as usize
    }
    #[inline]
    fn is_positive(self) -> bool {
        0 < self
    }
}

/// convert a vertex index back to its literal.
#[inline]
pub fn lit_of_vertex(v: usize) -> Lit {
    let var = (v >> 1) as Lit + 1;
    if v & 1 == 1 {
        var
    } else {
        -var
    }
}

/// make a literal from a 0-based variable index and a polarity.
#[inline]
pub fn lit_of(vi: VarId, positive: bool) -> Lit {
    if positive {
        vi as Lit + 1
    } else {
        -(vi as Lit + 1)
    }
}
