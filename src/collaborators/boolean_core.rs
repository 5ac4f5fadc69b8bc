/*!
The interface a CDCL boolean core exposes to the context (spec §6: "Boolean core →
exposes literal allocation, clause addition, assignment query, and push/pop level
tracking"). The concrete engine is out of scope (spec §1); this is only the seam the
[internalizer](crate::internalizer) and [context](crate::context) call through.
*/

use crate::normalizer::analysis::EvalContext;
use crate::structures::term::TermId;

/// A boolean-core literal: a signed atom index, following the DIMACS convention the
/// teacher's own `CLiteral` uses (positive for the atom, negative for its negation).
/// `0` is never a valid literal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Literal(i64);

impl Literal {
    /// Builds a literal from a nonzero atom index and a polarity.
    pub fn new(atom: u64, positive: bool) -> Self {
        let magnitude = atom as i64;
        debug_assert!(magnitude > 0, "atom indices are strictly positive");
        Literal(if positive { magnitude } else { -magnitude })
    }

    pub fn atom(self) -> u64 {
        self.0.unsigned_abs()
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn negate(self) -> Literal {
        Literal(-self.0)
    }
}

impl std::ops::Neg for Literal {
    type Output = Literal;
    fn neg(self) -> Literal {
        self.negate()
    }
}

/// The boolean core's view of the bit-vector variable a `bit_select` refers back to:
/// the normalizer asks this through [EvalContext], which every `BooleanCore`
/// implementation must also provide so normalization can consult the live trail.
pub trait BooleanCore: EvalContext {
    /// Allocates a fresh literal (its positive presentation), distinct from every
    /// previously allocated one.
    fn alloc_literal(&mut self) -> Literal;

    /// Adds a clause (disjunction of literals) to the core.
    fn add_clause(&mut self, clause: Vec<Literal>);

    /// The current trail assignment of a literal's atom, if determined, read
    /// through the literal's own polarity.
    fn assignment(&self, lit: Literal) -> Option<bool>;

    /// Registers the binding between a term and the bit it was internalized to, so
    /// [EvalContext::bit_value] can answer for it.
    fn bind_bit(&mut self, base: TermId, index: u32, lit: Literal);

    /// Pushes a fresh assertion level, mirroring the assertion stack's own push.
    fn push_level(&mut self);

    /// Pops back to `level` (0 is the base level).
    fn pop_to_level(&mut self, level: u32);

    /// The current level.
    fn current_level(&self) -> u32;
}
