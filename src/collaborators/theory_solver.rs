/*!
The interface each theory solver exposes to the context (spec §6: "Theory solvers →
each exposes `assert_atom`, `propagate`, `check`, `backtrack_to_level`,
`build_model`"). Concrete theory solvers (simplex, E-graph, array solver, the
bit-vector bit-blaster) are out of scope (spec §1); this is only the seam the
[internalizer](crate::internalizer) and [context](crate::context) call through.
*/

use crate::collaborators::boolean_core::Literal;
use crate::structures::bv_value::BvValue;
use crate::structures::kind::BvCompareOp;
use crate::structures::term::TermId;

/// A normalized bit-vector (or other theory) atom handed to a theory solver for
/// assertion, keyed to the boolean-core literal that carries its truth value.
///
/// `lhs`/`rhs` are the normalized operand ids, for bookkeeping and model
/// extraction; `lhs_const`/`rhs_const` carry the operand's value when the
/// internalizer's normalization already reduced that side to a `bv_constant`, so a
/// theory solver can act on ground (in)equalities without needing its own access to
/// the term store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TheoryAtom {
    /// `lhs = rhs`, both already normalized to the same width.
    Eq {
        lhs: TermId,
        rhs: TermId,
        lhs_const: Option<BvValue>,
        rhs_const: Option<BvValue>,
    },

    /// A bit-vector comparison atom.
    Compare {
        op: BvCompareOp,
        lhs: TermId,
        rhs: TermId,
        lhs_const: Option<BvValue>,
        rhs_const: Option<BvValue>,
    },
}

/// The outcome of a theory solver's `check`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TheoryCheckResult {
    /// The atoms asserted so far are consistent.
    Consistent,

    /// The atoms asserted so far are inconsistent; `conflicting` names the
    /// boolean-core literals whose disjunction of negations the boolean core should
    /// learn as a blocking clause.
    Conflict { conflicting: Vec<Literal> },

    /// The theory could not decide within its resources (e.g. a nonlinear
    /// subproblem it declines to solve precisely).
    Unknown,
}

/// A theory solver's seam with the context (spec §6).
pub trait TheorySolver {
    /// Registers that `lit` carries the truth value of `atom`.
    fn assert_atom(&mut self, lit: Literal, atom: TheoryAtom);

    /// Propagates consequences of the atoms asserted so far, returning any boolean
    /// literals now forced.
    fn propagate(&mut self) -> Vec<Literal>;

    /// Checks consistency of every atom asserted (and not yet retracted) so far.
    fn check(&mut self) -> TheoryCheckResult;

    /// Backtracks theory-internal state to `level` (spec §6 `backtrack_to_level`),
    /// mirroring the boolean core's own level tracking.
    fn backtrack_to_level(&mut self, level: u32);

    /// Materializes this theory's contribution to a model, as `(term, value)`
    /// bindings for the terms it was asked to assert atoms over.
    fn build_model(&self) -> Vec<(TermId, crate::structures::bv_value::BvValue)>;
}
