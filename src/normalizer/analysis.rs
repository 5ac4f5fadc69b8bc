/*!
The per-(term, width) analysis record (spec §3, "BV analysis record").
*/

use crate::structures::term::TermId;
use std::rc::Rc;

/// The decomposition [Normalizer::analyse](super::Normalizer::analyse) produces for
/// a bit-array term at a target width.
///
/// See spec §4.2 for the invariants this must satisfy:
/// `suffix + length <= w`; bits `[0, suffix)` are pure `eval`, bits
/// `[suffix, suffix+length)` come from `base[start..]`, bits `[suffix+length, w)`
/// are pure `eval` again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRecord {
    /// Number of leading low bits that are evaluable under the current trail.
    pub suffix: u32,

    /// Number of contiguous non-evaluable "central" bits.
    pub length: u32,

    /// Starting bit index inside the central section's base.
    pub start: u32,

    /// The underlying variable expression, or `None` if the central section is not
    /// a clean bit-slice of a single base (spec's `nobueno`).
    pub base: Option<TermId>,

    /// The rewritten constant-only form (width `w`, zero outside the eval bits).
    pub eval: TermId,

    /// The rewritten variable-only form (width `w`, the central section's
    /// contribution, in place).
    pub var: TermId,

    /// The full normalized form: `eval`'s value plus `var`'s value.
    pub norm: TermId,

    /// Set when normalization introduced new arithmetic (a sign-extension or
    /// negated-bit rewrite).
    pub intros: bool,

    /// The central section is not a clean bit-slice of a single base.
    pub nobueno: bool,
}

pub type SharedAnalysis = Rc<AnalysisRecord>;

/// A view onto the current trail's assignments, as needed to decide which bits of
/// a term are evaluable (spec: "Evaluable --- a term whose value is determined by
/// the current trail assignments").
///
/// This is the normalizer's narrow window onto the boolean core (spec §6,
/// "Boolean core ... exposes ... assignment query"); a full `BooleanCore`
/// implementation is supplied by the context at call sites, see
/// [collaborators::boolean_core](crate::collaborators::boolean_core).
pub trait EvalContext {
    /// The current value of bit `index` of `base`, if the trail determines one.
    fn bit_value(&self, base: TermId, index: u32) -> Option<bool>;
}

/// An [EvalContext] with nothing assigned --- every bit is undetermined. Useful for
/// normalizing before a search has begun, and as the default in tests.
pub struct EmptyTrail;

impl EvalContext for EmptyTrail {
    fn bit_value(&self, _base: TermId, _index: u32) -> Option<bool> {
        None
    }
}
