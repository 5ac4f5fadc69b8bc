/*!
Tracks, per push/pop scope, the declarations and named facts created so a `pop` can
retract them (spec §4.4, "Assertion Stack").

Mirrors the teacher's `LiteralDB` level stack in shape (a `Vec` of per-level records,
pushed/popped as a unit) even though what's being stacked here is declaration counts
rather than literal assignments.
*/

use crate::misc::log::targets;
use crate::structures::sort::Sort;
use crate::structures::term::TermId;
use crate::types::err::StackError;

use std::rc::Rc;

/// The kind of name a [NameStack] entry denotes, so retraction can tell which table
/// to remove it from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameKind {
    Term,
    Type,
}

/// A `(term, owned_name)` pair, produced by `(! φ :named n)` (spec §3, "Named-term
/// record").
#[derive(Clone, Debug)]
pub struct NamedAssertion {
    pub name: Rc<str>,
    pub term: TermId,
    pub sort: Sort,
}

/// A single push frame: the declaration/name counts as they stood at the moment of
/// push, plus how many levels this one push requested (spec §3, "Scope stack
/// record").
#[derive(Clone, Copy, Debug)]
struct ScopeFrame {
    multiplicity: u32,
    term_decl_count: usize,
    type_decl_count: usize,
    named_bool_count: usize,
    named_assert_count: usize,
    /// How many plain assertions were in scope at push time, tracked alongside the
    /// declaration counts so a `pop` can also hand back which assertions left
    /// scope; the context needs that to keep the term store's gc roots accurate.
    asserted_term_count: usize,
}

/// What a [AssertionStack::pop] retracted, so the caller can remove the
/// corresponding declarations from its own symbol table and recompute gc roots.
pub struct PopOutcome {
    pub retracted_term_names: Vec<Rc<str>>,
    pub retracted_type_names: Vec<Rc<str>>,
    pub retracted_named_asserts: Vec<NamedAssertion>,
    pub retracted_assertions: Vec<TermId>,
}

/// Tracks declarations and named facts across push/pop scopes.
#[derive(Default)]
pub struct AssertionStack {
    frames: Vec<ScopeFrame>,
    term_names: Vec<Rc<str>>,
    type_names: Vec<Rc<str>>,
    named_asserts: Vec<NamedAssertion>,
    named_bool_count: usize,
    asserted_terms: Vec<TermId>,
}

impl AssertionStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term_decl_count(&self) -> usize {
        self.term_names.len()
    }

    pub fn type_decl_count(&self) -> usize {
        self.type_names.len()
    }

    pub fn named_assert_count(&self) -> usize {
        self.named_asserts.len()
    }

    /// The sum of every frame's multiplicity (spec §3, "the stack's `total_levels`
    /// is the sum of frame multiplicities").
    pub fn total_levels(&self) -> u32 {
        self.frames.iter().map(|f| f.multiplicity).sum()
    }

    /// Records a fresh term (function/constant) declaration.
    pub fn declare_term(&mut self, name: Rc<str>) {
        self.term_names.push(name);
    }

    /// Records a fresh type (sort) declaration.
    pub fn declare_type(&mut self, name: Rc<str>) {
        self.type_names.push(name);
    }

    /// Records a `(! φ :named n)` assertion.
    pub fn add_named_assert(&mut self, name: Rc<str>, term: TermId, sort: Sort) {
        if sort == Sort::Bool {
            self.named_bool_count += 1;
        }
        self.named_asserts.push(NamedAssertion { name, term, sort });
    }

    /// Named assertions still active, for `get-assignment` (spec §6: only boolean
    /// ones are reported) and unsat-core bookkeeping (all of them).
    pub fn named_asserts(&self) -> &[NamedAssertion] {
        &self.named_asserts
    }

    /// Records a plain (possibly unnamed) assertion as part of the current scope.
    pub fn add_assertion(&mut self, term: TermId) {
        self.asserted_terms.push(term);
    }

    /// Every assertion still in scope, for use as term-store gc roots.
    pub fn live_assertions(&self) -> &[TermId] {
        &self.asserted_terms
    }

    fn snapshot(&self, multiplicity: u32) -> ScopeFrame {
        ScopeFrame {
            multiplicity,
            term_decl_count: self.term_names.len(),
            type_decl_count: self.type_names.len(),
            named_bool_count: self.named_bool_count,
            named_assert_count: self.named_asserts.len(),
            asserted_term_count: self.asserted_terms.len(),
        }
    }

    /// `push(n)`: adds a single frame of multiplicity `n` (spec §4.4).
    pub fn push(&mut self, n: u32) -> Result<(), StackError> {
        if n == 0 {
            return Err(StackError::ZeroMultiplicity);
        }
        self.frames.push(self.snapshot(n));
        log::trace!(target: targets::ASSERTION_STACK, "pushed frame, multiplicity {n}");
        Ok(())
    }

    /// `pop(n)`: pops frames summing to at least `n` multiplicity, retracting names
    /// and named assertions declared since the deepest fully-popped frame. A frame
    /// only fully popped when its *entire* multiplicity is consumed; a partial pop
    /// of a frame re-pushes the remainder without retracting anything declared
    /// under it (spec §4.4).
    ///
    /// When `global_declarations` is set, retraction is suppressed --- declarations
    /// persist across pop (spec §3) --- but the frame accounting still runs, so
    /// `total_levels` remains correct.
    pub fn pop(&mut self, n: u32, global_declarations: bool) -> Result<PopOutcome, StackError> {
        if n == 0 {
            return Err(StackError::ZeroMultiplicity);
        }

        let mut remaining = n;
        let mut target: Option<ScopeFrame> = None;

        while remaining > 0 {
            let frame = self.frames.pop().ok_or(StackError::PopExceedsStack)?;
            if frame.multiplicity <= remaining {
                remaining -= frame.multiplicity;
                target = Some(frame);
            } else {
                let leftover = ScopeFrame {
                    multiplicity: frame.multiplicity - remaining,
                    ..frame
                };
                self.frames.push(leftover);
                remaining = 0;
            }
        }

        let Some(frame) = target else {
            // Every pop in the loop was partial; nothing was fully retracted.
            return Ok(PopOutcome {
                retracted_term_names: Vec::new(),
                retracted_type_names: Vec::new(),
                retracted_named_asserts: Vec::new(),
                retracted_assertions: Vec::new(),
            });
        };

        // Plain assertions always leave scope on a full pop, regardless of
        // global-declarations (which governs *declaration* persistence only).
        let retracted_assertions = self.asserted_terms.split_off(frame.asserted_term_count);

        if global_declarations {
            log::trace!(
                target: targets::ASSERTION_STACK,
                "pop({n}) suppressed declaration retraction (global-declarations)"
            );
            return Ok(PopOutcome {
                retracted_term_names: Vec::new(),
                retracted_type_names: Vec::new(),
                retracted_named_asserts: Vec::new(),
                retracted_assertions,
            });
        }

        let retracted_term_names = self.term_names.split_off(frame.term_decl_count);
        let retracted_type_names = self.type_names.split_off(frame.type_decl_count);
        let retracted_named_asserts = self.named_asserts.split_off(frame.named_assert_count);
        self.named_bool_count = frame.named_bool_count;

        log::trace!(
            target: targets::ASSERTION_STACK,
            "pop({n}) retracted {} term(s), {} type(s), {} named assert(s)",
            retracted_term_names.len(),
            retracted_type_names.len(),
            retracted_named_asserts.len()
        );

        Ok(PopOutcome {
            retracted_term_names,
            retracted_type_names,
            retracted_named_asserts,
            retracted_assertions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::term::TermId;

    fn fake_term() -> TermId {
        // Any id works for bookkeeping tests; the stack never dereferences it.
        crate::term_store::TermStore::new()
            .intern(
                crate::structures::kind::TermKind::BoolConstant(true),
                Sort::Bool,
            )
            .unwrap()
    }

    #[test]
    fn push_then_full_pop_retracts_declarations() {
        let mut stack = AssertionStack::new();
        stack.push(1).unwrap();
        stack.declare_term("x".into());
        assert_eq!(stack.term_decl_count(), 1);

        let outcome = stack.pop(1, false).unwrap();
        assert_eq!(outcome.retracted_term_names.len(), 1);
        assert_eq!(stack.term_decl_count(), 0);
        assert_eq!(stack.total_levels(), 0);
    }

    #[test]
    fn partial_pop_of_a_multi_level_push_does_not_retract() {
        let mut stack = AssertionStack::new();
        stack.push(3).unwrap();
        stack.declare_term("x".into());

        let outcome = stack.pop(1, false).unwrap();
        assert!(outcome.retracted_term_names.is_empty());
        assert_eq!(stack.term_decl_count(), 1);
        assert_eq!(stack.total_levels(), 2);
    }

    #[test]
    fn pop_deeper_than_stack_errors() {
        let mut stack = AssertionStack::new();
        stack.push(1).unwrap();
        assert_eq!(stack.pop(2, false), Err(StackError::PopExceedsStack));
    }

    #[test]
    fn zero_multiplicity_is_rejected() {
        let mut stack = AssertionStack::new();
        assert_eq!(stack.push(0), Err(StackError::ZeroMultiplicity));
    }

    #[test]
    fn global_declarations_suppresses_retraction() {
        let mut stack = AssertionStack::new();
        stack.push(1).unwrap();
        stack.declare_term("x".into());
        let outcome = stack.pop(1, true).unwrap();
        assert!(outcome.retracted_term_names.is_empty());
        assert_eq!(stack.term_decl_count(), 1);
    }

    #[test]
    fn named_bool_assert_is_retracted_with_its_scope() {
        let mut stack = AssertionStack::new();
        stack.push(1).unwrap();
        stack.add_named_assert("P".into(), fake_term(), Sort::Bool);
        assert_eq!(stack.named_assert_count(), 1);
        stack.pop(1, false).unwrap();
        assert_eq!(stack.named_assert_count(), 0);
    }
}
