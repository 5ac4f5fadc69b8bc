/*!
Translates an asserted term into boolean-core clauses and theory-solver atoms
(spec §4.3, "Internalizer"): a Tseitin-style walk over the boolean skeleton,
bottoming out at equalities/comparisons over bit-vector-sorted operands, which are
first canonicalized through the [Normalizer] and then handed to the attached
[TheorySolver]s as [TheoryAtom]s tied to a freshly allocated [Literal].

Mirrors the shape of the teacher's own `Context::add_clause`/internalization path:
atoms are memoized so re-asserting the same subterm reuses its literal rather than
re-allocating, exactly as the teacher's clause database dedups by literal set.
*/

use crate::collaborators::boolean_core::{BooleanCore, Literal};
use crate::collaborators::theory_solver::{TheoryAtom, TheorySolver};
use crate::context::logic::LogicName;
use crate::normalizer::Normalizer;
use crate::structures::kind::TermKind;
use crate::structures::sort::Sort;
use crate::structures::term::TermId;
use crate::term_store::TermStore;
use crate::types::err::{CommandError, InternalizeError, UnsupportedConstruct};

use std::collections::HashMap;

/// What [Internalizer::assert] discovered about the formula it translated.
pub enum AssertOutcome {
    /// Translated without incident; the boolean core/theory solvers now carry it.
    Ok,

    /// The formula reduced to a constant `false`, or the theory solvers detected an
    /// immediate contradiction among its atoms, without needing a search at all
    /// (spec §4.3, "trivially unsat").
    TriviallyUnsat,
}

/// Translates asserted terms into boolean-core literals and theory atoms,
/// memoizing by term id so repeated subterms (common after `define-fun` expansion)
/// are internalized once.
#[derive(Default)]
pub struct Internalizer {
    atom_literals: HashMap<TermId, Literal>,
}

impl Internalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The literal carrying `term`'s truth value, if it has been internalized
    /// (spec §6 `get-assignment`/`get-value` on a `Bool`-sorted term).
    pub fn literal_of(&self, term: TermId) -> Option<Literal> {
        let lit = *self.atom_literals.get(&term.positive())?;
        Some(if term.is_negated() { lit.negate() } else { lit })
    }

    /// Internalizes `formula` (already required to be `Bool`-sorted by the caller)
    /// into the boolean core and theory solvers, per spec §4.3:
    ///
    /// 1. Reject constructs the active logic doesn't license
    ///    (`UnsupportedConstructInLogic`).
    /// 2. Walk the boolean skeleton (`and`/`or`/`not`/`ite`/`=`) via Tseitin,
    ///    allocating one literal per distinct subterm.
    /// 3. At an atom (an equality or comparison over bit-vector operands),
    ///    canonicalize both sides to a common width through the [Normalizer] and
    ///    hand the atom to every attached theory solver.
    #[allow(clippy::too_many_arguments)]
    pub fn assert(
        &mut self,
        term_store: &mut TermStore,
        normalizer: &mut Normalizer,
        boolean_core: &mut dyn BooleanCore,
        theory_solvers: &mut [Box<dyn TheorySolver>],
        logic: Option<&LogicName>,
        formula: TermId,
    ) -> Result<AssertOutcome, CommandError> {
        let logic = logic.ok_or(CommandError::Context(
            crate::types::err::ContextError::NoLogicSet,
        ))?;

        if let TermKind::BoolConstant(false) = term_store.kind_of(formula.positive()) {
            if formula.is_negated() {
                // asserting `(not false)`: trivially true, nothing to internalize.
                return Ok(AssertOutcome::Ok);
            }
            return Ok(AssertOutcome::TriviallyUnsat);
        }
        if let TermKind::BoolConstant(true) = term_store.kind_of(formula.positive()) {
            if formula.is_negated() {
                return Ok(AssertOutcome::TriviallyUnsat);
            }
            return Ok(AssertOutcome::Ok);
        }

        let top = self.internalize_bool(term_store, normalizer, boolean_core, theory_solvers, logic, formula)?;
        boolean_core.add_clause(vec![top]);

        let mut saw_conflict = false;
        for solver in theory_solvers.iter_mut() {
            if let crate::collaborators::theory_solver::TheoryCheckResult::Conflict { .. } =
                solver.check()
            {
                saw_conflict = true;
            }
        }

        Ok(if saw_conflict {
            AssertOutcome::TriviallyUnsat
        } else {
            AssertOutcome::Ok
        })
    }

    /// Internalizes a `Bool`-sorted term to the literal carrying its truth value.
    #[allow(clippy::too_many_arguments)]
    fn internalize_bool(
        &mut self,
        term_store: &mut TermStore,
        normalizer: &mut Normalizer,
        boolean_core: &mut dyn BooleanCore,
        theory_solvers: &mut [Box<dyn TheorySolver>],
        logic: &LogicName,
        term: TermId,
    ) -> Result<Literal, CommandError> {
        if term.is_negated() {
            let lit = self.internalize_bool(
                term_store,
                normalizer,
                boolean_core,
                theory_solvers,
                logic,
                term.positive(),
            )?;
            return Ok(lit.negate());
        }

        if let Some(&lit) = self.atom_literals.get(&term) {
            return Ok(lit);
        }

        let kind = term_store.kind_of(term).clone();
        let lit = match kind {
            TermKind::BoolConstant(b) => {
                let lit = boolean_core.alloc_literal();
                boolean_core.add_clause(vec![if b { lit } else { lit.negate() }]);
                lit
            }

            TermKind::Not(inner) => {
                self.internalize_bool(term_store, normalizer, boolean_core, theory_solvers, logic, inner)?
                    .negate()
            }

            TermKind::Or(args) => {
                let mut lits = Vec::with_capacity(args.len());
                for a in &args {
                    lits.push(self.internalize_bool(
                        term_store,
                        normalizer,
                        boolean_core,
                        theory_solvers,
                        logic,
                        *a,
                    )?);
                }
                let gate = boolean_core.alloc_literal();
                // gate -> (l1 or ... or ln): clause (not gate, l1, ..., ln)
                let mut clause = vec![gate.negate()];
                clause.extend(lits.iter().copied());
                boolean_core.add_clause(clause);
                // (li -> gate) for each i: clause (not li, gate)
                for l in lits {
                    boolean_core.add_clause(vec![l.negate(), gate]);
                }
                gate
            }

            TermKind::Ite {
                cond,
                then_branch,
                else_branch,
            } if term_store.sort_of(then_branch) == &Sort::Bool => {
                let c = self.internalize_bool(term_store, normalizer, boolean_core, theory_solvers, logic, cond)?;
                let t = self.internalize_bool(
                    term_store,
                    normalizer,
                    boolean_core,
                    theory_solvers,
                    logic,
                    then_branch,
                )?;
                let e = self.internalize_bool(
                    term_store,
                    normalizer,
                    boolean_core,
                    theory_solvers,
                    logic,
                    else_branch,
                )?;
                let gate = boolean_core.alloc_literal();
                boolean_core.add_clause(vec![c.negate(), t.negate(), gate]);
                boolean_core.add_clause(vec![c.negate(), t, gate.negate()]);
                boolean_core.add_clause(vec![c, e.negate(), gate]);
                boolean_core.add_clause(vec![c, e, gate.negate()]);
                gate
            }

            TermKind::Eq { lhs, rhs } if term_store.sort_of(lhs) == &Sort::Bool => {
                let l = self.internalize_bool(term_store, normalizer, boolean_core, theory_solvers, logic, lhs)?;
                let r = self.internalize_bool(term_store, normalizer, boolean_core, theory_solvers, logic, rhs)?;
                let gate = boolean_core.alloc_literal();
                boolean_core.add_clause(vec![l.negate(), r.negate(), gate]);
                boolean_core.add_clause(vec![l, r, gate]);
                boolean_core.add_clause(vec![l.negate(), r, gate.negate()]);
                boolean_core.add_clause(vec![l, r.negate(), gate.negate()]);
                gate
            }

            TermKind::Eq { lhs, rhs } => {
                self.internalize_atom(term_store, normalizer, boolean_core, theory_solvers, logic, TheoryAtomSpec::Eq(lhs, rhs))?
            }

            TermKind::BvCompare { op, lhs, rhs } => {
                self.internalize_atom(
                    term_store,
                    normalizer,
                    boolean_core,
                    theory_solvers,
                    logic,
                    TheoryAtomSpec::Compare(op, lhs, rhs),
                )?
            }

            TermKind::Apply { .. } if !logic.supports_uf => {
                return Err(CommandError::Internalize(
                    InternalizeError::UnsupportedConstructInLogic(
                        UnsupportedConstruct::UninterpretedFunction,
                    ),
                ))
            }

            TermKind::Forall { .. } | TermKind::Exists { .. } if !logic.supports_quantifiers => {
                return Err(CommandError::Internalize(
                    InternalizeError::UnsupportedConstructInLogic(UnsupportedConstruct::Quantifier),
                ))
            }

            TermKind::Uninterpreted { .. } | TermKind::Apply { .. } => boolean_core.alloc_literal(),

            TermKind::Forall { .. } | TermKind::Exists { .. } => {
                return Err(CommandError::Internalize(
                    InternalizeError::UnsupportedConstructInLogic(UnsupportedConstruct::Quantifier),
                ))
            }

            other => {
                let _ = other;
                return Err(CommandError::Internalize(InternalizeError::TypeMismatch));
            }
        };

        self.atom_literals.insert(term, lit);
        Ok(lit)
    }

    #[allow(clippy::too_many_arguments)]
    fn internalize_atom(
        &mut self,
        term_store: &mut TermStore,
        normalizer: &mut Normalizer,
        boolean_core: &mut dyn BooleanCore,
        theory_solvers: &mut [Box<dyn TheorySolver>],
        logic: &LogicName,
        spec: TheoryAtomSpec,
    ) -> Result<Literal, CommandError> {
        let _ = logic;
        let (lhs, rhs) = spec.operands();
        let width = term_store
            .width_of(lhs)
            .or_else(|| term_store.width_of(rhs))
            .unwrap_or(1);

        let norm_lhs = normalizer
            .normalize(term_store, boolean_core, lhs, width)
            .map_err(|e| CommandError::Internalize(InternalizeError::Normalize(e)))?;
        let norm_rhs = normalizer
            .normalize(term_store, boolean_core, rhs, width)
            .map_err(|e| CommandError::Internalize(InternalizeError::Normalize(e)))?;

        let lhs_const = const_value_of(term_store, norm_lhs);
        let rhs_const = const_value_of(term_store, norm_rhs);
        let atom = spec.into_atom(norm_lhs, norm_rhs, lhs_const, rhs_const);
        let lit = boolean_core.alloc_literal();
        for solver in theory_solvers.iter_mut() {
            solver.assert_atom(lit, atom.clone());
        }
        Ok(lit)
    }
}

/// Distinguishes which [TheoryAtom] an equality/comparison should become, without
/// borrowing the operands' ids past the point they're normalized.
enum TheoryAtomSpec {
    Eq(TermId, TermId),
    Compare(crate::structures::kind::BvCompareOp, TermId, TermId),
}

impl TheoryAtomSpec {
    fn operands(&self) -> (TermId, TermId) {
        match *self {
            TheoryAtomSpec::Eq(l, r) => (l, r),
            TheoryAtomSpec::Compare(_, l, r) => (l, r),
        }
    }

    fn into_atom(
        self,
        lhs: TermId,
        rhs: TermId,
        lhs_const: Option<crate::structures::bv_value::BvValue>,
        rhs_const: Option<crate::structures::bv_value::BvValue>,
    ) -> TheoryAtom {
        match self {
            TheoryAtomSpec::Eq(..) => TheoryAtom::Eq {
                lhs,
                rhs,
                lhs_const,
                rhs_const,
            },
            TheoryAtomSpec::Compare(op, ..) => TheoryAtom::Compare {
                op,
                lhs,
                rhs,
                lhs_const,
                rhs_const,
            },
        }
    }
}

/// The value of `t` if normalization already reduced it to a ground
/// `bv_constant`, so theory solvers can act on (in)equalities with a constant
/// operand without needing their own access to the term store.
fn const_value_of(
    term_store: &TermStore,
    t: TermId,
) -> Option<crate::structures::bv_value::BvValue> {
    if t.is_negated() {
        return None;
    }
    match term_store.kind_of(t) {
        TermKind::BvConstant(v) => Some(v.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::boolean_core::BooleanCore;
    use crate::normalizer::analysis::EvalContext;
    use crate::structures::bv_value::BvValue;
    use crate::structures::kind::Monomial;
    use std::collections::HashMap as Map;

    #[derive(Default)]
    struct MockCore {
        next_atom: u64,
        clauses: Vec<Vec<Literal>>,
        level: u32,
        bits: Map<(TermId, u32), Literal>,
    }

    impl EvalContext for MockCore {
        fn bit_value(&self, _base: TermId, _index: u32) -> Option<bool> {
            None
        }
    }

    impl BooleanCore for MockCore {
        fn alloc_literal(&mut self) -> Literal {
            self.next_atom += 1;
            Literal::new(self.next_atom, true)
        }
        fn add_clause(&mut self, clause: Vec<Literal>) {
            self.clauses.push(clause);
        }
        fn assignment(&self, _lit: Literal) -> Option<bool> {
            None
        }
        fn bind_bit(&mut self, base: TermId, index: u32, lit: Literal) {
            self.bits.insert((base, index), lit);
        }
        fn push_level(&mut self) {
            self.level += 1;
        }
        fn pop_to_level(&mut self, level: u32) {
            self.level = level;
        }
        fn current_level(&self) -> u32 {
            self.level
        }
    }

    #[test]
    fn asserting_constant_false_is_trivially_unsat() {
        let mut store = TermStore::new();
        let mut normalizer = Normalizer::new();
        let mut core = MockCore::default();
        let mut internalizer = Internalizer::new();
        let logic = LogicName::parse("QF_BV");

        let f = store
            .intern(TermKind::BoolConstant(false), Sort::Bool)
            .unwrap();

        let outcome = internalizer
            .assert(&mut store, &mut normalizer, &mut core, &mut [], Some(&logic), f)
            .unwrap();
        assert!(matches!(outcome, AssertOutcome::TriviallyUnsat));
    }

    #[test]
    fn asserting_a_bool_variable_allocates_one_literal() {
        let mut store = TermStore::new();
        let mut normalizer = Normalizer::new();
        let mut core = MockCore::default();
        let mut internalizer = Internalizer::new();
        let logic = LogicName::parse("QF_BV");

        let p = store
            .intern(TermKind::Uninterpreted { name: "p".into() }, Sort::Bool)
            .unwrap();

        internalizer
            .assert(&mut store, &mut normalizer, &mut core, &mut [], Some(&logic), p)
            .unwrap();
        assert_eq!(core.next_atom, 1);
    }

    #[test]
    fn bv_equality_reaches_a_theory_solver() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct RecordingSolver {
            asserted: Rc<RefCell<Vec<TheoryAtom>>>,
        }
        impl TheorySolver for RecordingSolver {
            fn assert_atom(&mut self, _lit: Literal, atom: TheoryAtom) {
                self.asserted.borrow_mut().push(atom);
            }
            fn propagate(&mut self) -> Vec<Literal> {
                Vec::new()
            }
            fn check(&mut self) -> crate::collaborators::theory_solver::TheoryCheckResult {
                crate::collaborators::theory_solver::TheoryCheckResult::Consistent
            }
            fn backtrack_to_level(&mut self, _level: u32) {}
            fn build_model(&self) -> Vec<(TermId, BvValue)> {
                Vec::new()
            }
        }

        let mut store = TermStore::new();
        let mut normalizer = Normalizer::new();
        let mut core = MockCore::default();
        let mut internalizer = Internalizer::new();
        let logic = LogicName::parse("QF_BV");

        let x = store
            .intern(TermKind::Uninterpreted { name: "x".into() }, Sort::BitVec(4))
            .unwrap();
        let y = store
            .intern(TermKind::Uninterpreted { name: "y".into() }, Sort::BitVec(4))
            .unwrap();
        let eq = store
            .intern(TermKind::Eq { lhs: x, rhs: y }, Sort::Bool)
            .unwrap();

        let asserted = Rc::new(RefCell::new(Vec::new()));
        let mut solver: Box<dyn TheorySolver> = Box::new(RecordingSolver {
            asserted: asserted.clone(),
        });
        internalizer
            .assert(
                &mut store,
                &mut normalizer,
                &mut core,
                std::slice::from_mut(&mut solver),
                Some(&logic),
                eq,
            )
            .unwrap();

        assert_eq!(asserted.borrow().len(), 1);
    }
}
