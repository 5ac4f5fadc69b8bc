/*!
A minimal reference implementation of [BooleanCore] and [TheorySolver], good enough
to run the demo binary and the end-to-end command-driver tests without first
wiring in a real SAT/SMT backend.

Spec §1 names the concrete CDCL engine and the theory-specific solvers as external
collaborators this core only specifies an interface for; this module is *not* that
engine. It is a small, deliberately unoptimized stand-in --- brute-force DPLL over
the boolean skeleton, and a theory solver that only understands ground (in)equalities
against a bit-vector constant (the shape [TheoryAtom]'s `lhs_const`/`rhs_const`
fields exist for) --- kept in the library so the crate is runnable and testable on
its own. Production use is expected to supply its own, richer collaborators (a real
CDCL core, a bit-blaster or word-level BV solver, ...) through the same two traits.

Grounded on the shape of the teacher's own engine (one mutable store of clauses plus
a trail, consulted by both solving and model extraction) without attempting to
replicate its actual search (two-watched-literal CDCL): this reference engine's
`solve` is exhaustive unit propagation plus chronological case-split, acceptable
only because the formulas it is ever asked to decide here are tiny.
*/

use crate::collaborators::boolean_core::{BooleanCore, Literal};
use crate::collaborators::theory_solver::{TheoryAtom, TheoryCheckResult, TheorySolver};
use crate::normalizer::analysis::EvalContext;
use crate::structures::bv_value::BvValue;
use crate::structures::term::TermId;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// State shared between a [ReferenceBooleanCore] and the [ReferenceTheorySolver]
/// built alongside it by [reference_pair].
#[derive(Default)]
struct Shared {
    clauses: Vec<Vec<Literal>>,
    next_atom: u64,
    bit_bindings: HashMap<(TermId, u32), Literal>,
    assignment: Option<HashMap<u64, bool>>,
    levels: Vec<(usize, u64)>,
}

impl Shared {
    fn solved_assignment(&mut self) -> &HashMap<u64, bool> {
        if self.assignment.is_none() {
            self.assignment = Some(solve(&self.clauses, self.next_atom));
        }
        self.assignment.as_ref().unwrap()
    }

    fn invalidate(&mut self) {
        self.assignment = None;
    }
}

/// Builds a fresh boolean-core/theory-solver pair sharing one [Shared] trail, ready
/// to be handed to [Context::new](crate::context::Context::new).
pub fn reference_pair() -> (Box<dyn BooleanCore>, Box<dyn TheorySolver>) {
    let shared = Rc::new(RefCell::new(Shared::default()));
    let core = ReferenceBooleanCore {
        shared: shared.clone(),
    };
    let theory = ReferenceTheorySolver {
        shared,
        atoms: Vec::new(),
        bindings: HashMap::new(),
        atom_levels: Vec::new(),
    };
    (Box::new(core), Box::new(theory))
}

/// The boolean-core half of the reference engine.
pub struct ReferenceBooleanCore {
    shared: Rc<RefCell<Shared>>,
}

impl EvalContext for ReferenceBooleanCore {
    fn bit_value(&self, base: TermId, index: u32) -> Option<bool> {
        let mut shared = self.shared.borrow_mut();
        let lit = *shared.bit_bindings.get(&(base, index))?;
        let value = *shared.solved_assignment().get(&lit.atom())?;
        Some(value == lit.is_positive())
    }
}

impl BooleanCore for ReferenceBooleanCore {
    fn alloc_literal(&mut self) -> Literal {
        let mut shared = self.shared.borrow_mut();
        shared.next_atom += 1;
        Literal::new(shared.next_atom, true)
    }

    fn add_clause(&mut self, clause: Vec<Literal>) {
        let mut shared = self.shared.borrow_mut();
        shared.clauses.push(clause);
        shared.invalidate();
    }

    fn assignment(&self, lit: Literal) -> Option<bool> {
        let mut shared = self.shared.borrow_mut();
        let value = *shared.solved_assignment().get(&lit.atom())?;
        Some(value == lit.is_positive())
    }

    fn bind_bit(&mut self, base: TermId, index: u32, lit: Literal) {
        self.shared.borrow_mut().bit_bindings.insert((base, index), lit);
    }

    fn push_level(&mut self) {
        let mut shared = self.shared.borrow_mut();
        let snapshot = (shared.clauses.len(), shared.next_atom);
        shared.levels.push(snapshot);
    }

    fn pop_to_level(&mut self, level: u32) {
        let mut shared = self.shared.borrow_mut();
        while shared.levels.len() > level as usize {
            let (clause_count, atom_count) = shared.levels.pop().unwrap();
            shared.clauses.truncate(clause_count);
            shared.next_atom = atom_count;
        }
        shared.invalidate();
    }

    fn current_level(&self) -> u32 {
        self.shared.borrow().levels.len() as u32
    }
}

/// A single fact the theory solver was asked to maintain: the atom together with
/// the gate literal the internalizer tied its truth value to.
struct TrackedAtom {
    lit: Literal,
    atom: TheoryAtom,
}

/// The theory-solver half of the reference engine: understands ground equalities
/// between a bit-vector term and a constant (via [TheoryAtom]'s `*_const` fields),
/// nothing richer --- comparisons and variable-to-variable equalities are accepted
/// but not checked.
///
/// Every tracked atom is treated as if its gate literal were forced true --- right
/// for the top-level, un-negated ground assertions this reference engine is built
/// to demonstrate, but not a substitute for actually consulting the boolean core's
/// assignment of `lit`, which a real theory-solver integration would need to do
/// (typically by sharing a trail, the way [ReferenceBooleanCore] and this type
/// share their [Shared] state already).
pub struct ReferenceTheorySolver {
    #[allow(dead_code)]
    shared: Rc<RefCell<Shared>>,
    atoms: Vec<TrackedAtom>,
    bindings: HashMap<TermId, BvValue>,
    atom_levels: Vec<usize>,
}

impl ReferenceTheorySolver {
    /// Marks the current atom count as a restore point. A caller wiring this
    /// engine into a [Context](crate::context::Context) is expected to invoke this
    /// in lockstep with [ReferenceBooleanCore::push_level].
    pub fn push_level(&mut self) {
        self.atom_levels.push(self.atoms.len());
    }
}

impl TheorySolver for ReferenceTheorySolver {
    fn assert_atom(&mut self, lit: Literal, atom: TheoryAtom) {
        self.atoms.push(TrackedAtom { lit, atom });
    }

    fn propagate(&mut self) -> Vec<Literal> {
        Vec::new()
    }

    fn check(&mut self) -> TheoryCheckResult {
        self.bindings.clear();
        for tracked in &self.atoms {
            let (var, value) = match &tracked.atom {
                TheoryAtom::Eq {
                    lhs,
                    rhs,
                    lhs_const,
                    rhs_const,
                } => match (lhs_const, rhs_const) {
                    (Some(l), Some(r)) => {
                        if l != r {
                            return TheoryCheckResult::Conflict {
                                conflicting: vec![tracked.lit],
                            };
                        }
                        continue;
                    }
                    (Some(c), None) => (*rhs, c.clone()),
                    (None, Some(c)) => (*lhs, c.clone()),
                    (None, None) => continue,
                },
                // Comparisons aren't decided by this reference solver; accepted
                // without effect so the demo still runs formulas that use them.
                TheoryAtom::Compare { .. } => continue,
            };

            if let Some(existing) = self.bindings.get(&var) {
                if *existing != value {
                    return TheoryCheckResult::Conflict {
                        conflicting: vec![tracked.lit],
                    };
                }
            } else {
                self.bindings.insert(var, value);
            }
        }
        TheoryCheckResult::Consistent
    }

    fn backtrack_to_level(&mut self, level: u32) {
        while self.atom_levels.len() > level as usize {
            let mark = self.atom_levels.pop().unwrap();
            self.atoms.truncate(mark);
        }
    }

    fn build_model(&self) -> Vec<(TermId, BvValue)> {
        self.bindings.iter().map(|(t, v)| (*t, v.clone())).collect()
    }
}

/// Exhaustive DPLL: unit-propagate to a fixpoint, then case-split on the first
/// unassigned atom, trying both polarities. Quadratic-ish and fine only because the
/// formulas this reference engine is ever handed (demo scenarios, end-to-end tests)
/// carry a handful of atoms.
fn solve(clauses: &[Vec<Literal>], atom_count: u64) -> HashMap<u64, bool> {
    let mut assignment = HashMap::new();
    if dpll(clauses, atom_count, &mut assignment) {
        assignment
    } else {
        HashMap::new()
    }
}

fn clause_status(clause: &[Literal], assignment: &HashMap<u64, bool>) -> ClauseStatus {
    let mut has_unassigned = None;
    let mut unassigned_count = 0;
    for &lit in clause {
        match assignment.get(&lit.atom()) {
            Some(&v) if v == lit.is_positive() => return ClauseStatus::Satisfied,
            Some(_) => {}
            None => {
                unassigned_count += 1;
                has_unassigned = Some(lit);
            }
        }
    }
    match (unassigned_count, has_unassigned) {
        (0, _) => ClauseStatus::Falsified,
        (1, Some(lit)) => ClauseStatus::Unit(lit),
        _ => ClauseStatus::Undetermined,
    }
}

enum ClauseStatus {
    Satisfied,
    Falsified,
    Unit(Literal),
    Undetermined,
}

fn unit_propagate(clauses: &[Vec<Literal>], assignment: &mut HashMap<u64, bool>) -> bool {
    loop {
        let mut propagated = false;
        for clause in clauses {
            match clause_status(clause, assignment) {
                ClauseStatus::Falsified => return false,
                ClauseStatus::Unit(lit) => {
                    assignment.insert(lit.atom(), lit.is_positive());
                    propagated = true;
                }
                ClauseStatus::Satisfied | ClauseStatus::Undetermined => {}
            }
        }
        if !propagated {
            return true;
        }
    }
}

fn dpll(clauses: &[Vec<Literal>], atom_count: u64, assignment: &mut HashMap<u64, bool>) -> bool {
    if !unit_propagate(clauses, assignment) {
        return false;
    }

    let mut all_satisfied = true;
    for clause in clauses {
        match clause_status(clause, assignment) {
            ClauseStatus::Falsified => return false,
            ClauseStatus::Satisfied => {}
            ClauseStatus::Unit(_) | ClauseStatus::Undetermined => all_satisfied = false,
        }
    }
    if all_satisfied {
        return true;
    }

    let Some(atom) = (1..=atom_count).find(|a| !assignment.contains_key(a)) else {
        return true;
    };

    for &value in &[true, false] {
        let mut trial = assignment.clone();
        trial.insert(atom, value);
        if dpll(clauses, atom_count, &mut trial) {
            *assignment = trial;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::theory_solver::TheoryCheckResult;
    use crate::structures::kind::BvCompareOp;

    #[test]
    fn unit_clauses_are_satisfied() {
        let (mut core, _theory) = reference_pair();
        let p = core.alloc_literal();
        core.add_clause(vec![p]);
        assert_eq!(core.assignment(p), Some(true));
    }

    #[test]
    fn a_two_literal_clause_is_satisfiable_either_way() {
        let (mut core, _theory) = reference_pair();
        let p = core.alloc_literal();
        let q = core.alloc_literal();
        core.add_clause(vec![p, q]);
        let pv = core.assignment(p).unwrap();
        let qv = core.assignment(q).unwrap();
        assert!(pv || qv);
    }

    #[test]
    fn contradictory_unit_clauses_are_unsatisfiable() {
        let (mut core, _theory) = reference_pair();
        let p = core.alloc_literal();
        core.add_clause(vec![p]);
        core.add_clause(vec![p.negate()]);
        assert_eq!(core.assignment(p), None);
    }

    #[test]
    fn ground_equality_against_a_constant_binds_the_variable() {
        let (_core, mut theory) = reference_pair();
        let x = TermId::from_index(0, false);
        let lit = Literal::new(1, true);
        theory.assert_atom(
            lit,
            TheoryAtom::Eq {
                lhs: x,
                rhs: x,
                lhs_const: None,
                rhs_const: Some(BvValue::from_u64(4, 3)),
            },
        );
        assert_eq!(theory.check(), TheoryCheckResult::Consistent);
        assert_eq!(theory.build_model(), vec![(x, BvValue::from_u64(4, 3))]);
    }

    #[test]
    fn conflicting_ground_bindings_are_a_conflict() {
        let (_core, mut theory) = reference_pair();
        let x = TermId::from_index(0, false);
        let lit_a = Literal::new(1, true);
        let lit_b = Literal::new(2, true);
        theory.assert_atom(
            lit_a,
            TheoryAtom::Eq {
                lhs: x,
                rhs: x,
                lhs_const: None,
                rhs_const: Some(BvValue::from_u64(4, 3)),
            },
        );
        theory.assert_atom(
            lit_b,
            TheoryAtom::Eq {
                lhs: x,
                rhs: x,
                lhs_const: None,
                rhs_const: Some(BvValue::from_u64(4, 0)),
            },
        );
        assert!(matches!(theory.check(), TheoryCheckResult::Conflict { .. }));
    }

    #[test]
    fn unsupported_compare_atoms_are_accepted_without_effect() {
        let (_core, mut theory) = reference_pair();
        let x = TermId::from_index(0, false);
        let lit = Literal::new(1, true);
        theory.assert_atom(
            lit,
            TheoryAtom::Compare {
                op: BvCompareOp::Ult,
                lhs: x,
                rhs: x,
                lhs_const: None,
                rhs_const: None,
            },
        );
        assert_eq!(theory.check(), TheoryCheckResult::Consistent);
    }
}
