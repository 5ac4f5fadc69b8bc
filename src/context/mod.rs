/*!
The context state machine (spec §4.5): orchestrates assert/check/push/pop against
the attached theory solvers, tracking a lifecycle status through
`idle | searching | sat | unsat | unknown | interrupted | error`.

Grounded on the teacher's `GenericContext`/`Context` split (`context::generic`,
`context::specific`): a context aggregates its databases (here: [TermStore],
[Normalizer], [AssertionStack], [DeclarationTable]), a source of randomness, and a
status field, with state transitions gated by that status exactly as the teacher's
own `ContextState` gates what a `GenericContext` will accept.
*/

pub mod declarations;
pub use declarations::{Declaration, DeclarationTable};

pub mod logic;
pub use logic::LogicName;

use crate::assertion_stack::AssertionStack;
use crate::collaborators::boolean_core::{BooleanCore, Literal};
use crate::collaborators::theory_solver::{TheoryCheckResult, TheorySolver};
use crate::config::{GlobalSettings, ParameterRegistry};
use crate::generic::minimal_pcg::MinimalPCG32;
use crate::internalizer::{AssertOutcome, Internalizer};
use crate::misc::log::targets;
use crate::normalizer::Normalizer;
use crate::structures::term::TermId;
use crate::term_store::TermStore;
use crate::types::err::{CommandError, ContextError};

use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The lifecycle status of a context (spec §4.5).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContextState {
    Idle,
    /// Transient; held only while `check()` runs (spec §4.5: "no user operation may
    /// be invoked while in `searching`").
    Searching,
    Sat,
    Unsat,
    Unknown,
    Interrupted,
    Error,
}

/// Whether a context permits push/pop (spec §4.5, "Mode discipline").
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContextMode {
    /// No push/pop; a single `check` (and no `assert` after it).
    OneShot,
    /// Push/pop allowed.
    Incremental,
}

/// A context aggregating the term store, bit-vector normalizer, declaration table,
/// assertion stack, settings/parameters, and the attached boolean core/theory
/// solvers (spec §3, "Context").
pub struct Context {
    pub term_store: TermStore,
    pub normalizer: Normalizer,
    pub declarations: DeclarationTable,
    pub assertion_stack: AssertionStack,
    pub settings: GlobalSettings,
    pub params: ParameterRegistry,

    logic: Option<LogicName>,
    mode: ContextMode,
    status: ContextState,

    /// How many push levels the context's boolean core/theory solvers have
    /// actually taken (as opposed to [AssertionStack::total_levels], which also
    /// counts levels deferred while `unsat`).
    base_level: u32,

    /// Spec §4.4, "Special case --- push/pop after unsat": pushes requested while
    /// `status == Unsat` are counted here rather than forwarded to the boolean
    /// core, since theory solvers typically cannot push above an unsat base level.
    deferred_pushes_after_unsat: u32,

    internalizer: Internalizer,
    boolean_core: Box<dyn BooleanCore>,
    theory_solvers: Vec<Box<dyn TheorySolver>>,

    rng: MinimalPCG32,
    interrupt_flag: Arc<AtomicBool>,

    gc_pending: usize,

    /// Rounds of [run_search](Self::run_search) run over the context's lifetime, for
    /// `get-info :all-statistics` (see [reports::Stats](crate::reports::Stats)).
    search_iterations: usize,

    /// Theory conflicts detected over the context's lifetime, for the same report.
    conflicts_seen: usize,
}

impl Context {
    /// Builds a fresh context in the given mode, with the given boolean
    /// core/theory solvers attached (spec §5: "The Context owns its theory solvers
    /// exclusively; no sharing").
    pub fn new(
        mode: ContextMode,
        boolean_core: Box<dyn BooleanCore>,
        theory_solvers: Vec<Box<dyn TheorySolver>>,
    ) -> Self {
        Context {
            term_store: TermStore::new(),
            normalizer: Normalizer::new(),
            declarations: DeclarationTable::new(),
            assertion_stack: AssertionStack::new(),
            settings: GlobalSettings::default(),
            params: ParameterRegistry::new(),
            logic: None,
            mode,
            status: ContextState::Idle,
            base_level: 0,
            deferred_pushes_after_unsat: 0,
            internalizer: Internalizer::new(),
            boolean_core,
            theory_solvers,
            rng: MinimalPCG32::from_random_seed(0),
            interrupt_flag: Arc::new(AtomicBool::new(false)),
            gc_pending: 0,
            search_iterations: 0,
            conflicts_seen: 0,
        }
    }

    /// Aggregate statistics over the context's lifetime, for `get-info
    /// :all-statistics` (spec §6's reserved info key).
    pub fn stats(&self) -> crate::reports::Stats {
        crate::reports::Stats {
            iterations: self.search_iterations,
            assertions: self.assertion_stack.live_assertions().len(),
            conflicts: self.conflicts_seen,
        }
    }

    pub fn status(&self) -> ContextState {
        self.status
    }

    pub fn mode(&self) -> ContextMode {
        self.mode
    }

    pub fn logic(&self) -> Option<&LogicName> {
        self.logic.as_ref()
    }

    pub fn logic_is_set(&self) -> bool {
        self.logic.is_some()
    }

    /// A clonable handle an external signal handler can use to request interrupt
    /// of an in-progress `check-sat` (spec §5: "cooperative polling rather than
    /// asynchronous unwinding").
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.interrupt_flag.clone()
    }

    /// `set-logic` (spec §6): legal only once, before any other command.
    pub fn set_logic(&mut self, name: &str) -> Result<(), CommandError> {
        if self.logic.is_some() {
            return Err(CommandError::Context(ContextError::IllegalInState));
        }
        self.logic = Some(LogicName::parse(name));
        Ok(())
    }

    /// `assert(φ)` (spec §4.3, §4.5).
    ///
    /// A one-shot context rejects any assert once it has left `idle`, since a
    /// one-shot context supports exactly one `check-sat`. In incremental mode,
    /// asserting from `sat`/`unknown` first discards the cached model and rolls
    /// boolean-core/theory-solver decisions back to `base_level`; asserting from
    /// `unsat` is silently accepted without effect, since nothing can make an
    /// already-unsat problem set any more unsat. `searching`/`interrupted` are a
    /// programming error (debug-asserted, not a recoverable `CommandError`).
    pub fn assert_formula(&mut self, formula: TermId) -> Result<(), CommandError> {
        debug_assert!(
            !matches!(self.status, ContextState::Searching),
            "assert invoked while searching"
        );

        if self.mode == ContextMode::OneShot && self.status != ContextState::Idle {
            return Err(CommandError::Context(ContextError::OneShotAlreadyChecked));
        }

        match self.status {
            ContextState::Unsat => return Ok(()),
            ContextState::Sat | ContextState::Unknown => {
                self.boolean_core.pop_to_level(self.base_level);
                for solver in &mut self.theory_solvers {
                    solver.backtrack_to_level(self.base_level);
                }
                self.status = ContextState::Idle;
            }
            ContextState::Interrupted => {
                return Err(CommandError::Context(ContextError::IllegalInState))
            }
            _ => {}
        }

        match self.internalizer.assert(
            &mut self.term_store,
            &mut self.normalizer,
            self.boolean_core.as_mut(),
            &mut self.theory_solvers,
            self.logic.as_ref(),
            formula,
        )? {
            AssertOutcome::Ok => {
                self.assertion_stack.add_assertion(formula);
            }
            AssertOutcome::TriviallyUnsat => {
                self.assertion_stack.add_assertion(formula);
                log::info!(target: targets::CONTEXT, "assert detected trivial unsat");
                self.status = ContextState::Unsat;
            }
        }

        Ok(())
    }

    /// `check-sat` (spec §4.5, §4.6): invokes the boolean core and theory solvers,
    /// polling the interrupt flag between rounds.
    pub fn check_sat(&mut self) -> Result<ContextState, CommandError> {
        if self.logic.is_none() {
            return Err(CommandError::Context(ContextError::NoLogicSet));
        }
        if self.status == ContextState::Unsat {
            return Ok(ContextState::Unsat);
        }

        self.status = ContextState::Searching;
        self.interrupt_flag.store(false, Ordering::Relaxed);

        let outcome = self.run_search();
        self.status = outcome;
        Ok(outcome)
    }

    fn run_search(&mut self) -> ContextState {
        // A DPLL(T)-style loop: ask the boolean core to propagate, let theory
        // solvers check consistency of the atoms asserted so far, and either
        // accept the candidate or learn a blocking clause and retry. The boolean
        // core/theory solvers are the external collaborators of spec §6; this is
        // only the outline the core is responsible for driving.
        const MAX_ROUNDS: usize = 10_000;

        for _ in 0..MAX_ROUNDS {
            self.search_iterations += 1;
            if self.interrupt_flag.load(Ordering::Relaxed) {
                return ContextState::Interrupted;
            }

            for solver in &mut self.theory_solvers {
                for lit in solver.propagate() {
                    self.boolean_core.add_clause(vec![lit]);
                }
            }

            let mut conflict_clause: Option<Vec<Literal>> = None;
            for solver in &mut self.theory_solvers {
                match solver.check() {
                    TheoryCheckResult::Consistent => continue,
                    TheoryCheckResult::Unknown => return ContextState::Unknown,
                    TheoryCheckResult::Conflict { conflicting } => {
                        self.conflicts_seen += 1;
                        conflict_clause =
                            Some(conflicting.into_iter().map(Literal::negate).collect());
                        break;
                    }
                }
            }

            match conflict_clause {
                None => return ContextState::Sat,
                Some(clause) => {
                    if clause.is_empty() {
                        return ContextState::Unsat;
                    }
                    self.boolean_core.add_clause(clause);
                }
            }
        }

        ContextState::Unknown
    }

    /// `push(n)` (spec §4.4, §4.5).
    pub fn push(&mut self, n: u32) -> Result<(), CommandError> {
        if self.mode == ContextMode::OneShot {
            return Err(CommandError::Context(
                ContextError::OneShotDoesNotSupportScopes,
            ));
        }

        self.assertion_stack.push(n).map_err(CommandError::Stack)?;

        if self.status == ContextState::Unsat {
            self.deferred_pushes_after_unsat += n;
            return Ok(());
        }

        if matches!(self.status, ContextState::Sat | ContextState::Unknown) {
            self.boolean_core.pop_to_level(self.base_level);
            for solver in &mut self.theory_solvers {
                solver.backtrack_to_level(self.base_level);
            }
            self.status = ContextState::Idle;
        }

        for _ in 0..n {
            self.boolean_core.push_level();
        }
        self.base_level += n;
        Ok(())
    }

    /// `pop(n)` (spec §4.4, §4.5).
    pub fn pop(&mut self, n: u32) -> Result<(), CommandError> {
        if self.mode == ContextMode::OneShot {
            return Err(CommandError::Context(
                ContextError::OneShotDoesNotSupportScopes,
            ));
        }

        // Spec §4.4: "a subsequent pop first consumes this [deferred] counter
        // before touching the context."
        let mut remaining = n;
        if self.deferred_pushes_after_unsat > 0 {
            let consumed = remaining.min(self.deferred_pushes_after_unsat);
            self.deferred_pushes_after_unsat -= consumed;
            remaining -= consumed;
        }

        let outcome = self
            .assertion_stack
            .pop(n, self.settings.global_declarations.value)
            .map_err(CommandError::Stack)?;

        self.declarations
            .retract_terms(&outcome.retracted_term_names);
        self.declarations
            .retract_sorts(&outcome.retracted_type_names);

        if remaining > 0 {
            self.base_level = self.base_level.saturating_sub(remaining);
            self.boolean_core.pop_to_level(self.base_level);
            for solver in &mut self.theory_solvers {
                solver.backtrack_to_level(self.base_level);
            }
        }

        self.gc_pending += outcome.retracted_term_names.len()
            + outcome.retracted_type_names.len()
            + outcome.retracted_named_asserts.len();
        if self.gc_pending >= self.settings.gc_threshold.value {
            self.collect_garbage();
        }

        // Spec §4.5: unsat clears only when crossing the level that caused it.
        if self.status == ContextState::Unsat
            && self.deferred_pushes_after_unsat == 0
            && remaining > 0
        {
            self.status = ContextState::Idle;
        }

        Ok(())
    }

    /// The current value of a `Bool`-sorted term, if it was internalized and the
    /// boolean core has assigned its literal (spec §6 `get-assignment`).
    pub fn boolean_value(&self, term: TermId) -> Option<bool> {
        let lit = self.internalizer.literal_of(term)?;
        self.boolean_core.assignment(lit)
    }

    /// The current value of a bit-vector-sorted term, as materialized by whichever
    /// attached theory solver was asked to assert an atom over it (spec §6
    /// `get-value`/`get-model`). Only terms that actually appeared as an operand of
    /// an internalized equality/comparison are bound; anything else is `None`.
    pub fn bv_model_value(&self, term: TermId) -> Option<crate::structures::bv_value::BvValue> {
        let positive = term.positive();
        for solver in &self.theory_solvers {
            if let Some((_, value)) = solver
                .build_model()
                .into_iter()
                .find(|(t, _)| *t == positive)
            {
                return Some(value);
            }
        }
        None
    }

    fn collect_garbage(&mut self) {
        let roots: Vec<TermId> = self.assertion_stack.live_assertions().to_vec();
        self.term_store.collect_garbage(&roots);
        self.normalizer.reset();
        self.gc_pending = 0;
    }

    /// `(check-sat)` interrupt (spec §5): sets the cooperative flag the search
    /// loop polls.
    pub fn interrupt(&mut self) {
        self.interrupt_flag.store(true, Ordering::Relaxed);
        if self.status == ContextState::Searching {
            self.status = ContextState::Interrupted;
        }
    }

    /// `reset` (spec §6): full reset retaining only options (incremental mode
    /// only, per the command table).
    pub fn reset(&mut self) {
        self.term_store = TermStore::new();
        self.normalizer = Normalizer::new();
        self.declarations = DeclarationTable::new();
        self.assertion_stack = AssertionStack::new();
        self.internalizer = Internalizer::new();
        self.logic = None;
        self.status = ContextState::Idle;
        self.base_level = 0;
        self.deferred_pushes_after_unsat = 0;
        self.gc_pending = 0;
        self.search_iterations = 0;
        self.conflicts_seen = 0;
        self.interrupt_flag.store(false, Ordering::Relaxed);
    }
}
