//! End-to-end command-driver scenarios (spec §8), exercised black-box through
//! [Command]/[Response] the way a front end would drive the library, without
//! reaching into [Context] internals beyond the term store needed to build
//! already-interned [TermId] arguments (parsing is out of scope, spec §1).
//!
//! Grounded on the teacher's `tests/basic.rs`: one flat module, one `Context`
//! (here, `CommandDriver`) built fresh per test, short straight-line scripts.

use smt_core::collaborators::printer::DebugPrinter;
use smt_core::collaborators::reference_engine::reference_pair;
use smt_core::command::{Command, CommandDriver, OptionValue, Response};
use smt_core::context::ContextMode;
use smt_core::reports::ModelValue;
use smt_core::structures::bv_value::BvValue;
use smt_core::structures::kind::TermKind;
use smt_core::structures::sort::Sort;

mod scenarios {
    use super::*;

    fn driver(mode: ContextMode) -> CommandDriver {
        let (boolean_core, theory_solver) = reference_pair();
        CommandDriver::new(mode, boolean_core, vec![theory_solver], Box::new(DebugPrinter))
    }

    /// Scenario 1: asserting `false` under `QF_BV` is unsat.
    #[test]
    fn trivial_unsat() {
        let mut driver = driver(ContextMode::OneShot);
        driver.execute(Command::SetLogic("QF_BV".to_string()));

        let bottom = driver
            .context
            .term_store
            .intern(TermKind::BoolConstant(false), Sort::Bool)
            .unwrap();
        assert!(matches!(
            driver.execute(Command::Assert(bottom)),
            Response::Success | Response::Silent
        ));

        match driver.execute(Command::CheckSat) {
            Response::CheckSat(report) => assert_eq!(report.to_string(), "unsat"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    /// Scenario 2: an empty assertion set under `QF_BV` is sat.
    #[test]
    fn trivial_sat() {
        let mut driver = driver(ContextMode::OneShot);
        driver.execute(Command::SetLogic("QF_BV".to_string()));

        match driver.execute(Command::CheckSat) {
            Response::CheckSat(report) => assert_eq!(report.to_string(), "sat"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    /// Scenario 3: a bit-vector constant binds its declared constant, and
    /// `get-value` reports it back.
    #[test]
    fn bv_satisfying_assignment_via_get_value() {
        let mut driver = driver(ContextMode::Incremental);
        driver.execute(Command::SetOption {
            keyword: "produce-models".to_string(),
            value: OptionValue::Bool(true),
        });
        driver.execute(Command::SetLogic("QF_BV".to_string()));
        driver.execute(Command::DeclareFun {
            name: "x".into(),
            params: vec![],
            result: Sort::BitVec(4),
        });

        let x = driver
            .context
            .term_store
            .intern(TermKind::Uninterpreted { name: "x".into() }, Sort::BitVec(4))
            .unwrap();
        let three = driver
            .context
            .term_store
            .intern(TermKind::BvConstant(BvValue::from_u64(4, 3)), Sort::BitVec(4))
            .unwrap();
        let eq = driver
            .context
            .term_store
            .intern(TermKind::Eq { lhs: x, rhs: three }, Sort::Bool)
            .unwrap();
        driver.execute(Command::Assert(eq));

        match driver.execute(Command::CheckSat) {
            Response::CheckSat(report) => assert_eq!(report.to_string(), "sat"),
            other => panic!("unexpected response: {other:?}"),
        }

        match driver.execute(Command::GetValue(vec![x])) {
            Response::Values(values) => {
                assert_eq!(values.len(), 1);
                assert_eq!(values[0].1, ModelValue::Bv(BvValue::from_u64(4, 3)));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    /// Scenario 4: a contradictory assertion under one push level makes the
    /// context unsat; popping the level restores satisfiability.
    #[test]
    fn push_pop_rollback() {
        let mut driver = driver(ContextMode::Incremental);
        driver.execute(Command::SetLogic("QF_BV".to_string()));
        driver.execute(Command::DeclareFun {
            name: "x".into(),
            params: vec![],
            result: Sort::BitVec(1),
        });

        let x = driver
            .context
            .term_store
            .intern(TermKind::Uninterpreted { name: "x".into() }, Sort::BitVec(1))
            .unwrap();
        let zero = driver
            .context
            .term_store
            .intern(TermKind::BvConstant(BvValue::from_u64(1, 0)), Sort::BitVec(1))
            .unwrap();
        let one = driver
            .context
            .term_store
            .intern(TermKind::BvConstant(BvValue::from_u64(1, 1)), Sort::BitVec(1))
            .unwrap();
        let x_is_zero = driver
            .context
            .term_store
            .intern(TermKind::Eq { lhs: x, rhs: zero }, Sort::Bool)
            .unwrap();
        let x_is_one = driver
            .context
            .term_store
            .intern(TermKind::Eq { lhs: x, rhs: one }, Sort::Bool)
            .unwrap();

        assert!(matches!(
            driver.execute(Command::Assert(x_is_zero)),
            Response::Success | Response::Silent
        ));

        assert!(matches!(
            driver.execute(Command::Push(1)),
            Response::Success | Response::Silent
        ));
        assert!(matches!(
            driver.execute(Command::Assert(x_is_one)),
            Response::Success | Response::Silent
        ));

        match driver.execute(Command::CheckSat) {
            Response::CheckSat(report) => assert_eq!(report.to_string(), "unsat"),
            other => panic!("unexpected response: {other:?}"),
        }

        assert!(matches!(
            driver.execute(Command::Pop(1)),
            Response::Success | Response::Silent
        ));

        match driver.execute(Command::CheckSat) {
            Response::CheckSat(report) => assert_eq!(report.to_string(), "sat"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    /// Scenario 5: a named boolean assertion shows up in `get-assignment`.
    #[test]
    fn named_assertion_in_get_assignment() {
        let mut driver = driver(ContextMode::Incremental);
        driver.execute(Command::SetOption {
            keyword: "produce-assignments".to_string(),
            value: OptionValue::Bool(true),
        });
        driver.execute(Command::SetLogic("QF_BV".to_string()));
        driver.execute(Command::DeclareFun {
            name: "p".into(),
            params: vec![],
            result: Sort::Bool,
        });

        let p = driver
            .context
            .term_store
            .intern(TermKind::Uninterpreted { name: "p".into() }, Sort::Bool)
            .unwrap();
        assert!(matches!(
            driver.execute(Command::AssertNamed {
                term: p,
                name: "P".into(),
            }),
            Response::Success | Response::Silent
        ));

        match driver.execute(Command::CheckSat) {
            Response::CheckSat(report) => assert_eq!(report.to_string(), "sat"),
            other => panic!("unexpected response: {other:?}"),
        }

        match driver.execute(Command::GetAssignment) {
            Response::Assignment(bindings) => {
                assert!(bindings.iter().any(|(name, _)| &**name == "P"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    /// Scenario 6: `set-option` after `set-logic` on a keyword gated to precede
    /// it reports an error rather than panicking or silently ignoring it.
    #[test]
    fn option_must_precede_set_logic_error() {
        let mut driver = driver(ContextMode::Incremental);
        driver.execute(Command::SetLogic("QF_BV".to_string()));

        match driver.execute(Command::SetOption {
            keyword: "global-declarations".to_string(),
            value: OptionValue::Bool(true),
        }) {
            Response::Error(message) => assert!(!message.is_empty()),
            other => panic!("expected an error response, got {other:?}"),
        }
    }
}
