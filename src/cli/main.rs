//! A minimal demo binary driving [CommandDriver] over a hardcoded script of
//! [Command] values, standing in for the real SMT-LIB front end (lexer, parser,
//! term-stack) that spec §1 names as out of scope.
//!
//! Grounded on `otter_cli/src/main.rs`'s role as a thin shell around its library's
//! `Context`: this binary plays the same role here, just driving the solve loop
//! directly with pre-built commands rather than parsed DIMACS/SMT-LIB input.

use smt_core::collaborators::printer::DebugPrinter;
use smt_core::collaborators::reference_engine::reference_pair;
use smt_core::command::{Command, CommandDriver, OptionValue};
use smt_core::context::ContextMode;
use smt_core::structures::bv_value::BvValue;
use smt_core::structures::kind::TermKind;
use smt_core::structures::sort::Sort;

fn main() {
    #[cfg(feature = "log")]
    env_logger::init();

    let (boolean_core, theory_solver) = reference_pair();
    let mut driver = CommandDriver::new(
        ContextMode::Incremental,
        boolean_core,
        vec![theory_solver],
        Box::new(DebugPrinter),
    );

    let commands = [
        Command::SetOption {
            keyword: "produce-models".to_string(),
            value: OptionValue::Bool(true),
        },
        Command::SetLogic("QF_BV".to_string()),
        Command::DeclareFun {
            name: "x".into(),
            params: vec![],
            result: Sort::BitVec(4),
        },
    ];
    for command in commands {
        report(&driver.execute(command));
    }

    let x = driver
        .context
        .term_store
        .intern(TermKind::Uninterpreted { name: "x".into() }, Sort::BitVec(4))
        .expect("interning a previously declared constant cannot fail");
    let constant = driver
        .context
        .term_store
        .intern(TermKind::BvConstant(BvValue::from_u64(4, 3)), Sort::BitVec(4))
        .expect("interning a bit-vector constant cannot fail");
    let equality = driver
        .context
        .term_store
        .intern(TermKind::Eq { lhs: x, rhs: constant }, Sort::Bool)
        .expect("interning an equality atom cannot fail");

    report(&driver.execute(Command::Assert(equality)));
    report(&driver.execute(Command::CheckSat));
    report(&driver.execute(Command::GetValue(vec![x])));
    report(&driver.execute(Command::Exit));
}

fn report(response: &smt_core::command::Response) {
    let text = response.to_string();
    if !text.is_empty() {
        println!("{text}");
    }
}
