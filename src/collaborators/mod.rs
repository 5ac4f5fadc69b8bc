/*!
Interfaces to out-of-scope collaborators (spec §1, §6): the SMT-LIB parser, the
boolean core, and the theory solvers. This core consumes these interfaces; it does
not implement the collaborators themselves.

Submodules:
- [parser] --- the shape of a parsed command and its source position, as produced by
  the external lexer/parser/term-stack.
- [boolean_core] --- the literal-allocation/clause-addition/assignment-query/push-pop
  interface a CDCL boolean core exposes.
- [theory_solver] --- the assert_atom/propagate/check/backtrack_to_level/build_model
  interface each theory solver exposes.
- [printer] --- pretty-printing of terms and models, out of scope per spec §1 but
  needed by the command driver to render query responses; consumed as a trait object
  rather than implemented here.
- [reference_engine] --- a small, deliberately unoptimized boolean-core/theory-solver
  pair implementing the two traits above, so the crate has something runnable on its
  own without a real CDCL engine wired in.
*/

pub mod parser;

pub mod boolean_core;
pub use boolean_core::{BooleanCore, Literal};

pub mod theory_solver;
pub use theory_solver::{TheoryAtom, TheoryCheckResult, TheorySolver};

pub mod printer;
pub use printer::TermPrinter;

pub mod reference_engine;
pub use reference_engine::reference_pair;
