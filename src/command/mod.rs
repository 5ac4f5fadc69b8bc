/*!
The command surface a driver dispatches (spec §6): one variant per recognized
SMT-LIB command, already shaped by the external parser --- this core never lexes
or parses, it only consumes [Command] values and produces [Response] values.

Grounded on the teacher's `otter_cli` dispatch loop (`otter_cli/src/main.rs`), which
reads a line, matches on a small fixed set of directives, and drives a
[Context](crate::context::Context) accordingly; generalized here from the teacher's
DIMACS-oriented directives (`solve`, `assert`, ...) to the full SMT-LIB command table.

Submodules:
- [driver] --- [CommandDriver], which owns a context and executes [Command] values.
- [response] --- [Response] and its SMT-LIB-flavored `Display` rendering.
*/

pub mod driver;
pub use driver::CommandDriver;

pub mod response;
pub use response::Response;

use crate::structures::sort::Sort;
use crate::structures::term::TermId;

use std::rc::Rc;

/// A value supplied to `set-option` or `set-info`, before it is routed to either
/// [GlobalSettings](crate::config::GlobalSettings) (the closed SMT-LIB keywords) or
/// [ParameterRegistry](crate::config::ParameterRegistry) (vendor-prefixed tunables).
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Nat(u64),
    /// A ratio in `[0, 1]`, only meaningful for a `ParameterRegistry` tunable.
    Ratio(f64),
    /// A factor `>= 1`, only meaningful for a `ParameterRegistry` tunable.
    Factor(f64),
    /// An enum symbol, only meaningful for a `ParameterRegistry` tunable.
    Symbol(String),
    Str(String),
}

/// One recognized SMT-LIB command (spec §6's command table), pre-parsed: formulas
/// and sorts arrive as already-interned [TermId]/[Sort] values rather than raw
/// syntax, since parsing is an out-of-scope collaborator (spec §1).
#[derive(Clone, Debug)]
pub enum Command {
    SetLogic(String),

    SetOption {
        keyword: String,
        value: OptionValue,
    },

    GetOption(String),

    SetInfo {
        keyword: String,
        value: String,
    },

    GetInfo(String),

    DeclareSort {
        name: Rc<str>,
        arity: u32,
    },

    DefineSort {
        name: Rc<str>,
        arity: u32,
        body: Sort,
    },

    DeclareFun {
        name: Rc<str>,
        params: Vec<Sort>,
        result: Sort,
    },

    DefineFun {
        name: Rc<str>,
        params: Vec<(Rc<str>, Sort)>,
        result: Sort,
        body: TermId,
    },

    Assert(TermId),

    /// `(assert (! φ :named n))`.
    AssertNamed {
        term: TermId,
        name: Rc<str>,
    },

    Push(u32),
    Pop(u32),

    CheckSat,

    GetValue(Vec<TermId>),
    GetAssignment,
    /// Vendor extension (spec §6): the full model, not just the queried terms.
    GetModel,

    Reset,

    Echo(String),
    Exit,
}
