/*!
A library implementing the core of an SMT-LIB 2 solver for the quantifier-free
bit-vector fragment (QF_BV), with an architecture open to further theories.

otter_sat is a library for determining the satisfiability of boolean formulas; this
library takes the same approach one layer up, determining the satisfiability of
formulas over bit-vectors (and, in outline, uninterpreted functions, linear
arithmetic, arrays, and quantifiers) by normalizing and internalizing them down to
atoms a boolean core and theory solvers can decide.

# Orientation

The library is built around a [Context](context::Context), reached through a
[CommandDriver](command::CommandDriver) that accepts pre-parsed SMT-LIB commands
(parsing itself is left to an external collaborator, see [collaborators::parser]).

At a high level a solve is viewed in terms of a handful of components:
- User terms are interned in a [TermStore](term_store::TermStore), a hash-consed DAG.
- Bit-vector terms are canonicalized by a [Normalizer](normalizer::Normalizer),
  modulo a target width, separating evaluable (constant) content from variable
  content.
- Canonical terms are mapped into solver-internal vocabulary by the
  [Internalizer](internalizer), which populates the [Context](context::Context).
- Declarations and named assertions are tracked per push/pop scope by an
  [AssertionStack](assertion_stack::AssertionStack).
- [Settings](config::GlobalSettings) and a [ParameterRegistry](config::ParameterRegistry)
  hold the recognized SMT-LIB options and vendor-prefixed tunables.

Useful starting points:
- [command::CommandDriver], to see how a stream of commands is dispatched.
- [context::Context], to inspect the state machine a solve runs against.
- [normalizer::Normalizer], for the bit-vector canonicalization algorithm.

# Logs

Calls to the [log] macro are made throughout, with a variety of targets defined to
help narrow output to relevant parts of the library; see [misc::log::targets].
No logging backend is bundled; enable the `log` feature to pull in `env_logger` for
the demo binary and tests.
*/

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::single_match)]

pub mod types;

pub mod misc;

pub mod generic;

pub mod structures;

pub mod term_store;

pub mod normalizer;

pub mod config;

pub mod assertion_stack;

pub mod context;

pub mod internalizer;

pub mod reports;

pub mod collaborators;

pub mod command;
