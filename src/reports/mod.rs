/*!
Reports about a solve (spec §6, §7): the high-level `sat`/`unsat`/`unknown` verdict,
a materialized model for `get-value`/`get-assignment`/`get-model`, and the solver
statistics `get-info :all-statistics` dumps.

Grounded on the teacher's own `reports::Report` (`otter_sat/src/reports/mod.rs`, a
three-variant `Satisfiable | Unsatisfiable | Unknown` enum with a `From<ContextState>`
impl) and its `dispatch::library::stat::Stat` dispatch enum, generalized from "one
dispatch variant per statistic update" to a plain aggregate struct, since this core has
no dispatch channel to stream updates over.
*/

use crate::context::ContextState;
use crate::structures::bv_value::BvValue;

use std::rc::Rc;

/// The high-level verdict of a `check-sat` (spec §6, "Status lexeme mapping").
///
/// Mirrors the teacher's `Report` (`otter_sat/src/reports/mod.rs`) exactly in shape;
/// `searching`/`interrupted`/`error` all collapse to [Unknown](SolveReport::Unknown)
/// here, since none of them is a verdict a user-facing `check-sat` response reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolveReport {
    Satisfiable,
    Unsatisfiable,
    Unknown,
}

impl From<ContextState> for SolveReport {
    fn from(value: ContextState) -> Self {
        match value {
            ContextState::Sat => Self::Satisfiable,
            ContextState::Unsat => Self::Unsatisfiable,
            ContextState::Idle
            | ContextState::Searching
            | ContextState::Unknown
            | ContextState::Interrupted
            | ContextState::Error => Self::Unknown,
        }
    }
}

impl std::fmt::Display for SolveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "sat"),
            Self::Unsatisfiable => write!(f, "unsat"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single value materialized for a `get-value`/`get-assignment`/`get-model` query.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelValue {
    Bool(bool),
    Bv(BvValue),
}

impl std::fmt::Display for ModelValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Bv(v) => write!(f, "{v}"),
        }
    }
}

/// The bindings materialized for a `get-value`/`get-assignment`/`get-model` response,
/// in the order the query named its terms (or, for `get-assignment`/`get-model`, the
/// order the underlying table yields them).
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub bindings: Vec<(Rc<str>, ModelValue)>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: Rc<str>, value: ModelValue) {
        self.bindings.push((name, value));
    }
}

/// Aggregate solver statistics for `get-info :all-statistics` (spec §6's reserved
/// info key).
///
/// Grounded on the teacher's `Stat` dispatch enum (`Iterations`, `Chosen`,
/// `Conflicts`, `Time`), collapsed here into one struct since this core doesn't run a
/// dispatch channel to stream individual updates over.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    /// Rounds of the context's search loop that ran (spec §4.5 `run_search`).
    pub iterations: usize,

    /// Distinct terms asserted over the lifetime of the context.
    pub assertions: usize,

    /// Conflicting theory atoms detected.
    pub conflicts: usize,
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(:iterations {} :assertions {} :conflicts {})",
            self.iterations, self.assertions, self.conflicts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_report_from_context_state() {
        assert_eq!(SolveReport::from(ContextState::Sat), SolveReport::Satisfiable);
        assert_eq!(SolveReport::from(ContextState::Unsat), SolveReport::Unsatisfiable);
        assert_eq!(SolveReport::from(ContextState::Idle), SolveReport::Unknown);
    }

    #[test]
    fn model_value_display() {
        assert_eq!(ModelValue::Bool(true).to_string(), "true");
        assert_eq!(ModelValue::Bv(BvValue::from_u64(4, 3)).to_string(), "#b0011");
    }
}
