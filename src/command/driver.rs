/*!
[CommandDriver], which owns a [Context](crate::context::Context) and dispatches
[Command] values against it, rendering a [Response] for each (spec §4.6, §6).

Grounded on the teacher's `otter_cli` read-eval loop: a thin shell that owns the
long-lived object (there, a `Context<...>` parameterized over a CDCL core; here,
this crate's own [Context]) and translates each input line into a call against it,
leaving error formatting and dispatch as the only real logic in this layer.
*/

use super::{Command, OptionValue, Response};
use crate::collaborators::boolean_core::BooleanCore;
use crate::collaborators::theory_solver::TheorySolver;
use crate::collaborators::TermPrinter;
use crate::config::{ParamValue, SettingValue};
use crate::context::{Context, ContextMode, ContextState, Declaration};
use crate::misc::log::targets;
use crate::reports::{Model, ModelValue};
use crate::structures::kind::TermKind;
use crate::structures::sort::Sort;
use crate::structures::term::TermId;
use crate::types::err::{CommandError, ContextError};

use std::collections::HashMap;
use std::rc::Rc;

/// The SMT-LIB keywords [GlobalSettings](crate::config::GlobalSettings) recognizes;
/// anything else is routed to the [ParameterRegistry](crate::config::ParameterRegistry)
/// instead (spec §6, "vendor-prefixed `:<vendor>-<param>`").
const GLOBAL_KEYWORDS: &[&str] = &[
    "print-success",
    "produce-models",
    "produce-assignments",
    "produce-unsat-cores",
    "regular-output-channel",
    "diagnostic-output-channel",
    "verbosity",
    "random-seed",
    "global-declarations",
    "gc-threshold",
];

/// Read-only info keys (spec §6, "Reserved info keys"): writes are rejected, reads
/// are computed rather than looked up in the free-form metadata table.
const RESERVED_INFO_KEYS: &[&str] = &[
    "error-behavior",
    "name",
    "authors",
    "version",
    "reason-unknown",
    "all-statistics",
];

/// Dispatches [Command] values against an owned [Context], rendering [Response]s.
pub struct CommandDriver {
    pub context: Context,
    printer: Box<dyn TermPrinter>,
    /// Free-form `set-info`/`get-info` metadata outside the reserved keys.
    info: HashMap<String, String>,
}

impl CommandDriver {
    pub fn new(
        mode: ContextMode,
        boolean_core: Box<dyn BooleanCore>,
        theory_solvers: Vec<Box<dyn TheorySolver>>,
        printer: Box<dyn TermPrinter>,
    ) -> Self {
        CommandDriver {
            context: Context::new(mode, boolean_core, theory_solvers),
            printer,
            info: HashMap::new(),
        }
    }

    /// Executes a single command, producing the response to emit.
    pub fn execute(&mut self, command: Command) -> Response {
        log::trace!(target: targets::COMMAND_DRIVER, "dispatching {command:?}");
        match command {
            Command::SetLogic(name) => {
                let result = self.context.set_logic(&name);
                self.side_effect_response(result)
            }

            Command::SetOption { keyword, value } => self.set_option(&keyword, value),
            Command::GetOption(keyword) => self.get_option(&keyword),

            Command::SetInfo { keyword, value } => self.set_info(keyword, value),
            Command::GetInfo(keyword) => self.get_info(&keyword),

            Command::DeclareSort { name, arity } => self.declare_sort(name, arity),
            Command::DefineSort { name, arity, body } => self.define_sort(name, arity, body),
            Command::DeclareFun {
                name,
                params,
                result,
            } => self.declare_fun(name, params, result),
            Command::DefineFun {
                name,
                params,
                result,
                body,
            } => self.define_fun(name, params, result, body),

            Command::Assert(term) => {
                let result = self.context.assert_formula(term);
                self.side_effect_response(result)
            }
            Command::AssertNamed { term, name } => self.assert_named(term, name),

            Command::Push(n) => {
                let result = self.context.push(n);
                self.side_effect_response(result)
            }
            Command::Pop(n) => {
                let result = self.context.pop(n);
                self.side_effect_response(result)
            }

            Command::CheckSat => match self.context.check_sat() {
                Ok(state) => Response::CheckSat(state.into()),
                Err(e) => Response::Error(e.to_string()),
            },

            Command::GetValue(terms) => self.get_value(terms),
            Command::GetAssignment => self.get_assignment(),
            Command::GetModel => self.get_model(),

            Command::Reset => self.reset(),

            Command::Echo(text) => Response::Echo(text),
            Command::Exit => Response::Exit,
        }
    }

    fn error_response(&self, error: CommandError) -> Response {
        Response::Error(error.to_string())
    }

    fn success_response(&self) -> Response {
        if self.context.settings.print_success.value {
            Response::Success
        } else {
            Response::Silent
        }
    }

    fn side_effect_response(&self, result: Result<(), CommandError>) -> Response {
        match result {
            Ok(()) => self.success_response(),
            Err(e) => Response::Error(e.to_string()),
        }
    }

    fn set_option(&mut self, keyword: &str, value: OptionValue) -> Response {
        let logic_is_set = self.context.logic_is_set();
        let result = if GLOBAL_KEYWORDS.contains(&keyword) {
            match option_value_to_setting(&value) {
                Some(setting) => self.context.settings.set(keyword, setting, logic_is_set),
                None => Err(CommandError::Param(crate::types::err::ParamError::TypeMismatch {
                    name: keyword.to_string(),
                    expected: "a value of the option's declared type",
                })),
            }
        } else {
            match option_value_to_param(value) {
                Some(param) => self
                    .context
                    .params
                    .set(keyword, param)
                    .map_err(CommandError::Param),
                None => Err(CommandError::NameNotRecognized(format!(":{keyword}"))),
            }
        };
        self.side_effect_response(result)
    }

    fn get_option(&self, keyword: &str) -> Response {
        let settings = &self.context.settings;
        let rendered = match keyword {
            "print-success" => Some(settings.print_success.value.to_string()),
            "produce-models" => Some(settings.produce_models.value.to_string()),
            "produce-assignments" => Some(settings.produce_assignments.value.to_string()),
            "produce-unsat-cores" => Some(settings.produce_unsat_cores.value.to_string()),
            "regular-output-channel" => {
                Some(format!("\"{}\"", settings.regular_output_channel.value))
            }
            "diagnostic-output-channel" => {
                Some(format!("\"{}\"", settings.diagnostic_output_channel.value))
            }
            "verbosity" => Some(settings.verbosity.value.to_string()),
            "random-seed" => Some(settings.random_seed.value.to_string()),
            "global-declarations" => Some(settings.global_declarations.value.to_string()),
            "gc-threshold" => Some(settings.gc_threshold.value.to_string()),
            other => self.context.params.get(other).ok().map(render_param_value),
        };
        match rendered {
            Some(s) => Response::OptionValue(s),
            None => self.error_response(CommandError::NameNotRecognized(format!(":{keyword}"))),
        }
    }

    fn set_info(&mut self, keyword: String, value: String) -> Response {
        if RESERVED_INFO_KEYS.contains(&keyword.as_str()) {
            return self.error_response(CommandError::ReservedInfoKeyIsReadOnly(format!(
                ":{keyword}"
            )));
        }
        self.info.insert(keyword, value);
        self.success_response()
    }

    fn get_info(&self, keyword: &str) -> Response {
        let rendered = match keyword {
            "name" => Some("\"smt_core\"".to_string()),
            "authors" => Some("\"smt_core contributors\"".to_string()),
            "version" => Some(format!("\"{}\"", env!("CARGO_PKG_VERSION"))),
            "error-behavior" => Some("continued-execution".to_string()),
            "reason-unknown" => Some(
                match self.context.status() {
                    ContextState::Interrupted => "incomplete",
                    _ => "unknown",
                }
                .to_string(),
            ),
            "all-statistics" => Some(self.context.stats().to_string()),
            other => self.info.get(other).map(|v| format!("\"{v}\"")),
        };
        match rendered {
            Some(s) => Response::Info(s),
            None => self.error_response(CommandError::NameNotRecognized(format!(":{keyword}"))),
        }
    }

    fn declare_sort(&mut self, name: Rc<str>, arity: u32) -> Response {
        if !self.context.logic_is_set() {
            return self.error_response(CommandError::Context(ContextError::IllegalInState));
        }
        if self.context.declarations.sort_is_declared(&name) {
            return self.error_response(CommandError::NameAlreadyDeclared(name.to_string()));
        }
        self.context
            .declarations
            .insert_sort(name.clone(), Declaration::Sort { arity });
        self.context.assertion_stack.declare_type(name);
        self.success_response()
    }

    fn define_sort(&mut self, name: Rc<str>, arity: u32, body: Sort) -> Response {
        if !self.context.logic_is_set() {
            return self.error_response(CommandError::Context(ContextError::IllegalInState));
        }
        if self.context.declarations.sort_is_declared(&name) {
            return self.error_response(CommandError::NameAlreadyDeclared(name.to_string()));
        }
        self.context
            .declarations
            .insert_sort(name.clone(), Declaration::SortMacro { arity, body });
        self.context.assertion_stack.declare_type(name);
        self.success_response()
    }

    fn declare_fun(&mut self, name: Rc<str>, params: Vec<Sort>, result: Sort) -> Response {
        if !self.context.logic_is_set() {
            return self.error_response(CommandError::Context(ContextError::IllegalInState));
        }
        if self.context.declarations.term_is_declared(&name) {
            return self.error_response(CommandError::NameAlreadyDeclared(name.to_string()));
        }

        // A zero-arity function is a constant: intern its term now, so a later
        // `get-model` can find it even if it's never the operand of an assertion.
        if params.is_empty() {
            if let Err(e) = self
                .context
                .term_store
                .intern(TermKind::Uninterpreted { name: name.clone() }, result.clone())
            {
                return Response::Error(e.to_string());
            }
        }

        self.context.declarations.insert_term(
            name.clone(),
            Declaration::Term {
                params,
                result,
            },
        );
        self.context.assertion_stack.declare_term(name);
        self.success_response()
    }

    fn define_fun(
        &mut self,
        name: Rc<str>,
        params: Vec<(Rc<str>, Sort)>,
        result: Sort,
        body: TermId,
    ) -> Response {
        if !self.context.logic_is_set() {
            return self.error_response(CommandError::Context(ContextError::IllegalInState));
        }
        if self.context.declarations.term_is_declared(&name) {
            return self.error_response(CommandError::NameAlreadyDeclared(name.to_string()));
        }
        self.context.declarations.insert_term(
            name.clone(),
            Declaration::Macro {
                params,
                result,
                body,
            },
        );
        self.context.assertion_stack.declare_term(name);
        self.success_response()
    }

    fn assert_named(&mut self, term: TermId, name: Rc<str>) -> Response {
        let result = self.context.assert_formula(term);
        if result.is_ok() {
            let sort = self.context.term_store.sort_of(term).clone();
            self.context
                .assertion_stack
                .add_named_assert(name, term, sort);
        }
        self.side_effect_response(result)
    }

    fn value_of(&self, term: TermId) -> Option<ModelValue> {
        match self.context.term_store.sort_of(term) {
            Sort::Bool => self.context.boolean_value(term).map(ModelValue::Bool),
            Sort::BitVec(_) => self.context.bv_model_value(term).map(ModelValue::Bv),
            _ => None,
        }
    }

    fn require_sat_or_unknown(&self) -> Result<(), CommandError> {
        match self.context.status() {
            ContextState::Sat | ContextState::Unknown => Ok(()),
            _ => Err(CommandError::QueryRequiresSatOrUnknown),
        }
    }

    fn get_value(&self, terms: Vec<TermId>) -> Response {
        if let Err(e) = self.require_sat_or_unknown() {
            return self.error_response(e);
        }
        if !self.context.settings.produce_models.value {
            return self.error_response(CommandError::ModelsNotEnabled);
        }

        let mut values = Vec::with_capacity(terms.len());
        for term in terms {
            let Some(value) = self.value_of(term) else {
                return self.error_response(CommandError::UnevaluableTerm);
            };
            let rendered = self.printer.print(&self.context.term_store, term);
            values.push((rendered, value));
        }
        Response::Values(values)
    }

    fn get_assignment(&self) -> Response {
        if let Err(e) = self.require_sat_or_unknown() {
            return self.error_response(e);
        }
        if !self.context.settings.produce_assignments.value {
            return self.error_response(CommandError::AssignmentsNotEnabled);
        }

        let named: Vec<(Rc<str>, TermId)> = self
            .context
            .assertion_stack
            .named_asserts()
            .iter()
            .filter(|named| named.sort == Sort::Bool)
            .map(|named| (named.name.clone(), named.term))
            .collect();

        let mut bindings = Vec::with_capacity(named.len());
        for (name, term) in named {
            if let Some(value) = self.context.boolean_value(term) {
                bindings.push((name, value));
            }
        }
        Response::Assignment(bindings)
    }

    fn get_model(&mut self) -> Response {
        if let Err(e) = self.require_sat_or_unknown() {
            return self.error_response(e);
        }
        if !self.context.settings.produce_models.value {
            return self.error_response(CommandError::ModelsNotEnabled);
        }

        let constants: Vec<(Rc<str>, Sort)> = self
            .context
            .declarations
            .term_entries()
            .filter_map(|(name, decl)| match decl {
                Declaration::Term { params, result } if params.is_empty() => {
                    Some((name.clone(), result.clone()))
                }
                _ => None,
            })
            .collect();

        let mut model = Model::new();
        for (name, result) in constants {
            let Ok(term) = self
                .context
                .term_store
                .intern(TermKind::Uninterpreted { name: name.clone() }, result)
            else {
                continue;
            };
            if let Some(value) = self.value_of(term) {
                model.push(name, value);
            }
        }
        Response::Model(model)
    }

    fn reset(&mut self) -> Response {
        if self.context.mode() == ContextMode::OneShot {
            return self.error_response(CommandError::Context(
                ContextError::OneShotDoesNotSupportScopes,
            ));
        }
        self.context.reset();
        self.info.clear();
        self.success_response()
    }
}

fn option_value_to_setting(value: &OptionValue) -> Option<SettingValue> {
    match value {
        OptionValue::Bool(b) => Some(SettingValue::Bool(*b)),
        OptionValue::Nat(n) => Some(SettingValue::Nat(*n)),
        OptionValue::Str(s) => Some(SettingValue::Str(s.clone())),
        OptionValue::Ratio(_) | OptionValue::Factor(_) | OptionValue::Symbol(_) => None,
    }
}

fn option_value_to_param(value: OptionValue) -> Option<ParamValue> {
    match value {
        OptionValue::Bool(b) => Some(ParamValue::Bool(b)),
        OptionValue::Nat(n) => Some(ParamValue::PositiveInt(n)),
        OptionValue::Ratio(r) => Some(ParamValue::Ratio(r)),
        OptionValue::Factor(f) => Some(ParamValue::Factor(f)),
        OptionValue::Symbol(s) => Some(ParamValue::Symbol(s)),
        OptionValue::Str(_) => None,
    }
}

fn render_param_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(b) => b.to_string(),
        ParamValue::PositiveInt(n) => n.to_string(),
        ParamValue::Ratio(r) | ParamValue::Factor(r) => r.to_string(),
        ParamValue::Symbol(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::reference_engine::reference_pair;
    use crate::collaborators::printer::DebugPrinter;
    use crate::structures::bv_value::BvValue;

    fn driver(mode: ContextMode) -> CommandDriver {
        let (boolean_core, theory_solver) = reference_pair();
        CommandDriver::new(mode, boolean_core, vec![theory_solver], Box::new(DebugPrinter))
    }

    #[test]
    fn trivial_unsat_scenario() {
        let mut driver = driver(ContextMode::OneShot);
        assert!(matches!(
            driver.execute(Command::SetLogic("QF_BV".to_string())),
            Response::Success | Response::Silent
        ));

        let term = driver
            .context
            .term_store
            .intern(TermKind::BoolConstant(false), Sort::Bool)
            .unwrap();
        driver.execute(Command::Assert(term));

        match driver.execute(Command::CheckSat) {
            Response::CheckSat(report) => assert_eq!(report.to_string(), "unsat"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn trivial_sat_scenario() {
        let mut driver = driver(ContextMode::OneShot);
        driver.execute(Command::SetLogic("QF_BV".to_string()));
        match driver.execute(Command::CheckSat) {
            Response::CheckSat(report) => assert_eq!(report.to_string(), "sat"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn get_value_requires_models_enabled() {
        let mut driver = driver(ContextMode::OneShot);
        driver.execute(Command::SetLogic("QF_BV".to_string()));
        driver.execute(Command::CheckSat);

        let term = driver
            .context
            .term_store
            .intern(TermKind::BoolConstant(true), Sort::Bool)
            .unwrap();
        match driver.execute(Command::GetValue(vec![term])) {
            Response::Error(_) => {}
            other => panic!("expected models-not-enabled error, got {other:?}"),
        }
    }

    #[test]
    fn option_must_precede_set_logic_is_rejected_afterward() {
        let mut driver = driver(ContextMode::Incremental);
        driver.execute(Command::SetLogic("QF_BV".to_string()));
        let response = driver.execute(Command::SetOption {
            keyword: "global-declarations".to_string(),
            value: OptionValue::Bool(true),
        });
        assert!(matches!(response, Response::Error(_)));
    }

    #[test]
    fn bv_value_round_trips_through_get_value() {
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
            .intern(
                TermKind::Uninterpreted { name: "x".into() },
                Sort::BitVec(4),
            )
            .unwrap();
        let constant = driver
            .context
            .term_store
            .intern(TermKind::BvConstant(BvValue::from_u64(4, 3)), Sort::BitVec(4))
            .unwrap();
        let eq = driver
            .context
            .term_store
            .intern(TermKind::Eq { lhs: x, rhs: constant }, Sort::Bool)
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
}
