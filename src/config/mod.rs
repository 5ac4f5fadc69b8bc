/*!
Configuration of a context (spec §3 "Global settings", §4.7 "Parameter Registry").

Two registries exist side by side, mirroring the teacher's own split between a typed
`Config` (a struct of fields, one per tunable) and the open vendor-prefixed options a
solver frontend also needs to track:

- [GlobalSettings] is a closed struct of [ConfigOption] fields, one per SMT-LIB
  keyword of spec §3/§6 (`:print-success`, `:produce-models`, ...).
- [ParameterRegistry] is the closed enumeration of vendor-prefixed solver tunables of
  spec §4.7 (variable elimination, or-flattening, restart/decay, branching heuristic),
  looked up and type-checked by name at `set`/`get` time.
*/

mod config_option;
pub use config_option::{ConfigOption, SettableUntil};

mod params;
pub use params::{ParamKind, ParameterRegistry, ParamValue};

use crate::types::err::CommandError;

/// A value parsed from a `set-option`/`set-info` keyword argument, before it is
/// type-checked against the option it targets.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Nat(u64),
    Str(String),
}

/// The fixed SMT-LIB keyword options recognized by the core (spec §3, §6).
pub struct GlobalSettings {
    pub print_success: ConfigOption<bool>,
    pub produce_models: ConfigOption<bool>,
    pub produce_assignments: ConfigOption<bool>,
    pub produce_unsat_cores: ConfigOption<bool>,
    pub regular_output_channel: ConfigOption<String>,
    pub diagnostic_output_channel: ConfigOption<String>,
    pub verbosity: ConfigOption<u64>,
    pub random_seed: ConfigOption<u64>,
    pub global_declarations: ConfigOption<bool>,

    /// Retracted-declaration threshold before a scope pop fires a term store gc
    /// sweep (spec §4.4, "e.g. 1000"; supplemented in `SPEC_FULL.md` §E as a tunable
    /// rather than a hardcoded constant).
    pub gc_threshold: ConfigOption<usize>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            print_success: ConfigOption {
                name: "print-success",
                min: false,
                max: true,
                gate: SettableUntil::Anytime,
                value: true,
            },
            produce_models: ConfigOption {
                name: "produce-models",
                min: false,
                max: true,
                gate: SettableUntil::Anytime,
                value: false,
            },
            produce_assignments: ConfigOption {
                name: "produce-assignments",
                min: false,
                max: true,
                gate: SettableUntil::Anytime,
                value: false,
            },
            produce_unsat_cores: ConfigOption {
                name: "produce-unsat-cores",
                min: false,
                max: true,
                gate: SettableUntil::Anytime,
                value: false,
            },
            regular_output_channel: ConfigOption {
                name: "regular-output-channel",
                min: String::new(),
                max: String::new(),
                gate: SettableUntil::Anytime,
                value: "stdout".to_string(),
            },
            diagnostic_output_channel: ConfigOption {
                name: "diagnostic-output-channel",
                min: String::new(),
                max: String::new(),
                gate: SettableUntil::Anytime,
                value: "stderr".to_string(),
            },
            verbosity: ConfigOption {
                name: "verbosity",
                min: 0,
                max: u64::MAX,
                gate: SettableUntil::Anytime,
                value: 0,
            },
            random_seed: ConfigOption {
                name: "random-seed",
                min: 0,
                max: u64::MAX,
                gate: SettableUntil::Anytime,
                value: 0,
            },
            global_declarations: ConfigOption {
                name: "global-declarations",
                min: false,
                max: true,
                // spec §8 scenario 6: this option must precede `set-logic`.
                gate: SettableUntil::BeforeSetLogic,
                value: false,
            },
            gc_threshold: ConfigOption {
                name: "gc-threshold",
                min: 0,
                max: usize::MAX,
                gate: SettableUntil::Anytime,
                value: 1000,
            },
        }
    }
}

impl GlobalSettings {
    /// Sets a recognized keyword's value, rejecting it if the option's gate has
    /// already closed (spec §8 scenario 6) or the value's shape doesn't match.
    pub fn set(
        &mut self,
        keyword: &str,
        value: SettingValue,
        logic_is_set: bool,
    ) -> Result<(), CommandError> {
        macro_rules! set_bool {
            ($opt:expr) => {{
                $opt.check_gate(logic_is_set, keyword)?;
                match value {
                    SettingValue::Bool(b) => {
                        $opt.value = b;
                        Ok(())
                    }
                    _ => Err(CommandError::Param(
                        crate::types::err::ParamError::TypeMismatch {
                            name: keyword.to_string(),
                            expected: "bool",
                        },
                    )),
                }
            }};
        }

        match keyword {
            "print-success" => set_bool!(self.print_success),
            "produce-models" => set_bool!(self.produce_models),
            "produce-assignments" => set_bool!(self.produce_assignments),
            "produce-unsat-cores" => set_bool!(self.produce_unsat_cores),
            "global-declarations" => set_bool!(self.global_declarations),
            "regular-output-channel" => {
                self.regular_output_channel.check_gate(logic_is_set, keyword)?;
                match value {
                    SettingValue::Str(s) => {
                        self.regular_output_channel.value = s;
                        Ok(())
                    }
                    _ => Err(CommandError::Param(
                        crate::types::err::ParamError::TypeMismatch {
                            name: keyword.to_string(),
                            expected: "string",
                        },
                    )),
                }
            }
            "diagnostic-output-channel" => {
                self.diagnostic_output_channel
                    .check_gate(logic_is_set, keyword)?;
                match value {
                    SettingValue::Str(s) => {
                        self.diagnostic_output_channel.value = s;
                        Ok(())
                    }
                    _ => Err(CommandError::Param(
                        crate::types::err::ParamError::TypeMismatch {
                            name: keyword.to_string(),
                            expected: "string",
                        },
                    )),
                }
            }
            "verbosity" => {
                self.verbosity.check_gate(logic_is_set, keyword)?;
                match value {
                    SettingValue::Nat(n) => {
                        self.verbosity.value = n;
                        Ok(())
                    }
                    _ => Err(CommandError::Param(
                        crate::types::err::ParamError::TypeMismatch {
                            name: keyword.to_string(),
                            expected: "nat",
                        },
                    )),
                }
            }
            "random-seed" => {
                self.random_seed.check_gate(logic_is_set, keyword)?;
                match value {
                    SettingValue::Nat(n) => {
                        self.random_seed.value = n;
                        Ok(())
                    }
                    _ => Err(CommandError::Param(
                        crate::types::err::ParamError::TypeMismatch {
                            name: keyword.to_string(),
                            expected: "nat",
                        },
                    )),
                }
            }
            "gc-threshold" => {
                self.gc_threshold.check_gate(logic_is_set, keyword)?;
                match value {
                    SettingValue::Nat(n) => {
                        self.gc_threshold.value = n as usize;
                        Ok(())
                    }
                    _ => Err(CommandError::Param(
                        crate::types::err::ParamError::TypeMismatch {
                            name: keyword.to_string(),
                            expected: "nat",
                        },
                    )),
                }
            }
            other => Err(CommandError::NameNotRecognized(format!(":{other}"))),
        }
    }
}

/// Whether a [ConfigOption]'s gate still permits a write, given whether `set-logic`
/// has already run.
pub(crate) fn gate_is_open(gate: SettableUntil, logic_is_set: bool) -> bool {
    match gate {
        SettableUntil::Anytime => true,
        SettableUntil::BeforeSetLogic => !logic_is_set,
    }
}
