/*!
The response a [CommandDriver](super::CommandDriver) produces for a [Command](super::Command)
(spec §6, "Response vocabulary"; spec §7, "Propagation policy").
*/

use crate::reports::{Model, ModelValue, SolveReport};

use std::rc::Rc;

/// A command's outcome, rendered via `Display` exactly as spec §6/§7 describe.
#[derive(Clone, Debug)]
pub enum Response {
    /// A side-effecting command succeeded and `:print-success` is enabled.
    Success,

    /// A side-effecting command succeeded but `:print-success` is disabled, so
    /// nothing is emitted (spec §6: "emit `success` when `print-success = true`").
    Silent,

    CheckSat(SolveReport),

    /// `get-value`'s `((term value) ...)` result.
    Values(Vec<(String, ModelValue)>),

    /// `get-assignment`'s `((name value) ...)` result, restricted to boolean
    /// named assertions.
    Assignment(Vec<(Rc<str>, bool)>),

    /// `get-model`'s full-model result (spec §6, vendor extension).
    Model(Model),

    /// `get-option`'s current-value result.
    OptionValue(String),

    /// `get-info`'s result, already rendered (a quoted string, a symbol, or a
    /// statistics S-expression, depending on the key).
    Info(String),

    /// `echo`'s result: always emitted, regardless of `:print-success`.
    Echo(String),

    /// `exit`: the driver's caller is responsible for actually terminating.
    Exit,

    /// `(error "message")` (spec §7: "Semantic errors from the core are printed
    /// as `(error "<message>")` without position").
    Error(String),
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Silent => Ok(()),
            Self::CheckSat(report) => write!(f, "{report}"),
            Self::Values(values) => {
                write!(f, "(")?;
                for (i, (term, value)) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({term} {value})")?;
                }
                write!(f, ")")
            }
            Self::Assignment(bindings) => {
                write!(f, "(")?;
                for (i, (name, value)) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({name} {value})")?;
                }
                write!(f, ")")
            }
            Self::Model(model) => {
                write!(f, "(")?;
                for (i, (name, value)) in model.bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({name} {value})")?;
                }
                write!(f, ")")
            }
            Self::OptionValue(s) | Self::Info(s) => write!(f, "{s}"),
            Self::Echo(s) => write!(f, "\"{s}\""),
            Self::Exit => Ok(()),
            Self::Error(message) => write!(f, "(error \"{message}\")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_render_as_paired_sexps() {
        let response = Response::Values(vec![("x".to_string(), ModelValue::Bool(true))]);
        assert_eq!(response.to_string(), "((x true))");
    }

    #[test]
    fn error_renders_with_message_quoted() {
        let response = Response::Error("oops".to_string());
        assert_eq!(response.to_string(), "(error \"oops\")");
    }

    #[test]
    fn silent_renders_as_nothing() {
        assert_eq!(Response::Silent.to_string(), "");
    }
}
