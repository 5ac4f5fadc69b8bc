/*!
Error types used in the library.

- Most of these surface directly to a user, formatted per the command taxonomy.
- Some are internally expected --- e.g. a `TrivialUnsat` from the internalizer is a
  routine outcome of asserting a formula, not a bug.
- Names of the error enums overlap with the subsystem they originate in, so
  `err::{self}` is typically used to prefix use of the types with `err::`.
*/

use crate::structures::term::TermId;

/// A union of varied error kinds, one per subsystem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CoreError {
    /// An error from the term store.
    TermStore(TermStoreError),

    /// An error from the bit-vector normalizer.
    Normalize(NormalizeError),

    /// An error from the internalizer.
    Internalize(InternalizeError),

    /// An error from the assertion stack.
    Stack(StackError),

    /// An error related to the state of the context.
    Context(ContextError),

    /// An error dispatching or executing a command.
    Command(CommandError),

    /// An error from the parameter registry.
    Param(ParamError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TermStore(e) => write!(f, "{e}"),
            Self::Normalize(e) => write!(f, "{e}"),
            Self::Internalize(e) => write!(f, "{e}"),
            Self::Stack(e) => write!(f, "{e}"),
            Self::Context(e) => write!(f, "{e}"),
            Self::Command(e) => write!(f, "{e}"),
            Self::Param(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CoreError {}

/// Errors raised by the term store (see [crate::term_store]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TermStoreError {
    /// The identifier namespace has been exhausted.
    IdsExhausted,

    /// A child of a term being interned was not well-formed (a programming error;
    /// detected via a debug assertion at intern time).
    MalformedChild,
}

impl From<TermStoreError> for CoreError {
    fn from(e: TermStoreError) -> Self {
        CoreError::TermStore(e)
    }
}

impl std::fmt::Display for TermStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdsExhausted => write!(f, "term identifier space exhausted"),
            Self::MalformedChild => write!(f, "malformed child term"),
        }
    }
}

/// Errors raised by [normalize](crate::normalizer::Normalizer::normalize) and
/// [analyse](crate::normalizer::Normalizer::analyse).
///
/// These only ever arise from malformed input --- a programming error --- since the
/// normalizer otherwise never fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NormalizeError {
    /// The requested width is zero.
    ZeroWidth,

    /// The requested width exceeds the bitwidth of the term being normalized.
    WidthExceedsTerm,

    /// `analyse` was asked to re-enter itself on the same (term, width) pair,
    /// which would not terminate (can happen along the sign-extension rewrite path
    /// if a term's central slice somehow referenced itself).
    ReentrantAnalysis(TermId, u32),

    /// Interning a rebuilt term failed.
    Intern(TermStoreError),
}

impl From<TermStoreError> for NormalizeError {
    fn from(e: TermStoreError) -> Self {
        NormalizeError::Intern(e)
    }
}

impl From<NormalizeError> for CoreError {
    fn from(e: NormalizeError) -> Self {
        CoreError::Normalize(e)
    }
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroWidth => write!(f, "normalization width must be at least 1"),
            Self::WidthExceedsTerm => {
                write!(f, "normalization width exceeds the bitwidth of the term")
            }
            Self::ReentrantAnalysis(t, w) => {
                write!(f, "analysis re-entered term {t:?} at width {w}")
            }
            Self::Intern(e) => write!(f, "{e}"),
        }
    }
}

/// Errors raised when internalizing an asserted formula (spec §4.3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InternalizeError {
    /// The active logic does not support any construct used in the formula.
    UnsupportedLogic,

    /// The formula uses a construct (UF, arithmetic, arrays, quantifiers, scalars,
    /// tuples, uninterpreted sorts, nonlinear arithmetic) not licensed by the logic.
    UnsupportedConstructInLogic(UnsupportedConstruct),

    /// The formula contains a free (unbound) variable where none is permitted.
    FormulaContainsFreeVariable,

    /// A bit-vector width exceeds the solver's configured maximum.
    BvSizeExceeded,

    /// A type mismatch between an operator and its operands.
    TypeMismatch,

    /// A divisor was required to be a constant but was not.
    DivisorNotConstantWhenRequired,

    /// A polynomial's degree exceeds the solver's configured maximum.
    DegreeOverflow,

    /// An arithmetic formula is not expressible in IDL/RDL under the active logic.
    ArithmeticFormulaNotInFragment,

    /// A theory solver or the boolean core has exhausted its capacity.
    SolverCapacityExceeded,

    /// Canonicalizing an atom's operands through the normalizer failed.
    Normalize(NormalizeError),
}

/// The kind of construct that triggered [InternalizeError::UnsupportedConstructInLogic].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnsupportedConstruct {
    UninterpretedFunction,
    Arithmetic,
    Array,
    Quantifier,
    Scalar,
    Tuple,
    UninterpretedSort,
    Nonlinear,
}

impl From<InternalizeError> for CoreError {
    fn from(e: InternalizeError) -> Self {
        CoreError::Internalize(e)
    }
}

impl std::fmt::Display for InternalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogic => write!(f, "unsupported logic"),
            Self::UnsupportedConstructInLogic(c) => {
                write!(f, "unsupported construct in logic: {c:?}")
            }
            Self::FormulaContainsFreeVariable => write!(f, "formula contains free variable"),
            Self::BvSizeExceeded => write!(f, "bit-vector size exceeds solver maximum"),
            Self::TypeMismatch => write!(f, "type mismatch"),
            Self::DivisorNotConstantWhenRequired => {
                write!(f, "divisor must be a non-zero constant")
            }
            Self::DegreeOverflow => write!(f, "polynomial degree overflow"),
            Self::ArithmeticFormulaNotInFragment => {
                write!(f, "arithmetic formula is not in IDL/RDL")
            }
            Self::SolverCapacityExceeded => write!(f, "solver capacity exceeded"),
            Self::Normalize(e) => write!(f, "{e}"),
        }
    }
}

impl From<NormalizeError> for InternalizeError {
    fn from(e: NormalizeError) -> Self {
        InternalizeError::Normalize(e)
    }
}

/// Errors raised by the assertion stack (spec §4.4).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StackError {
    /// `push`/`pop` was given a multiplicity of zero.
    ZeroMultiplicity,

    /// `pop n` was requested but fewer than `n` levels remain.
    PopExceedsStack,
}

impl From<StackError> for CoreError {
    fn from(e: StackError) -> Self {
        CoreError::Stack(e)
    }
}

impl std::fmt::Display for StackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroMultiplicity => write!(f, "push/pop multiplicity must be at least 1"),
            Self::PopExceedsStack => write!(f, "pop deeper than the assertion stack"),
        }
    }
}

/// Errors related to the state of a [Context](crate::context::Context).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContextError {
    /// The operation is not legal in the context's current state.
    IllegalInState,

    /// `push`/`pop` was attempted on a one-shot context.
    OneShotDoesNotSupportScopes,

    /// `assert` was attempted after the first `check-sat` on a one-shot context.
    OneShotAlreadyChecked,

    /// `check-sat` was invoked before `set-logic`.
    NoLogicSet,
}

impl From<ContextError> for CoreError {
    fn from(e: ContextError) -> Self {
        CoreError::Context(e)
    }
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllegalInState => write!(f, "operation is not legal in the current state"),
            Self::OneShotDoesNotSupportScopes => {
                write!(f, "push/pop is not supported by a one-shot context")
            }
            Self::OneShotAlreadyChecked => write!(
                f,
                "assert is not permitted after check-sat in a one-shot context"
            ),
            Self::NoLogicSet => write!(f, "check-sat called before set-logic"),
        }
    }
}

/// Errors raised while dispatching or executing a command (spec §7).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandError {
    /// A `set-option` keyword that must precede `set-logic` was set afterward.
    OptionMustPrecedeSetLogic(String),

    /// A query (`get-value`, `get-assignment`, `get-model`) was issued while the
    /// context status was not `sat`/`unknown`.
    QueryRequiresSatOrUnknown,

    /// A query that requires model production was issued with it disabled.
    ModelsNotEnabled,

    /// A query that requires assignment production was issued with it disabled.
    AssignmentsNotEnabled,

    /// A reserved info key was written to.
    ReservedInfoKeyIsReadOnly(String),

    /// A name (sort, function, or macro) was redefined.
    NameAlreadyDeclared(String),

    /// A name was used that is not declared, or not declared as the expected kind.
    NameNotRecognized(String),

    /// A term references an uninterpretable construct during a model query
    /// (quantifier, lambda) or its value could not be computed.
    UnevaluableTerm,

    /// Wraps an internalizer error encountered while processing `assert`.
    Internalize(InternalizeError),

    /// Wraps a context-state error.
    Context(ContextError),

    /// Wraps an assertion-stack error.
    Stack(StackError),

    /// Wraps a parameter-registry error.
    Param(ParamError),
}

impl From<CommandError> for CoreError {
    fn from(e: CommandError) -> Self {
        CoreError::Command(e)
    }
}

impl From<InternalizeError> for CommandError {
    fn from(e: InternalizeError) -> Self {
        CommandError::Internalize(e)
    }
}

impl From<ContextError> for CommandError {
    fn from(e: ContextError) -> Self {
        CommandError::Context(e)
    }
}

impl From<StackError> for CommandError {
    fn from(e: StackError) -> Self {
        CommandError::Stack(e)
    }
}

impl From<ParamError> for CommandError {
    fn from(e: ParamError) -> Self {
        CommandError::Param(e)
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptionMustPrecedeSetLogic(k) => {
                write!(f, "option {k} must be set before set-logic")
            }
            Self::QueryRequiresSatOrUnknown => {
                write!(f, "query is only legal when the status is sat or unknown")
            }
            Self::ModelsNotEnabled => write!(f, "model production is not enabled"),
            Self::AssignmentsNotEnabled => write!(f, "assignment production is not enabled"),
            Self::ReservedInfoKeyIsReadOnly(k) => write!(f, "{k} is read-only"),
            Self::NameAlreadyDeclared(n) => write!(f, "{n} is already declared"),
            Self::NameNotRecognized(n) => write!(f, "{n} is not recognized"),
            Self::UnevaluableTerm => write!(f, "term cannot be evaluated"),
            Self::Internalize(e) => write!(f, "{e}"),
            Self::Context(e) => write!(f, "{e}"),
            Self::Stack(e) => write!(f, "{e}"),
            Self::Param(e) => write!(f, "{e}"),
        }
    }
}

/// Errors raised by the [parameter registry](crate::config::ParameterRegistry).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParamError {
    /// No tunable is registered under this name.
    UnknownParameter(String),

    /// The value's type does not match the tunable's declared kind.
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    /// The value is outside the tunable's declared range.
    OutOfRange(String),
}

impl From<ParamError> for CoreError {
    fn from(e: ParamError) -> Self {
        CoreError::Param(e)
    }
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownParameter(n) => write!(f, "unknown parameter {n}"),
            Self::TypeMismatch { name, expected } => {
                write!(f, "parameter {name} expects a value of kind {expected}")
            }
            Self::OutOfRange(n) => write!(f, "value for parameter {n} is out of range"),
        }
    }
}
