/*!
The shape of what the external parser/term-stack hands to the command driver (spec
§1, "SMT-LIB 2 lexing/parsing and the term-stack ... out of scope"; §6 "Parser →
produces a stream of `ParsedCommand` values plus raw token positions").

This core's own [Command](crate::command::Command) enum *is* the `ParsedCommand`
referred to here --- the parser's job is to produce `Command` values (having already
resolved symbols into [TermId](crate::structures::term::TermId)s via its own term
stack against this core's [TermStore](crate::term_store::TermStore)); [Span] is the
position metadata it attaches for error reporting.
*/

/// A source position, attached to a command for error messages (spec §7: "each
/// carries line/column and token text").
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A value paired with the source position it came from, if the parser supplied one
/// (interactive/piped input may have none).
#[derive(Clone, Debug)]
pub struct Positioned<T> {
    pub value: T,
    pub span: Option<Span>,
}

impl<T> Positioned<T> {
    pub fn new(value: T, span: Option<Span>) -> Self {
        Positioned { value, span }
    }

    /// A value with no position information, e.g. constructed directly by a test
    /// rather than produced by a real parser.
    pub fn unpositioned(value: T) -> Self {
        Positioned { value, span: None }
    }
}
