/*!
Miscellaneous items related to [logging](log).

Calls to the [log] macro are made throughout the library to help diagnose issues when
extending it or tracking down a bug. No logging backend is provided; enable the `log`
cargo feature (which pulls in [env_logger](https://docs.rs/env_logger)) to see output
from the demo binary or the test suite.
*/

/// Targets to be used within a [log]! macro, so output can be filtered per subsystem,
/// e.g. `RUST_LOG=normalizer=trace`.
pub mod targets {
    /// Logs related to the [term store](crate::term_store).
    pub const TERM_STORE: &str = "term_store";

    /// Logs related to the [bit-vector normalizer](crate::normalizer).
    pub const NORMALIZER: &str = "normalizer";

    /// Logs related to the [internalizer](crate::internalizer).
    pub const INTERNALIZER: &str = "internalizer";

    /// Logs related to the [assertion stack](crate::assertion_stack).
    pub const ASSERTION_STACK: &str = "assertion_stack";

    /// Logs related to the [context state machine](crate::context).
    pub const CONTEXT: &str = "context";

    /// Logs related to the [command driver](crate::command).
    pub const COMMAND_DRIVER: &str = "command_driver";

    /// Logs related to the [parameter registry](crate::config).
    pub const PARAMS: &str = "params";
}
