use thiserror::Error;

/// Top-level matcher errors (spec.md §7).
///
/// `PatternCompileError` is deliberately absent here: it is a *soft* error
/// (spec.md §7 "never aborts `build`"), surfaced through
/// [`crate::Matcher::diagnostics`] rather than returned as an `Err`.
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("{0}")]
    Mode(String),

    #[error("matcher has not been built yet")]
    NotBuilt,

    #[error("allocation failed: {0}")]
    Allocation(#[from] multiscan_buffer::BufferError),

    #[error("automaton construction failed: {0}")]
    Automaton(#[from] multiscan_ac::AcError),
}
