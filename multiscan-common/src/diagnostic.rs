/// A soft, non-fatal diagnostic recorded during `build`.
///
/// Spec.md §7 requires `PatternCompileError` to be "recorded and reported via
/// an accessor" without aborting `build`; this is that record. `pattern_id`
/// refers to the id the dropped pattern would have received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDiagnostic {
    pub pattern_id: usize,
    pub pattern: String,
    pub message: String,
}

impl PatternDiagnostic {
    pub fn new(pattern_id: usize, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pattern_id,
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
