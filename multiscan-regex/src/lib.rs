//! # multiscan-regex
//!
//! Adapter over the `regex` crate satisfying spec.md §6's regex-engine
//! contract: `build(list<string>) -> void` and
//! `scan(bytes) -> list<(pattern_source, start, end, matched)>`.
//!
//! Spec.md §4.3 is explicit that the regex engine is treated as a pluggable,
//! engine-agnostic black box; this crate is the one concrete adapter, built
//! on `regex::bytes` so patterns match raw bytes directly rather than
//! decoding to UTF-8 first and mapping offsets back (spec.md's "Mixed
//! encodings" Design Note: treat all input as bytes end-to-end).
//!
//! The `regex` crate's `find_iter` uses its own leftmost-first-overall match
//! selection rather than a true leftmost-longest DFA search; spec.md §4.3
//! explicitly allows "the engine's documented equivalent", and this is it —
//! the contract does not require us to vendor a second regex engine just to
//! get longest-match disambiguation.

use multiscan_common::PatternDiagnostic;
use regex::bytes::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::warn;

/// One compiled pattern's matches: `(pattern_id, source, start, end, matched_bytes)`.
pub type RegexMatch = (usize, String, usize, usize, bytes::Bytes);

/// A pattern that failed to compile. Carried as the `source` behind a soft
/// [`PatternDiagnostic`], never propagated as a hard `Err` — spec.md §6/§7
/// drop uncompilable regex patterns rather than abort the whole build.
#[derive(Debug, Error)]
#[error("pattern {pattern_id} (`{source_pattern}`) failed to compile: {cause}")]
pub struct RegexEngineError {
    pattern_id: usize,
    source_pattern: String,
    #[source]
    cause: regex::Error,
}

struct CompiledPattern {
    id: usize,
    source: String,
    regex: Regex,
}

/// A set of compiled regex patterns, plus the soft diagnostics for any that
/// failed to compile (spec.md §6/§7: dropped, not fatal).
pub struct RegexEngine {
    compiled: Vec<CompiledPattern>,
    diagnostics: Vec<PatternDiagnostic>,
}

impl RegexEngine {
    /// Compiles every pattern, dropping (and recording a diagnostic for) any
    /// that fails — never aborts.
    pub fn build<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut compiled = Vec::new();
        let mut diagnostics = Vec::new();

        for (id, source) in patterns.iter().enumerate() {
            let source = source.as_ref();
            match RegexBuilder::new(source).build() {
                Ok(regex) => compiled.push(CompiledPattern {
                    id,
                    source: source.to_string(),
                    regex,
                }),
                Err(err) => {
                    let err = RegexEngineError {
                        pattern_id: id,
                        source_pattern: source.to_string(),
                        cause: err,
                    };
                    warn!(pattern_id = id, pattern = source, error = %err, "dropping uncompilable regex pattern");
                    diagnostics.push(PatternDiagnostic::new(id, source, err.to_string()));
                }
            }
        }

        Self {
            compiled,
            diagnostics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn diagnostics(&self) -> &[PatternDiagnostic] {
        &self.diagnostics
    }

    /// Finds all non-overlapping occurrences of every compiled pattern in
    /// `data`. Matches of different patterns may overlap each other
    /// (spec.md §9, Open Questions: "allows overlaps between different
    /// patterns, matching common regex-library behavior").
    pub fn scan(&self, data: &[u8]) -> Vec<RegexMatch> {
        let mut out = Vec::new();
        for pattern in &self.compiled {
            for m in pattern.regex.find_iter(data) {
                out.push((
                    pattern.id,
                    pattern.source.clone(),
                    m.start(),
                    m.end(),
                    bytes::Bytes::copy_from_slice(m.as_bytes()),
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_is_dropped_not_fatal() {
        let engine = RegexEngine::build(&["(", "foo"]);
        assert_eq!(engine.diagnostics().len(), 1);
        assert_eq!(engine.diagnostics()[0].pattern_id, 0);

        let matches = engine.scan(b"foo");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].1, "foo");
    }

    #[test]
    fn date_pattern_matches_expected_span() {
        let engine = RegexEngine::build(&[r"\d{4}-\d{2}-\d{2}"]);
        let matches = engine.scan(b"error on 2024-01-15");
        assert_eq!(matches.len(), 1);
        let (id, source, start, end, matched) = &matches[0];
        assert_eq!(*id, 0);
        assert_eq!(source, r"\d{4}-\d{2}-\d{2}");
        assert_eq!((*start, *end), (9, 19));
        assert_eq!(matched.as_ref(), b"2024-01-15".as_slice());
    }

    #[test]
    fn non_overlapping_per_pattern() {
        let engine = RegexEngine::build(&["aa"]);
        let matches = engine.scan(b"aaaa");
        // "aa" against "aaaa": find_iter is non-overlapping per pattern, so
        // two matches, not three.
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn empty_pattern_list_yields_no_matches() {
        let engine: RegexEngine = RegexEngine::build::<&str>(&[]);
        assert!(engine.is_empty());
        assert!(engine.scan(b"anything").is_empty());
    }
}
