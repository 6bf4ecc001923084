use std::collections::HashMap;

use multiscan_ac::AcAutomaton;
use multiscan_buffer::RingBuffer;
use multiscan_common::{MatchKind, MatchRecord, Pattern, PatternDiagnostic};
use multiscan_config::MatcherConfig;
use multiscan_regex::RegexEngine;
use tracing::{debug, instrument, trace, warn};

use crate::error::MatcherError;

/// Coordinates the AC automaton and the regex engine over the same byte
/// region, normalising both result streams into one ordered, absolutely
/// offset `MatchRecord` sequence (spec.md §2, §4.4).
///
/// Engines are held directly rather than through an `Option<Box<dyn ...>>`
/// pair: an absent engine is simply `None`, so each operation dispatches by
/// `match`/`if let` rather than null-checking a trait object, the sum-type
/// style spec.md's Design Notes recommend in place of "nullable handles".
pub struct Matcher {
    ac: Option<AcAutomaton>,
    regex: Option<RegexEngine>,
    literal_reprs: HashMap<usize, String>,
    streaming: bool,
    built: bool,
    buffer: Option<RingBuffer>,
    total_matches: usize,
    absolute_stream_offset: usize,
    dedup_watermark: usize,
    max_pattern_length: usize,
    config: MatcherConfig,
    diagnostics: Vec<PatternDiagnostic>,
}

impl Matcher {
    /// Builds a matcher with default configuration, compiling both pattern
    /// sets eagerly (spec.md §4.4 "Construction").
    pub fn new(
        literal_patterns: &[Vec<u8>],
        regex_patterns: &[String],
        streaming: bool,
    ) -> Result<Self, MatcherError> {
        Self::with_config(MatcherConfig::default(), literal_patterns, regex_patterns, streaming)
    }

    pub fn with_config(
        config: MatcherConfig,
        literal_patterns: &[Vec<u8>],
        regex_patterns: &[String],
        streaming: bool,
    ) -> Result<Self, MatcherError> {
        let mut matcher = Self {
            ac: None,
            regex: None,
            literal_reprs: HashMap::new(),
            streaming,
            built: false,
            buffer: None,
            total_matches: 0,
            absolute_stream_offset: 0,
            dedup_watermark: 0,
            max_pattern_length: 1,
            config,
            diagnostics: Vec::new(),
        };
        matcher.build(literal_patterns, regex_patterns)?;
        Ok(matcher)
    }

    /// (Re)compiles both engines from scratch, replacing any prior engines
    /// atomically (spec.md §3: "a rebuild discards all prior automaton
    /// state"). Counters (`total_matches`, `absolute_stream_offset`) are
    /// untouched — only [`Matcher::reset`] clears those.
    #[instrument(level = "debug", skip(self, literal_patterns, regex_patterns))]
    pub fn build(
        &mut self,
        literal_patterns: &[Vec<u8>],
        regex_patterns: &[String],
    ) -> Result<(), MatcherError> {
        let mut diagnostics = Vec::new();
        let mut patterns = Vec::with_capacity(literal_patterns.len());
        let mut literal_reprs = HashMap::new();

        for (id, bytes) in literal_patterns.iter().enumerate() {
            match Pattern::new(id, bytes.clone()) {
                Ok(pattern) => {
                    literal_reprs.insert(id, pattern.repr());
                    patterns.push(pattern);
                }
                Err(err) => {
                    warn!(pattern_id = id, error = %err, "dropping empty literal pattern");
                    diagnostics.push(PatternDiagnostic::new(
                        id,
                        String::from_utf8_lossy(bytes),
                        err.to_string(),
                    ));
                }
            }
        }

        let ac = if patterns.is_empty() {
            None
        } else {
            Some(AcAutomaton::build(&patterns)?)
        };

        let regex = if regex_patterns.is_empty() {
            None
        } else {
            let engine = RegexEngine::build(regex_patterns);
            diagnostics.extend(engine.diagnostics().iter().cloned());
            Some(engine)
        };

        let max_literal_length = patterns.iter().map(Pattern::len).max().unwrap_or(0);
        let max_regex_length = if regex_patterns.is_empty() {
            0
        } else {
            self.config.regex_length_floor
        };
        let max_pattern_length = max_literal_length.max(max_regex_length).max(1);

        self.ac = ac;
        self.regex = regex;
        self.literal_reprs = literal_reprs;
        self.diagnostics = diagnostics;
        self.max_pattern_length = max_pattern_length;
        self.built = true;

        if self.streaming {
            let capacity = self.config.stream_capacity.max(2 * max_pattern_length);
            match &mut self.buffer {
                Some(buffer) => buffer.grow_to(capacity)?,
                None => self.buffer = Some(RingBuffer::new(capacity)),
            }
        }

        debug!(
            literal_count = self.literal_reprs.len(),
            regex_count = self.regex.as_ref().map(|r| !r.is_empty()).unwrap_or(false),
            max_pattern_length,
            dropped = self.diagnostics.len(),
            "matcher built"
        );
        Ok(())
    }

    /// Scans one complete buffer (spec.md §4.4 "`match(text)` — batch").
    /// Rejected in streaming mode to keep the two modes' semantics distinct.
    #[instrument(level = "trace", skip(self, text))]
    pub fn match_bytes(&mut self, text: &[u8]) -> Result<Vec<MatchRecord>, MatcherError> {
        if self.streaming {
            return Err(MatcherError::Mode(
                "match() is not permitted on a streaming matcher; use feed()".into(),
            ));
        }
        if !self.built {
            return Err(MatcherError::NotBuilt);
        }

        let mut records = self.scan_window(text, 0);
        records.sort();
        self.total_matches += records.len();
        Ok(records)
    }

    /// Feeds one chunk of a streaming input (spec.md §4.4 "`feed(chunk)` —
    /// streaming"). An empty chunk signals the final flush.
    #[instrument(level = "trace", skip(self, chunk))]
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<MatchRecord>, MatcherError> {
        if !self.streaming {
            return Err(MatcherError::Mode(
                "feed() is not permitted on a batch matcher; use match()".into(),
            ));
        }
        if !self.built {
            return Err(MatcherError::NotBuilt);
        }

        let is_flush = chunk.is_empty();

        // Step 2: never drop a byte — grow the buffer rather than fail when
        // a chunk outgrows available space.
        {
            let buffer = self
                .buffer
                .as_mut()
                .expect("streaming matcher always has a ring buffer");
            let mut offset = 0;
            while offset < chunk.len() {
                let written = buffer.write(&chunk[offset..]);
                if written == 0 {
                    let needed = buffer.capacity() + (chunk.len() - offset);
                    buffer.grow_to(needed)?;
                    continue;
                }
                offset += written;
            }
        }
        self.absolute_stream_offset += chunk.len();

        let buffer = self
            .buffer
            .as_ref()
            .expect("streaming matcher always has a ring buffer");
        let available = buffer.available_data();

        // Step 3: a trailing retention tail of `max_pattern_length - 1` bytes
        // is held back from being *finalised* (it may still feed a longer
        // match once more data arrives). The full buffer is still scanned so
        // that a match starting before the tail and ending inside it is seen
        // at all; only the interpretation of what was found respects the
        // tail, not the window passed to the engines.
        let retention = if is_flush {
            0
        } else {
            self.max_pattern_length.saturating_sub(1)
        };
        let scannable = available.saturating_sub(retention);
        let window = buffer.peek(available);
        let window_start = self.absolute_stream_offset - available;
        let boundary = window_start + scannable;

        let mut all_records = self.scan_window(&window, window_start);
        all_records.sort();

        // A literal match is, by construction, already complete the moment
        // the automaton reports it — it cannot grow. A regex match ending
        // inside the retention tail might still extend with more input, so
        // it stays pending (neither emitted nor allowed to have its leading
        // bytes consumed) until it ends at or before the boundary, or until
        // flush removes the tail entirely.
        let mut resolved = Vec::with_capacity(all_records.len());
        let mut min_pending_start = None;
        for record in all_records {
            let is_pending = !is_flush && record.kind == MatchKind::Regex && record.end > boundary;
            if is_pending {
                min_pending_start = Some(
                    min_pending_start.map_or(record.start, |s: usize| s.min(record.start)),
                );
            } else {
                resolved.push(record);
            }
        }

        // Step 4: duplicate reports of matches already emitted from a prior
        // call are filtered by watermark.
        resolved.retain(|record| record.end > self.dedup_watermark);
        resolved.sort();

        let watermark_candidate = resolved
            .iter()
            .map(|record| record.end)
            .max()
            .unwrap_or(0)
            .max(boundary);
        self.dedup_watermark = self.dedup_watermark.max(watermark_candidate);

        // Step 5: consume everything that is safe to finalise, but never
        // past the start of a still-pending match — its leading bytes must
        // stay buffered until the match is resolved.
        let consume_len = if is_flush {
            available
        } else {
            match min_pending_start {
                Some(start) => (start - window_start).min(scannable),
                None => scannable,
            }
        };
        if consume_len > 0 {
            self.buffer.as_mut().unwrap().read(consume_len);
        }

        trace!(
            chunk_len = chunk.len(),
            available,
            consume_len,
            matches = resolved.len(),
            "fed chunk"
        );

        self.total_matches += resolved.len();
        Ok(resolved)
    }

    /// Runs both engines over `window`, translating their slice-relative
    /// offsets to absolute ones by adding `window_start`.
    fn scan_window(&self, window: &[u8], window_start: usize) -> Vec<MatchRecord> {
        let mut records = Vec::new();

        if let Some(ac) = &self.ac {
            for (pattern_id, start, end) in ac.search(window) {
                let repr = self
                    .literal_reprs
                    .get(&pattern_id)
                    .cloned()
                    .unwrap_or_default();
                records.push(MatchRecord::literal(
                    pattern_id,
                    repr,
                    start + window_start,
                    end + window_start,
                ));
            }
        }

        if let Some(regex) = &self.regex {
            for (pattern_id, source, start, end, matched) in regex.scan(window) {
                records.push(MatchRecord::regex(
                    pattern_id,
                    source,
                    start + window_start,
                    end + window_start,
                    matched,
                ));
            }
        }

        records
    }

    /// Clears streaming state: `total_matches`, the ring buffer, and
    /// `absolute_stream_offset`. Compiled engines survive (spec.md §3).
    pub fn reset(&mut self) {
        self.total_matches = 0;
        self.absolute_stream_offset = 0;
        self.dedup_watermark = 0;
        if let Some(buffer) = &mut self.buffer {
            buffer.clear();
        }
    }

    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Soft diagnostics collected during the last `build` call: empty
    /// literal patterns and regex patterns that failed to compile.
    pub fn diagnostics(&self) -> &[PatternDiagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }

    #[test]
    fn batch_rejects_feed_and_streaming_rejects_match() {
        let mut batch = Matcher::new(&[lit("a")], &[], false).unwrap();
        assert!(batch.feed(b"x").is_err());

        let mut streaming = Matcher::new(&[lit("a")], &[], true).unwrap();
        assert!(streaming.match_bytes(b"x").is_err());
    }

    #[test]
    fn scenario_s1_batch_overlap() {
        let mut matcher = Matcher::new(
            &[lit("he"), lit("she"), lit("his"), lit("hers")],
            &[],
            false,
        )
        .unwrap();
        let matches = matcher.match_bytes(b"ushers").unwrap();
        let spans: Vec<(usize, usize)> = matches.iter().map(|m| (m.start, m.end)).collect();
        assert_eq!(spans, vec![(1, 4), (2, 4), (2, 6)]);
    }

    #[test]
    fn scenario_s2_cross_chunk_literal_match() {
        // max_pattern_length is 6 ("banana"), so the first chunk alone (4
        // bytes) never reaches the point where a full match could be
        // present. The second chunk brings the buffer to "bananana" (8
        // bytes); the match at (0, 6) is now fully contained in the
        // buffered data and is reported immediately, because literal
        // matches are resolved on sight rather than held back for the
        // retention tail (that tail exists for still-growable regex
        // matches, not for fixed-length literals).
        let mut matcher = Matcher::new(&[lit("banana")], &[], true).unwrap();
        assert!(matcher.feed(b"bana").unwrap().is_empty());
        let found = matcher.feed(b"nana").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (0, 6));
        assert_eq!(found[0].pattern, "banana");

        let flushed = matcher.feed(b"").unwrap();
        assert!(flushed.is_empty());
    }

    #[test]
    fn scenario_s3_literal_and_regex_combined() {
        let mut matcher =
            Matcher::new(&[lit("error")], &[r"\d{4}-\d{2}-\d{2}".to_string()], false).unwrap();
        let matches = matcher.match_bytes(b"error on 2024-01-15").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].start, matches[0].end), (0, 5));
        assert_eq!(matches[0].pattern, "error");
        assert_eq!((matches[1].start, matches[1].end), (9, 19));
        assert_eq!(
            matches[1].matched.as_deref(),
            Some(b"2024-01-15".as_slice())
        );
    }

    #[test]
    fn scenario_s4_match_completes_on_second_feed() {
        let mut matcher = Matcher::new(&[lit("ab")], &[], true).unwrap();
        assert!(matcher.feed(b"a").unwrap().is_empty());
        let second = matcher.feed(b"b").unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!((second[0].start, second[0].end), (0, 2));
    }

    #[test]
    fn scenario_s5_invalid_regex_dropped() {
        let matcher = Matcher::new(&[], &["(".to_string(), "foo".to_string()], false).unwrap();
        assert_eq!(matcher.diagnostics().len(), 1);
    }

    #[test]
    fn scenario_s6_reset_then_replay_is_deterministic() {
        let mut matcher = Matcher::new(&[lit("he"), lit("she")], &[], false).unwrap();
        let first = matcher.match_bytes(b"she").unwrap();
        matcher.reset();
        let second = matcher.match_bytes(b"she").unwrap();
        assert_eq!(first, second);
        assert_eq!(matcher.total_matches(), second.len());
    }

    #[test]
    fn feed_then_flush_equals_batch_match() {
        let text = b"the quick brown fox error 2024-01-15 she saw hers";
        let literal = vec![lit("error"), lit("she"), lit("hers")];
        let regex = vec![r"\d{4}-\d{2}-\d{2}".to_string()];

        let mut batch = Matcher::new(&literal, &regex, false).unwrap();
        let mut batch_matches = batch.match_bytes(text).unwrap();
        batch_matches.sort();

        let mut streaming = Matcher::new(&literal, &regex, true).unwrap();
        let mut streamed = Vec::new();
        for chunk in text.chunks(7) {
            streamed.extend(streaming.feed(chunk).unwrap());
        }
        streamed.extend(streaming.feed(b"").unwrap());
        streamed.sort();

        assert_eq!(batch_matches, streamed);
    }
}
