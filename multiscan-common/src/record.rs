/// Which engine produced a match.
///
/// Ordering matters: at a tied `(start, end)`, spec.md §4.4 requires literal
/// records to sort before regex records, so `Literal < Regex` here is load
/// bearing, not incidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    Literal,
    Regex,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Literal => "literal",
            MatchKind::Regex => "regex",
        }
    }
}

/// A single occurrence of a pattern in the input stream.
///
/// `start`/`end` are always absolute byte offsets from the first byte ever
/// fed to the matcher, never relative to a chunk. `matched` is populated only
/// for `MatchKind::Regex` records; literal records reconstruct the matched
/// bytes trivially from `pattern`. `matched` is a [`bytes::Bytes`] rather than
/// a `Vec<u8>` so a clone of a record shares the underlying allocation instead
/// of copying the matched span, the same zero-copy payload convention
/// `vakthund-protocols::mqtt::MqttPacket` uses for packet payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub kind: MatchKind,
    pub pattern_id: usize,
    pub pattern: String,
    pub start: usize,
    pub end: usize,
    pub matched: Option<bytes::Bytes>,
}

impl MatchRecord {
    pub fn literal(pattern_id: usize, pattern: String, start: usize, end: usize) -> Self {
        Self {
            kind: MatchKind::Literal,
            pattern_id,
            pattern,
            start,
            end,
            matched: None,
        }
    }

    pub fn regex(
        pattern_id: usize,
        pattern: String,
        start: usize,
        end: usize,
        matched: impl Into<bytes::Bytes>,
    ) -> Self {
        Self {
            kind: MatchKind::Regex,
            pattern_id,
            pattern,
            start,
            end,
            matched: Some(matched.into()),
        }
    }

    /// The `(start, end, kind, pattern_id)` key the coordinator sorts on
    /// (spec.md §8 property 5, §5 "Ordering").
    fn sort_key(&self) -> (usize, usize, MatchKind, usize) {
        (self.start, self.end, self.kind, self.pattern_id)
    }
}

impl PartialOrd for MatchRecord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchRecord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}
