use thiserror::Error;

/// An immutable byte pattern with the integer id assigned to it at build time.
///
/// The id always equals the pattern's index in the list passed to `build`;
/// patterns are never renumbered and never mutated once a `Pattern` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    id: usize,
    bytes: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern at index {0} is empty")]
    Empty(usize),
}

impl Pattern {
    /// Builds a pattern, rejecting empty byte sequences per the data model's
    /// "an empty pattern is rejected" rule.
    pub fn new(id: usize, bytes: impl Into<Vec<u8>>) -> Result<Self, PatternError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(PatternError::Empty(id));
        }
        Ok(Self { id, bytes })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Source-text representation used in match records: a lossy UTF-8
    /// decode, which is exact for the common case of ASCII/UTF-8 patterns and
    /// degrades gracefully for arbitrary byte patterns.
    pub fn repr(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}
