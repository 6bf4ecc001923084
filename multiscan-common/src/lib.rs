//! # multiscan-common
//!
//! Shared data model for the multiscan workspace: the `Pattern` type, match
//! records, and soft-diagnostic records that flow between the AC automaton,
//! the regex engine adapter, and the matcher that coordinates them.

pub mod diagnostic;
pub mod pattern;
pub mod record;

pub use diagnostic::PatternDiagnostic;
pub use pattern::{Pattern, PatternError};
pub use record::{MatchKind, MatchRecord};
