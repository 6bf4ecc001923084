//! # multiscan
//!
//! A high-throughput multi-pattern text scanner. Given a set of literal byte
//! patterns and a set of regular-expression patterns, [`Matcher`] reports
//! every occurrence of any pattern inside an input byte stream, either in one
//! complete buffer ([`Matcher::match_bytes`]) or across arbitrarily sized
//! chunks of a stream ([`Matcher::feed`]), with absolute, globally ordered
//! byte offsets in both modes.
//!
//! ### Key submodules (workspace crates):
//! - `multiscan-common`: `Pattern`, `MatchRecord`, `MatchKind`, soft diagnostics
//! - `multiscan-buffer`: the circular streaming `RingBuffer`
//! - `multiscan-ac`: the Aho-Corasick literal automaton
//! - `multiscan-regex`: the regex-engine adapter
//! - `multiscan-config`: validated streaming configuration
//!
//! ### Example
//! ```
//! use multiscan::Matcher;
//!
//! let mut matcher = Matcher::new(
//!     &[b"he".to_vec(), b"she".to_vec(), b"his".to_vec(), b"hers".to_vec()],
//!     &[],
//!     false,
//! ).unwrap();
//! let matches = matcher.match_bytes(b"ushers").unwrap();
//! assert_eq!(matches.len(), 3);
//! ```

mod error;
mod matcher;

pub use error::MatcherError;
pub use matcher::Matcher;
pub use multiscan_common::{MatchKind, MatchRecord, PatternDiagnostic};
pub use multiscan_config::MatcherConfig;
