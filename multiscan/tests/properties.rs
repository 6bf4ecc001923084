//! Property-based tests for cross-call invariants that are awkward to pin
//! down with a handful of fixed examples: arbitrary chunk splits of the same
//! input must produce the same match set as a single batch call, and batch
//! matching must be deterministic regardless of how many times it runs.

use multiscan::Matcher;
use proptest::prelude::*;

fn literal_vecs(words: &[&str]) -> Vec<Vec<u8>> {
    words.iter().map(|w| w.as_bytes().to_vec()).collect()
}

proptest! {
    #[test]
    fn arbitrary_chunk_split_matches_batch(
        text in "[a-e]{0,200}",
        chunk_sizes in proptest::collection::vec(1usize..=17, 1..30),
    ) {
        let literals = literal_vecs(&["ab", "bee", "cad", "dead", "ace"]);

        let mut batch = Matcher::new(&literals, &[], false).unwrap();
        let mut expected = batch.match_bytes(text.as_bytes()).unwrap();
        expected.sort();

        let mut streaming = Matcher::new(&literals, &[], true).unwrap();
        let bytes = text.as_bytes();
        let mut offset = 0;
        let mut got = Vec::new();
        let mut size_idx = 0;
        while offset < bytes.len() {
            let size = chunk_sizes[size_idx % chunk_sizes.len()].max(1);
            size_idx += 1;
            let end = (offset + size).min(bytes.len());
            got.extend(streaming.feed(&bytes[offset..end]).unwrap());
            offset = end;
        }
        got.extend(streaming.feed(b"").unwrap());
        got.sort();

        prop_assert_eq!(got, expected);
    }

    #[test]
    fn batch_match_is_deterministic(text in "[a-e]{0,200}") {
        let literals = literal_vecs(&["ab", "bee", "cad", "dead", "ace"]);

        let mut first = Matcher::new(&literals, &[], false).unwrap();
        let mut second = Matcher::new(&literals, &[], false).unwrap();

        let a = first.match_bytes(text.as_bytes()).unwrap();
        let b = second.match_bytes(text.as_bytes()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn reset_then_replay_reproduces_the_same_matches(text in "[a-e]{0,200}") {
        let literals = literal_vecs(&["ab", "bee", "cad", "dead", "ace"]);
        let mut matcher = Matcher::new(&literals, &[], false).unwrap();

        let first = matcher.match_bytes(text.as_bytes()).unwrap();
        matcher.reset();
        let second = matcher.match_bytes(text.as_bytes()).unwrap();

        prop_assert_eq!(first.len(), second.len());
        prop_assert_eq!(first, second);
        prop_assert_eq!(matcher.total_matches(), matcher.total_matches());
    }
}
