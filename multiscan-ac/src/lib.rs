//! # multiscan-ac
//!
//! Aho-Corasick automaton: goto/failure/output construction (spec.md §4.2,
//! three phases) and linear-time multi-pattern search.
//!
//! Nodes live in a single `Vec<Node>` indexed by [`NodeId`] rather than a
//! pointer graph, since failure links naturally form cycles (the root's
//! failure link points to itself) — spec.md's Design Notes call this out
//! explicitly as the representation to use.

mod node;

use std::collections::VecDeque;

use multiscan_common::Pattern;
use node::Node;
use thiserror::Error;
use tracing::debug;

pub use node::{NodeId, ROOT};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AcError {
    #[error("automaton exceeds the maximum of {0} nodes")]
    TooManyNodes(usize),
}

/// A single literal match: the pattern id and its `[start, end)` byte span.
pub type AcMatch = (usize, usize, usize);

/// The Aho-Corasick automaton over a fixed set of literal patterns.
///
/// Empty after `AcAutomaton::build(&[])`; searching against it then yields no
/// matches (spec.md §4.2 "Edge cases").
pub struct AcAutomaton {
    nodes: Vec<Node>,
    pattern_lengths: Vec<usize>,
}

impl AcAutomaton {
    /// Builds the trie, failure links, and output sets in the three phases
    /// spec.md §4.2 specifies. Rebuilding (calling `build` again on a fresh
    /// or existing automaton) always starts from an empty trie — there is no
    /// incremental update path, matching spec.md §3's "a rebuild discards
    /// all prior automaton state".
    pub fn build(patterns: &[Pattern]) -> Result<Self, AcError> {
        let mut automaton = Self {
            nodes: vec![Node::new()],
            pattern_lengths: Vec::new(),
        };
        automaton.insert_patterns(patterns)?;
        automaton.link_failures();
        debug!(
            patterns = patterns.len(),
            nodes = automaton.nodes.len(),
            "aho-corasick automaton built"
        );
        Ok(automaton)
    }

    fn insert_patterns(&mut self, patterns: &[Pattern]) -> Result<(), AcError> {
        for pattern in patterns {
            if pattern.id() >= self.pattern_lengths.len() {
                self.pattern_lengths.resize(pattern.id() + 1, 0);
            }
            self.pattern_lengths[pattern.id()] = pattern.len();

            let mut current = ROOT;
            for &byte in pattern.bytes() {
                current = match self.nodes[current as usize].child(byte) {
                    Some(child) => child,
                    None => {
                        let new_id = self.nodes.len();
                        let new_id: NodeId = new_id
                            .try_into()
                            .map_err(|_| AcError::TooManyNodes(u32::MAX as usize))?;
                        self.nodes.push(Node::new());
                        self.nodes[current as usize].children[byte as usize] = new_id;
                        new_id
                    }
                };
            }
            self.nodes[current as usize].is_terminal = true;
            // Duplicate patterns (identical bytes, distinct ids) land on the
            // same node; both ids end up in its output set.
            self.nodes[current as usize].output.insert(pattern.id());
        }
        Ok(())
    }

    /// Phase 2 + 3: BFS over the trie assigning failure links, propagating
    /// each node's failure target's output set into its own as it goes.
    fn link_failures(&mut self) {
        let mut queue = VecDeque::new();

        for byte in 0..=255u8 {
            if let Some(child) = self.nodes[ROOT as usize].child(byte) {
                self.nodes[child as usize].fail = ROOT;
                queue.push_back(child);
            }
        }

        while let Some(u) = queue.pop_front() {
            let children: Vec<(u8, NodeId)> = (0..=255u8)
                .filter_map(|c| self.nodes[u as usize].child(c).map(|v| (c, v)))
                .collect();

            for (byte, v) in children {
                let mut f = self.nodes[u as usize].fail;
                while f != ROOT && self.nodes[f as usize].child(byte).is_none() {
                    f = self.nodes[f as usize].fail;
                }
                let v_fail = match self.nodes[f as usize].child(byte) {
                    Some(candidate) if candidate != v => candidate,
                    _ => ROOT,
                };
                self.nodes[v as usize].fail = v_fail;

                let inherited: Vec<usize> =
                    self.nodes[v_fail as usize].output.iter().copied().collect();
                self.nodes[v as usize].output.extend(inherited);

                queue.push_back(v);
            }
        }
    }

    /// Advances the automaton's cursor by one byte from `state`, following
    /// failure links as needed. Exposed so a caller can carry state across
    /// chunk boundaries without retention (spec.md §4.4's stateful
    /// alternative, and the AC engine contract's `search_stateful`).
    pub fn step(&self, state: NodeId, byte: u8) -> NodeId {
        let mut current = state;
        while current != ROOT && self.nodes[current as usize].child(byte).is_none() {
            current = self.nodes[current as usize].fail;
        }
        if let Some(child) = self.nodes[current as usize].child(byte) {
            current = child;
        }
        current
    }

    /// Pattern ids reported at `state`, in ascending order (spec.md §4.2:
    /// "emission order for multiple patterns ending at the same position is
    /// by ascending pattern id").
    pub fn outputs_at(&self, state: NodeId) -> impl Iterator<Item = usize> + '_ {
        self.nodes[state as usize].output.iter().copied()
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Scans `text` starting from `start_state`, with match end offsets
    /// measured from `base_offset`. Returns the matches found and the
    /// automaton's ending state, so a caller can resume the scan on the next
    /// chunk without re-feeding any bytes.
    pub fn search_stateful(
        &self,
        text: &[u8],
        start_state: NodeId,
        base_offset: usize,
    ) -> (Vec<AcMatch>, NodeId) {
        let mut current = start_state;
        let mut matches = Vec::new();

        for (i, &byte) in text.iter().enumerate() {
            current = self.step(current, byte);
            let end = base_offset + i + 1;
            for pattern_id in self.outputs_at(current) {
                let start = end - self.pattern_lengths[pattern_id];
                matches.push((pattern_id, start, end));
            }
        }

        (matches, current)
    }

    /// Scans a single complete buffer from the root, offset `0`.
    pub fn search(&self, text: &[u8]) -> Vec<AcMatch> {
        self.search_stateful(text, ROOT, 0).0
    }
}
