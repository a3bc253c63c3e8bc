//! Transposition cache: reuses search results across branches and across
//! successive searches within one session.

use std::collections::HashMap;

use crate::search::SearchResult;

/// Depth stored for exact win/draw results so they satisfy a lookup at
/// any requested depth.
pub const EXACT_DEPTH: usize = usize::MAX;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NodeType {
    /// Exact score.
    PV,
    /// Upper bound: the search failed low, the true score is at most this.
    All,
    /// Lower bound: a cutoff fired, the true score is at least this.
    Cut,
}

#[derive(Debug, Clone, Copy)]
pub struct TTEntry<M> {
    pub(crate) key: u64,
    pub(crate) depth: usize,
    pub(crate) result: SearchResult<M>,
    pub(crate) node_type: NodeType,
}

impl<M> TTEntry<M> {
    pub fn new(key: u64, depth: usize, result: SearchResult<M>, node_type: NodeType) -> Self {
        Self {
            key,
            depth,
            result,
            node_type,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn result(&self) -> &SearchResult<M> {
        &self.result
    }
}

#[derive(Debug)]
pub struct TranspositionTable<M> {
    entries: HashMap<u64, TTEntry<M>>,
}

impl<M: Copy> TranspositionTable<M> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the stored entry if its depth subsumes the request.
    /// Deeper-computed results answer shallower queries; whether the
    /// stored score is usable under the caller's window is the caller's
    /// decision, via [`TTEntry::node_type`].
    #[inline]
    pub fn probe(&self, key: u64, min_depth: usize) -> Option<&TTEntry<M>> {
        self.entries
            .get(&key)
            .filter(|e| e.key == key && e.depth >= min_depth)
    }

    #[inline]
    pub fn insert(&mut self, key: u64, depth: usize, result: SearchResult<M>, node_type: NodeType) {
        self.entries
            .insert(key, TTEntry::new(key, depth, result, node_type));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// No eviction runs implicitly; a session that must bound memory
    /// clears between searches.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<M: Copy> Default for TranspositionTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: f32) -> SearchResult<u8> {
        SearchResult {
            score,
            best_move: Some(3),
            depth: 4,
        }
    }

    #[test]
    fn deeper_entries_answer_shallower_probes() {
        let mut tt = TranspositionTable::new();
        tt.insert(42, 4, result(1.5), NodeType::PV);

        assert!(tt.probe(42, 2).is_some());
        assert!(tt.probe(42, 4).is_some());
        assert!(tt.probe(42, 5).is_none());
        assert!(tt.probe(7, 0).is_none());
    }

    #[test]
    fn exact_depth_satisfies_any_request() {
        let mut tt = TranspositionTable::new();
        tt.insert(42, EXACT_DEPTH, result(100.0), NodeType::PV);

        assert!(tt.probe(42, usize::MAX).is_some());
        assert!(tt.probe(42, 1_000).is_some());
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut tt = TranspositionTable::new();
        tt.insert(42, 2, result(1.0), NodeType::All);
        tt.insert(42, 6, result(2.0), NodeType::PV);

        let entry = tt.probe(42, 3).unwrap();
        assert_eq!(entry.result().score, 2.0);
        assert_eq!(entry.node_type(), NodeType::PV);
        assert_eq!(tt.len(), 1);
    }
}
