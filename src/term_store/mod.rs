/*!
A hash-consed immutable term DAG (spec §4.1, "Term Store").

Fields are private; all access runs through the methods below so the hash-consing
and monotonic-id invariants can't be broken from outside, mirroring how the teacher
keeps clause-database fields private behind `ClauseDB`'s methods.
*/

mod node;
pub use node::TermNode;

use crate::misc::log::targets;
use crate::structures::kind::TermKind;
use crate::structures::sort::Sort;
use crate::structures::term::TermId;
use crate::types::err::TermStoreError;

use std::collections::{HashMap, HashSet};

/// A hash-consed term DAG with stable, monotonically-first-assigned identifiers.
#[derive(Default)]
pub struct TermStore {
    /// Arena of interned nodes, indexed by `TermId::index`. `None` marks a slot
    /// whose content has been reclaimed by [collect_garbage](Self::collect_garbage)
    /// but whose id is still reserved in `dedup` (so re-asserting the same term
    /// later reproduces the same id, per the "intern is deterministic" guarantee).
    nodes: Vec<Option<TermNode>>,

    /// Structural-equality lookup: `(kind, sort)` payload to its positive index.
    dedup: HashMap<TermKind, u32>,
}

impl TermStore {
    /// A fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a term, returning a stable, positive-polarity [TermId].
    ///
    /// A `TermKind::Not(inner)` payload is never allocated a node: it collapses to
    /// `inner.negate()` directly, per spec §4.1's "constant-time negation" and §9's
    /// polarity-bit design note.
    pub fn intern(&mut self, kind: TermKind, sort: Sort) -> Result<TermId, TermStoreError> {
        if let TermKind::Not(inner) = kind {
            return Ok(inner.negate());
        }

        if let Some(&idx) = self.dedup.get(&kind) {
            if self.nodes[idx as usize].is_none() {
                log::trace!(target: targets::TERM_STORE, "reviving gc'd term at {idx}");
                self.nodes[idx as usize] = Some(TermNode::new(kind, sort));
            }
            return Ok(TermId::from_index(idx, false));
        }

        let idx = self.nodes.len();
        if idx > (u32::MAX >> 1) as usize {
            return Err(TermStoreError::IdsExhausted);
        }
        let idx = idx as u32;
        self.nodes.push(Some(TermNode::new(kind.clone(), sort)));
        self.dedup.insert(kind, idx);
        log::trace!(target: targets::TERM_STORE, "interned fresh term at {idx}");
        Ok(TermId::from_index(idx, false))
    }

    fn node(&self, t: TermId) -> &TermNode {
        self.nodes[t.index() as usize]
            .as_ref()
            .expect("term id referenced a garbage-collected slot without re-interning")
    }

    /// The kind tag of a term's positive presentation.
    pub fn kind_of(&self, t: TermId) -> &TermKind {
        &self.node(t.positive()).kind
    }

    /// The sort of a term (polarity-invariant).
    pub fn sort_of(&self, t: TermId) -> &Sort {
        &self.node(t.positive()).sort
    }

    /// The direct children of a term (polarity-invariant: children carry their own
    /// polarity, independent of the parent's).
    pub fn children_of(&self, t: TermId) -> Vec<TermId> {
        self.node(t.positive()).kind.children()
    }

    /// True if `t` carries the negation flag.
    pub fn is_negated(&self, t: TermId) -> bool {
        t.is_negated()
    }

    /// Negates a term id. O(1); never allocates (spec §4.1).
    pub fn negate(&self, t: TermId) -> TermId {
        t.negate()
    }

    /// The bitwidth of a bit-vector-sorted term.
    pub fn width_of(&self, t: TermId) -> Option<u32> {
        self.sort_of(t).bv_width()
    }

    /// Marks all terms reachable from `roots` and reclaims (drops the payload of)
    /// every unreachable node, per spec §4.1: "garbage collection ... preserves all
    /// terms reachable from the assertion set or from any unretracted name binding".
    ///
    /// Ids of reclaimed terms are not reused for *different* content; re-interning
    /// the same content later restores it under the same id (see [Self::intern]).
    pub fn collect_garbage(&mut self, roots: &[TermId]) {
        let mut reachable: HashSet<u32> = HashSet::new();
        let mut stack: Vec<TermId> = roots.iter().map(|r| r.positive()).collect();

        while let Some(t) = stack.pop() {
            let idx = t.index();
            if !reachable.insert(idx) {
                continue;
            }
            if let Some(node) = &self.nodes[idx as usize] {
                for child in node.kind.children() {
                    stack.push(child.positive());
                }
            }
        }

        let mut reclaimed = 0usize;
        for (idx, slot) in self.nodes.iter_mut().enumerate() {
            if slot.is_some() && !reachable.contains(&(idx as u32)) {
                *slot = None;
                reclaimed += 1;
            }
        }
        log::info!(target: targets::TERM_STORE, "gc reclaimed {reclaimed} terms");
    }

    /// The number of currently-live (non-reclaimed) terms. Exposed for statistics
    /// and tests.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bv(n: u32) -> Sort {
        Sort::BitVec(n)
    }

    #[test]
    fn structural_equality_is_identity() {
        let mut store = TermStore::new();
        let a = store
            .intern(
                TermKind::Uninterpreted { name: "x".into() },
                bv(4),
            )
            .unwrap();
        let b = store
            .intern(
                TermKind::Uninterpreted { name: "x".into() },
                bv(4),
            )
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_content_gets_distinct_ids() {
        let mut store = TermStore::new();
        let a = store
            .intern(TermKind::Uninterpreted { name: "x".into() }, bv(4))
            .unwrap();
        let b = store
            .intern(TermKind::Uninterpreted { name: "y".into() }, bv(4))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn not_collapses_into_polarity_bit() {
        let mut store = TermStore::new();
        let p = store
            .intern(TermKind::Uninterpreted { name: "p".into() }, Sort::Bool)
            .unwrap();
        let not_p = store.intern(TermKind::Not(p), Sort::Bool).unwrap();
        assert_eq!(not_p, p.negate());
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn gc_preserves_reachable_and_reclaims_rest() {
        let mut store = TermStore::new();
        let x = store
            .intern(TermKind::Uninterpreted { name: "x".into() }, bv(4))
            .unwrap();
        let _y = store
            .intern(TermKind::Uninterpreted { name: "y".into() }, bv(4))
            .unwrap();
        store.collect_garbage(&[x]);
        assert_eq!(store.live_count(), 1);
        assert_eq!(*store.kind_of(x), TermKind::Uninterpreted { name: "x".into() });
    }

    #[test]
    fn reinterning_after_gc_restores_same_id() {
        let mut store = TermStore::new();
        let x = store
            .intern(TermKind::Uninterpreted { name: "x".into() }, bv(4))
            .unwrap();
        store.collect_garbage(&[]);
        assert_eq!(store.live_count(), 0);
        let x2 = store
            .intern(TermKind::Uninterpreted { name: "x".into() }, bv(4))
            .unwrap();
        assert_eq!(x, x2);
        assert_eq!(store.live_count(), 1);
    }
}
