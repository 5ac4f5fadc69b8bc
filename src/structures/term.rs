/*!
Term identifiers: a stable integer identifier, canonically a positive term plus an
optional negation flag.

The *low* bit of the underlying `u32` is that polarity flag, used as a cheap
negation marker that avoids allocating a node for `not`; the remaining bits index
into the [term store](crate::term_store)'s arena. This makes `negate` an O(1)
bit-flip and keeps hashing/equality on `TermId` itself cheap and total.
*/

/// A stable identifier for an interned term, with an embedded polarity bit.
///
/// `TermId` values are produced exclusively by
/// [TermStore::intern](crate::term_store::TermStore::intern); there is no public way
/// to construct one out of thin air other than [TermId::negate], which never leaves
/// the store's namespace.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TermId(u32);

impl TermId {
    /// Constructs a term id from a raw arena index and polarity. Only the term
    /// store should call this; kept `pub(crate)` rather than private so the store's
    /// submodules (node, gc) can use it directly.
    pub(crate) fn from_index(index: u32, negated: bool) -> Self {
        debug_assert!(index <= (u32::MAX >> 1), "term index overflowed the id space");
        TermId((index << 1) | (negated as u32))
    }

    /// The arena index this id addresses, irrespective of polarity.
    pub fn index(self) -> u32 {
        self.0 >> 1
    }

    /// True if this id carries the negation flag.
    pub fn is_negated(self) -> bool {
        (self.0 & 1) == 1
    }

    /// Flips the polarity bit. O(1), no allocation.
    pub fn negate(self) -> Self {
        TermId(self.0 ^ 1)
    }

    /// The positive presentation of this term id (clears the polarity bit).
    pub fn positive(self) -> Self {
        TermId(self.0 & !1)
    }

    /// The raw packed representation, for use as a memo-table key alongside a width.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_negated() {
            write!(f, "(not t{})", self.index())
        } else {
            write!(f, "t{}", self.index())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negate_is_involutive() {
        let t = TermId::from_index(5, false);
        assert_eq!(t.negate().negate(), t);
    }

    #[test]
    fn negate_preserves_index() {
        let t = TermId::from_index(5, false);
        assert_eq!(t.negate().index(), t.index());
        assert!(t.negate().is_negated());
    }

    #[test]
    fn positive_clears_flag() {
        let t = TermId::from_index(3, true);
        assert!(!t.positive().is_negated());
        assert_eq!(t.positive().index(), t.index());
    }
}
