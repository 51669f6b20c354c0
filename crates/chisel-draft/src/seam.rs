//! Conversion seams between immutable elements and their draft forms.
//!
//! Container drafts are generic over three caller-supplied functions:
//! `wrap` builds the draft form of one element (attaching it to the parent's
//! dirty mark), `freeze` turns a draft form back into an element, and
//! `rebuild` reassembles the concrete immutable container from frozen
//! elements. All three are plain `fn` pointers, so seams are `Copy` and
//! container draft types stay nameable as record field types.
//!
//! Seam functions are infallible by signature. A seam that must fail does so
//! by panicking; the panic propagates to the caller unchanged and leaves
//! already-materialized entries as they were.

use crate::draft::{Draft, DraftCell, Draftable};
use crate::mark::DirtyMark;
use std::fmt;

/// The wrap/freeze pair shared by every entry of one container draft.
pub(crate) struct ElementSeam<T, M> {
    pub(crate) wrap: fn(T, &DirtyMark) -> M,
    pub(crate) freeze: fn(M) -> T,
}

impl<T, M> Clone for ElementSeam<T, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, M> Copy for ElementSeam<T, M> {}

/// Seam for sequence and set drafts over a container `C` of elements `T`
/// with draft form `M`.
///
/// # Examples
///
/// ```
/// use chisel_draft::{CollectionSeam, DraftCell};
///
/// // Plain elements draft as dirty-tracked cells.
/// let seam: CollectionSeam<Vec<i32>, i32, DraftCell<i32>> = CollectionSeam::plain();
/// assert_eq!((seam.rebuild)(vec![1, 2]), vec![1, 2]);
/// ```
pub struct CollectionSeam<C, T, M> {
    /// Reassemble the concrete container from frozen elements, in order.
    pub rebuild: fn(Vec<T>) -> C,
    /// Build the draft form of one element under the given parent mark.
    pub wrap: fn(T, &DirtyMark) -> M,
    /// Freeze one draft form back into an element.
    pub freeze: fn(M) -> T,
}

impl<C, T, M> CollectionSeam<C, T, M> {
    /// Seam from an explicit function triple.
    pub fn new(
        rebuild: fn(Vec<T>) -> C,
        wrap: fn(T, &DirtyMark) -> M,
        freeze: fn(M) -> T,
    ) -> Self {
        Self {
            rebuild,
            wrap,
            freeze,
        }
    }

    pub(crate) fn element(&self) -> ElementSeam<T, M> {
        ElementSeam {
            wrap: self.wrap,
            freeze: self.freeze,
        }
    }
}

impl<C: FromIterator<T>, T, M> CollectionSeam<C, T, M> {
    /// Seam whose rebuild collects into `C`, with an explicit element pair.
    pub fn collecting(wrap: fn(T, &DirtyMark) -> M, freeze: fn(M) -> T) -> Self {
        Self {
            rebuild: |items| items.into_iter().collect(),
            wrap,
            freeze,
        }
    }
}

impl<C: FromIterator<T>, T> CollectionSeam<C, T, DraftCell<T>> {
    /// Seam for plain elements, drafted as [`DraftCell`]s so that
    /// assignments through the draft surface are dirty-tracked.
    pub fn plain() -> Self {
        Self::collecting(
            |value, parent| DraftCell::new(value, Some(parent)),
            |cell| cell.freeze(),
        )
    }
}

impl<C: FromIterator<T>, T: Draftable> CollectionSeam<C, T, T::Draft> {
    /// Seam for elements that implement [`Draftable`].
    pub fn drafting() -> Self {
        Self::collecting(
            |value, parent| value.to_draft_in(Some(parent)),
            |draft| draft.freeze(),
        )
    }
}

impl<C, T, M> Clone for CollectionSeam<C, T, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, T, M> Copy for CollectionSeam<C, T, M> {}

impl<C, T, M> fmt::Debug for CollectionSeam<C, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CollectionSeam")
    }
}

/// Seam for mapping drafts over a container `C` keyed by `K` with values `T`
/// and value draft form `M`.
pub struct MapSeam<C, K, T, M> {
    /// Reassemble the concrete map from frozen entries, in table order.
    pub rebuild: fn(Vec<(K, T)>) -> C,
    /// Build the draft form of one value under the given parent mark.
    pub wrap: fn(T, &DirtyMark) -> M,
    /// Freeze one value draft back into a value.
    pub freeze: fn(M) -> T,
}

impl<C, K, T, M> MapSeam<C, K, T, M> {
    /// Seam from an explicit function triple.
    pub fn new(
        rebuild: fn(Vec<(K, T)>) -> C,
        wrap: fn(T, &DirtyMark) -> M,
        freeze: fn(M) -> T,
    ) -> Self {
        Self {
            rebuild,
            wrap,
            freeze,
        }
    }

    pub(crate) fn element(&self) -> ElementSeam<T, M> {
        ElementSeam {
            wrap: self.wrap,
            freeze: self.freeze,
        }
    }
}

impl<C: FromIterator<(K, T)>, K, T, M> MapSeam<C, K, T, M> {
    /// Seam whose rebuild collects into `C`, with an explicit element pair.
    pub fn collecting(wrap: fn(T, &DirtyMark) -> M, freeze: fn(M) -> T) -> Self {
        Self {
            rebuild: |entries| entries.into_iter().collect(),
            wrap,
            freeze,
        }
    }
}

impl<C: FromIterator<(K, T)>, K, T> MapSeam<C, K, T, DraftCell<T>> {
    /// Seam for plain values, drafted as [`DraftCell`]s so that
    /// assignments through the draft surface are dirty-tracked.
    pub fn plain() -> Self {
        Self::collecting(
            |value, parent| DraftCell::new(value, Some(parent)),
            |cell| cell.freeze(),
        )
    }
}

impl<C: FromIterator<(K, T)>, K, T: Draftable> MapSeam<C, K, T, T::Draft> {
    /// Seam for values that implement [`Draftable`].
    pub fn drafting() -> Self {
        Self::collecting(
            |value, parent| value.to_draft_in(Some(parent)),
            |draft| draft.freeze(),
        )
    }
}

impl<C, K, T, M> Clone for MapSeam<C, K, T, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, K, T, M> Copy for MapSeam<C, K, T, M> {}

impl<C, K, T, M> fmt::Debug for MapSeam<C, K, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MapSeam")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_plain_seam_round_trips_elements() {
        let seam: CollectionSeam<Vec<i32>, i32, DraftCell<i32>> = CollectionSeam::plain();
        let mark = DirtyMark::root();

        let drafted = (seam.wrap)(7, &mark);
        assert_eq!((seam.freeze)(drafted), 7);
        assert!(!mark.is_dirty(), "wrapping alone must not mark");
    }

    #[test]
    fn test_plain_seam_cells_chain_the_parent_mark() {
        let seam: CollectionSeam<Vec<i32>, i32, DraftCell<i32>> = CollectionSeam::plain();
        let mark = DirtyMark::root();

        let mut drafted = (seam.wrap)(7, &mark);
        drafted.set_value(8);
        assert!(mark.is_dirty());
        assert_eq!((seam.freeze)(drafted), 8);
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Tag(String);

    impl Draftable for Tag {
        type Draft = DraftCell<Tag>;

        fn to_draft_in(self, parent: Option<&DirtyMark>) -> Self::Draft {
            DraftCell::new(self, parent)
        }
    }

    #[test]
    fn test_drafting_seam_chains_the_parent_mark() {
        let seam: CollectionSeam<Vec<Tag>, Tag, DraftCell<Tag>> = CollectionSeam::drafting();
        let mark = DirtyMark::root();

        let mut drafted = (seam.wrap)(Tag("a".into()), &mark);
        drafted.set_value(Tag("b".into()));
        assert!(mark.is_dirty());
        assert_eq!((seam.freeze)(drafted), Tag("b".into()));
    }

    #[test]
    fn test_map_seam_rebuild_collects_entries() {
        let seam: MapSeam<HashMap<String, i32>, String, i32, DraftCell<i32>> = MapSeam::plain();
        let rebuilt = (seam.rebuild)(vec![("a".into(), 1), ("b".into(), 2)]);
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt["a"], 1);
    }

    #[test]
    fn test_seams_are_copy() {
        let seam: CollectionSeam<Vec<i32>, i32, DraftCell<i32>> = CollectionSeam::plain();
        let copy = seam;
        assert_eq!((copy.rebuild)(vec![3]), vec![3]);
        assert_eq!((seam.rebuild)(vec![3]), vec![3]);
    }
}
