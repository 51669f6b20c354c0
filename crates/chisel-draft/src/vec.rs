//! Sequence drafts.

use crate::draft::{Draft, DraftCell, Draftable};
use crate::entry::Entry;
use crate::error::{DraftError, DraftResult};
use crate::mark::DirtyMark;
use crate::seam::CollectionSeam;
use crate::source::SeqSource;
use std::fmt;
use std::ops::Range;

/// A draft over an ordered container `C` of elements `T` whose draft form
/// is `M`.
///
/// The entry table is built lazily on first structural access; until then
/// the draft is a thin wrapper around the original container. Every entry
/// keeps its element's baseline and materializes the draft form only when
/// the position is actually read, so freezing reuses untouched elements by
/// identity.
///
/// # Examples
///
/// ```
/// use chisel_draft::{Draft, DraftVec};
///
/// let mut numbers = DraftVec::plain(vec![1, 2, 3], None);
/// numbers.get_at(0).unwrap().set_value(10);
/// numbers.push_value(4);
///
/// assert!(numbers.is_dirty());
/// assert_eq!(numbers.freeze(), vec![10, 2, 3, 4]);
/// ```
pub struct DraftVec<C, T, M> {
    base: C,
    mark: DirtyMark,
    entries: Option<Vec<Entry<T, M>>>,
    seam: CollectionSeam<C, T, M>,
}

impl<C: SeqSource<T>, T: Clone, M> DraftVec<C, T, M> {
    /// Build a sequence draft over `base`, chained to `parent` when given.
    pub fn new(base: C, parent: Option<&DirtyMark>, seam: CollectionSeam<C, T, M>) -> Self {
        Self {
            base,
            mark: DirtyMark::adopted(parent),
            entries: None,
            seam,
        }
    }

    fn table(&mut self) -> &mut Vec<Entry<T, M>> {
        let Self {
            base,
            mark,
            entries,
            seam,
        } = self;
        entries.get_or_insert_with(|| {
            base.items()
                .into_iter()
                .map(|item| Entry::new(item, mark, seam.element()))
                .collect()
        })
    }

    fn entry(&mut self, value: T) -> Entry<T, M> {
        Entry::new(value, &self.mark, self.seam.element())
    }

    /// Number of elements. Does not materialize the entry table.
    pub fn len(&self) -> usize {
        match &self.entries {
            Some(table) => table.len(),
            None => self.base.len(),
        }
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draft of the element at `index`.
    ///
    /// Materializes the element exactly once; later calls return the same
    /// draft. Reading alone never marks anything dirty.
    pub fn get_at(&mut self, index: usize) -> DraftResult<&mut M> {
        let len = self.len();
        self.table()
            .get_mut(index)
            .map(Entry::draft)
            .ok_or_else(|| DraftError::index_out_of_bounds(index, len))
    }

    /// Iterate over every element's draft, materializing as it goes.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut M> + '_ {
        self.table().iter_mut().map(Entry::draft)
    }

    /// Cursor for walking the sequence with in-place edits.
    pub fn cursor(&mut self) -> DraftVecCursor<'_, C, T, M> {
        self.table();
        DraftVecCursor { vec: self, pos: 0 }
    }

    /// Append a draft. It is frozen immediately and stored as the new
    /// element's baseline.
    pub fn push(&mut self, draft: M) {
        let value = (self.seam.freeze)(draft);
        let entry = self.entry(value);
        self.table().push(entry);
        self.mark.raise();
    }

    /// Insert a draft at `index` (`index == len` appends). Frozen
    /// immediately, like [`push`](Self::push).
    pub fn insert(&mut self, index: usize, draft: M) -> DraftResult<()> {
        let len = self.len();
        if index > len {
            return Err(DraftError::index_out_of_bounds(index, len));
        }
        let value = (self.seam.freeze)(draft);
        let entry = self.entry(value);
        self.table().insert(index, entry);
        self.mark.raise();
        Ok(())
    }

    /// Replace the element at `index` with a draft, frozen immediately.
    pub fn set_at(&mut self, index: usize, draft: M) -> DraftResult<()> {
        let len = self.len();
        if index >= len {
            return Err(DraftError::index_out_of_bounds(index, len));
        }
        let value = (self.seam.freeze)(draft);
        let entry = self.entry(value);
        self.table()[index] = entry;
        self.mark.raise();
        Ok(())
    }

    /// Remove the element at `index`, returning its draft form.
    pub fn remove_at(&mut self, index: usize) -> DraftResult<M> {
        let len = self.len();
        if index >= len {
            return Err(DraftError::index_out_of_bounds(index, len));
        }
        let entry = self.table().remove(index);
        self.mark.raise();
        Ok(entry.into_draft())
    }

    /// Remove every element whose draft equals `draft`, materializing each
    /// element to compare. Marks dirty even when nothing matched.
    pub fn remove(&mut self, draft: &M) -> bool
    where
        M: PartialEq,
    {
        let table = self.table();
        let before = table.len();
        table.retain_mut(|entry| entry.draft() != draft);
        let removed = table.len() != before;
        self.mark.raise();
        removed
    }

    /// Keep only elements whose draft satisfies `keep`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&mut M) -> bool,
    {
        self.table().retain_mut(|entry| keep(entry.draft()));
        self.mark.raise();
    }

    /// Whether any *materialized or assigned* draft equals `draft`.
    ///
    /// Elements that were never read through the draft surface are not
    /// materialized for the comparison and never match.
    pub fn contains(&self, draft: &M) -> bool
    where
        M: PartialEq,
    {
        match &self.entries {
            Some(table) => table.iter().any(|entry| entry.backing() == Some(draft)),
            None => false,
        }
    }

    /// Index of the first element whose draft satisfies `matches`,
    /// materializing as it scans.
    pub fn position<F>(&mut self, mut matches: F) -> Option<usize>
    where
        F: FnMut(&mut M) -> bool,
    {
        self.table()
            .iter_mut()
            .position(|entry| matches(entry.draft()))
    }

    /// Index of the last element whose draft satisfies `matches`,
    /// materializing as it scans.
    pub fn rposition<F>(&mut self, mut matches: F) -> Option<usize>
    where
        F: FnMut(&mut M) -> bool,
    {
        self.table()
            .iter_mut()
            .rposition(|entry| matches(entry.draft()))
    }

    /// Append every draft in `drafts`, freezing each like [`push`](Self::push).
    pub fn extend_drafts<I>(&mut self, drafts: I)
    where
        I: IntoIterator<Item = M>,
    {
        for draft in drafts {
            self.push(draft);
        }
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.entries = Some(Vec::new());
        self.mark.raise();
    }

    /// Draft over the elements at `range`, built from their current
    /// baselines.
    ///
    /// The returned draft is an independent slice: it shares this draft's
    /// *parent* dirty chain (mutating it does not mark this draft dirty),
    /// its entries materialize independently, and edits inside it never
    /// write back into this draft's entry table. Freeze it separately and
    /// splice the result back if that is what you need.
    pub fn sub_range(&mut self, range: Range<usize>) -> DraftResult<Self> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(DraftError::range_out_of_bounds(range.start, range.end, len));
        }
        let seam = self.seam;
        let parent = self.mark.parent();
        let slice: Vec<T> = self.table()[range]
            .iter()
            .map(|entry| entry.base().clone())
            .collect();
        let base = (seam.rebuild)(slice);
        Ok(Self::new(base, parent.as_ref(), seam))
    }

    // ------------------------------------------------------------------
    // Raw-value surface: immutable elements in, no draft wrappers.
    // ------------------------------------------------------------------

    /// Swap the baseline at `index` to `value` without materializing it.
    ///
    /// The entry itself ends up clean over the new baseline; the sequence
    /// is marked dirty so the freeze picks the swap up.
    pub fn set_value_at(&mut self, index: usize, value: T) -> DraftResult<()> {
        let len = self.len();
        if index >= len {
            return Err(DraftError::index_out_of_bounds(index, len));
        }
        self.table()[index].set(value);
        self.mark.raise();
        Ok(())
    }

    /// Append `value` as a fresh unset entry.
    pub fn push_value(&mut self, value: T) {
        let entry = self.entry(value);
        self.table().push(entry);
        self.mark.raise();
    }

    /// Insert `value` at `index` as a fresh unset entry
    /// (`index == len` appends).
    pub fn insert_value(&mut self, index: usize, value: T) -> DraftResult<()> {
        let len = self.len();
        if index > len {
            return Err(DraftError::index_out_of_bounds(index, len));
        }
        let entry = self.entry(value);
        self.table().insert(index, entry);
        self.mark.raise();
        Ok(())
    }

    /// Remove every element whose *baseline* equals `value`. Never
    /// materializes; marks dirty even when nothing matched.
    pub fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let table = self.table();
        let before = table.len();
        table.retain(|entry| entry.base() != value);
        let removed = table.len() != before;
        self.mark.raise();
        removed
    }

    /// Keep only elements whose baseline satisfies `keep`. Never
    /// materializes.
    pub fn retain_values<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.table().retain(|entry| keep(entry.base()));
        self.mark.raise();
    }

    /// Append every value in `values` as fresh unset entries.
    pub fn extend_values<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push_value(value);
        }
    }
}

impl<C, T> DraftVec<C, T, DraftCell<T>>
where
    C: SeqSource<T> + FromIterator<T>,
    T: Clone,
{
    /// Sequence draft over plain elements: each element's draft form is a
    /// [`DraftCell`], so in-place edits are dirty-tracked.
    pub fn plain(base: C, parent: Option<&DirtyMark>) -> Self {
        Self::new(base, parent, CollectionSeam::plain())
    }
}

impl<C, T> DraftVec<C, T, T::Draft>
where
    C: SeqSource<T> + FromIterator<T>,
    T: Draftable,
{
    /// Sequence draft over [`Draftable`] elements.
    pub fn drafting(base: C, parent: Option<&DirtyMark>) -> Self {
        Self::new(base, parent, CollectionSeam::drafting())
    }
}

impl<C: SeqSource<T>, T: Clone, M> Draft for DraftVec<C, T, M> {
    type Value = C;

    fn base(&self) -> &C {
        &self.base
    }

    fn mark(&self) -> &DirtyMark {
        &self.mark
    }

    fn set(&mut self, value: C) {
        self.base = value;
        self.entries = None;
        self.mark.clear();
    }

    fn freeze(self) -> C {
        if self.mark.is_dirty() {
            let items: Vec<T> = match self.entries {
                Some(table) => table.into_iter().map(Entry::freeze).collect(),
                None => self.base.items(),
            };
            (self.seam.rebuild)(items)
        } else {
            self.base
        }
    }
}

impl<C, T, M> fmt::Debug for DraftVec<C, T, M>
where
    C: SeqSource<T>,
    T: Clone + PartialEq + fmt::Debug,
    M: fmt::Debug,
{
    /// Renders changed positions only: `~ index: draft` for positions whose
    /// draft was mutated, `+ index: draft` for positions whose baseline no
    /// longer matches the original element there.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if let Some(table) = &self.entries {
            let original = self.base.items();
            for (index, entry) in table.iter().enumerate() {
                if entry.backing().is_some() && entry.is_dirty() {
                    write!(f, "\n  ~ {index}: {entry:?}")?;
                } else if original.get(index) != Some(entry.base()) {
                    write!(f, "\n  + {index}: {entry:?}")?;
                }
            }
        }
        f.write_str("\n]")
    }
}

/// Forward cursor over a [`DraftVec`] with in-place edits, in the style of
/// `std::collections::linked_list::CursorMut`.
///
/// The cursor starts on the first element; [`move_next`](DraftVecCursor::move_next)
/// walks it forward, and past the last element
/// [`current`](DraftVecCursor::current) returns `None`.
pub struct DraftVecCursor<'a, C, T, M> {
    vec: &'a mut DraftVec<C, T, M>,
    pos: usize,
}

impl<C: SeqSource<T>, T: Clone, M> DraftVecCursor<'_, C, T, M> {
    /// Draft of the element under the cursor.
    pub fn current(&mut self) -> Option<&mut M> {
        let pos = self.pos;
        if pos < self.vec.len() {
            self.vec.get_at(pos).ok()
        } else {
            None
        }
    }

    /// Index of the element under the cursor, if any.
    pub fn index(&self) -> Option<usize> {
        (self.pos < self.vec.len()).then_some(self.pos)
    }

    /// Step to the next element.
    pub fn move_next(&mut self) {
        if self.pos < self.vec.len() {
            self.pos += 1;
        }
    }

    /// Replace the element under the cursor, returning its old draft form.
    /// The replacement is frozen immediately, like [`DraftVec::set_at`].
    pub fn replace(&mut self, draft: M) -> Option<M> {
        if self.pos >= self.vec.len() {
            return None;
        }
        let value = (self.vec.seam.freeze)(draft);
        let entry = self.vec.entry(value);
        let old = std::mem::replace(&mut self.vec.table()[self.pos], entry);
        self.vec.mark.raise();
        Some(old.into_draft())
    }

    /// Insert a draft before the cursor; the cursor keeps pointing at the
    /// same element.
    pub fn insert_before(&mut self, draft: M) {
        let value = (self.vec.seam.freeze)(draft);
        let entry = self.vec.entry(value);
        self.vec.table().insert(self.pos, entry);
        self.vec.mark.raise();
        self.pos += 1;
    }

    /// Remove the element under the cursor, returning its draft form. The
    /// cursor ends up on the element that followed it.
    pub fn remove_current(&mut self) -> Option<M> {
        if self.pos >= self.vec.len() {
            return None;
        }
        let entry = self.vec.table().remove(self.pos);
        self.vec.mark.raise();
        Some(entry.into_draft())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_answers_before_materialization() {
        let draft = DraftVec::plain(vec![1, 2, 3], None);
        assert_eq!(draft.len(), 3);
        assert!(!draft.is_empty());
        assert!(draft.entries.is_none());
    }

    #[test]
    fn test_get_at_out_of_bounds_is_an_error() {
        let mut draft = DraftVec::plain(vec![1], None);
        let err = draft.get_at(5).unwrap_err();
        assert_eq!(err, DraftError::index_out_of_bounds(5, 1));
    }

    #[test]
    fn test_failed_insert_leaves_the_draft_clean() {
        let mut draft = DraftVec::plain(vec![1, 2], None);
        let err = draft.insert_value(9, 3).unwrap_err();
        assert_eq!(err, DraftError::index_out_of_bounds(9, 2));
        assert!(!draft.is_dirty());
        assert_eq!(draft.freeze(), vec![1, 2]);
    }

    #[test]
    fn test_clear_marks_and_empties() {
        let mut draft = DraftVec::plain(vec![1, 2], None);
        draft.clear();
        assert!(draft.is_dirty());
        assert_eq!(draft.freeze(), Vec::<i32>::new());
    }

    #[test]
    fn test_contains_only_sees_materialized_drafts() {
        let mut draft = DraftVec::plain(vec![1, 2], None);
        let probe = DraftCell::new(1, None);
        assert!(!draft.contains(&probe));

        draft.get_at(0).unwrap();
        assert!(draft.contains(&probe));
    }

    #[test]
    fn test_cursor_walks_and_removes() {
        let mut draft = DraftVec::plain(vec![1, 2, 3], None);
        let mut cursor = draft.cursor();
        cursor.move_next();
        let removed = cursor.remove_current().map(DraftCell::freeze);
        assert_eq!(removed, Some(2));
        assert_eq!(cursor.index(), Some(1));
        assert_eq!(draft.freeze(), vec![1, 3]);
    }
}
