//! Set drafts.

use crate::draft::{Draft, DraftCell, Draftable};
use crate::entry::Entry;
use crate::mark::DirtyMark;
use crate::seam::CollectionSeam;
use crate::source::SetSource;
use std::fmt;

/// A draft over an unordered container `C` of elements `T` whose draft form
/// is `M`.
///
/// Entries keep their insertion order internally so freezing a set built
/// from an order-preserving source is deterministic. Uniqueness is enforced
/// against element *baselines*: inserting a value equal to an untouched
/// element's baseline is rejected, while elements whose drafts were already
/// materialized no longer participate in deduplication (their current value
/// is unknowable without freezing). The rebuild collapses any duplicates
/// that drafting created.
///
/// # Examples
///
/// ```
/// use chisel_draft::{Draft, DraftSet};
/// use std::collections::BTreeSet;
///
/// let mut draft = DraftSet::plain(BTreeSet::from([1, 2]), None);
/// assert!(draft.insert_value(3));
/// assert!(!draft.insert_value(2));
///
/// assert_eq!(draft.freeze(), BTreeSet::from([1, 2, 3]));
/// ```
pub struct DraftSet<C, T, M> {
    base: C,
    mark: DirtyMark,
    entries: Option<Vec<Entry<T, M>>>,
    seam: CollectionSeam<C, T, M>,
}

impl<C: SetSource<T>, T: Clone, M> DraftSet<C, T, M> {
    /// Build a set draft over `base`, chained to `parent` when given.
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

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a draft, frozen immediately into a new element's baseline.
    ///
    /// Returns `false` without adding when the frozen value equals an
    /// untouched element's baseline. Marks dirty either way.
    pub fn insert(&mut self, draft: M) -> bool
    where
        T: PartialEq,
    {
        let value = (self.seam.freeze)(draft);
        self.insert_value(value)
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

    /// Iterate over every element's draft, materializing as it goes.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut M> + '_ {
        self.table().iter_mut().map(Entry::draft)
    }

    /// Add every draft in `drafts`, freezing each like [`insert`](Self::insert).
    pub fn extend_drafts<I>(&mut self, drafts: I)
    where
        T: PartialEq,
        I: IntoIterator<Item = M>,
    {
        for draft in drafts {
            self.insert(draft);
        }
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.entries = Some(Vec::new());
        self.mark.raise();
    }

    // ------------------------------------------------------------------
    // Raw-value surface: immutable elements in, no draft wrappers.
    // ------------------------------------------------------------------

    /// Add `value` as a fresh unset entry, unless it equals an untouched
    /// element's baseline. Marks dirty either way.
    pub fn insert_value(&mut self, value: T) -> bool
    where
        T: PartialEq,
    {
        let duplicate = self
            .table()
            .iter()
            .any(|entry| entry.backing().is_none() && entry.base() == &value);
        if !duplicate {
            let entry = self.entry(value);
            self.table().push(entry);
        }
        self.mark.raise();
        !duplicate
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

    /// Add every value in `values` like [`insert_value`](Self::insert_value).
    pub fn extend_values<I>(&mut self, values: I)
    where
        T: PartialEq,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.insert_value(value);
        }
    }
}

impl<C, T> DraftSet<C, T, DraftCell<T>>
where
    C: SetSource<T> + FromIterator<T>,
    T: Clone,
{
    /// Set draft over plain elements: each element's draft form is a
    /// [`DraftCell`], so in-place edits are dirty-tracked.
    pub fn plain(base: C, parent: Option<&DirtyMark>) -> Self {
        Self::new(base, parent, CollectionSeam::plain())
    }
}

impl<C, T> DraftSet<C, T, T::Draft>
where
    C: SetSource<T> + FromIterator<T>,
    T: Draftable,
{
    /// Set draft over [`Draftable`] elements.
    pub fn drafting(base: C, parent: Option<&DirtyMark>) -> Self {
        Self::new(base, parent, CollectionSeam::drafting())
    }
}

impl<C: SetSource<T>, T: Clone, M> Draft for DraftSet<C, T, M> {
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

impl<C, T, M> fmt::Debug for DraftSet<C, T, M>
where
    C: SetSource<T>,
    T: Clone + PartialEq + fmt::Debug,
    M: fmt::Debug,
{
    /// Renders changed elements only: `~ draft` for elements whose draft
    /// was mutated, `+ draft` for elements whose baseline is not in the
    /// original set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if let Some(table) = &self.entries {
            let original = self.base.items();
            for entry in table {
                if entry.backing().is_some() && entry.is_dirty() {
                    write!(f, "\n  ~ {entry:?}")?;
                } else if !original.contains(entry.base()) {
                    write!(f, "\n  + {entry:?}")?;
                }
            }
        }
        f.write_str("\n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_len_answers_before_materialization() {
        let draft = DraftSet::plain(BTreeSet::from([1, 2, 3]), None);
        assert_eq!(draft.len(), 3);
        assert!(draft.entries.is_none());
    }

    #[test]
    fn test_insert_value_rejects_duplicates_but_marks() {
        let mut draft = DraftSet::plain(BTreeSet::from([1, 2]), None);
        assert!(!draft.insert_value(2));
        assert!(draft.is_dirty());
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn test_materialized_entries_leave_deduplication() {
        let mut draft = DraftSet::plain(BTreeSet::from([1, 2]), None);
        for cell in draft.iter_mut() {
            if cell.get() == &2 {
                cell.set_value(5);
            }
        }
        // The entry that was 2 is now a dirty draft; a fresh 2 may re-enter.
        assert!(draft.insert_value(2));
        assert_eq!(draft.freeze(), BTreeSet::from([1, 2, 5]));
    }

    #[test]
    fn test_duplicate_drafts_collapse_at_freeze() {
        let mut draft = DraftSet::plain(BTreeSet::from([1, 2]), None);
        for cell in draft.iter_mut() {
            cell.set_value(7);
        }
        assert_eq!(draft.freeze(), BTreeSet::from([7]));
    }

    #[test]
    fn test_remove_value_by_baseline() {
        let mut draft = DraftSet::plain(BTreeSet::from([1, 2, 3]), None);
        assert!(draft.remove_value(&2));
        assert!(!draft.remove_value(&9));
        assert!(draft.is_dirty());
        assert_eq!(draft.freeze(), BTreeSet::from([1, 3]));
    }
}
