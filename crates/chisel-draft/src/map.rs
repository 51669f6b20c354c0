//! Mapping drafts.

use crate::draft::{Draft, DraftCell, Draftable};
use crate::entry::Entry;
use crate::mark::DirtyMark;
use crate::seam::MapSeam;
use crate::source::MapSource;
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

/// A draft over a keyed container `C` mapping `K` to values `T` whose draft
/// form is `M`.
///
/// The entry table preserves the source's iteration order: replacing a value
/// keeps its position, new keys append, and removals close the gap. Like
/// [`DraftVec`](crate::DraftVec), the table is built lazily and each value
/// materializes its draft form only when the key is actually read.
///
/// # Examples
///
/// ```
/// use chisel_draft::{Draft, DraftMap};
/// use std::collections::BTreeMap;
///
/// let base = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
/// let mut draft = DraftMap::plain(base, None);
/// draft.get(&"a".to_string()).unwrap().set_value(10);
/// draft.insert_value("c".to_string(), 3);
///
/// let frozen = draft.freeze();
/// assert_eq!(frozen["a"], 10);
/// assert_eq!(frozen.len(), 3);
/// ```
pub struct DraftMap<C, K, T, M> {
    base: C,
    mark: DirtyMark,
    table: Option<IndexMap<K, Entry<T, M>>>,
    seam: MapSeam<C, K, T, M>,
}

impl<C, K, T, M> DraftMap<C, K, T, M>
where
    C: MapSource<K, T>,
    K: Hash + Eq + Clone,
    T: Clone,
{
    /// Build a mapping draft over `base`, chained to `parent` when given.
    pub fn new(base: C, parent: Option<&DirtyMark>, seam: MapSeam<C, K, T, M>) -> Self {
        Self {
            base,
            mark: DirtyMark::adopted(parent),
            table: None,
            seam,
        }
    }

    fn table(&mut self) -> &mut IndexMap<K, Entry<T, M>> {
        let Self {
            base,
            mark,
            table,
            seam,
        } = self;
        table.get_or_insert_with(|| {
            base.entries()
                .into_iter()
                .map(|(key, value)| (key, Entry::new(value, mark, seam.element())))
                .collect()
        })
    }

    fn entry(&mut self, value: T) -> Entry<T, M> {
        Entry::new(value, &self.mark, self.seam.element())
    }

    /// Number of mappings. Does not materialize the entry table.
    pub fn len(&self) -> usize {
        match &self.table {
            Some(table) => table.len(),
            None => self.base.len(),
        }
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draft of the value under `key`, or `None` when the key is absent.
    ///
    /// Materializes the value exactly once; later calls return the same
    /// draft. Reading alone never marks anything dirty.
    pub fn get(&mut self, key: &K) -> Option<&mut M> {
        self.table().get_mut(key).map(Entry::draft)
    }

    /// Whether `key` is present.
    pub fn contains_key(&mut self, key: &K) -> bool {
        self.table().contains_key(key)
    }

    /// Whether any value's draft equals `draft`, materializing each value
    /// to compare.
    pub fn contains_draft(&mut self, draft: &M) -> bool
    where
        M: PartialEq,
    {
        self.table()
            .values_mut()
            .any(|entry| entry.draft() == draft)
    }

    /// Map `key` to a draft, frozen immediately into the new baseline.
    ///
    /// Returns the displaced value's draft form when the key was already
    /// present. An existing key keeps its position in iteration order.
    pub fn insert(&mut self, key: K, draft: M) -> Option<M> {
        let value = (self.seam.freeze)(draft);
        let entry = self.entry(value);
        let old = self.table().insert(key, entry);
        self.mark.raise();
        old.map(Entry::into_draft)
    }

    /// Remove the mapping for `key`, returning its draft form.
    ///
    /// Marks the draft dirty even when the key was absent.
    pub fn remove(&mut self, key: &K) -> Option<M> {
        let removed = self.table().shift_remove(key);
        self.mark.raise();
        removed.map(Entry::into_draft)
    }

    /// Remove every mapping.
    pub fn clear(&mut self) {
        self.table = Some(IndexMap::new());
        self.mark.raise();
    }

    /// Iterate over every value's draft, materializing as it goes.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut M> + '_ {
        self.table().values_mut().map(Entry::draft)
    }

    /// View of the keys, with removals that drop whole mappings.
    pub fn keys(&mut self) -> DraftKeys<'_, C, K, T, M> {
        DraftKeys { map: self }
    }

    /// View of the mappings, with per-entry iteration and removal.
    pub fn entries(&mut self) -> DraftEntries<'_, C, K, T, M> {
        DraftEntries { map: self }
    }

    /// Map every key in `drafts`, freezing each like [`insert`](Self::insert).
    pub fn extend_drafts<I>(&mut self, drafts: I)
    where
        I: IntoIterator<Item = (K, M)>,
    {
        for (key, draft) in drafts {
            self.insert(key, draft);
        }
    }

    // ------------------------------------------------------------------
    // Raw-value surface: immutable values in, no draft wrappers.
    // ------------------------------------------------------------------

    /// Map `key` to `value` as a fresh unset entry. Returns whether an
    /// existing mapping was replaced.
    pub fn insert_value(&mut self, key: K, value: T) -> bool {
        let entry = self.entry(value);
        let old = self.table().insert(key, entry);
        self.mark.raise();
        old.is_some()
    }

    /// Remove the first mapping whose *baseline* equals `value`, returning
    /// its key. Never materializes; marks dirty only on a hit.
    pub fn remove_value(&mut self, value: &T) -> Option<K>
    where
        T: PartialEq,
    {
        let table = self.table();
        let key = table
            .iter()
            .find(|(_, entry)| entry.base() == value)
            .map(|(key, _)| key.clone())?;
        table.shift_remove(&key);
        self.mark.raise();
        Some(key)
    }

    /// Map every key in `values` as fresh unset entries.
    pub fn extend_values<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, T)>,
    {
        for (key, value) in values {
            self.insert_value(key, value);
        }
    }
}

impl<C, K, T> DraftMap<C, K, T, DraftCell<T>>
where
    C: MapSource<K, T> + FromIterator<(K, T)>,
    K: Hash + Eq + Clone,
    T: Clone,
{
    /// Mapping draft over plain values: each value's draft form is a
    /// [`DraftCell`], so in-place edits are dirty-tracked.
    pub fn plain(base: C, parent: Option<&DirtyMark>) -> Self {
        Self::new(base, parent, MapSeam::plain())
    }
}

impl<C, K, T> DraftMap<C, K, T, T::Draft>
where
    C: MapSource<K, T> + FromIterator<(K, T)>,
    K: Hash + Eq + Clone,
    T: Draftable,
{
    /// Mapping draft over [`Draftable`] values.
    pub fn drafting(base: C, parent: Option<&DirtyMark>) -> Self {
        Self::new(base, parent, MapSeam::drafting())
    }
}

impl<C, K, T, M> Draft for DraftMap<C, K, T, M>
where
    C: MapSource<K, T>,
    K: Hash + Eq + Clone,
    T: Clone,
{
    type Value = C;

    fn base(&self) -> &C {
        &self.base
    }

    fn mark(&self) -> &DirtyMark {
        &self.mark
    }

    fn set(&mut self, value: C) {
        self.base = value;
        self.table = None;
        self.mark.clear();
    }

    fn freeze(self) -> C {
        if self.mark.is_dirty() {
            let entries: Vec<(K, T)> = match self.table {
                Some(table) => table
                    .into_iter()
                    .map(|(key, entry)| (key, entry.freeze()))
                    .collect(),
                None => self.base.entries(),
            };
            (self.seam.rebuild)(entries)
        } else {
            self.base
        }
    }
}

impl<C, K, T, M> fmt::Debug for DraftMap<C, K, T, M>
where
    C: MapSource<K, T>,
    K: Hash + Eq + Clone + fmt::Debug,
    T: Clone + PartialEq + fmt::Debug,
    M: fmt::Debug,
{
    /// Renders changed mappings only: `~ key: old -> new` for values that
    /// were mutated or replaced, `+ key: value` for added keys, and
    /// `- key: old` for removed keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if let Some(table) = &self.table {
            let original: IndexMap<K, T> = self.base.entries().into_iter().collect();
            for (key, entry) in table {
                match original.get(key) {
                    None => write!(f, "\n  + {key:?}: {entry:?}")?,
                    Some(old) => {
                        let mutated = entry.backing().is_some() && entry.is_dirty();
                        if mutated || entry.base() != old {
                            write!(f, "\n  ~ {key:?}: {old:?} -> {entry:?}")?;
                        }
                    }
                }
            }
            for (key, old) in &original {
                if !table.contains_key(key) {
                    write!(f, "\n  - {key:?}: {old:?}")?;
                }
            }
        }
        f.write_str("\n}")
    }
}

/// Key view of a [`DraftMap`]. Removing a key drops the whole mapping.
///
/// Unlike the map's own [`remove`](DraftMap::remove), view removals mark
/// the draft dirty only when they actually remove something.
pub struct DraftKeys<'a, C, K, T, M> {
    map: &'a mut DraftMap<C, K, T, M>,
}

impl<C, K, T, M> DraftKeys<'_, C, K, T, M>
where
    C: MapSource<K, T>,
    K: Hash + Eq + Clone,
    T: Clone,
{
    /// Number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over the keys in table order.
    pub fn iter(&mut self) -> impl Iterator<Item = &K> + '_ {
        self.map.table().keys()
    }

    /// Whether `key` is present.
    pub fn contains(&mut self, key: &K) -> bool {
        self.map.table().contains_key(key)
    }

    /// Remove `key` and its mapping. Marks dirty only on a hit.
    pub fn remove(&mut self, key: &K) -> bool {
        let removed = self.map.table().shift_remove(key).is_some();
        if removed {
            self.map.mark.raise();
        }
        removed
    }

    /// Keep only mappings whose key satisfies `keep`. Marks dirty only
    /// when something was dropped.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        let table = self.map.table();
        let before = table.len();
        table.retain(|key, _| keep(key));
        if table.len() != before {
            self.map.mark.raise();
        }
    }

    /// Remove every mapping. Marks dirty only when the map was non-empty.
    pub fn clear(&mut self) {
        if !self.map.is_empty() {
            self.map.clear();
        }
    }
}

/// Entry view of a [`DraftMap`]: key plus value draft, with removals that
/// mark dirty only when they actually remove something.
pub struct DraftEntries<'a, C, K, T, M> {
    map: &'a mut DraftMap<C, K, T, M>,
}

impl<C, K, T, M> DraftEntries<'_, C, K, T, M>
where
    C: MapSource<K, T>,
    K: Hash + Eq + Clone,
    T: Clone,
{
    /// Number of mappings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether there are no mappings.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over the mappings, materializing each value's draft.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut M)> + '_ {
        self.map
            .table()
            .iter_mut()
            .map(|(key, entry)| (key, entry.draft()))
    }

    /// Remove the mapping for `key`, returning its draft form. Marks dirty
    /// only on a hit.
    pub fn remove(&mut self, key: &K) -> Option<M> {
        let removed = self.map.table().shift_remove(key);
        if removed.is_some() {
            self.map.mark.raise();
        }
        removed.map(Entry::into_draft)
    }

    /// Keep only mappings whose key and value draft satisfy `keep`,
    /// materializing as it scans. Marks dirty only when something was
    /// dropped.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut M) -> bool,
    {
        let table = self.map.table();
        let before = table.len();
        table.retain(|key, entry| keep(key, entry.draft()));
        if table.len() != before {
            self.map.mark.raise();
        }
    }

    /// Remove every mapping. Marks dirty only when the map was non-empty.
    pub fn clear(&mut self) {
        if !self.map.is_empty() {
            self.map.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> HashMap<String, i32> {
        HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)])
    }

    #[test]
    fn test_len_answers_before_materialization() {
        let draft = DraftMap::plain(base(), None);
        assert_eq!(draft.len(), 2);
        assert!(draft.table.is_none());
    }

    #[test]
    fn test_insert_returns_the_displaced_draft() {
        let mut draft = DraftMap::plain(base(), None);
        let displaced = draft.insert("a".to_string(), DraftCell::new(10, None));
        assert_eq!(displaced.map(DraftCell::freeze), Some(1));
        assert_eq!(draft.insert("c".to_string(), DraftCell::new(3, None)), None);
    }

    #[test]
    fn test_remove_marks_even_on_miss() {
        let mut draft = DraftMap::plain(base(), None);
        assert!(draft.remove(&"zzz".to_string()).is_none());
        assert!(draft.is_dirty());
    }

    #[test]
    fn test_key_view_marks_only_on_hit() {
        let mut draft = DraftMap::plain(base(), None);
        assert!(!draft.keys().remove(&"zzz".to_string()));
        assert!(!draft.is_dirty());

        assert!(draft.keys().remove(&"a".to_string()));
        assert!(draft.is_dirty());
        assert_eq!(draft.len(), 1);
    }

    #[test]
    fn test_clear_on_empty_map_view_stays_clean() {
        let mut draft = DraftMap::plain(HashMap::<String, i32>::new(), None);
        draft.keys().clear();
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_remove_value_by_baseline() {
        let mut draft = DraftMap::plain(base(), None);
        assert_eq!(draft.remove_value(&2), Some("b".to_string()));
        assert_eq!(draft.remove_value(&99), None);
        assert_eq!(draft.len(), 1);
    }
}
