//! The draft contract.
//!
//! A draft is a mutable view over an immutable value. It remembers the value
//! it was built from, tracks whether anything was mutated through it, and on
//! [`freeze`](Draft::freeze) either rebuilds a new immutable value or hands
//! the original back untouched.
//!
//! Immutable values moving through drafts are expected to clone cheaply:
//! `Arc`-backed records, scalars, small strings, persistent collections.
//! Nothing enforces this, but every lazy materialization clones the element
//! it wraps.

use crate::mark::DirtyMark;
use std::fmt;

/// A mutable view over an immutable value.
///
/// Mutations raise the draft's [`DirtyMark`], which propagates to the parent
/// draft's mark and onward to the root. Freezing a clean draft returns the
/// tracked value as-is; freezing a dirty draft rebuilds, reusing every clean
/// child by identity.
pub trait Draft {
    /// The immutable value this draft tracks.
    type Value;

    /// The tracked value: the original this draft was built from, or the
    /// replacement installed by the most recent [`set`](Self::set).
    fn base(&self) -> &Self::Value;

    /// This draft's dirty mark.
    fn mark(&self) -> &DirtyMark;

    /// Whether this draft has been mutated since it was built or last
    /// [`set`](Self::set).
    #[inline]
    fn is_dirty(&self) -> bool {
        self.mark().is_dirty()
    }

    /// Raise the dirty flag on this draft and every ancestor.
    #[inline]
    fn mark_dirty(&self) {
        self.mark().raise()
    }

    /// The parent draft's mark, if this draft has a parent.
    #[inline]
    fn parent(&self) -> Option<DirtyMark> {
        self.mark().parent()
    }

    /// Replace the tracked value.
    ///
    /// Clears the dirty flag on this draft only (ancestors keep theirs) and
    /// discards any memoized children, as if the draft had just been built
    /// from `value`.
    fn set(&mut self, value: Self::Value);

    /// Rebuild the immutable value.
    ///
    /// A clean draft returns its tracked value unchanged, preserving
    /// identity for shared-ownership values.
    fn freeze(self) -> Self::Value;
}

/// The simplest draft: a single tracked value with a dirty mark.
///
/// Container drafts and hand-written record wrappers build on the same
/// shape; `DraftCell` is useful on its own for leaf values that need
/// dirty tracking.
///
/// # Examples
///
/// ```
/// use chisel_draft::{Draft, DraftCell};
///
/// let mut cell = DraftCell::new("hello".to_string(), None);
/// assert!(!cell.is_dirty());
///
/// cell.set_value("world".to_string());
/// assert!(cell.is_dirty());
/// assert_eq!(cell.freeze(), "world");
/// ```
pub struct DraftCell<T> {
    value: T,
    mark: DirtyMark,
}

impl<T> DraftCell<T> {
    /// Build a cell over `value`, chained to `parent` when one is given.
    pub fn new(value: T, parent: Option<&DirtyMark>) -> Self {
        Self {
            value,
            mark: DirtyMark::adopted(parent),
        }
    }

    /// The current value.
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Assign a new value and mark the cell dirty.
    pub fn set_value(&mut self, value: T) {
        self.value = value;
        self.mark.raise();
    }
}

impl<T> Draft for DraftCell<T> {
    type Value = T;

    #[inline]
    fn base(&self) -> &T {
        &self.value
    }

    #[inline]
    fn mark(&self) -> &DirtyMark {
        &self.mark
    }

    fn set(&mut self, value: T) {
        self.value = value;
        self.mark.clear();
    }

    fn freeze(self) -> T {
        self.value
    }
}

impl<T: PartialEq> PartialEq for DraftCell<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug> fmt::Debug for DraftCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftCell")
            .field("value", &self.value)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

/// Immutable values that know their draft form.
///
/// This is the seam hand-written record wrappers plug into: implementing
/// `Draftable` for a record type gives it [`to_draft`](Draftable::to_draft)
/// plus the free functions [`wrap`], [`mutate`] and [`update`].
///
/// # Examples
///
/// ```
/// use chisel_draft::{update, Draft, Draftable, DraftCell, DirtyMark};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter(i64);
///
/// impl Draftable for Counter {
///     type Draft = DraftCell<Counter>;
///
///     fn to_draft_in(self, parent: Option<&DirtyMark>) -> Self::Draft {
///         DraftCell::new(self, parent)
///     }
/// }
///
/// let next = update(Counter(1), |draft| {
///     let bumped = Counter(draft.base().0 + 1);
///     draft.set_value(bumped);
/// });
/// assert_eq!(next, Counter(2));
/// ```
pub trait Draftable: Clone {
    /// The draft form of this value.
    type Draft: Draft<Value = Self>;

    /// Build a draft chained to `parent` when one is given.
    fn to_draft_in(self, parent: Option<&DirtyMark>) -> Self::Draft;

    /// Build a root draft.
    #[inline]
    fn to_draft(self) -> Self::Draft {
        self.to_draft_in(None)
    }
}

/// Wrap a value in a root draft.
#[inline]
pub fn wrap<V: Draftable>(value: V) -> V::Draft {
    value.to_draft()
}

/// Wrap a value, apply edits, and return the draft unfrozen.
///
/// The caller can inspect [`is_dirty`](Draft::is_dirty) or keep editing
/// before freezing.
pub fn mutate<V, F>(value: V, edit: F) -> V::Draft
where
    V: Draftable,
    F: FnOnce(&mut V::Draft),
{
    let mut draft = value.to_draft();
    edit(&mut draft);
    draft
}

/// Freeze a draft into its immutable value.
#[inline]
pub fn freeze<D: Draft>(draft: D) -> D::Value {
    draft.freeze()
}

/// Wrap, edit, and freeze in one step.
///
/// Returns the original value by identity when the edit block touched
/// nothing.
pub fn update<V, F>(value: V, edit: F) -> V
where
    V: Draftable,
    F: FnOnce(&mut V::Draft),
{
    mutate(value, edit).freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_clean_cell_freezes_to_same_value() {
        let original = Rc::new(42);
        let cell = DraftCell::new(Rc::clone(&original), None);

        assert!(!cell.is_dirty());
        let frozen = cell.freeze();
        assert!(Rc::ptr_eq(&original, &frozen));
    }

    #[test]
    fn test_set_value_marks_dirty_and_propagates() {
        let root = DirtyMark::root();
        let mut cell = DraftCell::new(1, Some(&root));

        cell.set_value(2);
        assert!(cell.is_dirty());
        assert!(root.is_dirty());
        assert_eq!(cell.freeze(), 2);
    }

    #[test]
    fn test_set_replaces_baseline_and_clears_own_flag() {
        let root = DirtyMark::root();
        let mut cell = DraftCell::new(1, Some(&root));

        cell.set_value(2);
        cell.set(3);
        assert!(!cell.is_dirty());
        // The parent learned about the earlier mutation and stays dirty.
        assert!(root.is_dirty());
        assert_eq!(cell.freeze(), 3);
    }

    #[test]
    fn test_cell_equality_ignores_dirty_state() {
        let mut a = DraftCell::new(7, None);
        let b = DraftCell::new(7, None);

        a.set_value(7);
        assert!(a.is_dirty());
        assert_eq!(a, b);
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Flag(bool);

    impl Draftable for Flag {
        type Draft = DraftCell<Flag>;

        fn to_draft_in(self, parent: Option<&DirtyMark>) -> Self::Draft {
            DraftCell::new(self, parent)
        }
    }

    #[test]
    fn test_mutate_returns_unfrozen_draft() {
        let draft = mutate(Flag(false), |d| d.set_value(Flag(true)));
        assert!(draft.is_dirty());
        assert_eq!(freeze(draft), Flag(true));
    }

    #[test]
    fn test_update_without_edits_is_identity() {
        let value = Flag(true);
        let next = update(value.clone(), |_| {});
        assert_eq!(next, value);
    }

    #[test]
    fn test_wrap_builds_clean_root_draft() {
        let draft = wrap(Flag(false));
        assert!(!draft.is_dirty());
        assert!(draft.parent().is_none());
    }
}
