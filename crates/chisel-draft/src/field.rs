//! Field helpers for hand-written record drafts.
//!
//! A record draft holds its immutable base, one [`DirtyMark`], and one field
//! slot per record field. Scalar fields use [`ValueField`]; fields whose
//! values have draft forms of their own use [`ChildField`]. Both start
//! *unset*, reading through to the base until written, so a freshly wrapped
//! record costs nothing beyond the base itself.

use crate::draft::{Draft, Draftable};
use crate::mark::DirtyMark;
use std::fmt;

/// Lazy slot for a plain record field.
///
/// Unset until assigned; while unset, reads come from the record's base and
/// freezing clones the base field. Assigning stores the value and raises
/// the record's mark.
///
/// # Examples
///
/// ```
/// use chisel_draft::{DirtyMark, ValueField};
///
/// let mark = DirtyMark::root();
/// let mut title = ValueField::new();
/// assert_eq!(title.get(&"draft".to_string()), "draft");
///
/// title.set("final".to_string(), &mark);
/// assert!(mark.is_dirty());
/// assert_eq!(title.freeze(&"draft".to_string()), "final");
/// ```
pub struct ValueField<T> {
    value: Option<T>,
}

impl<T: Clone> ValueField<T> {
    /// An unset field.
    pub fn new() -> Self {
        Self { value: None }
    }

    /// The field's current value, reading through to `base` while unset.
    pub fn get<'a>(&'a self, base: &'a T) -> &'a T {
        self.value.as_ref().unwrap_or(base)
    }

    /// Assign `value` and raise the record's mark.
    pub fn set(&mut self, value: T, mark: &DirtyMark) {
        self.value = Some(value);
        mark.raise();
    }

    /// Whether the field was ever assigned.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// The frozen field value: the assigned value, or a clone of `base`.
    pub fn freeze(self, base: &T) -> T {
        match self.value {
            Some(value) => value,
            None => base.clone(),
        }
    }
}

impl<T: Clone> Default for ValueField<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => value.fmt(f),
            None => f.write_str("unset"),
        }
    }
}

/// Lazy slot for a record field whose value has a draft form `D`.
///
/// The child draft is built on first access, chained to the record's mark
/// so edits inside it propagate upward. Freezing an unset slot clones the
/// base field; freezing a set slot freezes the child.
///
/// # Examples
///
/// ```
/// use chisel_draft::{ChildField, DirtyMark, Draft, DraftCell, DraftVec};
///
/// let mark = DirtyMark::root();
/// let mut tags: ChildField<Vec<String>, DraftVec<Vec<String>, String, DraftCell<String>>> =
///     ChildField::new(|value, parent| DraftVec::plain(value, Some(parent)));
///
/// let base = vec!["a".to_string()];
/// tags.get_or_wrap(&base, &mark).push_value("b".to_string());
/// assert!(mark.is_dirty());
/// assert_eq!(tags.freeze(&base), vec!["a".to_string(), "b".to_string()]);
/// ```
pub struct ChildField<T, D> {
    backing: Option<D>,
    wrap: fn(T, &DirtyMark) -> D,
}

impl<T, D> ChildField<T, D>
where
    T: Clone,
    D: Draft<Value = T>,
{
    /// An unset field whose child drafts are built by `wrap`.
    pub fn new(wrap: fn(T, &DirtyMark) -> D) -> Self {
        Self {
            backing: None,
            wrap,
        }
    }

    /// An unset field for a [`Draftable`] value.
    pub fn nested() -> Self
    where
        T: Draftable<Draft = D>,
    {
        Self::new(|value, parent| value.to_draft_in(Some(parent)))
    }

    /// Draft of this field, built from `base` under `mark` on first access.
    ///
    /// Building alone never marks anything dirty.
    pub fn get_or_wrap(&mut self, base: &T, mark: &DirtyMark) -> &mut D {
        let wrap = self.wrap;
        self.backing.get_or_insert_with(|| wrap(base.clone(), mark))
    }

    /// Assign an immutable value: the slot becomes a clean child draft over
    /// it and the record's mark is raised.
    pub fn assign(&mut self, value: T, mark: &DirtyMark) {
        self.backing = Some((self.wrap)(value, mark));
        mark.raise();
    }

    /// Install an already-built child draft and raise the record's mark.
    pub fn set_draft(&mut self, draft: D, mark: &DirtyMark) {
        self.backing = Some(draft);
        mark.raise();
    }

    /// Whether the child draft was ever built or assigned.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.backing.is_some()
    }

    /// The child draft, if built.
    pub fn backing(&self) -> Option<&D> {
        self.backing.as_ref()
    }

    /// The frozen field value: the child's freeze, or a clone of `base`.
    pub fn freeze(self, base: &T) -> T {
        match self.backing {
            Some(draft) => draft.freeze(),
            None => base.clone(),
        }
    }
}

impl<T, D: fmt::Debug> fmt::Debug for ChildField<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backing {
            Some(draft) => draft.fmt(f),
            None => f.write_str("unset"),
        }
    }
}
