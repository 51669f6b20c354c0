//! Per-element cells for container drafts.
//!
//! Each position in a sequence, mapping, or set draft is an [`Entry`]: the
//! element's baseline value plus an optional materialized draft form. The
//! draft form stays unset until the caller actually reads the position, so
//! wrapping a large container costs nothing for elements that are never
//! touched.

use crate::mark::DirtyMark;
use crate::seam::ElementSeam;
use std::fmt;

pub(crate) struct Entry<T, M> {
    base: T,
    mark: DirtyMark,
    backing: Option<M>,
    seam: ElementSeam<T, M>,
}

impl<T: Clone, M> Entry<T, M> {
    /// Fresh unset entry over `base`, chained to the container's mark.
    pub(crate) fn new(base: T, container: &DirtyMark, seam: ElementSeam<T, M>) -> Self {
        Self {
            base,
            mark: container.child(),
            backing: None,
            seam,
        }
    }

    pub(crate) fn base(&self) -> &T {
        &self.base
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.mark.is_dirty()
    }

    pub(crate) fn backing(&self) -> Option<&M> {
        self.backing.as_ref()
    }

    /// Materialize the draft form on first call; every later call returns
    /// the same instance until the entry is overwritten.
    ///
    /// Materialization alone does not raise any dirty flag.
    pub(crate) fn draft(&mut self) -> &mut M {
        let Self {
            base,
            mark,
            backing,
            seam,
        } = self;
        backing.get_or_insert_with(|| (seam.wrap)(base.clone(), mark))
    }

    /// Assign a draft form directly and mark the entry dirty.
    pub(crate) fn set_draft(&mut self, draft: M) {
        self.backing = Some(draft);
        self.mark.raise();
    }

    /// Swap the baseline: clears this entry's flag and drops any
    /// materialized draft. The container decides whether to mark itself.
    pub(crate) fn set(&mut self, value: T) {
        self.base = value;
        self.backing = None;
        self.mark.clear();
    }

    /// Freeze to the element value: a dirty entry freezes its draft form, a
    /// clean one returns its baseline by identity.
    pub(crate) fn freeze(self) -> T {
        match self.backing {
            Some(draft) if self.mark.is_dirty() => (self.seam.freeze)(draft),
            _ => self.base,
        }
    }

    /// Materialize (if needed) and take the draft form out of the entry.
    pub(crate) fn into_draft(self) -> M {
        let Self {
            base,
            mark,
            backing,
            seam,
        } = self;
        match backing {
            Some(draft) => draft,
            None => (seam.wrap)(base, &mark),
        }
    }
}

impl<T: PartialEq, M: PartialEq> PartialEq for Entry<T, M> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.backing == other.backing
    }
}

impl<T: fmt::Debug, M: fmt::Debug> fmt::Debug for Entry<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backing {
            Some(draft) => draft.fmt(f),
            None => self.base.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn plain_seam<T>() -> ElementSeam<T, T> {
        ElementSeam {
            wrap: |value, _| value,
            freeze: |value| value,
        }
    }

    #[test]
    fn test_draft_materializes_once() {
        let container = DirtyMark::root();
        let mut entry = Entry::new(vec![1], &container, plain_seam());

        entry.draft().push(2);
        entry.draft().push(3);
        assert_eq!(entry.draft(), &vec![1, 2, 3]);
        // Reading through `draft` never raises a flag by itself.
        assert!(!entry.is_dirty());
        assert!(!container.is_dirty());
    }

    #[test]
    fn test_clean_entry_freezes_to_baseline_identity() {
        let container = DirtyMark::root();
        let original = Rc::new("x".to_string());
        let mut entry = Entry::new(Rc::clone(&original), &container, plain_seam());

        // Materialized but never marked: the baseline survives by identity.
        let _ = entry.draft();
        let frozen = entry.freeze();
        assert!(Rc::ptr_eq(&original, &frozen));
    }

    #[test]
    fn test_set_draft_marks_and_freezes_the_backing() {
        let container = DirtyMark::root();
        let mut entry = Entry::new(1, &container, plain_seam());

        entry.set_draft(9);
        assert!(entry.is_dirty());
        assert!(container.is_dirty());
        assert_eq!(entry.freeze(), 9);
    }

    #[test]
    fn test_set_resets_backing_and_flag() {
        let container = DirtyMark::root();
        let mut entry = Entry::new(1, &container, plain_seam());

        entry.set_draft(9);
        entry.set(5);
        assert!(!entry.is_dirty());
        assert_eq!(entry.base(), &5);
        assert!(entry.backing().is_none());
        assert_eq!(entry.freeze(), 5);
    }

    #[test]
    fn test_into_draft_without_backing_wraps_the_baseline() {
        let container = DirtyMark::root();
        let entry = Entry::new(4, &container, plain_seam());
        assert_eq!(entry.into_draft(), 4);
    }

    #[test]
    fn test_debug_prefers_the_backing() {
        let container = DirtyMark::root();
        let mut entry = Entry::new(1, &container, plain_seam());
        assert_eq!(format!("{entry:?}"), "1");

        entry.set_draft(2);
        assert_eq!(format!("{entry:?}"), "2");
    }
}
