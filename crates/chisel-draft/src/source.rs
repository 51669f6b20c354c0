//! Read access over wrapped containers.
//!
//! A container draft never mutates the value it wraps; it only needs to know
//! how many elements the container holds and how to pull cheap clones of
//! them out when the entry table materializes. These traits make that
//! explicit for the concrete container types drafts are built over.

use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Sequence containers a [`DraftVec`](crate::DraftVec) can wrap.
pub trait SeqSource<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Cheap clones of every element, in order.
    fn items(&self) -> Vec<T>;

    /// Whether the container holds no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map containers a [`DraftMap`](crate::DraftMap) can wrap.
pub trait MapSource<K, T> {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Cheap clones of every entry, in the container's iteration order.
    fn entries(&self) -> Vec<(K, T)>;

    /// Whether the container holds no entries.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Set containers a [`DraftSet`](crate::DraftSet) can wrap.
pub trait SetSource<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Cheap clones of every element, in the container's iteration order.
    fn items(&self) -> Vec<T>;

    /// Whether the container holds no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> SeqSource<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn items(&self) -> Vec<T> {
        self.clone()
    }
}

impl<T: Clone> SeqSource<T> for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn items(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<K: Clone, T: Clone, S> MapSource<K, T> for HashMap<K, T, S> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Vec<(K, T)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: Clone, T: Clone> MapSource<K, T> for BTreeMap<K, T> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Vec<(K, T)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: Clone, T: Clone, S> MapSource<K, T> for IndexMap<K, T, S> {
    fn len(&self) -> usize {
        IndexMap::len(self)
    }

    fn entries(&self) -> Vec<(K, T)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<T: Clone, S> SetSource<T> for HashSet<T, S> {
    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn items(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Clone> SetSource<T> for BTreeSet<T> {
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn items(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Clone, S> SetSource<T> for IndexSet<T, S> {
    fn len(&self) -> usize {
        IndexSet::len(self)
    }

    fn items(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

// Shared-ownership wrappers delegate to the container they hold.

impl<T, C: SeqSource<T>> SeqSource<T> for Arc<C> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn items(&self) -> Vec<T> {
        (**self).items()
    }
}

impl<T, C: SeqSource<T>> SeqSource<T> for Rc<C> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn items(&self) -> Vec<T> {
        (**self).items()
    }
}

impl<K, T, C: MapSource<K, T>> MapSource<K, T> for Arc<C> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn entries(&self) -> Vec<(K, T)> {
        (**self).entries()
    }
}

impl<K, T, C: MapSource<K, T>> MapSource<K, T> for Rc<C> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn entries(&self) -> Vec<(K, T)> {
        (**self).entries()
    }
}

impl<T, C: SetSource<T>> SetSource<T> for Arc<C> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn items(&self) -> Vec<T> {
        (**self).items()
    }
}

impl<T, C: SetSource<T>> SetSource<T> for Rc<C> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn items(&self) -> Vec<T> {
        (**self).items()
    }
}
