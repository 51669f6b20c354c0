//! Dirty flag propagation.
//!
//! Every draft owns a [`DirtyMark`]: a small shared flag node linked to the
//! mark of its parent draft. Mutating a draft raises its mark, which raises
//! each ancestor mark in turn so the root knows it needs a rebuild on
//! freeze. The chain holds flag nodes only, never the parent draft itself,
//! so a child handle can outlive its parent draft without keeping it alive.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

struct Node {
    dirty: Cell<bool>,
    parent: Option<DirtyMark>,
}

/// Shared dirty flag for one draft, chained to the parent draft's mark.
///
/// Cloning a `DirtyMark` yields another handle to the same flag node.
///
/// # Examples
///
/// ```
/// use chisel_draft::DirtyMark;
///
/// let root = DirtyMark::root();
/// let child = root.child();
///
/// child.raise();
/// assert!(child.is_dirty());
/// assert!(root.is_dirty());
///
/// // Clearing is local: the child stays dirty.
/// root.clear();
/// assert!(!root.is_dirty());
/// assert!(child.is_dirty());
/// ```
#[derive(Clone)]
pub struct DirtyMark {
    node: Rc<Node>,
}

impl DirtyMark {
    /// Create a mark with no parent.
    pub fn root() -> Self {
        Self {
            node: Rc::new(Node {
                dirty: Cell::new(false),
                parent: None,
            }),
        }
    }

    /// Create a mark whose raises propagate into `self`.
    pub fn child(&self) -> Self {
        Self {
            node: Rc::new(Node {
                dirty: Cell::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Root mark, or a child of `parent` when one is given.
    pub fn adopted(parent: Option<&DirtyMark>) -> Self {
        match parent {
            Some(parent) => parent.child(),
            None => Self::root(),
        }
    }

    /// Whether this mark has been raised since creation or the last
    /// [`clear`](Self::clear).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.node.dirty.get()
    }

    /// Raise this mark and every ancestor mark.
    ///
    /// The walk stops at the first mark that is already dirty; everything
    /// above it was raised when that mark first went dirty.
    pub fn raise(&self) {
        let mut node = &self.node;
        while !node.dirty.get() {
            node.dirty.set(true);
            match &node.parent {
                Some(parent) => node = &parent.node,
                None => break,
            }
        }
    }

    /// Clear this mark only. Ancestor marks keep whatever state they had.
    #[inline]
    pub fn clear(&self) {
        self.node.dirty.set(false);
    }

    /// Handle to the parent draft's mark, if any.
    pub fn parent(&self) -> Option<DirtyMark> {
        self.node.parent.clone()
    }
}

impl Default for DirtyMark {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for DirtyMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyMark")
            .field("dirty", &self.is_dirty())
            .field("has_parent", &self.node.parent.is_some())
            .finish()
    }
}
