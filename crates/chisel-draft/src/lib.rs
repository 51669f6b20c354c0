//! Dirty-tracking draft layer over immutable values.
//!
//! `chisel-draft` provides mutable draft views over immutable values with
//! lazy materialization and upward dirty propagation, so freezing a draft
//! rebuilds only what actually changed and reuses everything else from the
//! original.
//!
//! # Core Concepts
//!
//! - **Draft**: Mutable view over an immutable value, frozen back into one
//! - **DirtyMark**: Shared dirty flag chained to the enclosing draft's flag
//! - **Draftable**: Trait connecting a value type to its draft form
//! - **DraftVec / DraftMap / DraftSet**: Container drafts with per-element laziness
//! - **Seams**: Function triples that wrap, freeze, and rebuild elements
//! - **ValueField / ChildField**: Field slots for hand-written record drafts
//!
//! # The Freeze Algebra
//!
//! ```text
//! value' = freeze(mutate(value, edits))
//! ```
//!
//! - A clean draft freezes to the value it wrapped, unchanged
//! - Freezing an untouched re-wrap of a frozen result returns it as-is
//! - A dirty draft rebuilds along the dirty path and reuses clean children
//!
//! # Quick Start
//!
//! ```
//! use chisel_draft::{Draft, DraftVec};
//!
//! let tags = vec!["alpha".to_string(), "beta".to_string()];
//!
//! let mut draft = DraftVec::plain(tags, None);
//! draft.get_at(0).unwrap().set_value("ALPHA".to_string());
//! draft.push_value("gamma".to_string());
//!
//! assert!(draft.is_dirty());
//! assert_eq!(draft.freeze(), vec!["ALPHA", "beta", "gamma"]);
//! ```
//!
//! # Record Drafts
//!
//! Record types get a hand-written draft: the immutable base, one
//! [`DirtyMark`], and a lazy field slot per field.
//!
//! ```
//! use chisel_draft::{
//!     update, ChildField, DirtyMark, Draft, DraftCell, DraftVec, Draftable, ValueField,
//! };
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Task {
//!     title: String,
//!     tags: Vec<String>,
//! }
//!
//! type TagsDraft = DraftVec<Vec<String>, String, DraftCell<String>>;
//!
//! struct TaskDraft {
//!     base: Task,
//!     mark: DirtyMark,
//!     title: ValueField<String>,
//!     tags: ChildField<Vec<String>, TagsDraft>,
//! }
//!
//! impl TaskDraft {
//!     fn title(&self) -> &str {
//!         self.title.get(&self.base.title)
//!     }
//!
//!     fn set_title(&mut self, title: impl Into<String>) {
//!         self.title.set(title.into(), &self.mark);
//!     }
//!
//!     fn tags(&mut self) -> &mut TagsDraft {
//!         self.tags.get_or_wrap(&self.base.tags, &self.mark)
//!     }
//! }
//!
//! impl Draft for TaskDraft {
//!     type Value = Task;
//!
//!     fn base(&self) -> &Task {
//!         &self.base
//!     }
//!
//!     fn mark(&self) -> &DirtyMark {
//!         &self.mark
//!     }
//!
//!     fn set(&mut self, value: Task) {
//!         self.base = value;
//!         self.title = ValueField::new();
//!         self.tags = ChildField::new(|tags, parent| DraftVec::plain(tags, Some(parent)));
//!         self.mark.clear();
//!     }
//!
//!     fn freeze(self) -> Task {
//!         if self.mark.is_dirty() {
//!             Task {
//!                 title: self.title.freeze(&self.base.title),
//!                 tags: self.tags.freeze(&self.base.tags),
//!             }
//!         } else {
//!             self.base
//!         }
//!     }
//! }
//!
//! impl Draftable for Task {
//!     type Draft = TaskDraft;
//!
//!     fn to_draft_in(self, parent: Option<&DirtyMark>) -> TaskDraft {
//!         TaskDraft {
//!             base: self,
//!             mark: DirtyMark::adopted(parent),
//!             title: ValueField::new(),
//!             tags: ChildField::new(|tags, parent| DraftVec::plain(tags, Some(parent))),
//!         }
//!     }
//! }
//!
//! let task = Task {
//!     title: "write docs".to_string(),
//!     tags: vec!["docs".to_string()],
//! };
//!
//! let updated = update(task.clone(), |draft| {
//!     draft.set_title("write more docs");
//!     draft.tags().push_value("urgent".to_string());
//!     assert_eq!(draft.title(), "write more docs");
//! });
//! assert_eq!(updated.title, "write more docs");
//! assert_eq!(updated.tags, vec!["docs", "urgent"]);
//!
//! // An edit-free pass hands the value back untouched.
//! let same = update(task.clone(), |_| {});
//! assert_eq!(same, task);
//! ```

mod draft;
mod entry;
mod error;
mod field;
mod map;
mod mark;
mod seam;
mod set;
mod source;
mod vec;

// Core draft machinery
pub use draft::{freeze, mutate, update, wrap, Draft, DraftCell, Draftable};
pub use error::{DraftError, DraftResult};
pub use mark::DirtyMark;

// Container drafts
pub use map::{DraftEntries, DraftKeys, DraftMap};
pub use seam::{CollectionSeam, MapSeam};
pub use set::DraftSet;
pub use source::{MapSource, SeqSource, SetSource};
pub use vec::{DraftVec, DraftVecCursor};

// Record field slots
pub use field::{ChildField, ValueField};
