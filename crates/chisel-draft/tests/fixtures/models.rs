//! Record types and their hand-written drafts.

use chisel_draft::{
    ChildField, CollectionSeam, DirtyMark, Draft, DraftCell, DraftMap, DraftSet, DraftVec,
    Draftable, ValueField,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A single task. `notes` is `Arc`-backed so reuse-by-identity across
/// freezes can be asserted with `Arc::ptr_eq`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Task {
    pub title: String,
    pub done: bool,
    pub notes: Arc<Vec<String>>,
}

pub type NotesDraft = DraftVec<Arc<Vec<String>>, String, DraftCell<String>>;

fn wrap_notes(notes: Arc<Vec<String>>, parent: &DirtyMark) -> NotesDraft {
    DraftVec::new(
        notes,
        Some(parent),
        CollectionSeam::new(
            Arc::new,
            |value, parent| DraftCell::new(value, Some(parent)),
            |cell| cell.freeze(),
        ),
    )
}

pub struct TaskDraft {
    base: Task,
    mark: DirtyMark,
    title: ValueField<String>,
    done: ValueField<bool>,
    notes: ChildField<Arc<Vec<String>>, NotesDraft>,
}

impl TaskDraft {
    pub fn title(&self) -> &str {
        self.title.get(&self.base.title)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title.set(title.into(), &self.mark);
    }

    pub fn done(&self) -> bool {
        *self.done.get(&self.base.done)
    }

    pub fn set_done(&mut self, done: bool) {
        self.done.set(done, &self.mark);
    }

    pub fn notes(&mut self) -> &mut NotesDraft {
        self.notes.get_or_wrap(&self.base.notes, &self.mark)
    }
}

impl Draft for TaskDraft {
    type Value = Task;

    fn base(&self) -> &Task {
        &self.base
    }

    fn mark(&self) -> &DirtyMark {
        &self.mark
    }

    fn set(&mut self, value: Task) {
        self.base = value;
        self.title = ValueField::new();
        self.done = ValueField::new();
        self.notes = ChildField::new(wrap_notes);
        self.mark.clear();
    }

    fn freeze(self) -> Task {
        if self.mark.is_dirty() {
            Task {
                title: self.title.freeze(&self.base.title),
                done: self.done.freeze(&self.base.done),
                notes: self.notes.freeze(&self.base.notes),
            }
        } else {
            self.base
        }
    }
}

impl Draftable for Task {
    type Draft = TaskDraft;

    fn to_draft_in(self, parent: Option<&DirtyMark>) -> TaskDraft {
        TaskDraft {
            base: self,
            mark: DirtyMark::adopted(parent),
            title: ValueField::new(),
            done: ValueField::new(),
            notes: ChildField::new(wrap_notes),
        }
    }
}

/// A project: tasks draft as nested records, labels and members as plain
/// container drafts.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<Task>,
    pub labels: BTreeMap<String, String>,
    pub members: BTreeSet<String>,
}

pub type TasksDraft = DraftVec<Vec<Task>, Task, TaskDraft>;
pub type LabelsDraft = DraftMap<BTreeMap<String, String>, String, String, DraftCell<String>>;
pub type MembersDraft = DraftSet<BTreeSet<String>, String, DraftCell<String>>;

pub struct ProjectDraft {
    base: Project,
    mark: DirtyMark,
    name: ValueField<String>,
    tasks: ChildField<Vec<Task>, TasksDraft>,
    labels: ChildField<BTreeMap<String, String>, LabelsDraft>,
    members: ChildField<BTreeSet<String>, MembersDraft>,
}

impl ProjectDraft {
    pub fn name(&self) -> &str {
        self.name.get(&self.base.name)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name.set(name.into(), &self.mark);
    }

    pub fn tasks(&mut self) -> &mut TasksDraft {
        self.tasks.get_or_wrap(&self.base.tasks, &self.mark)
    }

    pub fn labels(&mut self) -> &mut LabelsDraft {
        self.labels.get_or_wrap(&self.base.labels, &self.mark)
    }

    pub fn members(&mut self) -> &mut MembersDraft {
        self.members.get_or_wrap(&self.base.members, &self.mark)
    }
}

impl Draft for ProjectDraft {
    type Value = Project;

    fn base(&self) -> &Project {
        &self.base
    }

    fn mark(&self) -> &DirtyMark {
        &self.mark
    }

    fn set(&mut self, value: Project) {
        self.base = value;
        self.name = ValueField::new();
        self.tasks = ChildField::new(|tasks, parent| DraftVec::drafting(tasks, Some(parent)));
        self.labels = ChildField::new(|labels, parent| DraftMap::plain(labels, Some(parent)));
        self.members = ChildField::new(|members, parent| DraftSet::plain(members, Some(parent)));
        self.mark.clear();
    }

    fn freeze(self) -> Project {
        if self.mark.is_dirty() {
            Project {
                name: self.name.freeze(&self.base.name),
                tasks: self.tasks.freeze(&self.base.tasks),
                labels: self.labels.freeze(&self.base.labels),
                members: self.members.freeze(&self.base.members),
            }
        } else {
            self.base
        }
    }
}

impl Draftable for Project {
    type Draft = ProjectDraft;

    fn to_draft_in(self, parent: Option<&DirtyMark>) -> ProjectDraft {
        ProjectDraft {
            base: self,
            mark: DirtyMark::adopted(parent),
            name: ValueField::new(),
            tasks: ChildField::new(|tasks, parent| DraftVec::drafting(tasks, Some(parent))),
            labels: ChildField::new(|labels, parent| DraftMap::plain(labels, Some(parent))),
            members: ChildField::new(|members, parent| DraftSet::plain(members, Some(parent))),
        }
    }
}

/// A task titled `title` with the given notes, not done.
pub fn task(title: &str, notes: &[&str]) -> Task {
    Task {
        title: title.to_string(),
        done: false,
        notes: Arc::new(notes.iter().map(|note| note.to_string()).collect()),
    }
}

/// Two tasks, two labels, two members.
pub fn sample_project() -> Project {
    Project {
        name: "launch".to_string(),
        tasks: vec![
            task("write docs", &["outline first"]),
            task("cut release", &["tag", "announce"]),
        ],
        labels: BTreeMap::from([
            ("area".to_string(), "core".to_string()),
            ("priority".to_string(), "high".to_string()),
        ]),
        members: BTreeSet::from(["ana".to_string(), "bo".to_string()]),
    }
}
