//! The task board and its draft wrappers.

use chisel_draft::{
    ChildField, DirtyMark, Draft, DraftCell, DraftMap, DraftSet, DraftVec, Draftable, ValueField,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            done: false,
            notes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub crew: BTreeSet<String>,
}

/// Starting point when no board file exists yet.
pub fn starter_board() -> Board {
    Board {
        name: "backlog".to_string(),
        tasks: Vec::new(),
        labels: BTreeMap::new(),
        crew: BTreeSet::new(),
    }
}

pub type NotesDraft = DraftVec<Vec<String>, String, DraftCell<String>>;
pub type TasksDraft = DraftVec<Vec<Task>, Task, TaskDraft>;
pub type LabelsDraft = DraftMap<BTreeMap<String, String>, String, String, DraftCell<String>>;
pub type CrewDraft = DraftSet<BTreeSet<String>, String, DraftCell<String>>;

pub struct TaskDraft {
    base: Task,
    mark: DirtyMark,
    title: ValueField<String>,
    done: ValueField<bool>,
    notes: ChildField<Vec<String>, NotesDraft>,
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
        self.notes = ChildField::new(|notes, parent| DraftVec::plain(notes, Some(parent)));
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
            notes: ChildField::new(|notes, parent| DraftVec::plain(notes, Some(parent))),
        }
    }
}

pub struct BoardDraft {
    base: Board,
    mark: DirtyMark,
    name: ValueField<String>,
    tasks: ChildField<Vec<Task>, TasksDraft>,
    labels: ChildField<BTreeMap<String, String>, LabelsDraft>,
    crew: ChildField<BTreeSet<String>, CrewDraft>,
}

impl BoardDraft {
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

    pub fn crew(&mut self) -> &mut CrewDraft {
        self.crew.get_or_wrap(&self.base.crew, &self.mark)
    }
}

impl Draft for BoardDraft {
    type Value = Board;

    fn base(&self) -> &Board {
        &self.base
    }

    fn mark(&self) -> &DirtyMark {
        &self.mark
    }

    fn set(&mut self, value: Board) {
        self.base = value;
        self.name = ValueField::new();
        self.tasks = ChildField::new(|tasks, parent| DraftVec::drafting(tasks, Some(parent)));
        self.labels = ChildField::new(|labels, parent| DraftMap::plain(labels, Some(parent)));
        self.crew = ChildField::new(|crew, parent| DraftSet::plain(crew, Some(parent)));
        self.mark.clear();
    }

    fn freeze(self) -> Board {
        if self.mark.is_dirty() {
            Board {
                name: self.name.freeze(&self.base.name),
                tasks: self.tasks.freeze(&self.base.tasks),
                labels: self.labels.freeze(&self.base.labels),
                crew: self.crew.freeze(&self.base.crew),
            }
        } else {
            self.base
        }
    }
}

impl Draftable for Board {
    type Draft = BoardDraft;

    fn to_draft_in(self, parent: Option<&DirtyMark>) -> BoardDraft {
        BoardDraft {
            base: self,
            mark: DirtyMark::adopted(parent),
            name: ValueField::new(),
            tasks: ChildField::new(|tasks, parent| DraftVec::drafting(tasks, Some(parent))),
            labels: ChildField::new(|labels, parent| DraftMap::plain(labels, Some(parent))),
            crew: ChildField::new(|crew, parent| DraftSet::plain(crew, Some(parent))),
        }
    }
}
