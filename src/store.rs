// Task list store: owns the state and keeps the storage slot in sync

use crate::event::Event;
use crate::models::{IdGenerator, TODOS_KEY, Task, seed_tasks};
use crate::state::{Change, TaskListState};
use crate::storage::Storage;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

/// Where the tasks came from at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydrated {
    /// Decoded from the storage slot
    Stored,
    /// Nothing stored yet, seed list loaded
    Seeded,
    /// Stored value did not decode, seed list loaded in its place
    Recovered,
}

/// The single owner of the task list.
///
/// Every mutation goes through a pure transition on [`TaskListState`]; when
/// the task collection changed, the full collection is written back to the
/// storage slot before the call returns. Write failures are logged and never
/// roll back the in-memory state.
pub struct TaskListStore<S: Storage> {
    storage: S,
    state: TaskListState,
    ids: IdGenerator,
}

impl<S: Storage> TaskListStore<S> {
    /// Create an empty, unhydrated store
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: TaskListState::default(),
            ids: IdGenerator::new(),
        }
    }

    /// Create a store and hydrate it, writing the seed list back if one was used.
    ///
    /// Fails only when the storage slot cannot be read.
    pub fn open(storage: S) -> Result<Self> {
        let mut store = Self::new(storage);
        if store.hydrate()? == Hydrated::Seeded {
            store.persist_best_effort();
        }
        Ok(store)
    }

    pub fn state(&self) -> &TaskListState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Replace the in-memory tasks with the stored collection, or the seed.
    ///
    /// Stored entries are taken verbatim; a value that does not decode is
    /// replaced by the seed list. A failed read is returned as an error and
    /// leaves the state untouched, so nothing gets written over data that
    /// could not be read. Does not write to storage.
    pub fn hydrate(&mut self) -> Result<Hydrated> {
        let raw = self.storage.get(TODOS_KEY).context("Failed to read stored tasks")?;

        let (tasks, source) = match raw {
            None => (seed_tasks(), Hydrated::Seeded),
            Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => (tasks, Hydrated::Stored),
                Err(e) => {
                    warn!(error = ?e, "Stored tasks do not decode, falling back to seed list");
                    (seed_tasks(), Hydrated::Recovered)
                }
            },
        };

        info!(count = tasks.len(), ?source, "Hydrated task list");
        self.ids.observe(&tasks);
        self.state = TaskListState::with_tasks(tasks);
        Ok(source)
    }

    /// Serialize the full task collection and overwrite the storage slot
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.state.tasks).context("Failed to serialize tasks")?;
        self.storage.set(TODOS_KEY, &json)?;
        debug!(count = self.state.tasks.len(), "Persisted tasks");
        Ok(())
    }

    fn persist_best_effort(&mut self) {
        if let Err(e) = self.persist() {
            warn!(error = ?e, "Failed to persist tasks, keeping in-memory state");
        }
    }

    fn apply(&mut self, f: impl FnOnce(&mut TaskListState, &mut IdGenerator) -> Change) -> Change {
        let change = f(&mut self.state, &mut self.ids);
        if change.needs_persist() {
            self.persist_best_effort();
        }
        change
    }

    /// Add `draft` as a new task, or write it into the task under edit
    pub fn submit(&mut self, draft: &str) -> Change {
        self.apply(|state, ids| state.submit(draft, ids))
    }

    /// Load task `id` into the draft and submit `text` over it.
    ///
    /// Unknown ids are a no-op; nothing is added.
    pub fn edit(&mut self, id: i64, text: &str) -> Change {
        if self.begin_edit(id) == Change::Unchanged {
            return Change::Unchanged;
        }
        self.submit(text)
    }

    /// Submit whatever is currently in the draft
    pub fn submit_pending(&mut self) -> Change {
        let draft = self.state.pending_input.clone();
        self.submit(&draft)
    }

    pub fn remove(&mut self, id: i64) -> Change {
        self.apply(|state, _| state.remove(id))
    }

    pub fn toggle(&mut self, id: i64) -> Change {
        self.apply(|state, _| state.toggle(id))
    }

    pub fn begin_edit(&mut self, id: i64) -> Change {
        self.apply(|state, _| state.begin_edit(id))
    }

    pub fn set_draft(&mut self, text: &str) -> Change {
        self.apply(|state, _| state.set_draft(text))
    }

    /// Route a UI event to its operation
    pub fn dispatch(&mut self, event: Event) -> Change {
        debug!(?event, "Dispatching event");
        match event {
            Event::SubmitDraft(text) => self.submit(&text),
            Event::Toggle(id) => self.toggle(id),
            Event::BeginEdit(id) => self.begin_edit(id),
            Event::Delete(id) => self.remove(id),
            Event::DraftChanged(text) => self.set_draft(&text),
        }
    }
}
