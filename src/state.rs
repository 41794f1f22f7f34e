// In-memory task list state and its pure transitions
//
// Nothing in here touches storage or the terminal. Every transition reports
// what it changed so the caller can decide whether to persist and re-render.

use crate::models::{IdGenerator, Task};

/// Which task, if any, the draft is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditCursor {
    #[default]
    Idle,
    Editing(i64),
}

impl EditCursor {
    pub fn editing_id(self) -> Option<i64> {
        match self {
            EditCursor::Idle => None,
            EditCursor::Editing(id) => Some(id),
        }
    }
}

/// Result of applying a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// No-op: blank input or unknown id
    Unchanged,
    /// Only the draft or the edit cursor moved
    View,
    /// The task collection changed
    Tasks,
}

impl Change {
    pub fn needs_persist(self) -> bool {
        self == Change::Tasks
    }

    pub fn needs_render(self) -> bool {
        self != Change::Unchanged
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    /// Display order; only `submit` appends
    pub tasks: Vec<Task>,
    pub pending_input: String,
    pub cursor: EditCursor,
}

impl TaskListState {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a task, or update the one under edit.
    ///
    /// Blank drafts are ignored and leave the draft as it was.
    pub fn submit(&mut self, draft: &str, ids: &mut IdGenerator) -> Change {
        if draft.trim().is_empty() {
            return Change::Unchanged;
        }

        let change = match self.cursor {
            EditCursor::Editing(id) => {
                self.cursor = EditCursor::Idle;
                match self.tasks.iter_mut().find(|t| t.id == id) {
                    Some(task) => {
                        task.text = draft.to_string();
                        Change::Tasks
                    }
                    None => Change::View,
                }
            }
            EditCursor::Idle => {
                let id = ids.next_id(&self.tasks);
                self.tasks.push(Task::new(id, draft));
                Change::Tasks
            }
        };

        self.pending_input.clear();
        change
    }

    /// Delete the task with `id`.
    ///
    /// Removing the task under edit drops the cursor back to idle and clears
    /// the draft, so a later submit cannot target a missing task.
    pub fn remove(&mut self, id: i64) -> Change {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Change::Unchanged;
        }

        if self.cursor == EditCursor::Editing(id) {
            self.cursor = EditCursor::Idle;
            self.pending_input.clear();
        }
        Change::Tasks
    }

    pub fn toggle(&mut self, id: i64) -> Change {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                Change::Tasks
            }
            None => Change::Unchanged,
        }
    }

    /// Load a task's text into the draft and point the cursor at it
    pub fn begin_edit(&mut self, id: i64) -> Change {
        let Some(task) = self.find(id) else {
            return Change::Unchanged;
        };
        self.pending_input = task.text.clone();
        self.cursor = EditCursor::Editing(id);
        Change::View
    }

    pub fn set_draft(&mut self, text: &str) -> Change {
        if self.pending_input == text {
            return Change::Unchanged;
        }
        self.pending_input = text.to_string();
        Change::View
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_tasks;

    fn seeded() -> (TaskListState, IdGenerator) {
        let state = TaskListState::with_tasks(seed_tasks());
        let mut ids = IdGenerator::new();
        ids.observe(&state.tasks);
        (state, ids)
    }

    fn ids_of(state: &TaskListState) -> Vec<i64> {
        state.tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_submit_appends_task() {
        let (mut state, mut ids) = seeded();
        state.set_draft("Buy milk");

        let change = state.submit("Buy milk", &mut ids);

        assert_eq!(change, Change::Tasks);
        assert_eq!(state.tasks.len(), 4);
        let added = state.tasks.last().unwrap();
        assert_eq!(added.text, "Buy milk");
        assert!(!added.completed);
        assert!(seed_tasks().iter().all(|t| t.id != added.id));
        assert_eq!(state.pending_input, "");
        assert_eq!(state.cursor, EditCursor::Idle);
    }

    #[test]
    fn test_submit_blank_is_ignored() {
        let (mut state, mut ids) = seeded();
        state.set_draft("   ");

        let change = state.submit("   ", &mut ids);

        assert_eq!(change, Change::Unchanged);
        assert_eq!(state.tasks, seed_tasks());
        assert_eq!(state.pending_input, "   ");
    }

    #[test]
    fn test_submit_empty_is_ignored() {
        let (mut state, mut ids) = seeded();
        assert_eq!(state.submit("", &mut ids), Change::Unchanged);
        assert_eq!(state.tasks.len(), 3);
    }

    #[test]
    fn test_edit_round_trip() {
        let (mut state, mut ids) = seeded();
        state.toggle(2);

        assert_eq!(state.begin_edit(2), Change::View);
        assert_eq!(state.pending_input, "Explore Tailwind CSS");
        assert_eq!(state.cursor, EditCursor::Editing(2));

        let change = state.submit("New text", &mut ids);

        assert_eq!(change, Change::Tasks);
        assert_eq!(state.tasks.len(), 3);
        let task = state.find(2).unwrap();
        assert_eq!(task.text, "New text");
        assert!(task.completed);
        assert_eq!(state.cursor, EditCursor::Idle);
        assert_eq!(state.pending_input, "");
        assert_eq!(ids_of(&state), vec![1, 2, 3]);
    }

    #[test]
    fn test_blank_submit_keeps_edit_cursor() {
        let (mut state, mut ids) = seeded();
        state.begin_edit(1);

        assert_eq!(state.submit("  ", &mut ids), Change::Unchanged);
        assert_eq!(state.cursor, EditCursor::Editing(1));
    }

    #[test]
    fn test_begin_edit_unknown_id() {
        let (mut state, _) = seeded();
        state.set_draft("draft");

        assert_eq!(state.begin_edit(42), Change::Unchanged);
        assert_eq!(state.pending_input, "draft");
        assert_eq!(state.cursor, EditCursor::Idle);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let (mut state, _) = seeded();

        assert_eq!(state.toggle(1), Change::Tasks);
        assert!(state.find(1).unwrap().completed);
        assert_eq!(state.toggle(1), Change::Tasks);
        assert!(!state.find(1).unwrap().completed);
        assert_eq!(state.tasks, seed_tasks());
    }

    #[test]
    fn test_toggle_unknown_id() {
        let (mut state, _) = seeded();
        assert_eq!(state.toggle(99), Change::Unchanged);
        assert_eq!(state.tasks, seed_tasks());
    }

    #[test]
    fn test_remove_keeps_order() {
        let (mut state, _) = seeded();

        assert_eq!(state.remove(2), Change::Tasks);
        assert_eq!(ids_of(&state), vec![1, 3]);
    }

    #[test]
    fn test_remove_unknown_id() {
        let (mut state, _) = seeded();
        assert_eq!(state.remove(99), Change::Unchanged);
        assert_eq!(ids_of(&state), vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_task_under_edit_resets_cursor() {
        let (mut state, mut ids) = seeded();
        state.begin_edit(3);

        state.remove(3);

        assert_eq!(state.cursor, EditCursor::Idle);
        assert_eq!(state.pending_input, "");

        // Next submit adds instead of editing a missing task
        state.submit("Fresh", &mut ids);
        assert_eq!(state.tasks.len(), 3);
        assert_eq!(state.tasks.last().unwrap().text, "Fresh");
    }

    #[test]
    fn test_remove_other_task_keeps_cursor() {
        let (mut state, _) = seeded();
        state.begin_edit(3);

        state.remove(1);

        assert_eq!(state.cursor, EditCursor::Editing(3));
        assert_eq!(state.pending_input, "Build a To-Do App");
    }

    #[test]
    fn test_submit_with_stale_cursor_only_resets_view() {
        let (mut state, mut ids) = seeded();
        state.cursor = EditCursor::Editing(77);

        assert_eq!(state.submit("text", &mut ids), Change::View);
        assert_eq!(state.tasks, seed_tasks());
        assert_eq!(state.cursor, EditCursor::Idle);
    }

    #[test]
    fn test_change_flags() {
        assert!(Change::Tasks.needs_persist());
        assert!(!Change::View.needs_persist());
        assert!(Change::View.needs_render());
        assert!(!Change::Unchanged.needs_render());
    }
}
