// Terminal rendering of the task list

use crate::models::Task;
use crate::state::TaskListState;
use colored::Colorize;

/// Snapshot of what the UI shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub tasks: Vec<Task>,
    pub draft: String,
    pub editing_id: Option<i64>,
}

impl View {
    pub fn from_state(state: &TaskListState) -> Self {
        Self {
            tasks: state.tasks.clone(),
            draft: state.pending_input.clone(),
            editing_id: state.cursor.editing_id(),
        }
    }

    /// Label for the submit button
    pub fn button_label(&self) -> &'static str {
        if self.editing_id.is_some() { "Update" } else { "Add" }
    }
}

fn task_line(task: &Task, editing: bool, color: bool) -> String {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let line = format!("{} {}  {}", mark, task.id, task.text);

    if !color {
        return if editing { format!("{} *", line) } else { line };
    }

    let styled = if task.completed {
        line.strikethrough().dimmed().to_string()
    } else {
        line
    };
    if editing {
        format!("{} {}", styled, "*".yellow())
    } else {
        styled
    }
}

/// Render the list followed by the input prompt
pub fn render_text(view: &View, color: bool) -> String {
    let mut out = String::new();

    if view.tasks.is_empty() {
        out.push_str("(no tasks)\n");
    }
    for task in &view.tasks {
        let editing = view.editing_id == Some(task.id);
        out.push_str(&task_line(task, editing, color));
        out.push('\n');
    }

    let label = if color {
        view.button_label().bold().to_string()
    } else {
        view.button_label().to_string()
    };
    out.push_str(&format!("{}> {}", label, view.draft));
    out
}
