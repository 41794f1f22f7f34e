// Data models for the to-do list

use serde::{Deserialize, Serialize};

/// Storage key holding the serialized task collection
pub const TODOS_KEY: &str = "todos";

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Default list used when nothing has been persisted yet
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new(1, "Learn Next.js"),
        Task::new(2, "Explore Tailwind CSS"),
        Task::new(3, "Build a To-Do App"),
    ]
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Hands out task ids derived from the wall clock.
///
/// Ids are strictly increasing: when two tasks are created within the same
/// millisecond, or the clock steps backwards, the next id is `last + 1`.
/// Once `last` reaches `i64::MAX` the generator hands out unused ids below
/// the current minimum instead.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure future ids are above every id already in `tasks`
    pub fn observe(&mut self, tasks: &[Task]) {
        if let Some(max) = tasks.iter().map(|t| t.id).max() {
            self.last = self.last.max(max);
        }
    }

    /// Next id not present in `tasks`
    pub fn next_id(&mut self, tasks: &[Task]) -> i64 {
        self.next_at(now_ms(), tasks)
    }

    pub(crate) fn next_at(&mut self, now: i64, tasks: &[Task]) -> i64 {
        let id = if now > self.last {
            now
        } else {
            match self.last.checked_add(1) {
                Some(id) => id,
                None => return free_id(tasks),
            }
        };
        self.last = id;
        id
    }
}

fn free_id(tasks: &[Task]) -> i64 {
    let min = tasks.iter().map(|t| t.id).min().unwrap_or(0);
    if let Some(id) = min.checked_sub(1) {
        return id;
    }

    // Both ends of the range are taken: use the first gap
    let mut ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.windows(2)
        .find_map(|w| w[0].checked_add(1).filter(|candidate| *candidate < w[1]))
        .unwrap_or(0)
}
