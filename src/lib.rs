// todolist - single-list to-do manager persisted to a local key-value store

pub mod config;
pub mod event;
pub mod jsonl;
pub mod models;
pub mod render;
pub mod shell;
pub mod state;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use event::{Event, ShellInput};
pub use models::{IdGenerator, Task, now_ms, seed_tasks};
pub use render::{View, render_text};
pub use state::{Change, EditCursor, TaskListState};
pub use storage::{Backend, JsonlStorage, MemoryStorage, SqliteStorage, Storage, open_backend};
pub use store::{Hydrated, TaskListStore};
