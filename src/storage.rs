// Key-value storage backends for the persisted task list

use crate::jsonl::{self, Keyed};
use crate::models::now_ms;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CURRENT_VERSION: u32 = 1;
const STORE_DIR: &str = ".todolist";

/// JSONL log length that triggers compaction
const COMPACT_THRESHOLD: usize = 64;

/// Synchronous string-valued key-value slot
pub trait Storage {
    /// Fetch the value for `key`, or `None` if it was never set
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value for `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Which storage backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Jsonl,
    Memory,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Jsonl => write!(f, "jsonl"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

/// Open the chosen backend rooted at `path`
pub fn open_backend(backend: Backend, path: &Path) -> Result<Box<dyn Storage>> {
    info!(%backend, path = ?path, "Opening storage");
    Ok(match backend {
        Backend::Sqlite => Box::new(SqliteStorage::open(path)?),
        Backend::Jsonl => Box::new(JsonlStorage::open(path)?),
        Backend::Memory => Box::new(MemoryStorage::new()),
    })
}

/// Create the store directory with its `.gitignore` and `.version` files
fn prepare_dir(path: &Path) -> Result<PathBuf> {
    let base_path = path.join(STORE_DIR);
    fs::create_dir_all(&base_path).context("Failed to create store directory")?;

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, "todolist.db\ntodolist.db-shm\ntodolist.db-wal\n")?;
    }

    let version_path = base_path.join(".version");
    if !version_path.exists() {
        fs::write(version_path, CURRENT_VERSION.to_string())?;
    }

    Ok(base_path)
}

// ============================================================================
// In-memory
// ============================================================================

/// Storage that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// SQLite
// ============================================================================

/// Key-value table in a SQLite database
pub struct SqliteStorage {
    base_path: PathBuf,
    db: Connection,
}

impl SqliteStorage {
    /// Open or create the database in a `.todolist` subdirectory of `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = prepare_dir(path.as_ref())?;

        let db_path = base_path.join("todolist.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let storage = Self { base_path, db };
        storage.create_schema()?;
        Ok(storage)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .context("Failed to read key from database")?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, now_ms()],
            )
            .context("Failed to write key to database")?;
        Ok(())
    }
}

// ============================================================================
// JSONL
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KvEntry {
    key: String,
    value: String,
    updated_at: i64,
}

impl Keyed for KvEntry {
    fn key(&self) -> String {
        self.key.clone()
    }
}

/// Append-only log of key-value writes; the last entry per key wins.
///
/// Once the log grows past a threshold it is compacted down to one entry
/// per key.
pub struct JsonlStorage {
    log_path: PathBuf,
    lines: usize,
}

impl JsonlStorage {
    /// Open or create the log in a `.todolist` subdirectory of `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = prepare_dir(path.as_ref())?;
        let log_path = base_path.join("kv.jsonl");
        let lines = jsonl::count_lines(&log_path)?;
        Ok(Self { log_path, lines })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl Storage for JsonlStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries: HashMap<String, KvEntry> = jsonl::read_jsonl_latest(&self.log_path)?;
        Ok(entries.remove(key).map(|e| e.value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let entry = KvEntry {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: now_ms(),
        };
        jsonl::append_jsonl(&self.log_path, &entry)?;
        self.lines += 1;

        if self.lines > COMPACT_THRESHOLD {
            self.lines = jsonl::compact_jsonl::<KvEntry>(&self.log_path)?;
        }
        Ok(())
    }
}
