// JSONL file operations

use eyre::{Context, Result};
use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Sidecar lock file guarding appends and compaction of `path`
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Take the exclusive lock for `path`; released when the returned file drops
fn lock(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(path))
        .context("Failed to open JSONL lock file")?;
    file.lock_exclusive().context("Failed to acquire file lock")?;
    Ok(file)
}

/// Append a record to a JSONL file under an exclusive lock
pub fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let _guard = lock(path)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open JSONL file for appending")?;

    let json = serde_json::to_string(record)?;
    writeln!(file, "{}", json)?;
    file.sync_all()?; // Ensure data is flushed to disk

    Ok(())
}

/// Read all records from a JSONL file, returning the latest version per key
///
/// Lines are in write order, so for records sharing a key the last line wins.
/// Unreadable or malformed lines are skipped.
pub fn read_jsonl_latest<T>(path: &Path) -> Result<HashMap<String, T>>
where
    T: DeserializeOwned + Keyed,
{
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let file = File::open(path).context("Failed to open JSONL file")?;
    let reader = BufReader::new(file);
    let mut records: HashMap<String, T> = HashMap::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to read line, skipping"
                );
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let record: T = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to parse JSON, skipping"
                );
                continue;
            }
        };

        records.insert(record.key(), record);
    }

    debug!(file = ?path, count = records.len(), "Loaded latest records from JSONL");

    Ok(records)
}

/// Count the non-blank lines of a JSONL file; a missing file has none
pub fn count_lines(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let file = File::open(path).context("Failed to open JSONL file")?;
    let mut count = 0;
    for line in BufReader::new(file).lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

/// Rewrite a JSONL file so it holds only the latest record per key.
///
/// Writes to a temporary file and renames it over `path` while holding the
/// lock, so readers see either the old or the new file. Returns the number
/// of lines left.
pub fn compact_jsonl<T>(path: &Path) -> Result<usize>
where
    T: Serialize + DeserializeOwned + Keyed,
{
    let _guard = lock(path)?;

    let records: HashMap<String, T> = read_jsonl_latest(path)?;
    let mut keys: Vec<&String> = records.keys().collect();
    keys.sort();

    let tmp_path = path.with_extension("jsonl.tmp");
    {
        let file = File::create(&tmp_path).context("Failed to create compacted JSONL file")?;
        let mut writer = BufWriter::new(file);
        for key in &keys {
            let json = serde_json::to_string(&records[*key])?;
            writeln!(writer, "{}", json)?;
        }
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path).context("Failed to replace JSONL file with compacted copy")?;

    info!(file = ?path, count = keys.len(), "Compacted JSONL");
    Ok(keys.len())
}

/// A record addressed by key
pub trait Keyed {
    fn key(&self) -> String;
}
