//! String-keyed persistence backends
//!
//! The session store and the active timer each live under a single key as a
//! JSON blob. [`SqliteKv`] is the on-disk backend; [`MemoryKv`] backs tests and
//! throwaway runs.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{BilltimeError, Result};

const SCHEMA_VERSION: i32 = 1;
pub const DB_FILE_NAME: &str = "billtime.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Write several keys so that either all of them or none are stored
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()>;
}

/// In-memory backend
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// SQLite-backed key-value table
pub struct SqliteKv {
    db: Connection,
    path: PathBuf,
}

impl SqliteKv {
    /// Open or create `billtime.db` inside `data_dir`
    pub fn open_in(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        Self::open(&data_dir.join(DB_FILE_NAME))
    }

    /// Open or create the database at `path`
    ///
    /// A file SQLite reports as corrupt or not a database is copied to
    /// `*.db.backup` and recreated empty. Any other failure, such as a lock
    /// held by another process, is returned and the file is left alone.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, BUSY_TIMEOUT)
    }

    fn open_with_timeout(path: &Path, busy_timeout: Duration) -> Result<Self> {
        match Self::try_open(path, busy_timeout) {
            Ok(kv) => Ok(kv),
            Err(e) if is_corruption(&e) => {
                warn!(path = %path.display(), error = %e, "database is corrupt, recreating");
                move_aside(path)?;
                Self::try_open(path, busy_timeout)
            }
            Err(e) => Err(e),
        }
    }

    fn try_open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let db = Connection::open(path)?;
        db.busy_timeout(busy_timeout)?;
        db.pragma_update(None, "journal_mode", "WAL")?;

        let kv = Self {
            db,
            path: path.to_path_buf(),
        };
        kv.init_schema()?;
        debug!(path = %path.display(), "opened key-value store");
        Ok(kv)
    }

    fn init_schema(&self) -> Result<()> {
        self.db.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
            [],
        )?;
        let version: Option<i32> = self
            .db
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        if version.is_none() {
            self.db.execute(
                "CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                )",
                [],
            )?;
            self.db.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let tx = self.db.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn is_corruption(error: &BilltimeError) -> bool {
    matches!(
        error,
        BilltimeError::Storage(rusqlite::Error::SqliteFailure(e, _))
            if matches!(e.code, ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase)
    )
}

/// Copy the database and its WAL side files to `*.backup`, then delete them
///
/// Nothing is deleted unless every copy succeeded.
fn move_aside(path: &Path) -> Result<()> {
    let files: Vec<PathBuf> = ["", "-wal", "-shm"]
        .iter()
        .map(|suffix| side_file(path, suffix))
        .filter(|p| p.exists())
        .collect();

    for file in &files {
        std::fs::copy(file, side_file(file, ".backup"))?;
    }
    for file in &files {
        std::fs::remove_file(file)?;
    }
    Ok(())
}

fn side_file(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_kv() {
        let mut kv = MemoryKv::new();
        assert_eq!(kv.get("a").unwrap(), None);
        kv.set("a", "1").unwrap();
        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some("2".to_string()));
        kv.set_many(&[("a", "3"), ("b", "4")]).unwrap();
        assert_eq!(kv.get("a").unwrap(), Some("3".to_string()));
        assert_eq!(kv.get("b").unwrap(), Some("4".to_string()));
    }

    #[test]
    fn test_sqlite_kv_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        {
            let mut kv = SqliteKv::open_in(dir.path()).unwrap();
            kv.set("timeTrackerSessions", "[]").unwrap();
            kv.set("timeTrackerSessions", "[1]").unwrap();
        }
        let kv = SqliteKv::open_in(dir.path()).unwrap();
        assert_eq!(kv.get("timeTrackerSessions").unwrap(), Some("[1]".to_string()));
        assert_eq!(kv.get("missing").unwrap(), None);
        assert!(kv.path().ends_with(DB_FILE_NAME));
    }

    #[test]
    fn test_set_many_writes_all_keys() {
        let dir = TempDir::new().unwrap();
        let mut kv = SqliteKv::open_in(dir.path()).unwrap();
        kv.set_many(&[("timeTrackerSessions", "[]"), ("activeTimer", "{}")])
            .unwrap();
        assert_eq!(kv.get("timeTrackerSessions").unwrap(), Some("[]".to_string()));
        assert_eq!(kv.get("activeTimer").unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_locked_database_is_not_recreated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DB_FILE_NAME);
        {
            let mut kv = SqliteKv::open(&path).unwrap();
            kv.set("timeTrackerSessions", "[1]").unwrap();
        }

        let holder = Connection::open(&path).unwrap();
        holder
            .execute_batch("PRAGMA locking_mode = EXCLUSIVE; BEGIN EXCLUSIVE;")
            .unwrap();
        let result = SqliteKv::open_with_timeout(&path, Duration::from_millis(50));
        drop(holder);

        assert!(result.is_err());
        assert!(!dir.path().join("billtime.db.backup").exists());
        let kv = SqliteKv::open(&path).unwrap();
        assert_eq!(kv.get("timeTrackerSessions").unwrap(), Some("[1]".to_string()));
    }

    #[test]
    fn test_corrupt_file_kept_when_backup_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DB_FILE_NAME);
        std::fs::write(&path, b"this is definitely not a sqlite database file....").unwrap();
        // A directory in the way makes the backup copy fail
        std::fs::create_dir(dir.path().join("billtime.db.backup")).unwrap();

        assert!(SqliteKv::open(&path).is_err());
        assert_eq!(
            std::fs::read(&path).unwrap(),
            b"this is definitely not a sqlite database file...."
        );
    }

    #[test]
    fn test_sqlite_kv_recovers_from_garbage_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DB_FILE_NAME);
        std::fs::write(&path, b"this is definitely not a sqlite database file....").unwrap();

        let mut kv = SqliteKv::open(&path).unwrap();
        kv.set("k", "v").unwrap();
        assert_eq!(kv.get("k").unwrap(), Some("v".to_string()));
        assert!(dir.path().join("billtime.db.backup").exists());
    }
}
