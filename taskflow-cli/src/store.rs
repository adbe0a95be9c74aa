//! File-backed task store: the snapshot provider behind the CLI.
//!
//! The whole store is one JSON document. Writes go to a sibling temp file and
//! are renamed into place, so a concurrent reader sees either the old or the
//! new snapshot, never a torn one. Every read-modify-write holds an exclusive
//! lock on `tasks.json.lock`, so two processes editing at once cannot lose an
//! update.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use taskflow_core::{Task, TaskId, TaskSnapshotProvider, TaskStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    next_id: TaskId,
    tasks: Vec<Task>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

/// Fields supplied when creating a task; id and status are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
    pub estimated_minutes: u32,
    pub priority: u8,
}

#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Result<Vec<Task>> {
        Ok(self.load()?.tasks)
    }

    pub fn add(&self, new: NewTask) -> Result<Task> {
        self.add_at(new, Utc::now())
    }

    /// Like [`add`](Self::add), stamping `created_at` with the given instant.
    pub fn add_at(&self, new: NewTask, created_at: DateTime<Utc>) -> Result<Task> {
        let _lock = self.lock()?;
        let mut file = self.load()?;

        let mut task = Task::new(file.next_id, new.title.trim(), new.deadline)
            .with_duration(new.estimated_minutes)
            .with_priority(new.priority)
            .with_created_at(created_at);
        task.description = new.description.filter(|d| !d.trim().is_empty());
        task.validate()?;

        file.next_id += 1;
        file.tasks.push(task.clone());
        self.save(&file)?;

        debug!(task_id = task.id, "task created");
        Ok(task)
    }

    pub fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<Task> {
        let _lock = self.lock()?;
        let mut file = self.load()?;
        let Some(task) = file.tasks.iter_mut().find(|t| t.id == id) else {
            bail!("task not found: {id}");
        };
        task.status = status;
        let updated = task.clone();
        self.save(&file)?;

        debug!(task_id = id, status = %status, "task status updated");
        Ok(updated)
    }

    pub fn delete(&self, id: TaskId) -> Result<()> {
        let _lock = self.lock()?;
        let mut file = self.load()?;
        let before = file.tasks.len();
        file.tasks.retain(|t| t.id != id);
        if file.tasks.len() == before {
            bail!("task not found: {id}");
        }
        self.save(&file)?;

        debug!(task_id = id, "task deleted");
        Ok(())
    }

    /// Blocks until no other writer holds the store.
    fn lock(&self) -> Result<StoreLock> {
        let lock_path = self.path.with_extension("json.lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("open {}", lock_path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("lock {}", lock_path.display()))?;
        Ok(StoreLock { file })
    }

    fn load(&self) -> Result<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        serde_json::from_str(&s).with_context(|| format!("parse {}", self.path.display()))
    }

    fn save(&self, file: &StoreFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file).context("serialize tasks")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Releases the store lock when dropped.
struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl TaskSnapshotProvider for JsonTaskStore {
    fn snapshot(&self) -> Result<Vec<Task>> {
        self.list()
    }
}
