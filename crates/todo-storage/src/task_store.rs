//! File system storage for tasks

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use todo_core::error::{Result, TodoError};
use todo_core::task::{Task, TaskId, TaskStore};
use tracing::{debug, warn};

/// Schema version written to new task files
///
/// Version 2 added the `next_id` counter.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// On-disk task document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFile {
    pub schema_version: u32,
    /// Identifier for the next new task (absent in version 1 files)
    #[serde(default)]
    pub next_id: TaskId,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskFile {
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut file = Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            next_id: 0,
            tasks,
        };
        file.next_id = file.effective_next_id();
        file
    }

    /// The stored counter, raised to one past the highest stored ID
    pub fn effective_next_id(&self) -> TaskId {
        let past_highest = self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.next_id.max(past_highest)
    }
}

/// File system based task storage
///
/// All tasks live in a single `tasks.json` under the base directory. Every
/// write replaces the file atomically.
pub struct FileSystemTaskStore {
    /// Base directory for task storage
    base_dir: PathBuf,
    /// Path of the task document
    tasks_path: PathBuf,
}

impl FileSystemTaskStore {
    /// Create a new file system storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let tasks_path = base_dir.join("tasks.json");

        let storage = Self {
            base_dir,
            tasks_path,
        };

        storage.ensure_dirs()?;
        Ok(storage)
    }

    /// Create storage in the platform data directory (~/.todo-export as fallback)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// The platform data directory for todo-export
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "todo-export", "todo-export")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".todo-export")
            })
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                TodoError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory: {}", e),
                ))
            })?;
            debug!("Created data directory: {:?}", self.base_dir);
        }
        Ok(())
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self) -> PathBuf {
        self.base_dir.join(".tasks.json.tmp")
    }

    /// Read the task document, an absent file meaning no tasks
    fn read_file(&self) -> Result<TaskFile> {
        let file = match fs::File::open(&self.tasks_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TaskFile::new(Vec::new())),
            Err(e) => return Err(TodoError::Io(e)),
        };

        let mut task_file: TaskFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| TodoError::from(e).with_context(format!("Corrupt task file {:?}", self.tasks_path)))?;

        if task_file.schema_version > CURRENT_SCHEMA_VERSION {
            warn!(
                "Task file schema {} is newer than supported {}",
                task_file.schema_version, CURRENT_SCHEMA_VERSION
            );
        }

        // Version 1 files carry no counter
        task_file.next_id = task_file.effective_next_id();
        Ok(task_file)
    }

    /// Write the document atomically (write to temp, then rename)
    fn write_file(&self, mut task_file: TaskFile) -> Result<()> {
        task_file.tasks.sort_by_key(|t| t.id);
        task_file.next_id = task_file.effective_next_id();
        task_file.schema_version = CURRENT_SCHEMA_VERSION;
        let temp_path = self.temp_path();

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            TodoError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &task_file)?;
        writer.flush()?;

        fs::rename(&temp_path, &self.tasks_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TodoError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved tasks to {:?}", self.tasks_path);
        Ok(())
    }

    /// Get base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the task document path
    pub fn tasks_path(&self) -> &PathBuf {
        &self.tasks_path
    }
}

impl TaskStore for FileSystemTaskStore {
    fn save(&self, task: &Task) -> Result<()> {
        let mut task_file = self.read_file()?;
        match task_file.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => task_file.tasks.push(task.clone()),
        }
        self.write_file(task_file)
    }

    fn load(&self, id: TaskId) -> Result<Task> {
        self.read_file()?
            .tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(TodoError::TaskNotFound(id))
    }

    fn list(&self) -> Result<Vec<Task>> {
        Ok(self.read_file()?.tasks)
    }

    fn delete(&self, id: TaskId) -> Result<()> {
        let mut task_file = self.read_file()?;
        let before = task_file.tasks.len();
        task_file.tasks.retain(|t| t.id != id);

        if task_file.tasks.len() == before {
            return Err(TodoError::TaskNotFound(id));
        }

        self.write_file(task_file)?;
        debug!("Deleted task {} from {:?}", id, self.tasks_path);
        Ok(())
    }

    fn exists(&self, id: TaskId) -> bool {
        match self.read_file() {
            Ok(task_file) => task_file.tasks.iter().any(|t| t.id == id),
            Err(e) => {
                warn!("Cannot read {:?}, treating task {} as absent: {}", self.tasks_path, id, e);
                false
            }
        }
    }

    fn next_id(&self) -> Result<TaskId> {
        Ok(self.read_file()?.next_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use todo_core::task::{NewTask, TaskManager};

    fn create_test_storage() -> (FileSystemTaskStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSystemTaskStore::new(temp_dir.path()).unwrap();
        (storage, temp_dir)
    }

    fn create_test_task(id: TaskId) -> Task {
        Task::new(id, format!("task {}", id), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
            .with_owner("local")
    }

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("data");
        let storage = FileSystemTaskStore::new(&base).unwrap();
        assert!(storage.base_dir().exists());
        assert!(!storage.tasks_path().exists());
    }

    #[test]
    fn test_empty_list() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.list().unwrap().is_empty());
        assert_eq!(storage.next_id().unwrap(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let (storage, _temp) = create_test_storage();
        let task = create_test_task(1).with_due_date(Utc.with_ymd_and_hms(2025, 1, 10, 18, 0, 0).unwrap());

        storage.save(&task).unwrap();
        assert!(storage.exists(1));

        let loaded = storage.load(1).unwrap();
        assert_eq!(loaded, task);
    }

    #[test]
    fn test_save_replaces_existing() {
        let (storage, _temp) = create_test_storage();
        storage.save(&create_test_task(1)).unwrap();

        let mut task = create_test_task(1);
        task.title = "renamed".to_string();
        storage.save(&task).unwrap();

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "renamed");
    }

    #[test]
    fn test_load_nonexistent() {
        let (storage, _temp) = create_test_storage();
        assert!(matches!(storage.load(9), Err(TodoError::TaskNotFound(9))));
    }

    #[test]
    fn test_delete() {
        let (storage, _temp) = create_test_storage();
        storage.save(&create_test_task(1)).unwrap();
        storage.save(&create_test_task(2)).unwrap();

        storage.delete(1).unwrap();
        assert!(!storage.exists(1));
        assert!(storage.exists(2));
        assert!(matches!(storage.delete(1), Err(TodoError::TaskNotFound(1))));
    }

    #[test]
    fn test_next_id_after_delete_of_last() {
        let (storage, _temp) = create_test_storage();
        storage.save(&create_test_task(1)).unwrap();
        storage.save(&create_test_task(2)).unwrap();
        storage.delete(2).unwrap();
        assert_eq!(storage.next_id().unwrap(), 3);

        // The counter is persisted, not derived from the remaining tasks
        let reopened = FileSystemTaskStore::new(storage.base_dir()).unwrap();
        assert_eq!(reopened.next_id().unwrap(), 3);
    }

    #[test]
    fn test_version_1_file_without_counter() {
        let (storage, _temp) = create_test_storage();
        let task = serde_json::to_string(&create_test_task(4)).unwrap();
        fs::write(
            storage.tasks_path(),
            format!("{{\"schema_version\": 1, \"tasks\": [{}]}}", task),
        )
        .unwrap();

        assert_eq!(storage.next_id().unwrap(), 5);
        storage.delete(4).unwrap();
        assert_eq!(storage.next_id().unwrap(), 5);
    }

    #[test]
    fn test_exists_on_corrupt_file_is_false() {
        let (storage, _temp) = create_test_storage();
        fs::write(storage.tasks_path(), "{ not json").unwrap();
        assert!(!storage.exists(1));
        assert!(storage.next_id().is_err());
    }

    #[test]
    fn test_atomic_write() {
        let (storage, _temp) = create_test_storage();
        storage.save(&create_test_task(1)).unwrap();

        assert!(!storage.temp_path().exists());
        let content = fs::read_to_string(storage.tasks_path()).unwrap();
        assert!(content.contains("schema_version"));
        assert!(content.contains("task 1"));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let (storage, _temp) = create_test_storage();
        fs::write(storage.tasks_path(), "{ not json").unwrap();
        assert!(storage.list().is_err());
    }

    #[test]
    fn test_with_task_manager() {
        let (storage, _temp) = create_test_storage();
        let manager = TaskManager::new(storage, "local");

        let first = manager.create(NewTask::new("Buy milk")).unwrap();
        let second = manager.create(NewTask::new("Pay rent")).unwrap();
        manager.set_completed(second.id, true).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let tasks = manager.list().unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().any(|t| t.id == 2 && t.completed));
    }

    #[test]
    fn test_deleted_newest_id_is_not_reissued() {
        let (storage, _temp) = create_test_storage();
        let manager = TaskManager::new(storage, "local");

        manager.create(NewTask::new("a")).unwrap();
        let dentist = manager.create(NewTask::new("Dentist")).unwrap();
        manager.delete(dentist.id).unwrap();

        let unrelated = manager.create(NewTask::new("Unrelated")).unwrap();
        assert_ne!(unrelated.id, dentist.id);
    }
}
