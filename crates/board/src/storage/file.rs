//! File-based storage implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use super::traits::Storage;
use crate::entities::{normalize_email, Task, UserProfile};
use crate::errors::{BoardError, BoardResult};
use crate::identity::Principal;

/// On-disk shape of tasks.json. The counter lives next to the tasks so IDs
/// survive restarts and are never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TasksFile {
    #[serde(rename = "nextId")]
    next_id: u64,
    tasks: Vec<Task>,
}

impl Default for TasksFile {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    principal: Principal,
    profile: UserProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UsersFile {
    users: Vec<UserRecord>,
}

/// File-based storage implementation
pub struct FileStorage {
    /// Data root
    data_dir: PathBuf,

    /// Path to tasks.json
    tasks_file: PathBuf,

    /// Path to users.json
    users_file: PathBuf,

    /// Serializes read-modify-write cycles so concurrent handlers cannot
    /// lose updates
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a new file storage instance rooted at `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let tasks_file = data_dir.join("tasks.json");
        let users_file = data_dir.join("users.json");

        Self {
            data_dir,
            tasks_file,
            users_file,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read_json<T>(&self, path: &Path) -> BoardResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let data: T = serde_json::from_str(&content)?;
                Ok(data)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(BoardError::FileReadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> BoardResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(data)?;
        fs::write(path, content)
            .await
            .map_err(|e| BoardError::FileWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    async fn read_tasks_file(&self) -> BoardResult<TasksFile> {
        self.read_json(&self.tasks_file).await
    }

    async fn write_tasks_file(&self, data: &TasksFile) -> BoardResult<()> {
        self.write_json(&self.tasks_file, data).await
    }

    async fn read_users_file(&self) -> BoardResult<UsersFile> {
        self.read_json(&self.users_file).await
    }

    async fn write_users_file(&self, data: &UsersFile) -> BoardResult<()> {
        self.write_json(&self.users_file, data).await
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> BoardResult<()> {
        fs::create_dir_all(&self.data_dir).await?;

        if !self.tasks_file.exists() {
            self.write_tasks_file(&TasksFile::default()).await?;
        }
        if !self.users_file.exists() {
            self.write_users_file(&UsersFile::default()).await?;
        }

        Ok(())
    }

    fn storage_type(&self) -> &'static str {
        "file"
    }

    async fn next_task_id(&self) -> BoardResult<u64> {
        let _guard = self.write_lock.lock().await;

        let mut data = self.read_tasks_file().await?;
        let id = data.next_id;
        data.next_id += 1;
        self.write_tasks_file(&data).await?;
        Ok(id)
    }

    async fn insert_task(&self, task: Task) -> BoardResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut data = self.read_tasks_file().await?;
        if data.tasks.iter().any(|t| t.task_id == task.task_id) {
            return Err(BoardError::StorageError {
                reason: format!("task {} already exists", task.task_id),
            });
        }
        data.tasks.push(task);
        self.write_tasks_file(&data).await
    }

    async fn get_task(&self, task_id: u64) -> BoardResult<Option<Task>> {
        let data = self.read_tasks_file().await?;
        Ok(data.tasks.into_iter().find(|t| t.task_id == task_id))
    }

    async fn update_task(&self, task: &Task) -> BoardResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut data = self.read_tasks_file().await?;
        let slot = data
            .tasks
            .iter_mut()
            .find(|t| t.task_id == task.task_id)
            .ok_or(BoardError::TaskNotFound {
                task_id: task.task_id,
            })?;
        *slot = task.clone();
        self.write_tasks_file(&data).await
    }

    async fn list_tasks(&self) -> BoardResult<Vec<Task>> {
        let data = self.read_tasks_file().await?;
        Ok(data.tasks)
    }

    async fn list_tasks_for(&self, assignee: &Principal) -> BoardResult<Vec<Task>> {
        let data = self.read_tasks_file().await?;
        Ok(data
            .tasks
            .into_iter()
            .filter(|t| t.assigned_to == *assignee)
            .collect())
    }

    async fn get_user(&self, principal: &Principal) -> BoardResult<Option<UserProfile>> {
        let data = self.read_users_file().await?;
        Ok(data
            .users
            .into_iter()
            .find(|u| u.principal == *principal)
            .map(|u| u.profile))
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> BoardResult<Option<(Principal, UserProfile)>> {
        let wanted = normalize_email(email);
        let data = self.read_users_file().await?;
        Ok(data
            .users
            .into_iter()
            .find(|u| {
                u.profile
                    .email
                    .as_deref()
                    .is_some_and(|e| normalize_email(e) == wanted)
            })
            .map(|u| (u.principal, u.profile)))
    }

    async fn upsert_user(&self, principal: &Principal, profile: &UserProfile) -> BoardResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut data = self.read_users_file().await?;
        if let Some(record) = data.users.iter_mut().find(|u| u.principal == *principal) {
            record.profile = profile.clone();
        } else {
            data.users.push(UserRecord {
                principal: principal.clone(),
                profile: profile.clone(),
            });
        }
        self.write_users_file(&data).await
    }

    async fn delete_user(&self, principal: &Principal) -> BoardResult<bool> {
        let _guard = self.write_lock.lock().await;

        let mut data = self.read_users_file().await?;
        let before = data.users.len();
        data.users.retain(|u| u.principal != *principal);
        if data.users.len() == before {
            return Ok(false);
        }
        self.write_users_file(&data).await?;
        Ok(true)
    }

    async fn list_users(&self) -> BoardResult<Vec<(Principal, UserProfile)>> {
        let data = self.read_users_file().await?;
        Ok(data
            .users
            .into_iter()
            .map(|u| (u.principal, u.profile))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Department, TaskPriority, UserRole};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn setup_storage() -> (FileStorage, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path());
        (storage, temp)
    }

    fn principal(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn sample_task(id: u64, assignee: &str) -> Task {
        Task::new(
            id,
            "Fix AC unit",
            "Apartment 4B reports a broken AC",
            Department::Apartments,
            TaskPriority::Medium,
            principal(assignee),
            principal("mgr-1"),
            Utc::now() + Duration::days(3),
        )
    }

    #[tokio::test]
    async fn test_initialize_creates_files() {
        let (storage, temp) = setup_storage();
        storage.initialize().await.unwrap();

        assert!(temp.path().join("tasks.json").exists());
        assert!(temp.path().join("users.json").exists());
        assert_eq!(storage.storage_type(), "file");
    }

    #[tokio::test]
    async fn test_missing_files_mean_empty_state() {
        let (storage, _temp) = setup_storage();
        assert!(storage.list_tasks().await.unwrap().is_empty());
        assert!(storage.list_users().await.unwrap().is_empty());
        assert!(storage.get_task(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_task_ids_monotonic_and_survive_restart() {
        let (storage, temp) = setup_storage();
        assert_eq!(storage.next_task_id().await.unwrap(), 1);
        assert_eq!(storage.next_task_id().await.unwrap(), 2);

        // A fresh instance over the same directory continues the sequence
        let reopened = FileStorage::new(temp.path());
        assert_eq!(reopened.next_task_id().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insert_get_update_task() {
        let (storage, _temp) = setup_storage();

        let id = storage.next_task_id().await.unwrap();
        storage.insert_task(sample_task(id, "emp-1")).await.unwrap();

        let mut task = storage.get_task(id).await.unwrap().unwrap();
        assert_eq!(task.title, "Fix AC unit");

        task.title = "Fix AC unit in 4B".to_string();
        storage.update_task(&task).await.unwrap();
        let reloaded = storage.get_task(id).await.unwrap().unwrap();
        assert_eq!(reloaded.title, "Fix AC unit in 4B");
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_is_refused() {
        let (storage, _temp) = setup_storage();
        storage.insert_task(sample_task(7, "emp-1")).await.unwrap();
        let err = storage.insert_task(sample_task(7, "emp-2")).await;
        assert!(matches!(err, Err(BoardError::StorageError { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_task_errors() {
        let (storage, _temp) = setup_storage();
        let task = sample_task(99, "emp-1");
        let err = storage.update_task(&task).await;
        assert!(matches!(err, Err(BoardError::TaskNotFound { task_id: 99 })));
    }

    #[tokio::test]
    async fn test_list_tasks_for_assignee() {
        let (storage, _temp) = setup_storage();
        storage.insert_task(sample_task(1, "emp-1")).await.unwrap();
        storage.insert_task(sample_task(2, "emp-2")).await.unwrap();
        storage.insert_task(sample_task(3, "emp-1")).await.unwrap();

        let mine = storage.list_tasks_for(&principal("emp-1")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.assigned_to == principal("emp-1")));
    }

    #[tokio::test]
    async fn test_user_upsert_get_delete() {
        let (storage, _temp) = setup_storage();
        let p = principal("emp-1");
        let mut profile = UserProfile::new("Asha", UserRole::Employee, Department::Marketing);

        storage.upsert_user(&p, &profile).await.unwrap();
        assert_eq!(storage.get_user(&p).await.unwrap().unwrap().name, "Asha");

        profile.credit_points(20);
        storage.upsert_user(&p, &profile).await.unwrap();
        assert_eq!(
            storage
                .get_user(&p)
                .await
                .unwrap()
                .unwrap()
                .performance_points,
            20
        );

        assert!(storage.delete_user(&p).await.unwrap());
        assert!(!storage.delete_user(&p).await.unwrap());
        assert!(storage.get_user(&p).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_user_by_email_is_case_insensitive() {
        let (storage, _temp) = setup_storage();
        let p = principal("emp-1");
        let mut profile = UserProfile::new("Asha", UserRole::Employee, Department::Marketing);
        profile.email = Some("asha@example.com".to_string());
        storage.upsert_user(&p, &profile).await.unwrap();

        let found = storage.find_user_by_email("ASHA@Example.Com").await.unwrap();
        assert_eq!(found.unwrap().0, p);
        assert!(storage
            .find_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_corrupt_tasks_file_surfaces_parse_error() {
        let (storage, temp) = setup_storage();
        std::fs::write(temp.path().join("tasks.json"), "{not json").unwrap();

        let err = storage.list_tasks().await;
        assert!(matches!(err, Err(BoardError::JsonParseError { .. })));
    }
}
