use domain_users::{UserInfo, require_admin};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{NewTask, SaveTask, Task, TaskFilter, UpdateTask};
use crate::repository::TaskRepository;

/// Tasks written on first boot into an empty store.
pub fn seed_tasks() -> Vec<NewTask> {
    vec![
        NewTask::new("Task a", false),
        NewTask::new("Task b", true),
        NewTask::new("Task c", false),
        NewTask::new("Task d", false),
        NewTask::new("Task e", true),
    ]
}

/// Service layer for Task business logic
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List tasks with filters
    pub async fn find(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        self.repository.find(filter).await
    }

    /// Get a task by ID
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get(&self, id: Uuid) -> TaskResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// Validate and upsert a task
    #[instrument(skip(self, task), fields(task_id = ?task.id))]
    pub async fn save(&self, task: SaveTask) -> TaskResult<Task> {
        task.validate()?;
        self.repository.save(task).await
    }

    /// Create a new task
    pub async fn create(&self, input: NewTask) -> TaskResult<Task> {
        self.save(input.into()).await
    }

    /// Overwrite an existing task
    pub async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        self.save(SaveTask::existing(id, input)).await
    }

    /// Delete a task
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete(&self, id: Uuid) -> TaskResult<()> {
        if !self.repository.delete(id).await? {
            return Err(TaskError::NotFound(id));
        }
        Ok(())
    }

    /// Count all tasks
    pub async fn count(&self) -> TaskResult<u64> {
        self.repository.count().await
    }

    /// Validate and bulk insert tasks
    #[instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub async fn insert(&self, tasks: Vec<NewTask>) -> TaskResult<Vec<Task>> {
        for task in &tasks {
            task.validate()?;
        }
        self.repository.insert(tasks).await
    }

    /// Insert the starter tasks when the store is empty.
    ///
    /// Returns how many tasks were written.
    #[instrument(skip(self))]
    pub async fn seed_if_empty(&self) -> TaskResult<u64> {
        if self.repository.count().await? > 0 {
            tracing::debug!("Task store not empty, skipping seed");
            return Ok(0);
        }

        let inserted = self.insert(seed_tasks()).await?;
        tracing::info!(count = inserted.len(), "Seeded task store");
        Ok(inserted.len() as u64)
    }

    /// Set `completed` on every task. Admin only.
    ///
    /// Tasks are written one at a time; a failure part-way leaves earlier
    /// writes in place.
    #[instrument(skip(self, user), fields(user = ?user.map(|u| &u.name)))]
    pub async fn set_all(&self, user: Option<&UserInfo>, completed: bool) -> TaskResult<u64> {
        require_admin(user)?;

        let tasks = self.repository.find(TaskFilter::default()).await?;
        let mut updated = 0;

        for task in tasks {
            self.repository
                .save(SaveTask {
                    id: Some(task.id),
                    title: task.title,
                    completed,
                })
                .await?;
            updated += 1;
        }

        tracing::info!(updated, completed, "Bulk updated tasks");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryTaskRepository, MockTaskRepository};
    use domain_users::{Role, UserError};
    use mockall::predicate::*;

    fn admin() -> UserInfo {
        UserInfo {
            id: "1".to_string(),
            name: "Jane".to_string(),
            roles: vec![Role::Admin],
        }
    }

    fn plain_user() -> UserInfo {
        UserInfo {
            id: "2".to_string(),
            name: "Steve".to_string(),
            roles: vec![],
        }
    }

    fn task(title: &str, completed: bool) -> Task {
        Task {
            id: Uuid::now_v7(),
            title: title.to_string(),
            completed,
        }
    }

    #[tokio::test]
    async fn test_save_with_blank_title_never_reaches_repository() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_save().never();

        let service = TaskService::new(mock_repo);
        let result = service.create(NewTask::new("  ", false)).await;

        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_missing_task_is_not_found() {
        let id = Uuid::now_v7();
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let service = TaskService::new(mock_repo);
        assert!(matches!(service.get(id).await, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_task_is_not_found() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_delete().times(1).returning(|_| Ok(false));

        let service = TaskService::new(mock_repo);
        let result = service.delete(Uuid::now_v7()).await;

        assert!(matches!(result, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_all_as_non_admin_is_forbidden_without_writes() {
        for user in [None, Some(plain_user())] {
            let mut mock_repo = MockTaskRepository::new();
            mock_repo.expect_find().never();
            mock_repo.expect_save().never();

            let service = TaskService::new(mock_repo);
            let result = service.set_all(user.as_ref(), true).await;

            assert!(matches!(
                result,
                Err(TaskError::User(UserError::Forbidden))
            ));
        }
    }

    #[tokio::test]
    async fn test_set_all_as_admin_saves_every_task() {
        let tasks = vec![task("Task a", false), task("Task b", true)];
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_find()
            .times(1)
            .returning(move |_| Ok(tasks.clone()));
        mock_repo
            .expect_save()
            .times(2)
            .withf(|t| t.id.is_some() && t.completed)
            .returning(|t| {
                Ok(Task {
                    id: t.id.unwrap(),
                    title: t.title,
                    completed: t.completed,
                })
            });

        let service = TaskService::new(mock_repo);
        assert_eq!(service.set_all(Some(&admin()), true).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_all_stops_at_first_failure() {
        let tasks = vec![task("Task a", false), task("Task b", false)];
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_find()
            .returning(move |_| Ok(tasks.clone()));
        mock_repo
            .expect_save()
            .times(1)
            .returning(|_| Err(TaskError::Internal("disk full".to_string())));

        let service = TaskService::new(mock_repo);
        assert!(service.set_all(Some(&admin()), true).await.is_err());
    }

    #[tokio::test]
    async fn test_seed_if_empty_inserts_five_tasks_once() {
        let service = TaskService::new(InMemoryTaskRepository::new());

        assert_eq!(service.seed_if_empty().await.unwrap(), 5);
        assert_eq!(service.seed_if_empty().await.unwrap(), 0);

        let completed = service
            .find(TaskFilter {
                completed: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(completed.len(), 2);
    }

    #[tokio::test]
    async fn test_set_all_as_admin_completes_everything() {
        let service = TaskService::new(InMemoryTaskRepository::new());
        service.seed_if_empty().await.unwrap();

        service.set_all(Some(&admin()), true).await.unwrap();

        let tasks = service.find(TaskFilter::default()).await.unwrap();
        assert!(tasks.iter().all(|t| t.completed));
    }

    #[tokio::test]
    async fn test_set_all_as_non_admin_leaves_store_unchanged() {
        let service = TaskService::new(InMemoryTaskRepository::new());
        service.seed_if_empty().await.unwrap();
        let before = service.find(TaskFilter::default()).await.unwrap();

        let result = service.set_all(Some(&plain_user()), true).await;

        assert!(result.is_err());
        assert_eq!(service.find(TaskFilter::default()).await.unwrap(), before);
    }
}
