use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{NewTask, SaveTask, Task, TaskFilter, TaskOrder};

/// Repository trait for Task persistence
///
/// Implementations: [`crate::PgTaskRepository`] for PostgreSQL and
/// [`InMemoryTaskRepository`] for development and tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List tasks matching `filter`
    async fn find(&self, filter: TaskFilter) -> TaskResult<Vec<Task>>;

    /// Get a task by ID
    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// Insert (`id: None`) or overwrite (`id: Some`) a task.
    ///
    /// Overwriting an id that does not exist fails with `NotFound`.
    async fn save(&self, task: SaveTask) -> TaskResult<Task>;

    /// Delete a task by ID, returning whether anything was removed
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;

    /// Count all tasks
    async fn count(&self) -> TaskResult<u64>;

    /// Insert many tasks at once
    async fn insert(&self, tasks: Vec<NewTask>) -> TaskResult<Vec<Task>>;
}

/// In-memory implementation of TaskRepository
///
/// Keyed by UUID v7 in a `BTreeMap`, so iteration follows creation order.
#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<BTreeMap<Uuid, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort `tasks` (already in id order) and apply the limit.
pub(crate) fn order_and_limit(mut tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    match filter.order_by {
        Some(TaskOrder::CompletedAsc) => tasks.sort_by_key(|t| t.completed),
        Some(TaskOrder::CompletedDesc) => tasks.sort_by_key(|t| !t.completed),
        None => {}
    }

    if let Some(limit) = filter.limit {
        tasks.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let matching = tasks
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();

        Ok(order_and_limit(matching, &filter))
    }

    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn save(&self, input: SaveTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        match input.id {
            Some(id) => {
                let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
                task.title = input.title;
                task.completed = input.completed;

                tracing::info!(task_id = %id, "Updated task");
                Ok(task.clone())
            }
            None => {
                let task = Task {
                    id: Uuid::now_v7(),
                    title: input.title,
                    completed: input.completed,
                };
                tasks.insert(task.id, task.clone());

                tracing::info!(task_id = %task.id, "Created task");
                Ok(task)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;
        let removed = tasks.remove(&id).is_some();
        if removed {
            tracing::info!(task_id = %id, "Deleted task");
        }
        Ok(removed)
    }

    async fn count(&self) -> TaskResult<u64> {
        let tasks = self.tasks.read().await;
        Ok(tasks.len() as u64)
    }

    async fn insert(&self, input: Vec<NewTask>) -> TaskResult<Vec<Task>> {
        let mut tasks = self.tasks.write().await;

        let created: Vec<Task> = input
            .into_iter()
            .map(|new| Task {
                id: Uuid::now_v7(),
                title: new.title,
                completed: new.completed,
            })
            .collect();

        for task in &created {
            tasks.insert(task.id, task.clone());
        }

        tracing::info!(count = created.len(), "Inserted tasks");
        Ok(created)
    }
}
